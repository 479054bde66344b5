//! Play Starfall stages without a screen and report how it went.
//!
//! Usage:
//!   starfall --assets assets --seconds 90
//!   RUST_LOG=debug starfall --stage 1 --autofire 0.4

use anyhow::{bail, Context};
use clap::Parser;
use starfall::{Session, SessionState, Settings};
use starfall_engine::{AssetError, AssetSource, DirAssets, InputEvent};
use starfall_headless::GameRunner;

const CONFIG_PATH: &str = "config.json";

#[derive(Parser)]
#[command(name = "starfall")]
#[command(about = "Run Starfall stages headlessly")]
struct Args {
    /// Asset directory holding config.json and manifest.json
    #[arg(long, default_value = "assets")]
    assets: String,

    /// Manifest index of the stage to start from
    #[arg(long)]
    stage: Option<usize>,

    /// Simulated seconds to run before giving up
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Frames per second of the simulated display
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Fling a shot straight up every N seconds
    #[arg(long)]
    autofire: Option<f32>,
}

fn load_settings(assets: &DirAssets) -> anyhow::Result<Settings> {
    match assets.read_text(CONFIG_PATH) {
        Ok(text) => Ok(Settings::from_json(&text)?),
        Err(AssetError::NotFound(_)) => {
            log::warn!("no {CONFIG_PATH} under {}, using defaults", assets.root().display());
            Ok(Settings::default())
        }
        Err(err) => Err(err).context("reading settings"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.fps == 0 {
        bail!("--fps must be positive");
    }

    let assets = DirAssets::new(&args.assets);
    let settings = load_settings(&assets)?;

    let mut session = Session::new(settings, Box::new(assets));
    if let Some(index) = args.stage {
        session.start_stage(index);
    }

    let mut runner = GameRunner::new(session);
    let dt = 1.0 / args.fps as f32;
    let mut clock = 0.0_f32;
    let mut next_shot = args.autofire.unwrap_or(f32::INFINITY);

    while clock < args.seconds {
        match runner.game().state().clone() {
            SessionState::Playing => {}
            SessionState::StageCleared => {
                if !runner.game_mut().next_stage() {
                    break;
                }
            }
            SessionState::GameOver | SessionState::Failed(_) => break,
        }

        if clock >= next_shot {
            runner.push_input(InputEvent::Fling { vx: 0.0, vy: -600.0 });
            next_shot += args.autofire.unwrap_or(f32::INFINITY);
        }

        runner.tick(dt).context("fatal simulation error")?;
        clock += dt;
    }

    let session = runner.game();
    let user = session.world().user();
    log::info!(
        "finished after {:.1}s ({} frames): {:?}, score {}, lives {}",
        clock,
        runner.frames(),
        session.state(),
        user.score(),
        user.lives()
    );

    if let SessionState::Failed(message) = session.state() {
        bail!("session failed: {message}");
    }
    Ok(())
}
