//! A play session: the stage sequence from the manifest, the world, and the
//! frame protocol the runner drives.

use glam::Vec2;
use starfall_engine::{AssetManifest, AssetSource, Game, GameConfig, InputEvent, InputQueue, Surface};

use crate::config::Settings;
use crate::entity::weapon::MAX_AMMUNITION;
use crate::error::GameError;
use crate::stage::Stage;
use crate::world::World;

pub const MANIFEST_PATH: &str = "manifest.json";

const HUD_TEXT: f32 = 18.0;
const BANNER_TEXT: f32 = 32.0;
const AMMO_BAR: Vec2 = Vec2::new(120.0, 6.0);
const AMMO_BAR_BACK: [f32; 4] = [1.0, 1.0, 1.0, 0.25];
const AMMO_BAR_FILL: [f32; 4] = [1.0, 0.8, 0.2, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Playing,
    StageCleared,
    GameOver,
    /// Something could not be loaded, or a fatal error stopped play.
    Failed(String),
}

pub struct Session {
    settings: Settings,
    assets: Box<dyn AssetSource>,
    manifest: AssetManifest,
    stage_index: usize,
    stage: Option<Stage>,
    world: World,
    elapsed: f32,
    state: SessionState,
}

/// Log and swallow recoverable errors; pass fatal ones up.
fn recoverable(result: Result<(), GameError>, what: &str) -> Result<(), GameError> {
    match result {
        Err(err) if !err.is_fatal() => {
            log::debug!("{what}: {err}");
            Ok(())
        }
        other => other,
    }
}

impl Session {
    /// Read the manifest and start the first stage. Load failures leave the
    /// session in `Failed` rather than returning an error.
    pub fn new(settings: Settings, assets: Box<dyn AssetSource>) -> Self {
        let world = World::new(&settings);
        let mut session = Self {
            settings,
            assets,
            manifest: AssetManifest::default(),
            stage_index: 0,
            stage: None,
            world,
            elapsed: 0.0,
            state: SessionState::Playing,
        };

        match session.assets.manifest(MANIFEST_PATH) {
            Ok(manifest) => {
                session.manifest = manifest;
                session.start_stage(0);
            }
            Err(err) => session.fail(&GameError::from(err)),
        }
        session
    }

    /// Play a single, already loaded stage.
    pub fn with_stage(settings: Settings, assets: Box<dyn AssetSource>, stage: Stage) -> Self {
        let world = World::new(&settings);
        let mut session = Self {
            settings,
            assets,
            manifest: AssetManifest::default(),
            stage_index: 0,
            stage: None,
            world,
            elapsed: 0.0,
            state: SessionState::Playing,
        };
        session.begin(stage);
        session
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load and begin stage `index` of the manifest.
    pub fn start_stage(&mut self, index: usize) {
        let Some(path) = self.manifest.stages.get(index).cloned() else {
            self.fail(&GameError::InvalidStage(format!("no stage {index} in the manifest")));
            return;
        };
        match Stage::load(&path, self.assets.as_ref(), &self.settings.rules) {
            Ok(stage) => {
                self.stage_index = index;
                self.begin(stage);
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Move on after a cleared stage. Returns false when there is none left.
    pub fn next_stage(&mut self) -> bool {
        if self.state != SessionState::StageCleared {
            return false;
        }
        let next = self.stage_index + 1;
        if next >= self.manifest.stages.len() {
            return false;
        }
        self.start_stage(next);
        self.state == SessionState::Playing
    }

    pub fn has_next_stage(&self) -> bool {
        self.stage_index + 1 < self.manifest.stages.len()
    }

    fn begin(&mut self, mut stage: Stage) {
        self.world.reset();
        stage.scenario.reset();
        self.world.spawn_player();
        self.elapsed = 0.0;
        self.state = SessionState::Playing;
        log::info!("stage {} \"{}\" started", stage.number(), stage.descriptor.name);
        self.stage = Some(stage);
    }

    fn fail(&mut self, err: &GameError) {
        log::error!("session failed: {err}");
        self.state = SessionState::Failed(err.to_string());
    }

    /// Record a fatal error as the session state and pass it on.
    fn check(&mut self, result: Result<(), GameError>) -> Result<(), GameError> {
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    fn handle_input(&mut self, event: &InputEvent) -> Result<(), GameError> {
        let Some(player) = self.world.user().ship else {
            return Ok(());
        };
        let converter = *self.world.converter();

        match *event {
            InputEvent::PointerDown { .. } => {
                recoverable(self.world.load_weapon(player).map(|_| ()), "load")
            }
            InputEvent::PointerUp { x, y } => {
                let loaded = self
                    .world
                    .player()
                    .and_then(|e| e.ship())
                    .and_then(|s| s.active_weapon())
                    .is_some_and(|w| w.is_loaded());
                if !loaded {
                    return Ok(());
                }
                let from = self.world.player_pos().unwrap_or(Vec2::ZERO);
                let aim = converter.to_world(Vec2::new(x, y)) - from;
                recoverable(self.world.fire_along(player, aim).map(|_| ()), "fire")
            }
            InputEvent::Drag { vx, vy } => {
                self.world.steer(player, converter.velocity_to_world(Vec2::new(vx, vy)))
            }
            InputEvent::Fling { vx, vy } => {
                let direction = converter.velocity_to_world(Vec2::new(vx, vy));
                recoverable(self.world.fire_along(player, direction).map(|_| ()), "fire")
            }
            InputEvent::Loop => self.world.start_loop(player).map(|_| ()),
            InputEvent::SelectWeapon { index } => self.world.select_weapon(player, index),
        }
    }

    fn draw_hud(&self, surface: &mut dyn Surface) {
        let user = self.world.user();
        surface.draw_text(&format!("SCORE {}", user.score()), Vec2::new(8.0, 8.0), HUD_TEXT);
        surface.draw_text(&format!("LIVES {}", user.lives()), Vec2::new(8.0, 30.0), HUD_TEXT);

        if let Some(weapon) = self.world.player().and_then(|e| e.ship()).and_then(|s| s.active_weapon()) {
            let width = self.world.converter().screen_size().x;
            let left = width - 140.0;
            surface.draw_text(
                &format!("{} x{}", weapon.kind().name().to_uppercase(), weapon.ammunition()),
                Vec2::new(left, 8.0),
                HUD_TEXT,
            );

            let fill = weapon.ammunition() as f32 / MAX_AMMUNITION as f32;
            let top = Vec2::new(left, 30.0);
            surface.draw_rect(top, top + AMMO_BAR, AMMO_BAR_BACK);
            surface.draw_rect(top, top + AMMO_BAR * Vec2::new(fill, 1.0), AMMO_BAR_FILL);
        }

        let banner = match &self.state {
            SessionState::Playing => return,
            SessionState::StageCleared => "STAGE CLEAR".to_string(),
            SessionState::GameOver => "GAME OVER".to_string(),
            SessionState::Failed(message) => format!("ERROR: {message}"),
        };
        let center = self.world.converter().screen_size() * 0.5;
        surface.draw_text(&banner, Vec2::new(16.0, center.y), BANNER_TEXT);
    }
}

impl Game for Session {
    type Error = GameError;

    fn config(&self) -> GameConfig {
        self.settings.engine.clone()
    }

    fn fixed_update(&mut self, _dt: f32) -> Result<(), GameError> {
        if self.state != SessionState::Playing {
            return Ok(());
        }
        let result = self.world.fixed_step();
        self.check(result)
    }

    fn update(&mut self, dt: f32, input: &InputQueue) -> Result<(), GameError> {
        if self.state != SessionState::Playing {
            return Ok(());
        }

        for event in input.iter() {
            let result = self.handle_input(event);
            self.check(result)?;
        }

        self.elapsed += dt;
        let result = self.world.update(dt);
        self.check(result)?;

        if let Some(stage) = self.stage.as_mut() {
            let result = stage.scenario.action(self.elapsed, &mut self.world);
            self.check(result)?;
        }
        let result = self.world.drain();
        self.check(result)?;
        self.world.flush();

        if self.world.user().is_game_over() {
            log::info!("game over at {:.1}s", self.elapsed);
            self.state = SessionState::GameOver;
        } else if self.stage.as_ref().is_some_and(|s| s.scenario.has_finished(&self.world)) {
            log::info!("stage cleared with score {}", self.world.user().score());
            self.state = SessionState::StageCleared;
        }
        Ok(())
    }

    fn render(&self, surface: &mut dyn Surface) {
        let background = self.stage.as_ref().map_or("", |s| s.background());
        surface.begin(background);
        self.world.render(surface);
        self.draw_hud(surface);
    }
}
