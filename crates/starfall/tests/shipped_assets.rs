use std::path::PathBuf;

use starfall::entity::weapon::WeaponKind;
use starfall::session::MANIFEST_PATH;
use starfall::{Session, SessionState, Settings, ShipKind, Stage};
use starfall_engine::{AssetSource, DirAssets};

fn assets() -> DirAssets {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets");
    DirAssets::new(root)
}

fn settings() -> Settings {
    let text = assets().read_text("config.json").unwrap();
    Settings::from_json(&text).unwrap()
}

#[test]
fn config_parses() {
    let settings = settings();
    assert_eq!(settings.rules.starting_lives, 3);
    assert_eq!(settings.engine.pixels_per_meter, 32.0);
}

#[test]
fn every_stage_loads_and_every_line_parses() {
    let assets = assets();
    let settings = settings();
    let manifest = assets.manifest(MANIFEST_PATH).unwrap();
    assert_eq!(manifest.stages.len(), 2);

    for (index, path) in manifest.stages.iter().enumerate() {
        let stage = Stage::load(path, &assets, &settings.rules).unwrap();
        assert_eq!(stage.number() as usize, index + 1);
        assert!(stage.descriptor.boss.kind.is_boss());

        let script = stage.scenario.script();
        assert!(!script.ships.is_empty());
        for line in &script.lines {
            assert!(line.command().is_ok(), "{path} line {}: {}", line.number, line.text());
        }
        assert!(stage.scenario.duration() > script.last_time());
    }
}

#[test]
fn manifest_names_every_sprite() {
    let manifest = assets().manifest(MANIFEST_PATH).unwrap();
    let ships = [
        ShipKind::Player,
        ShipKind::Scout,
        ShipKind::Fighter,
        ShipKind::Bomber,
        ShipKind::Cruiser,
        ShipKind::Dreadnought,
    ];
    for kind in ships {
        assert!(manifest.sprite(kind.name()).is_some(), "{}", kind.name());
    }
    let weapons = [
        WeaponKind::Laser,
        WeaponKind::Missile,
        WeaponKind::Fireball,
        WeaponKind::Shiboleet,
        WeaponKind::Blackhole,
        WeaponKind::BossOrb,
        WeaponKind::BossFlame,
    ];
    for kind in weapons {
        assert!(manifest.sprite(kind.name()).is_some(), "{}", kind.name());
    }
}

#[test]
fn session_starts_on_the_first_stage() {
    let session = Session::new(settings(), Box::new(assets()));
    assert_eq!(*session.state(), SessionState::Playing);
    assert_eq!(session.stage().map(|s| s.number()), Some(1));
    assert!(session.has_next_stage());
    assert!(session.world().player().is_some());
}
