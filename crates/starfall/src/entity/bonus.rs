use super::weapon::WeaponKind;

/// Ammunition pickup dropped by destroyed enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bonus {
    pub weapon: WeaponKind,
    pub ammunition: u32,
}

impl Bonus {
    pub fn new(weapon: WeaponKind) -> Self {
        Self {
            weapon,
            ammunition: payload(weapon),
        }
    }
}

/// Pick a bonus from a uniform percentage in `[0, 100)`. Rarer weapons need
/// higher rolls; at or below 50 nothing drops.
pub fn roll(chance: f32) -> Option<WeaponKind> {
    match chance {
        c if c > 98.0 => Some(WeaponKind::Blackhole),
        c if c > 70.0 => Some(WeaponKind::Fireball),
        c if c > 60.0 => Some(WeaponKind::Shiboleet),
        c if c > 50.0 => Some(WeaponKind::Missile),
        _ => None,
    }
}

/// Rounds a bonus of this kind carries.
pub fn payload(weapon: WeaponKind) -> u32 {
    match weapon {
        WeaponKind::Blackhole => 1,
        WeaponKind::Fireball => 5,
        WeaponKind::Shiboleet => 10,
        WeaponKind::Missile => 15,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(roll(99.9), Some(WeaponKind::Blackhole));
        assert_eq!(roll(98.5), Some(WeaponKind::Blackhole));
        assert_eq!(roll(98.0), Some(WeaponKind::Fireball));
        assert_eq!(roll(70.5), Some(WeaponKind::Fireball));
        assert_eq!(roll(70.0), Some(WeaponKind::Shiboleet));
        assert_eq!(roll(60.5), Some(WeaponKind::Shiboleet));
        assert_eq!(roll(60.0), Some(WeaponKind::Missile));
        assert_eq!(roll(50.5), Some(WeaponKind::Missile));
        assert_eq!(roll(50.0), None);
        assert_eq!(roll(0.0), None);
    }

    #[test]
    fn blackhole_band_is_two_percent_wide() {
        // Sweep [0, 100) in 0.01 steps; each band's share matches its width.
        let mut blackholes = 0;
        let mut empties = 0;
        for step in 0..10_000 {
            match roll(step as f32 / 100.0) {
                Some(WeaponKind::Blackhole) => blackholes += 1,
                None => empties += 1,
                _ => {}
            }
        }
        assert!((195..=200).contains(&blackholes), "{blackholes}");
        assert!((5000..=5002).contains(&empties), "{empties}");
    }

    #[test]
    fn payload_matches_rarity() {
        assert_eq!(Bonus::new(WeaponKind::Blackhole).ammunition, 1);
        assert_eq!(Bonus::new(WeaponKind::Missile).ammunition, 15);
    }
}
