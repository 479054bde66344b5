use starfall_engine::EntityId;

/// The person playing: lives, score and the ship they control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    lives: u32,
    score: u32,
    pub ship: Option<EntityId>,
}

impl User {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            score: 0,
            ship: None,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Take one life. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lives_run_out() {
        let mut user = User::new(2);
        assert_eq!(user.lose_life(), 1);
        assert!(!user.is_game_over());
        assert_eq!(user.lose_life(), 0);
        assert_eq!(user.lose_life(), 0);
        assert!(user.is_game_over());
    }

    #[test]
    fn score_accumulates() {
        let mut user = User::new(3);
        user.add_score(100);
        user.add_score(50);
        assert_eq!(user.score(), 150);
    }
}
