use starfall_engine::{FixedTimestep, Game, GameConfig, InputEvent, InputQueue, RecordingSurface};

/// Generic game runner that wires up the engine loop.
///
/// A platform layer owns one runner, feeds it input as it arrives and calls
/// `tick` with the real frame time. The runner decides how many fixed steps
/// the frame owes and records the draw calls the game emits.
pub struct GameRunner<G: Game> {
    game: G,
    input: InputQueue,
    surface: RecordingSurface,
    timestep: FixedTimestep,
    config: GameConfig,
    frames: u64,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);

        Self {
            game,
            input: InputQueue::new(),
            surface: RecordingSurface::new(),
            timestep,
            config,
            frames: 0,
        }
    }

    /// Push an input event into the queue. It is seen by the next `update`.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: the fixed steps owed, one variable update, then render.
    /// Returns the number of fixed steps taken.
    pub fn tick(&mut self, dt: f32) -> Result<u32, G::Error> {
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.fixed_update(self.timestep.dt())?;
        }

        let update = self.game.update(dt, &self.input);
        // Input is consumed even when the update failed.
        self.input.drain();
        update?;

        self.game.render(&mut self.surface);
        self.frames += 1;
        Ok(steps)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Draw calls from the last rendered frame.
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn total_steps(&self) -> u64 {
        self.timestep.total_steps()
    }
}
