use std::time::Duration;

/// 60 Hz.
pub const DEFAULT_STEP: Duration = Duration::from_nanos(16_666_667);

/// Fixed timestep accumulator.
/// Ensures the simulation advances in whole, equal steps regardless of frame time.
///
/// Time is accumulated as a `Duration` (integer nanoseconds), so the number of
/// steps produced for a total elapsed time `T` is always `floor(T / dt)` no matter
/// how `T` was split across frames. The remainder carries over to the next frame.
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt: Duration,
    /// Accumulated time not yet consumed by a step.
    accumulator: Duration,
    /// Total steps produced since creation.
    total_steps: u64,
}

impl FixedTimestep {
    /// A step that is not a positive, representable number of seconds falls
    /// back to `DEFAULT_STEP`.
    pub fn new(dt: f32) -> Self {
        match Duration::try_from_secs_f32(dt) {
            Ok(step) if !step.is_zero() => Self::from_duration(step),
            _ => {
                log::warn!("invalid fixed step {dt}, using {:?}", DEFAULT_STEP);
                Self::from_duration(DEFAULT_STEP)
            }
        }
    }

    pub fn from_duration(dt: Duration) -> Self {
        Self {
            dt: dt.max(Duration::from_nanos(1)),
            accumulator: Duration::ZERO,
            total_steps: 0,
        }
    }

    /// Add frame time (seconds) to the accumulator. Returns the number of fixed steps to run.
    /// Negative or non-finite frame times count as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        let frame = if frame_dt.is_finite() && frame_dt > 0.0 {
            Duration::from_secs_f32(frame_dt)
        } else {
            Duration::ZERO
        };
        self.accumulate_duration(frame)
    }

    /// Add an exact frame duration. Returns the number of fixed steps to run.
    pub fn accumulate_duration(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;
        let steps = self.accumulator.as_nanos() / self.dt.as_nanos();
        self.accumulator -= self.dt * steps as u32;
        self.total_steps += steps as u64;
        steps as u32
    }

    /// The fixed delta time in seconds.
    pub fn dt(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    /// Leftover time carried into the next frame.
    pub fn remainder(&self) -> Duration {
        self.accumulator
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STEP: Duration = Duration::from_micros(16_667);

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::from_duration(STEP);
        assert_eq!(ts.accumulate_duration(STEP), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a step
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one step total
        assert_eq!(steps, 1);
    }

    #[test]
    fn long_frames_are_not_capped() {
        let mut ts = FixedTimestep::from_duration(STEP);
        let steps = ts.accumulate_duration(STEP * 60);
        assert_eq!(steps, 60);
    }

    #[test]
    fn remainder_carries_over() {
        let mut ts = FixedTimestep::from_duration(Duration::from_millis(10));
        assert_eq!(ts.accumulate_duration(Duration::from_millis(25)), 2);
        assert_eq!(ts.remainder(), Duration::from_millis(5));
        assert_eq!(ts.accumulate_duration(Duration::from_millis(5)), 1);
        assert_eq!(ts.remainder(), Duration::ZERO);
    }

    #[test]
    fn bad_frame_times_count_as_zero() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.remainder(), Duration::ZERO);
    }

    #[test]
    fn unusable_step_falls_back_to_default() {
        for dt in [-0.5, 0.0, f32::NAN, f32::INFINITY, 1e30] {
            let ts = FixedTimestep::new(dt);
            assert_eq!(ts.dt(), DEFAULT_STEP.as_secs_f32(), "dt {dt}");
        }
    }

    proptest! {
        #[test]
        fn step_count_is_independent_of_frame_split(
            frames in proptest::collection::vec(0u64..100_000_000, 1..64)
        ) {
            let mut ts = FixedTimestep::from_duration(STEP);
            let mut steps = 0u64;
            for nanos in &frames {
                steps += ts.accumulate_duration(Duration::from_nanos(*nanos)) as u64;
            }
            let total: u64 = frames.iter().sum();
            prop_assert_eq!(steps, total / STEP.as_nanos() as u64);
            prop_assert_eq!(ts.total_steps(), steps);
        }
    }
}
