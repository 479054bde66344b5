//! One-shot frame playback for multi-frame sprites (loop maneuvers, impacts).

/// Which sprite frames to show and for how long each.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    /// Frame indices into the sprite's strip.
    pub frames: Vec<u32>,
    /// Seconds per frame.
    pub frame_duration: f32,
}

impl AnimationDef {
    /// A strip of `count` frames stretched to last exactly `seconds`.
    pub fn timed(count: u32, seconds: f32) -> Self {
        let count = count.max(1);
        Self {
            frames: (0..count).collect(),
            frame_duration: seconds.max(f32::EPSILON) / count as f32,
        }
    }

    fn duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }
}

/// Playback state. Stops on the last frame.
#[derive(Debug, Clone)]
pub struct Animation {
    def: AnimationDef,
    frame_index: usize,
    frame_timer: f32,
    elapsed: f32,
}

impl Animation {
    pub fn new(def: AnimationDef) -> Self {
        Self {
            def,
            frame_index: 0,
            frame_timer: 0.0,
            elapsed: 0.0,
        }
    }

    /// Current sprite frame, or 0 for an empty definition.
    pub fn frame(&self) -> u32 {
        self.def.frames.get(self.frame_index).copied().unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.def.duration()
    }

    /// Fraction played so far, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let total = self.def.duration();
        if total <= 0.0 {
            return 1.0;
        }
        (self.elapsed / total).min(1.0)
    }

    /// Advance by `dt` seconds. Returns true if the frame changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.def.frames.is_empty() || self.is_finished() {
            return false;
        }

        self.elapsed += dt;
        self.frame_timer += dt;
        let last = self.def.frames.len() - 1;
        let mut frame_changed = false;

        while self.frame_timer >= self.def.frame_duration && self.frame_index < last {
            self.frame_timer -= self.def.frame_duration;
            self.frame_index += 1;
            frame_changed = true;
        }
        frame_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_spreads_frames_evenly() {
        let def = AnimationDef::timed(4, 1.0);
        assert_eq!(def.frames, vec![0, 1, 2, 3]);
        assert!((def.frame_duration - 0.25).abs() < 1e-6);
    }

    #[test]
    fn ticks_through_frames() {
        let mut anim = Animation::new(AnimationDef::timed(4, 0.4));
        assert_eq!(anim.frame(), 0);
        assert!(anim.tick(0.15));
        assert_eq!(anim.frame(), 1);
        assert!(!anim.tick(0.01));
    }

    #[test]
    fn timed_animation_finishes_on_last_frame() {
        let mut anim = Animation::new(AnimationDef::timed(3, 0.3));
        anim.tick(0.1);
        assert!(!anim.is_finished());
        assert!((anim.progress() - 1.0 / 3.0).abs() < 1e-3);

        anim.tick(0.25);
        assert!(anim.is_finished());
        assert_eq!(anim.frame(), 2);
        assert_eq!(anim.progress(), 1.0);
        assert!(!anim.tick(1.0));
    }

    #[test]
    fn zero_length_is_finished_at_once() {
        let anim = Animation::new(AnimationDef { frames: Vec::new(), frame_duration: 0.0 });
        assert!(anim.is_finished());
        assert_eq!(anim.frame(), 0);
        assert_eq!(anim.progress(), 1.0);
    }
}
