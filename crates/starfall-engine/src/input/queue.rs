/// Input events the engine understands.
///
/// Touch traces are classified before they get here: the core only sees a press
/// position, a release velocity, or a discrete gesture. Positions and velocities
/// are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch began at screen coordinates (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch ended at screen coordinates (x, y) without a fling.
    PointerUp { x: f32, y: f32 },
    /// A drag with the given velocity (pixels/s).
    Drag { vx: f32, vy: f32 },
    /// A release with the given fling velocity (pixels/s).
    Fling { vx: f32, vy: f32 },
    /// The loop gesture was recognized.
    Loop,
    /// A weapon slot was tapped.
    SelectWeapon { index: usize },
}

/// A queue of input events.
/// The platform layer writes events; the game reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
