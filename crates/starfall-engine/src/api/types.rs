/// Unique identifier for a simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved id stamped on static bodies that are not entities (walls).
    pub const NONE: EntityId = EntityId(0);
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision filter: which category a body belongs to and which categories it touches.
/// Values are opaque bitmasks chosen by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    /// Same category, touches nothing.
    pub const fn untouchable(self) -> Self {
        Self { category: self.category, mask: 0 }
    }

    /// Both sides must accept each other for a contact to happen.
    pub fn accepts(&self, other: &CollisionFilter) -> bool {
        self.mask & other.category != 0 && other.mask & self.category != 0
    }
}
