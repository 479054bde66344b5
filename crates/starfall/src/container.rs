//! Live entity set with two-phase destruction.
//!
//! Nothing in here removes a body while contacts are being handled:
//! `to_destroy` only flags, and `flush` (once per frame) does the removal.

use starfall_engine::{EntityId, PhysicsWorld, Rect};

use crate::entity::{Entity, FrameContext};
use crate::error::GameError;

#[derive(Debug)]
pub struct EntityContainer {
    entities: Vec<Entity>,
    pending: Vec<EntityId>,
    bounds: Rect,
    margin: f32,
}

impl EntityContainer {
    /// `bounds` is the visible world; entities are dropped once they leave it
    /// expanded by `margin`.
    pub fn new(bounds: Rect, margin: f32) -> Self {
        Self {
            entities: Vec::new(),
            pending: Vec::new(),
            bounds,
            margin,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Add an entity. Returns false (and drops nothing) if the id is already live.
    pub fn push(&mut self, entity: Entity) -> bool {
        if self.contains(entity.id) {
            log::warn!("entity {} pushed twice", entity.id);
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    /// Update every live entity in insertion order, then check world edges.
    /// Destruction requested here is deferred to `flush`.
    ///
    /// Recoverable update failures are logged. Every entity still runs when one
    /// fails fatally; the first fatal error is returned at the end.
    pub fn update(&mut self, dt: f32, cx: &mut FrameContext) -> Result<(), GameError> {
        let area = self.bounds.expand(self.margin);
        let mut requests = Vec::new();
        let mut escaped = Vec::new();
        let mut fatal = None;

        for entity in &mut self.entities {
            if entity.is_destroy_requested() {
                continue;
            }
            match entity.update(dt, cx) {
                Ok(true) => requests.push(entity.id),
                Ok(false) => {}
                Err(err) => {
                    let context = format!("entity {} update", entity.id);
                    if let Some(err) = err.escalate(&context) {
                        fatal.get_or_insert(err);
                    }
                }
            }
            if entity.checks_edges() && !area.intersects(&entity.aabb()) {
                escaped.push(entity.id);
            }
        }

        for id in requests {
            self.to_destroy(id);
        }
        for id in escaped {
            self.edge_reached(id);
        }
        fatal.map_or(Ok(()), Err)
    }

    /// Flag an entity for removal at the next flush. Safe to call repeatedly.
    /// Returns true only the first time.
    pub fn to_destroy(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        if entity.is_destroy_requested() {
            return false;
        }
        entity.mark_destroy_requested();
        self.pending.push(id);
        true
    }

    /// An entity left the world. Same as `to_destroy`.
    pub fn edge_reached(&mut self, id: EntityId) -> bool {
        let queued = self.to_destroy(id);
        if queued {
            log::debug!("entity {id} left the world");
        }
        queued
    }

    /// Whether every live entity overlaps `area`.
    pub fn is_inside(&self, area: &Rect) -> bool {
        self.entities.iter().all(|e| area.intersects(&e.aabb()))
    }

    /// Remove pending entities and their bodies. Returns how many were removed.
    pub fn flush(&mut self, physics: &mut PhysicsWorld) -> usize {
        let mut removed = 0;
        for id in std::mem::take(&mut self.pending) {
            let Some(index) = self.entities.iter().position(|e| e.id == id) else {
                continue;
            };
            let mut entity = self.entities.remove(index);
            release(&mut entity, physics);
            log::debug!("flushed entity {id}");
            removed += 1;
        }
        removed
    }

    /// Flush, then drop every remaining entity and body.
    pub fn reset(&mut self, physics: &mut PhysicsWorld) {
        self.flush(physics);
        for mut entity in self.entities.drain(..) {
            release(&mut entity, physics);
        }
    }
}

fn release(entity: &mut Entity, physics: &mut PhysicsWorld) {
    if let Some(ship) = entity.ship_mut() {
        ship.unload_all(physics);
    }
    // take() leaves None behind so a second release is a no-op
    if let Some(body) = entity.body.take() {
        physics.remove_body(&body);
    }
}
