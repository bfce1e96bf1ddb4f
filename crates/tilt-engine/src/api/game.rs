use glam::Vec2;

use crate::api::types::{EntityId, GameEvent};
use crate::components::entity::Entity;
use crate::core::physics::{BodyDesc, ColliderMaterial, CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Initial gravity vector. Tilt-driven games start at zero and steer
    /// gravity from the ambient control vector every tick.
    pub gravity: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 1024.0,
            world_height: 768.0,
            gravity: Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Runs once per fixed step, before the physics step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    /// Out-queue for the presentation layer; drained by the runner.
    pub events: Vec<GameEvent>,
    next_id: u32,
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_gravity(Vec2::ZERO)
    }

    /// Create an EngineContext with a custom gravity vector.
    pub fn with_gravity(gravity: Vec2) -> Self {
        Self {
            scene: Scene::new(),
            physics: PhysicsWorld::new(gravity),
            events: Vec::new(),
            next_id: 1,
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a presentation event.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-tick transient data (presentation events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    /// Spawn an entity with a physics body. Returns the EntityId and notifies
    /// the presentation layer.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_body(body);
        self.scene.spawn(entity);
        self.emit_event(GameEvent::EntitySpawned(id));
        id
    }

    /// Spawn a presentation-only entity (no physics body).
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        self.emit_event(GameEvent::EntitySpawned(id));
        id
    }

    /// Despawn an entity, cleaning up its physics body if present, and notify
    /// the presentation layer.
    pub fn despawn(&mut self, id: EntityId) {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                self.emit_event(GameEvent::EntityRemoved(id));
            }
            None => {
                log::debug!("despawn of unknown entity {:?} ignored", id);
            }
        }
    }

    /// Collision pairs from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the game runner after `Game::update()`.
    ///
    /// Only dynamic bodies are synced: a frozen body's entity may be driven
    /// by a tween (the death animation), and syncing it would fight the
    /// animation for the position.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                if self.physics.is_dynamic(body) {
                    entity.pos = self.physics.body_position(body);
                }
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(Vec2::new(100.0, 200.0));
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 })
            .with_position(Vec2::new(100.0, 200.0));

        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        assert!(ctx.scene.get(id).unwrap().body.is_some());
        assert_eq!(ctx.events, vec![GameEvent::EntitySpawned(id)]);
    }

    #[test]
    fn despawn_cleans_up_physics_and_notifies() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let entity = Entity::new(id);
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 });

        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());
        ctx.clear_frame_data();
        ctx.despawn(id);

        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert_eq!(ctx.events, vec![GameEvent::EntityRemoved(id)]);
    }

    #[test]
    fn step_physics_syncs_dynamic_positions() {
        let mut ctx = EngineContext::with_gravity(Vec2::new(0.0, -100.0));
        ctx.physics.set_dt(1.0 / 60.0);

        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(Vec2::new(100.0, 500.0));
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(100.0, 500.0));
        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());

        for _ in 0..10 {
            ctx.step_physics();
        }

        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.pos.y < 500.0, "Entity should fall: y={}", entity.pos.y);
    }

    #[test]
    fn frozen_body_position_not_overwritten() {
        let mut ctx = EngineContext::with_gravity(Vec2::new(0.0, -100.0));
        ctx.physics.set_dt(1.0 / 60.0);

        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(Vec2::new(100.0, 500.0));
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(100.0, 500.0));
        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());

        let body = *ctx.scene.get(id).unwrap().body.as_ref().unwrap();
        ctx.physics.set_dynamic(&body, false);

        // A tween-style external write to the frozen entity's position
        ctx.scene.get_mut(id).unwrap().pos = Vec2::new(42.0, 43.0);
        ctx.step_physics();

        let entity = ctx.scene.get(id).unwrap();
        assert_eq!(entity.pos, Vec2::new(42.0, 43.0));
    }
}
