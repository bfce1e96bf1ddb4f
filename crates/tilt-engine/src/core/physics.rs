use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
///
/// The three bit masks follow the category/collision/contact-test model:
/// `category_bits` is what the body *is*, `collision_bits` is what physically
/// blocks it, and `contact_bits` is what it wants overlap notifications for.
/// A body whose `collision_bits` are empty never pushes anything and is built
/// as a sensor — it can be overlapped freely while still reporting contact.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub fixed_rotation: bool,
    pub linear_damping: f32,
    pub collider: ColliderDesc,
    pub category_bits: u32,
    pub collision_bits: u32,
    pub contact_bits: u32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            fixed_rotation: false,
            linear_damping: 0.0,
            collider,
            category_bits: u32::MAX,
            collision_bits: u32::MAX,
            contact_bits: 0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            fixed_rotation: true,
            linear_damping: 0.0,
            collider,
            category_bits: u32::MAX,
            collision_bits: u32::MAX,
            contact_bits: 0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body
    /// faster, so motion dies out without continuous force input.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_category(mut self, bits: u32) -> Self {
        self.category_bits = bits;
        self
    }

    /// Categories this body is physically blocked by.
    pub fn with_collision(mut self, bits: u32) -> Self {
        self.collision_bits = bits;
        self
    }

    /// Categories this body reports begin-contact events against, without
    /// necessarily colliding with them.
    pub fn with_contact_test(mut self, bits: u32) -> Self {
        self.contact_bits = bits;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A contact event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the overlap just started, `false` when it ended.
    pub started: bool,
}

// ---------------------------------------------------------------------------
// Event collector
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        std::mem::take(&mut *self.collisions.lock().unwrap())
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions.lock().unwrap().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
        // Contact forces are not part of the contact-test model.
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

// Collider user_data layout: category bits in the low word, contact-test bits
// shifted above them. Body user_data holds the EntityId.
const CONTACT_BITS_SHIFT: u32 = 32;

fn pack_mask_data(category: u32, contact: u32) -> u128 {
    category as u128 | ((contact as u128) << CONTACT_BITS_SHIFT)
}

fn unpack_mask_data(data: u128) -> (u32, u32) {
    (data as u32, (data >> CONTACT_BITS_SHIFT) as u32)
}

/// Wraps all Rapier2D boilerplate into a single struct.
///
/// Bodies carry the category/collision/contact-test masks from their
/// [`BodyDesc`]; [`PhysicsWorld::step_into`] only delivers pairs where at
/// least one side contact-tests the other's category, so a game never sees
/// events it did not ask for.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Replace the global gravity vector. Called every tick with the ambient
    /// control vector in tilt-driven games.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vec2_to_na(gravity);
    }

    /// The current global gravity vector.
    pub fn gravity(&self) -> Vec2 {
        na_to_vec2(&self.gravity)
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for contact lookups;
    /// the collider's `user_data` carries the category and contact-test bits.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .linear_damping(desc.linear_damping)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let membership = Group::from_bits_truncate(desc.category_bits);
        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            // Contact generation: anything we block against or contact-test.
            .collision_groups(InteractionGroups::new(
                membership,
                Group::from_bits_truncate(desc.collision_bits | desc.contact_bits),
            ))
            // Force resolution: only what physically blocks us.
            .solver_groups(InteractionGroups::new(
                membership,
                Group::from_bits_truncate(desc.collision_bits),
            ))
            .sensor(desc.collision_bits == 0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .user_data(pack_mask_data(desc.category_bits, desc.contact_bits))
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Switch a body between dynamic and fixed. A frozen (fixed) body stops
    /// moving immediately and generates no further contact events against
    /// other fixed bodies.
    pub fn set_dynamic(&mut self, body: &PhysicsBody, dynamic: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            let kind = if dynamic {
                RigidBodyType::Dynamic
            } else {
                RigidBodyType::Fixed
            };
            rb.set_body_type(kind, true);
        }
    }

    /// Whether a body is currently dynamic.
    pub fn is_dynamic(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_dynamic())
            .unwrap_or(false)
    }

    /// Step the simulation and collect contact events into the provided Vec.
    /// Pairs where neither side contact-tests the other's category are
    /// dropped here, mirroring the contact-test mask contract.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            if !self.contact_tested(h1, h2) {
                continue;
            }

            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the current position of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| Vec2::new(rb.translation().x, rb.translation().y))
            .unwrap_or(Vec2::ZERO)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }

    fn contact_tested(&self, h1: ColliderHandle, h2: ColliderHandle) -> bool {
        let (Some(c1), Some(c2)) = (self.colliders.get(h1), self.colliders.get(h2)) else {
            // One side is already gone (removal mid-step); a stale pair must
            // not reach dispatch.
            return false;
        };
        let (cat1, contact1) = unpack_mask_data(c1.user_data);
        let (cat2, contact2) = unpack_mask_data(c2.user_data);
        (contact1 & cat2) != 0 || (contact2 & cat1) != 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
