use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::physics::PhysicsBody;

/// Fat entity — a single struct with optional parts.
/// Designed for simplicity and small scenes over ECS purity.
///
/// The transform fields (pos/rotation/scale/alpha) are the contract with the
/// presentation collaborator: a renderer mirrors them each frame, the engine
/// never draws anything itself.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Contact-dispatch tag ("star", "vortex", "finish"). Entities that never
    /// need tag dispatch (walls, the player) leave it empty.
    pub tag: String,
    /// Position in world space.
    pub pos: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Scale factor (1.0 = natural size).
    pub scale: Vec2,
    /// Presentation opacity in [0, 1].
    pub alpha: f32,
    /// Physics body backing this entity, if any.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            pos: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            alpha: 1.0,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }
}
