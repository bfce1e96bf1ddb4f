pub mod api;
pub mod core;
pub mod components;
pub mod extensions;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};
pub use input::queue::{InputEvent, InputQueue};

// Extensions — decoupled optional systems
pub use extensions::{
    Easing, lerp, lerp_vec2, ease, ease_vec2,
    Scheduler, ScheduledEvent,
    TweenState, Tween, TweenId, TweenTarget, TweenLoop, TweenEvent,
};
