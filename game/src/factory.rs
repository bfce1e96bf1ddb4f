//! Entity construction: turns level descriptors into scene entities with the
//! right bodies, masks, tags, and idle animations.

use glam::Vec2;

use tilt_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, Easing, EngineContext, Entity, EntityId, Tween,
    TweenLoop, TweenState,
};

use crate::categories::{Category, PLAYER_CONTACT_MASK, TAG_FINISH, TAG_STAR, TAG_VORTEX};
use crate::level::EntityDescriptor;

/// Velocity decay on the player ball. Keeps it from skating forever once the
/// tilt vector drops.
pub const PLAYER_DAMPING: f32 = 0.5;

const VORTEX_SPIN_DURATION: f32 = 1.0;
const STAR_PULSE_DURATION: f32 = 0.8;
const STAR_PULSE_SCALE: f32 = 1.1;
const STAR_WOBBLE_DURATION: f32 = 2.0;
const STAR_WOBBLE_ANGLE: f32 = 0.2;

/// Spawns maze entities for a fixed tile size.
#[derive(Debug, Clone, Copy)]
pub struct EntityFactory {
    tile_size: f32,
}

impl EntityFactory {
    pub fn new(tile_size: f32) -> Self {
        Self { tile_size }
    }

    /// Spawn one level node from a parsed descriptor.
    pub fn spawn(
        &self,
        ctx: &mut EngineContext,
        tweens: &mut TweenState,
        desc: &EntityDescriptor,
    ) -> EntityId {
        match desc.category {
            Category::Wall => self.spawn_wall(ctx, desc.position),
            Category::Star => self.spawn_marker(ctx, tweens, desc.position, Category::Star),
            Category::Vortex => self.spawn_marker(ctx, tweens, desc.position, Category::Vortex),
            Category::Finish => self.spawn_marker(ctx, tweens, desc.position, Category::Finish),
            // Player cells never appear in level text
            Category::Player => self.spawn_player(ctx, desc.position),
        }
    }

    fn spawn_wall(&self, ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let half = self.tile_size / 2.0;
        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(pos);
        let body = BodyDesc::fixed(ColliderDesc::Cuboid {
            half_width: half,
            half_height: half,
        })
        .with_position(pos)
        .with_category(Category::Wall.bits())
        .with_collision(Category::Player.bits());
        ctx.spawn_with_body(entity, body, ColliderMaterial::default())
    }

    /// Stars, vortices and the finish marker share a shape: a static sensor
    /// circle that only ever reports contact with the player.
    fn spawn_marker(
        &self,
        ctx: &mut EngineContext,
        tweens: &mut TweenState,
        pos: Vec2,
        category: Category,
    ) -> EntityId {
        let tag = match category {
            Category::Star => TAG_STAR,
            Category::Vortex => TAG_VORTEX,
            Category::Finish => TAG_FINISH,
            _ => "",
        };

        let id = ctx.next_id();
        let entity = Entity::new(id).with_tag(tag).with_pos(pos);
        let body = BodyDesc::fixed(ColliderDesc::Ball {
            radius: self.tile_size / 2.0,
        })
        .with_position(pos)
        .with_category(category.bits())
        .with_collision(0)
        .with_contact_test(Category::Player.bits());
        ctx.spawn_with_body(entity, body, ColliderMaterial::default());

        match category {
            Category::Vortex => {
                tweens.add(
                    id,
                    Tween::rotation(0.0, std::f32::consts::PI, VORTEX_SPIN_DURATION, Easing::Linear)
                        .with_loop(TweenLoop::Loop),
                );
            }
            Category::Star => {
                tweens.add(
                    id,
                    Tween::scale_uniform(
                        1.0,
                        STAR_PULSE_SCALE,
                        STAR_PULSE_DURATION,
                        Easing::SineInOut,
                    )
                    .with_loop(TweenLoop::PingPong),
                );
                tweens.add(
                    id,
                    Tween::rotation(0.0, STAR_WOBBLE_ANGLE, STAR_WOBBLE_DURATION, Easing::SineInOut)
                        .with_loop(TweenLoop::PingPong),
                );
            }
            _ => {}
        }

        id
    }

    /// Spawn the player ball: dynamic, rotation-locked, damped, blocked by
    /// walls and contact-testing everything collectible or deadly.
    pub fn spawn_player(&self, ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let entity = Entity::new(id).with_pos(pos);
        let body = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: self.tile_size / 2.0,
        })
        .with_position(pos)
        .with_fixed_rotation(true)
        .with_linear_damping(PLAYER_DAMPING)
        .with_category(Category::Player.bits())
        .with_collision(Category::Wall.bits())
        .with_contact_test(PLAYER_CONTACT_MASK);
        ctx.spawn_with_body(entity, body, ColliderMaterial::default())
    }
}
