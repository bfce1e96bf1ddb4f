// extensions/tween.rs
//
// Tween system — animated value transitions by EntityId, decoupled from
// Entity/Scene internals. "Run effect E over duration D, then fire
// continuation K": the continuation is a (kind, entity) completion event the
// game drains and dispatches after each tick.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(entity_id, Tween::scale_uniform(1.0, 1.5, 0.3, Easing::QuadOut));
//   tweens.tick(dt, &mut scene);

use std::collections::HashMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, ease, ease_vec2};

/// What property a tween animates.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Vec2, to: Vec2 },
    /// Animate Entity.rotation
    Rotation { from: f32, to: f32 },
    /// Animate Entity.scale
    Scale { from: Vec2, to: Vec2 },
    /// Animate Entity.alpha
    Alpha { from: f32, to: f32 },
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (ping-pong).
    PingPong,
}

/// Fired when a `Once` tween with an `on_complete` kind finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenEvent {
    /// Game-defined continuation kind.
    pub kind: u32,
    /// The entity the completed tween was animating.
    pub entity: EntityId,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    /// What to animate.
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    /// Elapsed time.
    pub elapsed: f32,
    /// Easing function.
    pub easing: Easing,
    /// Loop behavior.
    pub loop_mode: TweenLoop,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
    /// Optional continuation kind to emit as a TweenEvent when complete.
    pub on_complete: Option<u32>,
}

impl Tween {
    fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            forward: true,
            on_complete: None,
        }
    }

    /// Create a position tween.
    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    /// Create a rotation tween.
    pub fn rotation(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, duration, easing)
    }

    /// Create a scale tween.
    pub fn scale(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from, to }, duration, easing)
    }

    /// Create a uniform scale tween.
    pub fn scale_uniform(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::scale(Vec2::splat(from), Vec2::splat(to), duration, easing)
    }

    /// Create an alpha (fade) tween.
    pub fn alpha(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, duration, easing)
    }

    /// Fade in from transparent.
    pub fn fade_in(duration: f32, easing: Easing) -> Self {
        Self::alpha(0.0, 1.0, duration, easing)
    }

    /// Fade out to transparent.
    pub fn fade_out(duration: f32, easing: Easing) -> Self {
        Self::alpha(1.0, 0.0, duration, easing)
    }

    // -- Builder methods --

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_on_complete(mut self, kind: u32) -> Self {
        self.on_complete = Some(kind);
        self
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
    /// Completed tween events waiting to be drained.
    completed_events: Vec<TweenEvent>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity. Returns a handle for later control.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens for an entity. This is the cancellation primitive:
    /// a removed entity must never fire a stale continuation.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.tweens.retain(|_, (e, _)| *e != entity);
        self.completed_events.retain(|ev| ev.entity != entity);
    }

    /// Advance all tweens and apply to entities in the scene.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let mut completed = Vec::new();

        for (&id, (entity_id, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;

            let raw_t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };

            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            if let Some(entity) = scene.get_mut(*entity_id) {
                match tween.target {
                    TweenTarget::Position { from, to } => {
                        entity.pos = ease_vec2(from, to, t, tween.easing);
                    }
                    TweenTarget::Rotation { from, to } => {
                        entity.rotation = ease(from, to, t, tween.easing);
                    }
                    TweenTarget::Scale { from, to } => {
                        entity.scale = ease_vec2(from, to, t, tween.easing);
                    }
                    TweenTarget::Alpha { from, to } => {
                        entity.alpha = ease(from, to, t, tween.easing);
                    }
                }
            }

            if tween.elapsed >= tween.duration {
                match tween.loop_mode {
                    TweenLoop::Once => {
                        if let Some(kind) = tween.on_complete {
                            self.completed_events.push(TweenEvent {
                                kind,
                                entity: *entity_id,
                            });
                        }
                        completed.push(id);
                    }
                    TweenLoop::Loop => {
                        tween.elapsed = 0.0;
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = 0.0;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.tweens.remove(&id);
        }

        count
    }

    /// Drain completion events fired since the last drain.
    pub fn drain_completed(&mut self) -> Vec<TweenEvent> {
        std::mem::take(&mut self.completed_events)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Clear all tweens and pending events.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    #[test]
    fn tween_position() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id).with_pos(Vec2::ZERO));
        tweens.add(id, Tween::position(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            1.0,
            Easing::Linear,
        ));

        // Tick halfway
        tweens.tick(0.5, &mut scene);
        let e = scene.get(id).unwrap();
        assert!((e.pos.x - 50.0).abs() < 0.01);

        // Tick to completion
        tweens.tick(0.5, &mut scene);
        let e = scene.get(id).unwrap();
        assert!((e.pos.x - 100.0).abs() < 0.01);

        // Tween should be removed
        assert!(tweens.is_empty());
    }

    #[test]
    fn alpha_tween_writes_entity_alpha() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id));
        tweens.add(id, Tween::fade_out(1.0, Easing::Linear));

        tweens.tick(0.5, &mut scene);
        let e = scene.get(id).unwrap();
        assert!((e.alpha - 0.5).abs() < 0.01);
    }

    #[test]
    fn completion_event_carries_entity() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(7);

        scene.spawn(Entity::new(id));
        tweens.add(id, Tween::fade_out(0.3, Easing::Linear).with_on_complete(42));

        tweens.tick(0.3, &mut scene);
        let events = tweens.drain_completed();
        assert_eq!(events, vec![TweenEvent { kind: 42, entity: id }]);
        assert!(tweens.drain_completed().is_empty());
    }

    #[test]
    fn tween_loop_repeats() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id));
        tweens.add(id, Tween::rotation(0.0, std::f32::consts::PI, 1.0, Easing::Linear)
            .with_loop(TweenLoop::Loop));

        tweens.tick(1.0, &mut scene);
        // Tween should still exist
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn tween_ping_pong() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id));
        tweens.add(id, Tween::scale_uniform(1.0, 1.1, 0.8, Easing::SineInOut)
            .with_loop(TweenLoop::PingPong));

        // Go to peak
        tweens.tick(0.8, &mut scene);
        let e = scene.get(id).unwrap();
        assert!((e.scale.x - 1.1).abs() < 0.01);

        // Come back down
        tweens.tick(0.8, &mut scene);
        let e = scene.get(id).unwrap();
        assert!((e.scale.x - 1.0).abs() < 0.01);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn remove_entity_cancels_pending_events() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id));
        tweens.add(id, Tween::fade_out(0.1, Easing::Linear).with_on_complete(9));
        tweens.add(id, Tween::rotation(0.0, 1.0, 5.0, Easing::Linear));

        tweens.tick(0.1, &mut scene);
        // Completed event is queued but the entity gets removed before drain
        tweens.remove_entity(id);
        assert!(tweens.is_empty());
        assert!(tweens.drain_completed().is_empty());
    }
}
