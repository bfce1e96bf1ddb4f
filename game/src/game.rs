//! The maze game itself: level lifecycle, contact outcomes, scoring, and the
//! timed sequences for death, collection, and level advance.

use glam::Vec2;

use tilt_engine::{
    CollisionPair, Easing, EngineContext, Entity, EntityId, Game, GameConfig, GameEvent,
    InputQueue, Scheduler, Tween, TweenState,
};

use crate::categories::{TAG_FINISH, TAG_STAR, TAG_VORTEX};
use crate::control::ControlSource;
use crate::factory::EntityFactory;
use crate::level::{EntityDescriptor, LevelError, LevelSet};

const FIXED_DT: f32 = 1.0 / 60.0;
const WORLD_WIDTH: f32 = 1024.0;
const WORLD_HEIGHT: f32 = 768.0;

// Continuation kinds dispatched when a tween or scheduled delay finishes.
const SEQ_RESPAWN: u32 = 1;
const SEQ_REMOVE_ENTITY: u32 = 2;
const SEQ_REMOVE_PLAYER: u32 = 3;
const SEQ_BANNER_START: u32 = 4;
const SEQ_BANNER_SHOWN: u32 = 5;
const SEQ_BANNER_SCALED: u32 = 6;
const SEQ_NEXT_LEVEL: u32 = 7;

const DEATH_DURATION: f32 = 0.25;
const COLLECT_DURATION: f32 = 0.3;
const FINISH_FADE_DURATION: f32 = 0.3;
const PLAYER_SHRINK_DURATION: f32 = 0.25;
const PLAYER_REMOVE_DELAY: f32 = 0.1;
const BANNER_DELAY: f32 = 0.3;
const BANNER_FADE_DURATION: f32 = 0.7;
const BANNER_SCALE_DURATION: f32 = 0.3;
const BANNER_SCALE_TO: f32 = 1.3;

const STAR_SCORE: u32 = 1;
const VORTEX_PENALTY: u32 = 1;
const FINISH_SCORE: u32 = 3;

// The shrink animations end at a near-zero scale rather than zero so the
// presentation never divides by a degenerate transform.
const SHRINK_SCALE: f32 = 0.0001;

/// Where the game is in its contact-outcome state machine. Contacts only
/// have outcomes while `Playing`; the other phases run timed sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Playing,
    Dying,
    Advancing,
}

/// The marble maze game.
pub struct MazeGame {
    levels: LevelSet,
    /// Parsed once at startup; a broken level file fails construction.
    parsed: Vec<Vec<EntityDescriptor>>,
    factory: EntityFactory,
    control: Box<dyn ControlSource>,
    tweens: TweenState,
    scheduler: Scheduler,
    phase: Phase,
    score: u32,
    /// 1-based level index.
    level: u32,
    player: Option<EntityId>,
    banner: Option<EntityId>,
    level_nodes: Vec<EntityId>,
}

impl std::fmt::Debug for MazeGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MazeGame")
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl MazeGame {
    /// Build the game over a level set, validating every level up front.
    pub fn new(levels: LevelSet, control: Box<dyn ControlSource>) -> Result<Self, LevelError> {
        let parsed = levels.parse_all()?;
        let factory = EntityFactory::new(levels.tile_size());
        Ok(Self {
            levels,
            parsed,
            factory,
            control,
            tweens: TweenState::new(),
            scheduler: Scheduler::new(),
            phase: Phase::Playing,
            score: 0,
            level: 1,
            player: None,
            banner: None,
            level_nodes: Vec::new(),
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current 1-based level index.
    pub fn level(&self) -> u32 {
        self.level
    }

    fn set_score(&mut self, ctx: &mut EngineContext, score: u32) {
        self.score = score;
        ctx.emit_event(GameEvent::ScoreChanged(score));
    }

    fn set_level(&mut self, ctx: &mut EngineContext, level: u32) {
        self.level = level;
        ctx.emit_event(GameEvent::LevelChanged(level));
    }

    fn load_level(&mut self, ctx: &mut EngineContext) {
        let descriptors = self.parsed[(self.level - 1) as usize].clone();
        for desc in &descriptors {
            let id = self.factory.spawn(ctx, &mut self.tweens, desc);
            self.level_nodes.push(id);
        }
        log::info!("level {} loaded, {} nodes", self.level, self.level_nodes.len());
    }

    fn spawn_player(&mut self, ctx: &mut EngineContext) {
        let id = self.factory.spawn_player(ctx, self.levels.spawn());
        self.player = Some(id);
    }

    fn freeze_player(&self, ctx: &mut EngineContext, player: EntityId) {
        if let Some(body) = ctx.scene.get(player).and_then(|e| e.body) {
            ctx.physics.set_dynamic(&body, false);
        }
    }

    /// Dispatch a begin-contact pair involving the player on the other
    /// entity's tag. Everything untagged (walls) is purely physical.
    fn on_contact(&mut self, ctx: &mut EngineContext, pair: CollisionPair) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(player) = self.player else {
            return;
        };
        let other = if pair.entity_a == player {
            pair.entity_b
        } else if pair.entity_b == player {
            pair.entity_a
        } else {
            return;
        };

        let tag = ctx
            .scene
            .get(other)
            .map(|e| e.tag.clone())
            .unwrap_or_default();
        match tag.as_str() {
            TAG_VORTEX => self.on_vortex(ctx, player, other),
            TAG_STAR => self.on_star(ctx, other),
            TAG_FINISH => self.on_finish(ctx, player, other),
            _ => {}
        }
    }

    /// Vortex: freeze the ball, deduct a point, suck it into the center while
    /// shrinking, then respawn.
    fn on_vortex(
        &mut self,
        ctx: &mut EngineContext,
        player: EntityId,
        vortex: EntityId,
    ) {
        self.phase = Phase::Dying;
        self.freeze_player(ctx, player);
        if self.score > 0 {
            let score = self.score - VORTEX_PENALTY;
            self.set_score(ctx, score);
        }

        let from = ctx.scene.get(player).map(|e| e.pos).unwrap_or_default();
        let to = ctx.scene.get(vortex).map(|e| e.pos).unwrap_or(from);
        let scale = ctx.scene.get(player).map(|e| e.scale).unwrap_or(Vec2::ONE);

        self.tweens
            .add(player, Tween::position(from, to, DEATH_DURATION, Easing::QuadOut));
        self.tweens.add(
            player,
            Tween::scale(scale, Vec2::splat(SHRINK_SCALE), DEATH_DURATION, Easing::QuadIn)
                .with_on_complete(SEQ_RESPAWN),
        );
        log::info!("player lost in a vortex, score {}", self.score);
    }

    /// Star: collect exactly once, pop-and-fade, score a point.
    fn on_star(&mut self, ctx: &mut EngineContext, star: EntityId) {
        // Clearing the tag makes any duplicate contact a no-op.
        let Some(entity) = ctx.scene.get_mut(star) else {
            return;
        };
        entity.tag.clear();
        let scale = entity.scale;

        // Stop the idle pulse before the collect animation takes over.
        self.tweens.remove_entity(star);
        self.tweens.add(
            star,
            Tween::scale(scale, Vec2::splat(1.5), COLLECT_DURATION, Easing::QuadOut),
        );
        self.tweens.add(
            star,
            Tween::fade_out(COLLECT_DURATION, Easing::Linear).with_on_complete(SEQ_REMOVE_ENTITY),
        );

        let score = self.score + STAR_SCORE;
        self.set_score(ctx, score);
    }

    /// Finish: fade the marker, shrink the ball out, then run the banner
    /// sequence that leads into the next level.
    fn on_finish(
        &mut self,
        ctx: &mut EngineContext,
        player: EntityId,
        finish: EntityId,
    ) {
        self.phase = Phase::Advancing;
        self.freeze_player(ctx, player);

        if let Some(entity) = ctx.scene.get_mut(finish) {
            entity.tag.clear();
        }
        self.tweens.remove_entity(finish);
        self.tweens.add(
            finish,
            Tween::scale_uniform(1.0, BANNER_SCALE_TO, FINISH_FADE_DURATION, Easing::QuadOut),
        );
        self.tweens.add(
            finish,
            Tween::fade_out(FINISH_FADE_DURATION, Easing::Linear)
                .with_on_complete(SEQ_REMOVE_ENTITY),
        );

        let scale = ctx.scene.get(player).map(|e| e.scale).unwrap_or(Vec2::ONE);
        self.tweens.add(
            player,
            Tween::scale(scale, Vec2::splat(SHRINK_SCALE), PLAYER_SHRINK_DURATION, Easing::QuadIn),
        );
        self.scheduler.schedule(PLAYER_REMOVE_DELAY, SEQ_REMOVE_PLAYER, player);

        if let Some(banner) = self.banner {
            self.scheduler.schedule(BANNER_DELAY, SEQ_BANNER_START, banner);
        }
        log::info!("level {} cleared", self.level);
    }

    /// Run one continuation from a finished tween or elapsed delay.
    fn on_sequence_event(
        &mut self,
        ctx: &mut EngineContext,
        kind: u32,
        entity: EntityId,
    ) {
        match kind {
            SEQ_RESPAWN => {
                self.tweens.remove_entity(entity);
                self.scheduler.cancel_entity(entity);
                ctx.despawn(entity);
                self.spawn_player(ctx);
                self.phase = Phase::Playing;
            }
            SEQ_REMOVE_ENTITY => {
                self.level_nodes.retain(|&id| id != entity);
                self.tweens.remove_entity(entity);
                ctx.despawn(entity);
            }
            SEQ_REMOVE_PLAYER => {
                self.tweens.remove_entity(entity);
                ctx.despawn(entity);
                if self.player == Some(entity) {
                    self.player = None;
                }
            }
            SEQ_BANNER_START => {
                self.tweens.add(
                    entity,
                    Tween::fade_in(BANNER_FADE_DURATION, Easing::Linear)
                        .with_on_complete(SEQ_BANNER_SHOWN),
                );
            }
            SEQ_BANNER_SHOWN => {
                self.tweens.add(
                    entity,
                    Tween::scale_uniform(1.0, BANNER_SCALE_TO, BANNER_SCALE_DURATION, Easing::QuadOut)
                        .with_on_complete(SEQ_BANNER_SCALED),
                );
            }
            SEQ_BANNER_SCALED => {
                self.tweens.add(
                    entity,
                    Tween::fade_out(BANNER_FADE_DURATION, Easing::Linear)
                        .with_on_complete(SEQ_NEXT_LEVEL),
                );
            }
            SEQ_NEXT_LEVEL => {
                self.advance_level(ctx);
            }
            other => {
                log::warn!("unknown continuation kind {other}");
            }
        }
    }

    /// Tear down what is left of the cleared level, bump score and level, and
    /// bring up the next one with a fresh ball.
    fn advance_level(&mut self, ctx: &mut EngineContext) {
        for id in std::mem::take(&mut self.level_nodes) {
            self.tweens.remove_entity(id);
            self.scheduler.cancel_entity(id);
            ctx.despawn(id);
        }

        let score = self.score + FINISH_SCORE;
        self.set_score(ctx, score);

        let next = if (self.level as usize) >= self.levels.total() {
            1
        } else {
            self.level + 1
        };
        self.set_level(ctx, next);

        self.load_level(ctx);
        self.spawn_player(ctx);

        // Hide the banner again for the next clear.
        if let Some(banner) = self.banner {
            if let Some(entity) = ctx.scene.get_mut(banner) {
                entity.alpha = 0.0;
                entity.scale = Vec2::ONE;
            }
        }

        self.phase = Phase::Playing;
    }
}

impl Game for MazeGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gravity: Vec2::ZERO,
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        // Level-clear banner, invisible until a level is won.
        let id = ctx.next_id();
        ctx.spawn(
            Entity::new(id)
                .with_pos(Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0))
                .with_alpha(0.0),
        );
        self.banner = Some(id);

        self.load_level(ctx);
        self.spawn_player(ctx);

        ctx.emit_event(GameEvent::ScoreChanged(self.score));
        ctx.emit_event(GameEvent::LevelChanged(self.level));
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            self.control.feed(event);
        }

        self.tweens.tick(FIXED_DT, &mut ctx.scene);
        self.scheduler.tick(FIXED_DT);
        for event in self.tweens.drain_completed() {
            self.on_sequence_event(ctx, event.kind, event.entity);
        }
        for event in self.scheduler.drain_fired() {
            self.on_sequence_event(ctx, event.kind, event.entity);
        }

        let started: Vec<CollisionPair> = ctx
            .collisions()
            .iter()
            .filter(|p| p.started)
            .copied()
            .collect();
        for pair in started {
            self.on_contact(ctx, pair);
        }

        // Steer gravity from the ambient control vector, only while the ball
        // is live.
        if self.phase == Phase::Playing {
            if let Some(player) = self.player {
                let pos = ctx
                    .scene
                    .get(player)
                    .map(|e| e.pos)
                    .unwrap_or(self.levels.spawn());
                if let Some(v) = self.control.ambient_vector(pos) {
                    ctx.physics.set_gravity(v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::DragControl;
    use tilt_engine::{EntityId, InputEvent};

    fn new_game() -> (MazeGame, EngineContext) {
        let levels = LevelSet::embedded().unwrap();
        let mut game = MazeGame::new(levels, Box::new(DragControl::new())).unwrap();
        let config = game.config();
        let mut ctx = EngineContext::with_gravity(config.gravity);
        ctx.physics.set_dt(config.fixed_dt);
        game.init(&mut ctx);
        (game, ctx)
    }

    fn run(game: &mut MazeGame, ctx: &mut EngineContext, seconds: f32) {
        let input = InputQueue::new();
        let steps = (seconds / FIXED_DT).ceil() as usize;
        for _ in 0..steps {
            game.update(ctx, &input);
        }
    }

    fn find_by_tag(ctx: &EngineContext, tag: &str) -> EntityId {
        ctx.scene
            .find_by_tag(tag)
            .map(|e| e.id)
            .unwrap_or_else(|| panic!("no entity tagged {tag:?}"))
    }

    fn contact(game: &mut MazeGame, ctx: &mut EngineContext, other: EntityId) {
        let player = game.player.unwrap();
        game.on_contact(
            ctx,
            CollisionPair { entity_a: player, entity_b: other, started: true },
        );
    }

    #[test]
    fn bad_level_fails_construction() {
        let levels = LevelSet::new(64.0, Vec2::ZERO, vec!["x?x".to_string()]);
        let err = MazeGame::new(levels, Box::new(DragControl::new())).unwrap_err();
        assert!(matches!(err, LevelError::UnknownSymbol { symbol: '?', .. }));
    }

    #[test]
    fn star_collects_exactly_once() {
        let (mut game, mut ctx) = new_game();
        let star = find_by_tag(&ctx, TAG_STAR);

        contact(&mut game, &mut ctx, star);
        assert_eq!(game.score(), 1);
        assert!(ctx.events.contains(&GameEvent::ScoreChanged(1)));
        assert!(ctx.scene.get(star).unwrap().tag.is_empty());

        // A duplicate pair for the same star does nothing.
        contact(&mut game, &mut ctx, star);
        assert_eq!(game.score(), 1);

        // The pop-and-fade removes the star shortly after.
        run(&mut game, &mut ctx, 0.5);
        assert!(ctx.scene.get(star).is_none());
        assert!(!game.level_nodes.contains(&star));
        assert_eq!(game.phase, Phase::Playing);
    }

    #[test]
    fn vortex_at_zero_score_stays_at_zero() {
        let (mut game, mut ctx) = new_game();
        let vortex = find_by_tag(&ctx, TAG_VORTEX);

        contact(&mut game, &mut ctx, vortex);
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase, Phase::Dying);
    }

    #[test]
    fn vortex_deducts_and_respawns() {
        let (mut game, mut ctx) = new_game();
        game.score = 3;
        let vortex = find_by_tag(&ctx, TAG_VORTEX);
        let old_player = game.player.unwrap();

        contact(&mut game, &mut ctx, vortex);
        assert_eq!(game.score(), 2);
        assert!(ctx.events.contains(&GameEvent::ScoreChanged(2)));

        // The frozen ball no longer answers to physics.
        let body = ctx.scene.get(old_player).unwrap().body.unwrap();
        assert!(!ctx.physics.is_dynamic(&body));

        // Further contacts are ignored while dying.
        let star = find_by_tag(&ctx, TAG_STAR);
        contact(&mut game, &mut ctx, star);
        assert_eq!(game.score(), 2);

        run(&mut game, &mut ctx, 0.5);
        let new_player = game.player.unwrap();
        assert_ne!(new_player, old_player);
        assert!(ctx.scene.get(old_player).is_none());
        assert_eq!(ctx.scene.get(new_player).unwrap().pos, Vec2::new(96.0, 672.0));
        assert_eq!(game.phase, Phase::Playing);
    }

    #[test]
    fn finish_advances_to_next_level() {
        let (mut game, mut ctx) = new_game();
        let finish = find_by_tag(&ctx, TAG_FINISH);
        let old_player = game.player.unwrap();

        contact(&mut game, &mut ctx, finish);
        assert_eq!(game.phase, Phase::Advancing);

        // Marker fade, player removal, banner in/scale/out, then the reload.
        run(&mut game, &mut ctx, 2.5);

        assert_eq!(game.level(), 2);
        assert_eq!(game.score(), 3);
        assert_eq!(game.phase, Phase::Playing);
        assert!(ctx.scene.get(old_player).is_none());

        let player = game.player.unwrap();
        assert_ne!(player, old_player);
        assert_eq!(ctx.scene.get(player).unwrap().pos, Vec2::new(96.0, 672.0));

        // Scene now holds exactly the new level plus the player and banner.
        let expected_nodes = game.parsed[1].len();
        assert_eq!(game.level_nodes.len(), expected_nodes);
        assert_eq!(ctx.scene.len(), expected_nodes + 2);

        // Banner is hidden again.
        let banner = ctx.scene.get(game.banner.unwrap()).unwrap();
        assert_eq!(banner.alpha, 0.0);
        assert_eq!(banner.scale, Vec2::ONE);
    }

    #[test]
    fn finishing_the_last_level_wraps_to_the_first() {
        let (mut game, mut ctx) = new_game();

        let finish = find_by_tag(&ctx, TAG_FINISH);
        contact(&mut game, &mut ctx, finish);
        run(&mut game, &mut ctx, 2.5);
        assert_eq!(game.level(), 2);

        let finish = find_by_tag(&ctx, TAG_FINISH);
        contact(&mut game, &mut ctx, finish);
        run(&mut game, &mut ctx, 2.5);

        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 6);
        assert_eq!(game.level_nodes.len(), game.parsed[0].len());
    }

    #[test]
    fn gravity_follows_the_pointer_only_while_playing() {
        let (mut game, mut ctx) = new_game();
        let player_pos = ctx.scene.get(game.player.unwrap()).unwrap().pos;

        let mut input = InputQueue::new();
        input.push(InputEvent::PointerDown { x: player_pos.x + 200.0, y: player_pos.y - 100.0 });
        game.update(&mut ctx, &input);
        assert_eq!(ctx.physics.gravity(), Vec2::new(2.0, -1.0));

        // While dying, pointer motion no longer steers gravity.
        let vortex = find_by_tag(&ctx, TAG_VORTEX);
        contact(&mut game, &mut ctx, vortex);
        let mut input = InputQueue::new();
        input.push(InputEvent::PointerMove { x: player_pos.x, y: player_pos.y + 500.0 });
        game.update(&mut ctx, &input);
        assert_eq!(ctx.physics.gravity(), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn overlapping_star_scores_through_the_physics_pipe() {
        // One star, player spawned right on top of it.
        let levels = LevelSet::new(64.0, Vec2::new(32.0, -32.0), vec!["s".to_string()]);
        let mut game = MazeGame::new(levels, Box::new(DragControl::new())).unwrap();
        let config = game.config();
        let mut ctx = EngineContext::with_gravity(config.gravity);
        ctx.physics.set_dt(config.fixed_dt);
        game.init(&mut ctx);

        let input = InputQueue::new();
        for _ in 0..10 {
            game.update(&mut ctx, &input);
            ctx.step_physics();
        }
        assert_eq!(game.score(), 1);
    }
}
