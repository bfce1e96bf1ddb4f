/// Unique identifier for an entity in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// An event the game emits for the presentation layer.
///
/// The engine emits `EntitySpawned`/`EntityRemoved` from the spawn and
/// despawn paths; games emit `ScoreChanged`/`LevelChanged` whenever the
/// corresponding value mutates, so a HUD collaborator can observe every
/// change without polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new entity entered the scene.
    EntitySpawned(EntityId),
    /// An entity left the scene; its presentation node should be dropped.
    EntityRemoved(EntityId),
    /// The score changed; carries the new value.
    ScoreChanged(u32),
    /// The 1-based level index changed; carries the new value.
    LevelChanged(u32),
}
