use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Flat-Vec entity storage. A maze level is a couple hundred nodes at most,
/// so linear lookup beats any indexing structure worth maintaining.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(256),
        }
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity, returning it so the caller can release its physics
    /// body. Iteration order is not preserved.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// First entity carrying the given contact-dispatch tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn spawn_get_despawn() {
        let mut scene = Scene::new();
        let id = EntityId(3);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));

        assert_eq!(scene.get(id).unwrap().pos, Vec2::new(10.0, 20.0));
        assert!(scene.despawn(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.despawn(id).is_none());
    }

    #[test]
    fn tag_lookup_skips_untagged() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        scene.spawn(Entity::new(EntityId(2)).with_tag("vortex"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("star"));

        assert_eq!(scene.find_by_tag("star").unwrap().id, EntityId(3));
        assert!(scene.find_by_tag("finish").is_none());
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_tag("star"));
        scene.get_mut(id).unwrap().tag.clear();
        assert!(scene.find_by_tag("star").is_none());
    }
}
