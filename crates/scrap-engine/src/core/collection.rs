use crate::api::types::{AudioCommand, ObjectId};
use crate::assets::manager::ResourceManagementSystem;
use crate::components::{DestroyContext, GameObject, RenderContext, Services};
use crate::error::{EngineError, EngineResult};

use super::hierarchy::Hierarchy;

/// Owns the game objects of the active scene.
///
/// Flat `Vec` storage in insertion order; sized for hundreds of objects, not
/// millions. Objects added during a frame wait in a pending list and join at
/// the start of the next update pass. Destruction is deferred to
/// [`end_frame`](Self::end_frame) so nothing is removed mid-iteration.
#[derive(Debug)]
pub struct GameObjectCollection {
    objects: Vec<GameObject>,
    pending: Vec<GameObject>,
    hierarchy: Hierarchy,
    next_id: u32,
}

impl Default for GameObjectCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObjectCollection {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(256),
            pending: Vec::new(),
            hierarchy: Hierarchy::new(),
            next_id: 1,
        }
    }

    /// Build a new object with a fresh id. It is not part of the collection
    /// until passed to [`add`](Self::add).
    pub fn create(&mut self, name: impl Into<String>) -> GameObject {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        GameObject::new(id, name)
    }

    /// Queue an object. It is started and updated from the next update pass.
    pub fn add(&mut self, object: GameObject) -> ObjectId {
        let id = object.id();
        self.hierarchy.register(id);
        log::debug!("object {:?} '{}' queued", id, object.name());
        self.pending.push(object);
        id
    }

    /// Create and queue an empty object.
    pub fn spawn(&mut self, name: impl Into<String>) -> ObjectId {
        let object = self.create(name);
        self.add(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects
            .iter()
            .chain(self.pending.iter())
            .find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects
            .iter_mut()
            .chain(self.pending.iter_mut())
            .find(|o| o.id() == id)
    }

    /// First object registered under `name`.
    pub fn find(&self, name: &str) -> Option<&GameObject> {
        self.objects
            .iter()
            .chain(self.pending.iter())
            .find(|o| o.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut GameObject> {
        self.objects
            .iter_mut()
            .chain(self.pending.iter_mut())
            .find(|o| o.name() == name)
    }

    /// Live objects, excluding those still pending.
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    /// Live plus pending objects.
    pub fn len(&self) -> usize {
        self.objects.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Flag an object for removal at the end of the frame.
    pub fn destroy(&mut self, id: ObjectId) -> EngineResult<()> {
        let object = self.get_mut(id).ok_or(EngineError::ObjectNotFound(id))?;
        object.destroy();
        Ok(())
    }

    pub fn set_parent(&mut self, child: ObjectId, parent: Option<ObjectId>) -> EngineResult<()> {
        self.hierarchy.set_parent(child, parent)?;
        if let Some(object) = self.get_mut(child) {
            object.transform.set_parent(parent);
        }
        Ok(())
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.hierarchy.parent(id)
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.hierarchy.children(id)
    }

    /// Recompute world transforms for every live and pending object.
    pub fn propagate(&mut self) {
        if self.pending.is_empty() {
            self.hierarchy.propagate(&mut self.objects);
            return;
        }
        let live = self.objects.len();
        self.objects.append(&mut self.pending);
        self.hierarchy.propagate(&mut self.objects);
        self.pending = self.objects.split_off(live);
    }

    /// Promote pending objects, then start and update every active object.
    pub fn update(&mut self, dt: f32, services: &mut Services<'_>) {
        if !self.pending.is_empty() {
            self.objects.append(&mut self.pending);
        }
        self.propagate();

        for object in self.objects.iter_mut() {
            if object.active && !object.is_destroyed() {
                object.update(dt, services);
            }
        }
    }

    pub fn render(&mut self, rc: &mut RenderContext<'_>) {
        self.propagate();
        for object in self.objects.iter() {
            if object.active && !object.is_destroyed() {
                object.render(rc);
            }
        }
    }

    /// Remove flagged components and objects, running their `on_destroy`
    /// hooks. Returns the number of objects removed.
    pub fn end_frame(&mut self, resources: &mut ResourceManagementSystem, audio: &mut Vec<AudioCommand>) -> usize {
        let mut removed = Vec::new();

        for object in self.objects.iter_mut().chain(self.pending.iter_mut()) {
            let mut ctx = DestroyContext {
                object: object.id(),
                resources: &mut *resources,
                audio: &mut *audio,
            };
            if object.is_destroyed() {
                object.dispose(&mut ctx);
                removed.push(object.id());
            } else {
                for kind in object.sweep_components(&mut ctx) {
                    log::debug!("object {:?}: {:?} removed", object.id(), kind);
                }
            }
        }

        if removed.is_empty() {
            return 0;
        }
        self.objects.retain(|o| !o.is_destroyed());
        self.pending.retain(|o| !o.is_destroyed());
        for &id in &removed {
            for orphan in self.hierarchy.remove(id) {
                if let Some(object) = self.get_mut(orphan) {
                    object.transform.set_parent(None);
                }
            }
            log::debug!("object {:?} destroyed", id);
        }
        removed.len()
    }

    /// Destroy every object immediately. Used on scene exit.
    pub fn dispose(&mut self, resources: &mut ResourceManagementSystem, audio: &mut Vec<AudioCommand>) {
        for mut object in self.objects.drain(..).chain(self.pending.drain(..)) {
            let mut ctx = DestroyContext {
                object: object.id(),
                resources: &mut *resources,
                audio: &mut *audio,
            };
            object.dispose(&mut ctx);
        }
        self.hierarchy.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::GameEvent;
    use crate::assets::source::MemoryAssets;
    use crate::components::{
        AudioSource, ComponentKind, Phase, SpriteRenderer, Tween, TweenComponent,
    };
    use crate::extensions::easing::Easing;
    use crate::input::InputState;
    use crate::renderer::headless::RecordingBackend;
    use crate::test_support::png;
    use glam::Vec2;

    struct Harness {
        gpu: RecordingBackend,
        resources: ResourceManagementSystem,
        input: InputState,
        events: Vec<GameEvent>,
        audio: Vec<AudioCommand>,
    }

    impl Harness {
        fn new() -> Self {
            let assets = MemoryAssets::new().with("hero.png", png(2, 2, [255, 0, 0, 255]));
            Self {
                gpu: RecordingBackend::new(),
                resources: ResourceManagementSystem::new(Box::new(assets), 1, 4, 4),
                input: InputState::new(),
                events: Vec::new(),
                audio: Vec::new(),
            }
        }

        fn update(&mut self, objects: &mut GameObjectCollection, dt: f32) {
            let mut services = Services {
                input: &self.input,
                resources: &mut self.resources,
                gpu: &mut self.gpu,
                events: &mut self.events,
                audio: &mut self.audio,
            };
            objects.update(dt, &mut services);
        }

        fn end_frame(&mut self, objects: &mut GameObjectCollection) -> usize {
            let removed = objects.end_frame(&mut self.resources, &mut self.audio);
            self.resources.end_frame(&mut self.gpu);
            removed
        }
    }

    #[test]
    fn objects_added_mid_frame_join_next_update() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let id = objects.spawn("late");
        assert_eq!(objects.pending_len(), 1);
        assert_eq!(objects.iter().count(), 0);
        assert!(objects.get(id).is_some());

        h.update(&mut objects, 0.016);
        assert_eq!(objects.pending_len(), 0);
        assert_eq!(objects.iter().count(), 1);
    }

    #[test]
    fn start_runs_once_before_first_update() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let obj = objects
            .create("hero")
            .with(SpriteRenderer::new("hero.png"))
            .unwrap();
        let id = objects.add(obj);

        h.update(&mut objects, 0.016);
        assert_eq!(h.gpu.texture_creations(), 1);
        assert_eq!(objects.get(id).unwrap().phase(ComponentKind::SpriteRenderer), Some(Phase::Active));

        h.update(&mut objects, 0.016);
        assert_eq!(h.gpu.texture_creations(), 1);
    }

    #[test]
    fn find_returns_first_registered() {
        let mut objects = GameObjectCollection::new();
        let first = objects.spawn("enemy");
        let _second = objects.spawn("enemy");
        assert_eq!(objects.find("enemy").unwrap().id(), first);
        assert!(objects.find("boss").is_none());
    }

    #[test]
    fn destroyed_object_survives_until_end_of_frame() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let obj = objects
            .create("hero")
            .with(SpriteRenderer::new("hero.png"))
            .unwrap();
        let id = objects.add(obj);
        h.update(&mut objects, 0.016);

        objects.destroy(id).unwrap();
        assert!(objects.get(id).is_some());
        assert_eq!(h.resources.stats().cached, 2);

        assert_eq!(h.end_frame(&mut objects), 1);
        assert!(objects.get(id).is_none());
        assert_eq!(h.resources.stats().cached, 0);
        assert!(matches!(objects.destroy(id), Err(EngineError::ObjectNotFound(_))));
    }

    #[test]
    fn finished_tweens_can_destroy_their_object() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let tweens = TweenComponent::new().with(Tween::fade(1.0, 0.0, 0.01, Easing::Linear));
        let obj = objects
            .create("fader")
            .with(tweens.destroy_object_when_done())
            .unwrap()
            .with(AudioSource::new("a.wav"))
            .unwrap();
        let id = objects.add(obj);

        h.update(&mut objects, 0.016);
        assert!(objects.get(id).unwrap().is_destroyed());
        h.end_frame(&mut objects);
        assert!(objects.is_empty());
    }

    #[test]
    fn self_destroying_component_leaves_siblings() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let tweens = TweenComponent::new().with(Tween::fade(1.0, 0.5, 0.01, Easing::Linear));
        let obj = objects
            .create("fader")
            .with(tweens.remove_when_done())
            .unwrap()
            .with(AudioSource::new("a.wav"))
            .unwrap()
            .with(SpriteRenderer::new("hero.png"))
            .unwrap();
        let id = objects.add(obj);

        h.update(&mut objects, 0.016);
        let obj = objects.get(id).unwrap();
        assert_eq!(obj.phase(ComponentKind::Tween), Some(Phase::PendingDestroy));
        // Siblings still ran this frame.
        assert_eq!(obj.phase(ComponentKind::SpriteRenderer), Some(Phase::Active));
        assert_eq!(obj.get::<SpriteRenderer>().unwrap().opacity, 0.5);
        assert!(!obj.is_destroyed());

        assert_eq!(h.end_frame(&mut objects), 0);
        let obj = objects.get(id).unwrap();
        assert!(!obj.has(ComponentKind::Tween));
        assert_eq!(obj.phase(ComponentKind::AudioSource), Some(Phase::Active));
        assert_eq!(obj.phase(ComponentKind::SpriteRenderer), Some(Phase::Active));
        assert_eq!(h.resources.stats().cached, 2);

        h.update(&mut objects, 0.016);
        assert_eq!(objects.get(id).unwrap().get::<SpriteRenderer>().unwrap().opacity, 0.5);
    }

    #[test]
    fn overshooting_fade_is_clamped_through_update() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let obj = objects
            .create("pop")
            .with(SpriteRenderer::new("hero.png").with_opacity(0.0))
            .unwrap()
            .with(TweenComponent::new().with(Tween::fade(0.0, 1.0, 1.0, Easing::BackOut)))
            .unwrap();
        let id = objects.add(obj);

        h.update(&mut objects, 0.6);
        let sprite = objects.get(id).unwrap().get::<SpriteRenderer>().unwrap();
        assert_eq!(sprite.opacity, 1.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "released")]
    fn releasing_a_handle_twice_asserts() {
        let mut h = Harness::new();
        let quad = h.resources.quad(&mut h.gpu).unwrap();
        let mut ctx = DestroyContext {
            object: ObjectId(1),
            resources: &mut h.resources,
            audio: &mut h.audio,
        };
        ctx.release(quad);
        ctx.release(quad);
    }

    #[test]
    fn destroy_component_keeps_object() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let obj = objects
            .create("hero")
            .with(SpriteRenderer::new("hero.png"))
            .unwrap();
        let id = objects.add(obj);
        h.update(&mut objects, 0.016);

        objects
            .get_mut(id)
            .unwrap()
            .destroy_component(ComponentKind::SpriteRenderer)
            .unwrap();
        assert_eq!(h.end_frame(&mut objects), 0);

        let obj = objects.get(id).unwrap();
        assert!(!obj.has(ComponentKind::SpriteRenderer));
        assert_eq!(h.resources.stats().cached, 0);
    }

    #[test]
    fn removing_parent_orphans_children() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let parent = objects.create("parent").with_position(Vec2::new(5.0, 0.0));
        let parent = objects.add(parent);
        let child = objects.create("child").with_position(Vec2::new(1.0, 0.0));
        let child = objects.add(child);
        objects.set_parent(child, Some(parent)).unwrap();

        h.update(&mut objects, 0.016);
        assert_eq!(objects.get(child).unwrap().transform.world().position, Vec2::new(6.0, 0.0));

        objects.destroy(parent).unwrap();
        h.end_frame(&mut objects);
        assert_eq!(objects.parent(child), None);
        assert_eq!(objects.get(child).unwrap().transform.parent(), None);

        objects.propagate();
        assert_eq!(objects.get(child).unwrap().transform.world().position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn child_of_pending_parent_follows_it() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        let child = objects.create("child").with_position(Vec2::new(1.0, 0.0));
        let child = objects.add(child);
        h.update(&mut objects, 0.016);

        let parent = objects.create("parent").with_position(Vec2::new(5.0, 0.0));
        let parent = objects.add(parent);
        objects.set_parent(child, Some(parent)).unwrap();
        assert_eq!(objects.pending_len(), 1);

        objects.propagate();
        assert_eq!(objects.pending_len(), 1);
        assert_eq!(objects.iter().count(), 1);
        assert_eq!(objects.get(child).unwrap().transform.world().position, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn dispose_releases_everything() {
        let mut h = Harness::new();
        let mut objects = GameObjectCollection::new();
        for name in ["a", "b"] {
            let obj = objects.create(name).with(SpriteRenderer::new("hero.png")).unwrap();
            objects.add(obj);
        }
        h.update(&mut objects, 0.016);
        let texture = objects.find("a").unwrap().get::<SpriteRenderer>().unwrap().texture().unwrap();
        assert_eq!(h.resources.ref_count(texture.into()), Some(2));

        objects.dispose(&mut h.resources, &mut h.audio);
        assert!(objects.is_empty());
        assert_eq!(h.resources.stats().cached, 0);
    }
}
