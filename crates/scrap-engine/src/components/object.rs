use glam::Vec2;

use super::{
    Button, Component, ComponentContext, ComponentKind, ComponentType, DestroyContext, Phase, RenderContext,
    Requests, Services, SpriteRenderer, Transform,
};
use crate::api::types::ObjectId;
use crate::error::{EngineError, EngineResult};

#[derive(Debug)]
struct ComponentSlot {
    component: Component,
    phase: Phase,
}

/// A named entity: a transform plus at most one component of each kind.
///
/// Destruction is always deferred: `destroy` and `destroy_component` only
/// flag, and the owning collection removes flagged parts at the end of the
/// frame.
#[derive(Debug)]
pub struct GameObject {
    id: ObjectId,
    name: String,
    pub transform: Transform,
    /// Inactive objects are neither updated nor rendered.
    pub active: bool,
    slots: Vec<ComponentSlot>,
    destroy_requested: bool,
}

impl GameObject {
    /// Objects are created through [`GameObjectCollection::create`](crate::core::collection::GameObjectCollection::create),
    /// which hands out unique ids.
    pub(crate) fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform::default(),
            active: true,
            slots: Vec::new(),
            destroy_requested: false,
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.transform.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with<C: ComponentType>(mut self, component: C) -> EngineResult<Self> {
        self.add_component(component)?;
        Ok(self)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a component. It starts on the next update pass.
    pub fn add_component<C: ComponentType>(&mut self, component: C) -> EngineResult<()> {
        if self.slot(C::KIND).is_some() {
            return Err(EngineError::DuplicateComponent(C::KIND));
        }
        self.slots.push(ComponentSlot {
            component: component.into_component(),
            phase: Phase::Uninitialized,
        });
        Ok(())
    }

    fn slot(&self, kind: ComponentKind) -> Option<&ComponentSlot> {
        self.slots
            .iter()
            .find(|s| s.component.kind() == kind && s.phase != Phase::Removed)
    }

    fn slot_mut(&mut self, kind: ComponentKind) -> Option<&mut ComponentSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.component.kind() == kind && s.phase != Phase::Removed)
    }

    pub fn get<C: ComponentType>(&self) -> Option<&C> {
        self.slot(C::KIND).and_then(|s| C::from_component(&s.component))
    }

    pub fn get_mut<C: ComponentType>(&mut self) -> Option<&mut C> {
        self.slot_mut(C::KIND)
            .and_then(|s| C::from_component_mut(&mut s.component))
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        kind == ComponentKind::Transform || self.slot(kind).is_some()
    }

    pub fn phase(&self, kind: ComponentKind) -> Option<Phase> {
        match kind {
            ComponentKind::Transform => Some(Phase::Active),
            _ => self.slot(kind).map(|s| s.phase),
        }
    }

    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        self.slots.iter().map(|s| s.component.kind()).collect()
    }

    /// Flag a component for removal at the end of the frame.
    /// Flagging twice is harmless; a component that is already gone is an error.
    pub fn destroy_component(&mut self, kind: ComponentKind) -> EngineResult<()> {
        let slot = self.slot_mut(kind).ok_or(EngineError::ComponentNotFound(kind))?;
        slot.phase = Phase::PendingDestroy;
        Ok(())
    }

    /// Flag the whole object for removal at the end of the frame.
    pub fn destroy(&mut self) {
        self.destroy_requested = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroy_requested
    }

    /// Start new components, then update live ones, in attachment order.
    pub(crate) fn update(&mut self, dt: f32, services: &mut Services<'_>) {
        let mut requests = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.phase != Phase::Uninitialized {
                continue;
            }
            let mut ctx = ComponentContext {
                object: self.id,
                dt,
                transform: &mut self.transform,
                services: &mut *services,
                requests: Requests::default(),
            };
            match slot.component.hooks_mut().start(&mut ctx) {
                Ok(()) => slot.phase = Phase::Started,
                Err(e) => {
                    log::error!(
                        "'{}': {:?} failed to start: {}",
                        self.name,
                        slot.component.kind(),
                        e
                    );
                    slot.phase = Phase::PendingDestroy;
                }
            }
            requests.push((index, ctx.requests));
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !matches!(slot.phase, Phase::Started | Phase::Active) {
                continue;
            }
            let mut ctx = ComponentContext {
                object: self.id,
                dt,
                transform: &mut self.transform,
                services: &mut *services,
                requests: Requests::default(),
            };
            slot.component.hooks_mut().update(&mut ctx);
            slot.phase = Phase::Active;
            requests.push((index, ctx.requests));
        }

        for (index, request) in requests {
            self.apply(index, request);
        }
    }

    fn apply(&mut self, index: usize, request: Requests) {
        if request.destroy_self {
            self.slots[index].phase = Phase::PendingDestroy;
        }
        if request.destroy_object {
            self.destroy_requested = true;
        }
        if let Some(color) = request.color {
            if let Some(sprite) = self.get_mut::<SpriteRenderer>() {
                sprite.color = color;
            } else if let Some(button) = self.get_mut::<Button>() {
                button.color = color;
            }
        }
        if let Some(opacity) = request.opacity {
            if let Some(sprite) = self.get_mut::<SpriteRenderer>() {
                sprite.set_opacity(opacity);
            } else if let Some(button) = self.get_mut::<Button>() {
                button.set_opacity(opacity);
            }
        }
    }

    pub(crate) fn render(&self, rc: &mut RenderContext<'_>) {
        let world = self.transform.world();
        for slot in &self.slots {
            if matches!(slot.phase, Phase::Started | Phase::Active) {
                slot.component.hooks().render(&world, rc);
            }
        }
    }

    /// Run `on_destroy` for flagged components and drop them.
    /// Returns the kinds removed.
    pub(crate) fn sweep_components(&mut self, ctx: &mut DestroyContext<'_>) -> Vec<ComponentKind> {
        let mut removed = Vec::new();
        for slot in self.slots.iter_mut() {
            if slot.phase == Phase::PendingDestroy {
                slot.component.hooks_mut().on_destroy(ctx);
                slot.phase = Phase::Removed;
                removed.push(slot.component.kind());
            }
        }
        self.slots.retain(|s| s.phase != Phase::Removed);
        removed
    }

    /// Run `on_destroy` for every remaining component and drop them all.
    pub(crate) fn dispose(&mut self, ctx: &mut DestroyContext<'_>) {
        for slot in self.slots.iter_mut() {
            slot.component.hooks_mut().on_destroy(ctx);
            slot.phase = Phase::Removed;
        }
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AudioSource, TweenComponent};

    #[test]
    fn duplicate_component_is_rejected() {
        let mut obj = GameObject::new(ObjectId(1), "hero");
        obj.add_component(AudioSource::new("a.wav")).unwrap();
        let err = obj.add_component(AudioSource::new("b.wav")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateComponent(ComponentKind::AudioSource)));
        assert_eq!(obj.get::<AudioSource>().unwrap().clip, "a.wav");
    }

    #[test]
    fn builder_sets_transform_and_components() {
        let obj = GameObject::new(ObjectId(2), "logo")
            .with_position(Vec2::new(1.0, 2.0))
            .with_scale(Vec2::splat(3.0))
            .with(SpriteRenderer::new("logo.png"))
            .unwrap()
            .with(TweenComponent::new())
            .unwrap();
        assert_eq!(obj.transform.position, Vec2::new(1.0, 2.0));
        assert!(obj.has(ComponentKind::SpriteRenderer));
        assert!(obj.has(ComponentKind::Tween));
        assert!(obj.has(ComponentKind::Transform));
        assert!(!obj.has(ComponentKind::Button));
        assert_eq!(obj.phase(ComponentKind::SpriteRenderer), Some(Phase::Uninitialized));
    }

    #[test]
    fn destroy_component_flags_only() {
        let mut obj = GameObject::new(ObjectId(3), "x");
        obj.add_component(AudioSource::new("a.wav")).unwrap();
        obj.destroy_component(ComponentKind::AudioSource).unwrap();
        obj.destroy_component(ComponentKind::AudioSource).unwrap();
        assert_eq!(obj.phase(ComponentKind::AudioSource), Some(Phase::PendingDestroy));
        assert!(matches!(
            obj.destroy_component(ComponentKind::Text),
            Err(EngineError::ComponentNotFound(ComponentKind::Text))
        ));
    }
}
