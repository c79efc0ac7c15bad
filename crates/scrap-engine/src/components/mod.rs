//! Components attached to game objects, and the contexts they run with.
//!
//! Every object carries a [`Transform`]; everything else is an optional
//! [`Component`]. Components never hold references to their siblings or to
//! engine systems; the collection hands them a context per call.

pub mod audio;
pub mod button;
pub mod layer;
pub mod object;
pub mod sprite;
pub mod text;
pub mod transform;
pub mod tween;

use glam::Vec3;

use crate::api::types::{AudioCommand, GameEvent, ObjectId};
use crate::assets::manager::{ResourceHandle, ResourceManagementSystem, ResourceManager};
use crate::error::EngineResult;
use crate::input::state::InputState;
use crate::renderer::backend::GpuBackend;
use crate::renderer::graphics::Graphics;

pub use audio::AudioSource;
pub use button::{Button, ButtonEvent};
pub use layer::RenderLayer;
pub use object::GameObject;
pub use sprite::{BlendMode, SpriteRenderer};
pub use text::{Text, TextAlign};
pub use transform::{Transform, WorldTransform};
pub use tween::{Tween, TweenComponent, TweenId, TweenLoop, TweenTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Intrinsic: every object has exactly one.
    Transform,
    SpriteRenderer,
    Text,
    Button,
    AudioSource,
    Tween,
}

/// Lifecycle of an attached component.
///
/// `Uninitialized` until its first update pass runs `start`; `Started` until
/// its first `update`; then `Active`. A destroy request moves it to
/// `PendingDestroy`, and the end-of-frame sweep runs `on_destroy` and marks
/// it `Removed` before dropping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Started,
    Active,
    PendingDestroy,
    Removed,
}

/// Hooks the collection drives. All default to doing nothing.
pub trait ComponentHooks {
    /// Runs once, on the first update pass after attachment.
    fn start(&mut self, _ctx: &mut ComponentContext<'_, '_>) -> EngineResult<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ComponentContext<'_, '_>) {}

    fn render(&self, _world: &WorldTransform, _rc: &mut RenderContext<'_>) {}

    /// Runs once before the component is dropped. Release resources here.
    fn on_destroy(&mut self, _ctx: &mut DestroyContext<'_>) {}
}

#[derive(Debug)]
pub enum Component {
    SpriteRenderer(SpriteRenderer),
    Text(Text),
    Button(Button),
    AudioSource(AudioSource),
    Tween(TweenComponent),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::SpriteRenderer(_) => ComponentKind::SpriteRenderer,
            Component::Text(_) => ComponentKind::Text,
            Component::Button(_) => ComponentKind::Button,
            Component::AudioSource(_) => ComponentKind::AudioSource,
            Component::Tween(_) => ComponentKind::Tween,
        }
    }

    pub fn hooks(&self) -> &dyn ComponentHooks {
        match self {
            Component::SpriteRenderer(c) => c,
            Component::Text(c) => c,
            Component::Button(c) => c,
            Component::AudioSource(c) => c,
            Component::Tween(c) => c,
        }
    }

    pub fn hooks_mut(&mut self) -> &mut dyn ComponentHooks {
        match self {
            Component::SpriteRenderer(c) => c,
            Component::Text(c) => c,
            Component::Button(c) => c,
            Component::AudioSource(c) => c,
            Component::Tween(c) => c,
        }
    }
}

/// Typed access to a [`Component`] variant.
pub trait ComponentType: ComponentHooks + Sized {
    const KIND: ComponentKind;

    fn from_component(component: &Component) -> Option<&Self>;
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
    fn into_component(self) -> Component;
}

macro_rules! component_type {
    ($ty:ty, $variant:ident) => {
        impl ComponentType for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn from_component(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn into_component(self) -> Component {
                Component::$variant(self)
            }
        }

        impl From<$ty> for Component {
            fn from(c: $ty) -> Self {
                Component::$variant(c)
            }
        }
    };
}

component_type!(SpriteRenderer, SpriteRenderer);
component_type!(Text, Text);
component_type!(Button, Button);
component_type!(AudioSource, AudioSource);
component_type!(TweenComponent, Tween);

/// Engine services lent to objects for one update or destroy pass.
pub struct Services<'a> {
    pub input: &'a InputState,
    pub resources: &'a mut ResourceManagementSystem,
    pub gpu: &'a mut dyn GpuBackend,
    pub events: &'a mut Vec<GameEvent>,
    pub audio: &'a mut Vec<AudioCommand>,
}

/// Changes a component asks of its object, applied after the component returns.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Requests {
    pub destroy_self: bool,
    pub destroy_object: bool,
    pub color: Option<Vec3>,
    pub opacity: Option<f32>,
}

/// Context for `start` and `update`.
pub struct ComponentContext<'a, 'b> {
    pub object: ObjectId,
    pub dt: f32,
    pub transform: &'a mut Transform,
    pub services: &'a mut Services<'b>,
    pub(crate) requests: Requests,
}

impl<'a, 'b> ComponentContext<'a, 'b> {
    pub fn input(&self) -> &InputState {
        self.services.input
    }

    pub fn emit_event(&mut self, event: GameEvent) {
        self.services.events.push(event);
    }

    pub fn emit_audio(&mut self, command: AudioCommand) {
        self.services.audio.push(command);
    }

    /// Remove this component at the end of the frame.
    pub fn destroy_self(&mut self) {
        self.requests.destroy_self = true;
    }

    /// Remove the whole object at the end of the frame.
    pub fn destroy_object(&mut self) {
        self.requests.destroy_object = true;
    }

    /// Tint the object's visual (sprite, else button).
    pub fn set_color(&mut self, color: Vec3) {
        self.requests.color = Some(color);
    }

    /// Set the opacity of the object's visual (sprite, else button).
    pub fn set_opacity(&mut self, opacity: f32) {
        self.requests.opacity = Some(opacity);
    }
}

/// Context for `render`.
pub struct RenderContext<'a> {
    pub graphics: Graphics<'a>,
    pub resources: &'a ResourceManagementSystem,
}

/// Context for `on_destroy`.
pub struct DestroyContext<'a> {
    pub object: ObjectId,
    pub resources: &'a mut ResourceManagementSystem,
    pub audio: &'a mut Vec<AudioCommand>,
}

impl<'a> DestroyContext<'a> {
    /// Release a handle, logging instead of failing.
    ///
    /// Releasing a handle that is no longer held is a lifecycle bug and
    /// asserts in debug builds.
    pub fn release(&mut self, handle: impl Into<ResourceHandle>) {
        let handle = handle.into();
        if let Err(e) = self.resources.release(handle) {
            log::error!("object {:?}: release of {:?} failed: {}", self.object, handle, e);
            debug_assert!(false, "object {:?} released {:?} twice", self.object, handle);
        }
    }
}
