use glam::{Vec2, Vec3};

use super::{ComponentContext, ComponentHooks, DestroyContext, RenderContext, RenderLayer, WorldTransform};
use crate::api::types::{GameEvent, ObjectId};
use crate::assets::mesh_allocator::MeshHandle;
use crate::error::EngineResult;
use crate::extensions::signal::Signal;
use crate::renderer::command::RenderParams;

/// Payload of button signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonEvent {
    pub object: ObjectId,
    /// Pointer position in world space.
    pub pointer: Vec2,
}

/// Clickable rectangle centred on the object's world position.
///
/// `on_click` fires when the pointer goes down inside it, `on_release` when
/// the pointer comes back up inside it after a click. If `click_event` is
/// set, a click also emits that game event with payload (object id,
/// pointer x, pointer y).
#[derive(Debug)]
pub struct Button {
    /// Hit area size before the transform's scale.
    pub size: Vec2,
    pub color: Vec3,
    pub hover_color: Option<Vec3>,
    /// 0.0 hides the button's own quad but keeps it clickable.
    pub opacity: f32,
    pub layer: RenderLayer,
    pub z_order: i32,
    pub click_event: Option<u32>,
    pub on_click: Signal<ButtonEvent>,
    pub on_release: Signal<ButtonEvent>,
    hovered: bool,
    pressed: bool,
    quad: Option<MeshHandle>,
}

impl Button {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            color: Vec3::splat(0.8),
            hover_color: None,
            opacity: 1.0,
            layer: RenderLayer::UI,
            z_order: 0,
            click_event: None,
            on_click: Signal::new(),
            on_release: Signal::new(),
            hovered: false,
            pressed: false,
            quad: None,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_hover_color(mut self, color: Vec3) -> Self {
        self.hover_color = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    /// Clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn with_click_event(mut self, kind: u32) -> Self {
        self.click_event = Some(kind);
        self
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Axis-aligned hit test; rotation is ignored.
    pub fn contains(&self, world: &WorldTransform, point: Vec2) -> bool {
        let half = (self.size * world.scale).abs() / 2.0;
        let d = (point - world.position).abs();
        d.x <= half.x && d.y <= half.y
    }
}

impl ComponentHooks for Button {
    fn start(&mut self, ctx: &mut ComponentContext<'_, '_>) -> EngineResult<()> {
        let services = &mut *ctx.services;
        self.quad = Some(services.resources.quad(services.gpu)?);
        Ok(())
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_, '_>) {
        let world = ctx.transform.world();
        let input = ctx.input();
        let pointer = input.pointer_world();
        let (went_down, went_up) = (input.pointer_pressed(), input.pointer_released());
        self.hovered = self.contains(&world, pointer);

        let event = ButtonEvent { object: ctx.object, pointer };
        if self.hovered && went_down {
            self.pressed = true;
            self.on_click.emit(&event);
            if let Some(kind) = self.click_event {
                ctx.emit_event(GameEvent::with_payload(kind, ctx.object.0 as f32, pointer.x, pointer.y));
            }
        }
        if self.pressed && went_up {
            self.pressed = false;
            if self.hovered {
                self.on_release.emit(&event);
            }
        }
    }

    fn render(&self, world: &WorldTransform, rc: &mut RenderContext<'_>) {
        let Some(quad) = self.quad else { return };
        if self.opacity <= 0.0 {
            return;
        }
        let color = match self.hover_color {
            Some(hover) if self.hovered => hover,
            _ => self.color,
        };
        let params = RenderParams {
            tint: color.extend(self.opacity),
            translation: world.position,
            rotation: world.rotation,
            scale: self.size * world.scale,
            layer: self.layer,
            z_order: self.z_order,
            ..RenderParams::default()
        };
        rc.graphics.draw_mesh(quad, &params);
    }

    fn on_destroy(&mut self, ctx: &mut DestroyContext<'_>) {
        self.on_click.disconnect_all();
        self.on_release.disconnect_all();
        if let Some(quad) = self.quad.take() {
            ctx.release(quad);
        }
    }
}
