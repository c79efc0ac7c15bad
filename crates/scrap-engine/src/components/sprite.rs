use glam::{Vec2, Vec3};

use super::{ComponentContext, ComponentHooks, DestroyContext, RenderContext, RenderLayer, WorldTransform};
use crate::assets::mesh_allocator::MeshHandle;
use crate::assets::texture::TextureConfig;
use crate::assets::texture_allocator::TextureHandle;
use crate::error::EngineResult;
use crate::renderer::command::{RenderParams, FULL_UV};

/// Blend mode for sprite rendering.
/// Alpha draws before additive within the same layer and z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    #[default]
    Alpha,
    /// Additive blending for glow effects (src-alpha, one).
    Additive,
}

/// Draws a textured (or flat-colored) quad at the object's transform.
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    /// Texture to load on start. `None` draws a flat quad in `color`.
    pub texture_path: Option<String>,
    pub texture_config: TextureConfig,
    pub color: Vec3,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f32,
    /// World-space size of the quad before the transform's scale.
    pub size: Vec2,
    /// Anchor inside the quad: (0, 0) is the centre, (-0.5, -0.5) the bottom-left corner.
    pub pivot: Vec2,
    pub uv_rect: [f32; 4],
    pub layer: RenderLayer,
    pub z_order: i32,
    pub blend: BlendMode,
    pub visible: bool,
    texture: Option<TextureHandle>,
    quad: Option<MeshHandle>,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            texture_path: None,
            texture_config: TextureConfig::default(),
            color: Vec3::ONE,
            opacity: 1.0,
            size: Vec2::ONE,
            pivot: Vec2::ZERO,
            uv_rect: FULL_UV,
            layer: RenderLayer::default(),
            z_order: 0,
            blend: BlendMode::Alpha,
            visible: true,
            texture: None,
            quad: None,
        }
    }
}

impl SpriteRenderer {
    pub fn new(texture_path: impl Into<String>) -> Self {
        Self {
            texture_path: Some(texture_path.into()),
            ..Self::default()
        }
    }

    /// A flat-colored quad.
    pub fn solid(color: Vec3) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
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

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_texture_config(mut self, config: TextureConfig) -> Self {
        self.texture_config = config;
        self
    }

    pub fn with_uv_rect(mut self, uv_rect: [f32; 4]) -> Self {
        self.uv_rect = uv_rect;
        self
    }

    /// Loaded texture, once started.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub(crate) fn render_params(&self, world: &WorldTransform) -> RenderParams {
        RenderParams {
            tint: self.color.extend(self.opacity),
            translation: world.transform_point(-self.pivot * self.size),
            rotation: world.rotation,
            scale: self.size * world.scale,
            texture: self.texture,
            uv_rect: self.uv_rect,
            layer: self.layer,
            z_order: self.z_order,
            blend: self.blend,
        }
    }
}

impl ComponentHooks for SpriteRenderer {
    fn start(&mut self, ctx: &mut ComponentContext<'_, '_>) -> EngineResult<()> {
        let services = &mut *ctx.services;
        self.quad = Some(services.resources.quad(services.gpu)?);
        if let Some(path) = &self.texture_path {
            self.texture = Some(services.resources.load_texture_or_blank(
                services.gpu,
                path,
                self.texture_config,
            )?);
        }
        Ok(())
    }

    fn render(&self, world: &WorldTransform, rc: &mut RenderContext<'_>) {
        let Some(quad) = self.quad else { return };
        if !self.visible || self.opacity <= 0.0 {
            return;
        }
        rc.graphics.draw_mesh(quad, &self.render_params(world));
    }

    fn on_destroy(&mut self, ctx: &mut DestroyContext<'_>) {
        if let Some(texture) = self.texture.take() {
            ctx.release(texture);
        }
        if let Some(quad) = self.quad.take() {
            ctx.release(quad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_apply_pivot_and_scale() {
        let sprite = SpriteRenderer::solid(Vec3::new(1.0, 0.0, 0.0))
            .with_size(Vec2::new(4.0, 2.0))
            .with_pivot(Vec2::new(-0.5, -0.5))
            .with_opacity(0.5);
        let world = WorldTransform {
            position: Vec2::new(10.0, 10.0),
            rotation: 0.0,
            scale: Vec2::splat(2.0),
        };
        let params = sprite.render_params(&world);
        // Bottom-left anchored: the quad centre sits half a size up and right.
        assert_eq!(params.translation, Vec2::new(14.0, 12.0));
        assert_eq!(params.scale, Vec2::new(8.0, 4.0));
        assert_eq!(params.tint.w, 0.5);
        assert_eq!(params.texture, None);
    }

    #[test]
    fn opacity_is_clamped() {
        let world = WorldTransform::default();
        let bright = SpriteRenderer::solid(Vec3::ONE).with_opacity(1.7);
        assert_eq!(bright.render_params(&world).tint.w, 1.0);

        let mut faded = SpriteRenderer::solid(Vec3::ONE);
        faded.set_opacity(-0.3);
        assert_eq!(faded.opacity, 0.0);
    }

    #[test]
    fn alpha_sorts_before_additive() {
        assert!(BlendMode::Alpha < BlendMode::Additive);
    }
}
