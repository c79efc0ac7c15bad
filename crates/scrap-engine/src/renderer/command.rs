use glam::{Mat4, Quat, Vec2, Vec4};
use slotmap::Key;

use crate::assets::mesh_allocator::MeshHandle;
use crate::assets::texture_allocator::TextureHandle;
use crate::components::layer::RenderLayer;
use crate::components::sprite::BlendMode;

/// Full UV rectangle (u, v, width, height).
pub const FULL_UV: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// One queued draw: mesh + texture handles plus per-draw state.
/// Submitted during render, consumed by the next flush.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub texture: Option<TextureHandle>,
    pub translation: Vec2,
    /// Rotation about Z in degrees.
    pub rotation: f32,
    pub scale: Vec2,
    pub tint: Vec4,
    pub uv_rect: [f32; 4],
    pub layer: RenderLayer,
    pub z_order: i32,
    pub blend: BlendMode,
}

/// Sort key used to batch commands. Ties keep submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BatchKey {
    pub layer: RenderLayer,
    pub z_order: i32,
    pub blend: BlendMode,
    texture: u64,
    mesh: u64,
}

impl DrawCommand {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            texture: None,
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            tint: Vec4::ONE,
            uv_rect: FULL_UV,
            layer: RenderLayer::default(),
            z_order: 0,
            blend: BlendMode::default(),
        }
    }

    /// translate * rotateZ * scale
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::from_rotation_z(self.rotation.to_radians()),
            self.translation.extend(0.0),
        )
    }

    pub fn batch_key(&self) -> BatchKey {
        BatchKey {
            layer: self.layer,
            z_order: self.z_order,
            blend: self.blend,
            texture: self.texture.map_or(0, |t| t.data().as_ffi()),
            mesh: self.mesh.data().as_ffi(),
        }
    }

    /// Whether switching from `prev` to `self` changes GPU state.
    pub(crate) fn breaks_batch(&self, prev: &DrawCommand) -> bool {
        self.texture != prev.texture || self.mesh != prev.mesh || self.blend != prev.blend
    }
}

/// Per-draw overrides accepted by [`Graphics::draw_mesh`](super::graphics::Graphics::draw_mesh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub tint: Vec4,
    pub translation: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub texture: Option<TextureHandle>,
    pub uv_rect: [f32; 4],
    pub layer: RenderLayer,
    pub z_order: i32,
    pub blend: BlendMode,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            tint: Vec4::ONE,
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            texture: None,
            uv_rect: FULL_UV,
            layer: RenderLayer::default(),
            z_order: 0,
            blend: BlendMode::default(),
        }
    }
}
