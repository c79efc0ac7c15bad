use super::command::{DrawCommand, RenderParams};
use super::pipeline::Renderer;
use crate::assets::mesh_allocator::MeshHandle;

/// Thin drawing facade handed to components and scenes during render.
/// Turns (mesh, params) into a queued [`DrawCommand`].
pub struct Graphics<'a> {
    renderer: &'a mut Renderer,
}

impl<'a> Graphics<'a> {
    pub fn new(renderer: &'a mut Renderer) -> Self {
        Self { renderer }
    }

    pub fn draw_mesh(&mut self, mesh: MeshHandle, params: &RenderParams) {
        self.renderer.submit_command(DrawCommand {
            mesh,
            texture: params.texture,
            translation: params.translation,
            rotation: params.rotation,
            scale: params.scale,
            tint: params.tint,
            uv_rect: params.uv_rect,
            layer: params.layer,
            z_order: params.z_order,
            blend: params.blend,
        });
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.renderer.set_clear_color(color);
    }

    pub fn queued(&self) -> usize {
        self.renderer.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::backend::Viewport;
    use glam::{Vec2, Vec4};
    use slotmap::KeyData;

    #[test]
    fn draw_mesh_queues_command_with_params() {
        let mut renderer = Renderer::new(Viewport::new(10, 10), [0.0; 4]);
        let mesh = MeshHandle::from(KeyData::from_ffi(3));
        let params = RenderParams {
            tint: Vec4::new(0.5, 0.5, 0.5, 1.0),
            translation: Vec2::new(2.0, 3.0),
            z_order: 7,
            ..RenderParams::default()
        };
        let mut gfx = Graphics::new(&mut renderer);
        gfx.draw_mesh(mesh, &params);
        gfx.draw_mesh(mesh, &RenderParams::default());
        assert_eq!(gfx.queued(), 2);
    }
}
