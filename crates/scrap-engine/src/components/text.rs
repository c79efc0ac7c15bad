use glam::{Vec2, Vec3};

use super::{ComponentContext, ComponentHooks, DestroyContext, RenderContext, RenderLayer, WorldTransform};
use crate::assets::font::{FontConfig, FontHandle};
use crate::assets::mesh_allocator::MeshHandle;
use crate::error::EngineResult;
use crate::renderer::command::RenderParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Bitmap-font text drawn as one quad per glyph.
#[derive(Debug, Clone)]
pub struct Text {
    pub content: String,
    pub font_path: String,
    pub font_config: FontConfig,
    pub color: Vec3,
    pub opacity: f32,
    /// Glyph cell height in world units.
    pub size: f32,
    pub align: TextAlign,
    /// Offset from the object's origin in world units, before its rotation and scale.
    pub offset: Vec2,
    pub layer: RenderLayer,
    pub z_order: i32,
    font: Option<FontHandle>,
    quad: Option<MeshHandle>,
}

impl Text {
    pub fn new(content: impl Into<String>, font_path: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_path: font_path.into(),
            font_config: FontConfig::default(),
            color: Vec3::ONE,
            opacity: 1.0,
            size: 1.0,
            align: TextAlign::Left,
            offset: Vec2::ZERO,
            layer: RenderLayer::UI,
            z_order: 0,
            font: None,
            quad: None,
        }
    }

    pub fn with_font_config(mut self, config: FontConfig) -> Self {
        self.font_config = config;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn set_text(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn font(&self) -> Option<FontHandle> {
        self.font
    }
}

impl ComponentHooks for Text {
    fn start(&mut self, ctx: &mut ComponentContext<'_, '_>) -> EngineResult<()> {
        let services = &mut *ctx.services;
        self.font = Some(services.resources.load_font(services.gpu, &self.font_path, self.font_config)?);
        self.quad = Some(services.resources.quad(services.gpu)?);
        Ok(())
    }

    fn render(&self, world: &WorldTransform, rc: &mut RenderContext<'_>) {
        let (Some(font), Some(quad)) = (self.font, self.quad) else {
            return;
        };
        if self.opacity <= 0.0 || self.content.is_empty() {
            return;
        }
        let Ok(font) = rc.resources.font(font) else {
            return;
        };
        let placed = font.layout(&self.content);
        let Some((first, _)) = placed.first() else {
            return;
        };
        // Atlas pixels to world units.
        let unit = self.size / first.size.y;
        let shift = match self.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -font.measure(&self.content) * unit / 2.0,
            TextAlign::Right => -font.measure(&self.content) * unit,
        };
        let origin = self.offset + Vec2::new(shift, 0.0);

        for (glyph, pen) in placed {
            let centre = (pen + glyph.size / 2.0) * unit + origin;
            let params = RenderParams {
                tint: self.color.extend(self.opacity),
                translation: world.transform_point(centre),
                rotation: world.rotation,
                scale: glyph.size * unit * world.scale,
                texture: Some(font.texture),
                uv_rect: [glyph.uv_origin.x, glyph.uv_origin.y, glyph.uv_size.x, glyph.uv_size.y],
                layer: self.layer,
                z_order: self.z_order,
                ..RenderParams::default()
            };
            rc.graphics.draw_mesh(quad, &params);
        }
    }

    fn on_destroy(&mut self, ctx: &mut DestroyContext<'_>) {
        if let Some(font) = self.font.take() {
            ctx.release(font);
        }
        if let Some(quad) = self.quad.take() {
            ctx.release(quad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ObjectId;
    use crate::assets::manager::ResourceManagementSystem;
    use crate::assets::source::MemoryAssets;
    use crate::components::{GameObject, Services};
    use crate::input::InputState;
    use crate::renderer::backend::{DrawCall, Viewport};
    use crate::renderer::graphics::Graphics;
    use crate::renderer::headless::RecordingBackend;
    use crate::renderer::pipeline::Renderer;
    use crate::test_support::png;

    struct Fixture {
        gpu: RecordingBackend,
        resources: ResourceManagementSystem,
        object: GameObject,
    }

    // 16x6 grid of 2x2 pixel cells, advancing a full cell per glyph.
    fn started(text: Text) -> Fixture {
        let assets = MemoryAssets::new().with("font.png", png(32, 12, [255, 255, 255, 255]));
        let mut fx = Fixture {
            gpu: RecordingBackend::new(),
            resources: ResourceManagementSystem::new(Box::new(assets), 0, 4, 4),
            object: GameObject::new(ObjectId(1), "label")
                .with(text.with_font_config(FontConfig::default().with_spacing(1.0)))
                .unwrap(),
        };
        let input = InputState::new();
        let (mut events, mut audio) = (Vec::new(), Vec::new());
        let mut services = Services {
            input: &input,
            resources: &mut fx.resources,
            gpu: &mut fx.gpu,
            events: &mut events,
            audio: &mut audio,
        };
        fx.object.update(0.016, &mut services);
        fx
    }

    impl Fixture {
        fn draws(&mut self) -> Vec<DrawCall> {
            let mut renderer = Renderer::new(Viewport::new(64, 64), [0.0; 4]);
            let mut rc = RenderContext {
                graphics: Graphics::new(&mut renderer),
                resources: &self.resources,
            };
            self.object.render(&mut rc);
            self.gpu.clear_calls();
            renderer.flush(&mut self.gpu, &self.resources);
            self.gpu.draws().copied().collect()
        }

        fn text_mut(&mut self) -> &mut Text {
            self.object.get_mut::<Text>().unwrap()
        }
    }

    fn centre(draw: &DrawCall) -> Vec2 {
        draw.model.w_axis.truncate().truncate()
    }

    #[test]
    fn one_draw_per_glyph_with_atlas_uvs() {
        let mut fx = started(Text::new("AB", "font.png"));
        let draws = fx.draws();
        assert_eq!(draws.len(), 2);

        let font = fx.resources.font(fx.object.get::<Text>().unwrap().font().unwrap()).unwrap();
        let a = font.glyph('A').unwrap();
        let b = font.glyph('B').unwrap();
        assert_eq!(draws[0].uv_rect, [a.uv_origin.x, a.uv_origin.y, a.uv_size.x, a.uv_size.y]);
        assert_eq!(draws[1].uv_rect, [b.uv_origin.x, b.uv_origin.y, b.uv_size.x, b.uv_size.y]);
        assert!(draws.iter().all(|d| d.texture.is_some()));

        // size 1.0 over a 2 pixel cell: half a world unit per pixel.
        assert_eq!(centre(&draws[0]), Vec2::new(0.5, 0.5));
        assert_eq!(centre(&draws[1]), Vec2::new(1.5, 0.5));
    }

    #[test]
    fn alignment_shifts_the_line() {
        let mut fx = started(Text::new("AB", "font.png").with_align(TextAlign::Center));
        let draws = fx.draws();
        assert_eq!(centre(&draws[0]), Vec2::new(-0.5, 0.5));
        assert_eq!(centre(&draws[1]), Vec2::new(0.5, 0.5));

        fx.text_mut().align = TextAlign::Right;
        let draws = fx.draws();
        assert_eq!(centre(&draws[0]), Vec2::new(-1.5, 0.5));
        assert_eq!(centre(&draws[1]), Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn offset_moves_every_glyph() {
        let mut fx = started(Text::new("AB", "font.png").with_offset(Vec2::new(1.0, 2.0)));
        let draws = fx.draws();
        assert_eq!(centre(&draws[0]), Vec2::new(1.5, 2.5));
        assert_eq!(centre(&draws[1]), Vec2::new(2.5, 2.5));
    }

    #[test]
    fn empty_or_transparent_text_draws_nothing() {
        let mut fx = started(Text::new("", "font.png"));
        assert!(fx.draws().is_empty());

        fx.text_mut().set_text("AB");
        assert_eq!(fx.draws().len(), 2);

        fx.text_mut().opacity = 0.0;
        assert!(fx.draws().is_empty());
    }

    #[test]
    fn on_destroy_releases_font_and_quad() {
        let mut fx = started(Text::new("AB", "font.png"));
        assert_eq!(fx.resources.stats().cached, 2);
        assert_eq!(fx.resources.stats().fonts, 1);

        let mut audio = Vec::new();
        let mut ctx = DestroyContext {
            object: fx.object.id(),
            resources: &mut fx.resources,
            audio: &mut audio,
        };
        fx.object.dispose(&mut ctx);
        assert_eq!(fx.resources.stats().cached, 0);

        fx.resources.end_frame(&mut fx.gpu);
        assert_eq!(fx.resources.stats().fonts, 0);
        assert_eq!(fx.resources.stats().textures, 0);
    }
}
