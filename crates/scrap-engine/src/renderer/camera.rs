use std::cell::Cell;

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Half of the visible height in world units. The visible width follows
    /// from the viewport aspect ratio.
    pub ortho_size: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { ortho_size: 1.0 }
    }
}

#[derive(Debug, Clone, Copy)]
struct Matrices {
    view: Mat4,
    view_projection: Mat4,
    inverse_view_projection: Mat4,
}

/// Orthographic camera for 2D rendering, Y-up, origin at the view centre.
///
/// View matrices are computed lazily: moving the camera only marks them
/// stale, and the next query recomputes and caches them.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    position: Vec2,
    viewport: Vec2,
    projection: Mat4,
    cached: Cell<Option<Matrices>>,
    /// World rectangle the view must stay inside: [min_x, min_y, max_x, max_y].
    bounds: Option<[f32; 4]>,
    /// Per-frame retention used by `follow`.
    smoothing: f32,
}

impl Camera {
    pub fn new(config: CameraConfig, viewport_width: u32, viewport_height: u32) -> Self {
        let mut camera = Self {
            config,
            position: Vec2::ZERO,
            viewport: Vec2::ONE,
            projection: Mat4::IDENTITY,
            cached: Cell::new(None),
            bounds: None,
            smoothing: 0.0,
        };
        camera.recalculate(viewport_width, viewport_height);
        camera
    }

    /// Rebuild the projection for a new viewport size (e.g. on window resize).
    pub fn recalculate(&mut self, viewport_width: u32, viewport_height: u32) {
        self.viewport = Vec2::new(viewport_width.max(1) as f32, viewport_height.max(1) as f32);
        let half = self.half_extents();
        self.projection = Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, -1.0, 1.0);
        self.cached.set(None);
    }

    pub fn config(&self) -> CameraConfig {
        self.config
    }

    pub fn set_ortho_size(&mut self, ortho_size: f32) {
        self.config.ortho_size = ortho_size;
        self.recalculate(self.viewport.x as u32, self.viewport.y as u32);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    /// Half the visible area in world units.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.config.ortho_size * self.aspect_ratio(), self.config.ortho_size)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.clamp_to_bounds();
        self.cached.set(None);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    fn matrices(&self) -> Matrices {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let view = Mat4::from_translation(self.position.extend(0.0)).inverse();
        let view_projection = self.projection * view;
        let m = Matrices {
            view,
            view_projection,
            inverse_view_projection: view_projection.inverse(),
        };
        self.cached.set(Some(m));
        m
    }

    pub fn view(&self) -> Mat4 {
        self.matrices().view
    }

    pub fn view_projection(&self) -> Mat4 {
        self.matrices().view_projection
    }

    /// Convert a screen pixel (origin top-left, Y down) to world coordinates.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ndc = Vec3::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
            0.0,
        );
        let world = self.matrices().inverse_view_projection * ndc.extend(1.0);
        world.xy() / world.w
    }

    /// Convert a world position to a screen pixel (origin top-left, Y down).
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let clip = self.view_projection() * world.extend(0.0).extend(1.0);
        let ndc = clip.xy() / clip.w;
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }

    /// Keep the visible rectangle inside `[min, max]` on both axes. The
    /// position is re-clamped now and after every move; an axis narrower
    /// than the view stays centred on the bounds.
    pub fn set_bounds(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        self.bounds = Some([min_x, min_y, max_x, max_y]);
        self.clamp_to_bounds();
        self.cached.set(None);
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Fraction of the remaining distance kept per 60 Hz frame in
    /// [`follow`](Self::follow). Zero snaps; capped at 0.99.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    /// Ease toward `target`, frame-rate independent, then re-clamp.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.set_position(target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.set_position(self.position + (target - self.position) * lerp_factor);
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some([min_x, min_y, max_x, max_y]) = self.bounds else {
            return;
        };
        let half = self.half_extents();
        // Viewport larger than the bounds: centre on them.
        self.position.x = if half.x * 2.0 >= max_x - min_x {
            (min_x + max_x) / 2.0
        } else {
            self.position.x.clamp(min_x + half.x, max_x - half.x)
        };
        self.position.y = if half.y * 2.0 >= max_y - min_y {
            (min_y + max_y) / 2.0
        } else {
            self.position.y.clamp(min_y + half.y, max_y - half.y)
        };
    }

    /// True when `point` falls inside the current view.
    pub fn is_visible(&self, point: Vec2) -> bool {
        let d = (point - self.position).abs();
        let half = self.half_extents();
        d.x <= half.x && d.y <= half.y
    }

    /// True when the axis-aligned rectangle touches the current view.
    pub fn is_rect_visible(&self, rect_center: Vec2, rect_half_size: Vec2) -> bool {
        let d = (rect_center - self.position).abs();
        let reach = self.half_extents() + rect_half_size;
        d.x <= reach.x && d.y <= reach.y
    }
}
