use glam::Vec2;

use crate::api::types::ObjectId;

/// Resolved world-space placement of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    pub position: Vec2,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl WorldTransform {
    /// Map a point from this transform's local space into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation.to_radians()).rotate(local * self.scale)
    }

    /// Compose a child's local transform under this one.
    pub fn child(&self, local: &Transform) -> WorldTransform {
        WorldTransform {
            position: self.transform_point(local.position),
            rotation: self.rotation + local.rotation,
            scale: self.scale * local.scale,
        }
    }
}

/// Placement every game object carries.
///
/// `position`, `rotation` and `scale` are local (relative to the parent, or
/// to the world for root objects). The world transform is recomputed by the
/// collection before each render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,
    parent: Option<ObjectId>,
    world: WorldTransform,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec2::ZERO)
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
            parent: None,
            world: WorldTransform {
                position,
                ..WorldTransform::default()
            },
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// World transform as of the last propagation.
    pub fn world(&self) -> WorldTransform {
        self.world
    }

    pub fn local(&self) -> WorldTransform {
        WorldTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    pub(crate) fn set_world(&mut self, world: WorldTransform) {
        self.world = world;
    }
}
