//! The mandatory Transform component.
//!
//! Every entity owns exactly one [`Transform`], created atomically with the
//! entity and always at component index 0. It cannot be removed — only the
//! entity's destruction takes it along. The core composes the local matrix
//! and nothing more; world-space propagation and geometry belong to external
//! systems.

use glam::{Mat4, Quat, Vec2};

use crate::component::Component;

/// 2-D local transform: position, rotation (radians), scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    pub fn from_position(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::new()
        }
    }

    /// The local transformation matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::from_rotation_z(self.rotation),
            self.position.extend(0.0),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

// Transform carries no per-frame behavior; it is pure data with the default
// (empty) hooks.
impl Component for Transform {}
