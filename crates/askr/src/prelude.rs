//! Common imports, re-exported in one place.

pub use crate::component::Component;
pub use crate::context::Context;
pub use crate::engine::{Engine, EngineSettings};
pub use crate::handle::{ComponentHandle, EntityHandle, Handle, TaskHandle};
pub use crate::id::Id;
pub use crate::render::RenderQueue;
pub use crate::scene::Scene;
pub use crate::task::{Suspend, TaskRoutine, TaskStep};
pub use crate::time::Time;
pub use crate::transform::Transform;

pub use glam::{Mat4, Vec2};
