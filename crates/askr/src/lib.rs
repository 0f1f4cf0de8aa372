//! # askr — A Hierarchical Entity/Component Scene Runtime
//!
//! askr is the headless core of a 2-D game framework: a tree of entities,
//! each carrying an ordered list of polymorphic components, driven through a
//! fixed sequence of per-frame passes by an [`Engine`](engine::Engine).
//!
//! The pillars:
//!
//! - **Entities** form a single-rooted ownership tree. Traversal is always
//!   depth-first, self before children, in sibling order.
//! - **Components** ([`Component`](component::Component)) are the behavior
//!   units, with lifecycle hooks (`start`, `update`, `late_update`, physics /
//!   render / gizmo callbacks) that have empty defaults. Every entity owns a
//!   mandatory [`Transform`](transform::Transform) at component index 0.
//! - **Handles** ([`handle`]) are generation-checked weak references. They
//!   never dangle: destroying the target makes every outstanding handle stop
//!   validating, detectably and safely.
//! - **Tasks** ([`task`]) are cooperative routines resumed once per frame
//!   after their owner's update, with frame, timed, and await-another-task
//!   suspension.
//! - **Deferred mutation**: structural changes requested while the tree is
//!   being traversed are queued and applied at well-defined drain points, so
//!   hooks may freely spawn and destroy mid-pass.
//!
//! ```no_run
//! use askr::prelude::*;
//!
//! struct Spinner;
//!
//! impl Component for Spinner {
//!     fn update(&mut self, ctx: &mut Context) {
//!         let dt = ctx.time().delta_secs();
//!         ctx.scene.transform_mut(ctx.entity()).rotation += dt;
//!     }
//! }
//!
//! let mut engine = Engine::new();
//! let root = engine.scene().root();
//! let e = engine.scene_mut().make_child(root, "spinner");
//! engine.scene_mut().add_component(e, Spinner);
//! loop {
//!     engine.tick();
//! }
//! ```

pub mod component;
pub mod context;
pub mod engine;
pub mod handle;
pub mod id;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod task;
pub mod time;
pub mod transform;

mod arena;

pub use glam;
