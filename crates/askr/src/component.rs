//! # Component — The Behavior Unit of the Scene Tree
//!
//! A [`Component`] is a polymorphic behavior attached to exactly one entity.
//! All leaf behaviors — renderers, physics bodies, triggers, the mandatory
//! [`Transform`](crate::transform::Transform) — implement this trait. Every
//! hook has an empty default, so a component overrides only what it needs.
//!
//! Lifecycle, per frame, for an active component:
//!
//! ```text
//! on_physics → start (first active frame only) → update → late_update
//!            → on_render → on_gizmo
//! ```
//!
//! Hooks never suspend; they always run to completion within the frame. A
//! component that wants to spread work across frames starts a
//! [task](crate::task) from a hook instead.
//!
//! Components are stored type-erased (`Box<dyn Component>`) in the scene and
//! recovered by downcast, which is what lets
//! [`Scene::get_component`](crate::scene::Scene::get_component) and
//! [`Scene::cast`](crate::scene::Scene::cast) narrow an untyped handle
//! safely.

use std::any::Any;

use crate::context::Context;
use crate::handle::{ComponentHandle, EntityHandle, TaskHandle};
use crate::render::RenderQueue;

/// A behavior unit attached to one entity.
///
/// The `Any` supertrait is the downcast seam: typed component queries upcast
/// the boxed component to `&dyn Any` and try the concrete type.
#[allow(unused_variables)]
pub trait Component: Any {
    /// Called exactly once, lazily, on the first frame the component is
    /// active, before its first `update`.
    fn start(&mut self, ctx: &mut Context) {}

    /// Called once per active frame during the update pass.
    fn update(&mut self, ctx: &mut Context) {}

    /// Called once per active frame after every entity has updated.
    fn late_update(&mut self, ctx: &mut Context) {}

    /// Called once per active frame during the physics pass, before `update`.
    fn on_physics(&mut self, ctx: &mut Context) {}

    /// Called once per active frame during the render pass. A drawing
    /// component pushes its own handle into the queue; the core never draws.
    fn on_render(&mut self, ctx: &mut Context, queue: &mut RenderQueue) {}

    /// Called once per active frame during the debug-overlay pass.
    fn on_gizmo(&mut self, ctx: &mut Context) {}

    /// Called when the component becomes enabled: its own flag or its owner
    /// entity's flag was switched on. Toggles further up the ancestor chain
    /// do not notify.
    fn on_enable(&mut self, ctx: &mut Context) {}

    /// Counterpart of [`on_enable`](Component::on_enable), called when the
    /// component or its owner entity is switched off.
    fn on_disable(&mut self, ctx: &mut Context) {}

    /// Called on every attached component when a sibling is attached to the
    /// same entity (including on the new component itself). Lets components
    /// discover collaborators, e.g. a trigger finding a physics body.
    fn on_component_added(&mut self, ctx: &mut Context, added: ComponentHandle) {}

    /// Called on every attached component when a sibling is about to detach.
    fn on_component_removed(&mut self, ctx: &mut Context, removed: ComponentHandle) {}
}

/// Scene-side state shared by all components, kept outside the boxed value so
/// it stays addressable while the component's own hook is executing.
pub(crate) struct ComponentSlot {
    /// The entity this component is attached to.
    pub owner: EntityHandle,
    /// Sibling index within the owner; stable until a removal re-packs.
    pub index: usize,
    /// Disabled components skip every pass but stay attached.
    pub enabled: bool,
    /// Latched once `start` has run.
    pub start_called: bool,
    /// Set by a destroy request; detachment itself is deferred.
    pub pending_destroy: bool,
    /// Tasks hosted by this component, in start order.
    pub tasks: Vec<TaskHandle>,
    /// The behavior itself. Taken out for the duration of each hook call so
    /// the scene can be borrowed mutably by the hook.
    pub component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub fn new(owner: EntityHandle, component: Box<dyn Component>) -> Self {
        Self {
            owner,
            index: 0,
            enabled: true,
            start_called: false,
            pending_destroy: false,
            tasks: Vec::new(),
            component: Some(component),
        }
    }

    /// Downcast the stored component to a concrete type. `None` if the type
    /// does not match or the component is currently executing a hook.
    pub fn as_type<T: Component>(&self) -> Option<&T> {
        let boxed = self.component.as_ref()?;
        (boxed.as_ref() as &dyn Any).downcast_ref::<T>()
    }

    pub fn as_type_mut<T: Component>(&mut self) -> Option<&mut T> {
        let boxed = self.component.as_mut()?;
        (boxed.as_mut() as &mut dyn Any).downcast_mut::<T>()
    }

    /// `true` if the stored component is of concrete type `T`.
    pub fn is_type<T: Component>(&self) -> bool {
        self.component
            .as_ref()
            .is_some_and(|boxed| (boxed.as_ref() as &dyn Any).is::<T>())
    }
}
