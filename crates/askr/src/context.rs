//! Context — what a hook or task sees while it runs.
//!
//! Every [`Component`](crate::component::Component) hook and every task
//! routine receives `&mut Context`: mutable access to the whole
//! [`Scene`](crate::scene::Scene) plus handles identifying *who* is running.
//! Structural changes requested through the scene during a pass are deferred
//! by the scene's own guards, so a hook may freely destroy itself, spawn
//! siblings, or re-parent subtrees mid-traversal.

use crate::handle::{ComponentHandle, EntityHandle, Handle, TaskHandle};
use crate::component::Component;
use crate::scene::Scene;
use crate::task::TaskRoutine;
use crate::time::Time;

/// Passed to every component hook and task routine.
pub struct Context<'a> {
    /// The scene tree. All structural operations go through here.
    pub scene: &'a mut Scene,
    entity: EntityHandle,
    component: ComponentHandle,
}

impl<'a> Context<'a> {
    pub(crate) fn for_component(
        scene: &'a mut Scene,
        entity: EntityHandle,
        component: ComponentHandle,
    ) -> Self {
        Self {
            scene,
            entity,
            component,
        }
    }

    pub(crate) fn for_entity(scene: &'a mut Scene, entity: EntityHandle) -> Self {
        Self {
            scene,
            entity,
            component: ComponentHandle::invalid(),
        }
    }

    /// Frame timing for the current frame.
    pub fn time(&self) -> Time {
        self.scene.time()
    }

    /// The entity that owns the running hook or task.
    pub fn entity(&self) -> EntityHandle {
        self.entity
    }

    /// The component that owns the running hook or task, or an invalid
    /// handle when the running code is entity-owned.
    pub fn component(&self) -> ComponentHandle {
        self.component
    }

    /// Start a task on the running component (or on the entity, for
    /// entity-owned code). Returns a handle usable with
    /// [`Suspend::Until`](crate::task::Suspend::Until) and
    /// [`Scene::stop_task`](crate::scene::Scene::stop_task).
    pub fn start_task(
        &mut self,
        routine: impl FnMut(&mut Context) -> anyhow::Result<crate::task::TaskStep> + 'static,
    ) -> TaskHandle {
        let routine: TaskRoutine = Box::new(routine);
        if self.scene.component_alive(self.component) {
            self.scene.start_component_task(self.component, routine)
        } else {
            self.scene.start_entity_task(self.entity, routine)
        }
    }

    /// First component of type `T` on the owning entity (committed list
    /// only). Invalid handle if there is none.
    pub fn get_component<T: Component>(&self) -> Handle<T> {
        self.scene.get_component::<T>(self.entity)
    }

    /// Queue the running component (or entity, for entity-owned code) for
    /// destruction. Idempotent.
    pub fn destroy_self(&mut self) {
        if self.scene.component_alive(self.component) {
            self.scene.destroy_component(self.component);
        } else {
            self.scene.destroy(self.entity);
        }
    }
}
