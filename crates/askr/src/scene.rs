//! # Scene — The Entity Tree and Its Update Pipeline
//!
//! The [`Scene`] owns every entity, component, and task in three generational
//! arenas, plus the identity registry and a copy of the frame clock. The tree
//! is strictly single-owner: a parent's `children` list owns the subtree, and
//! the child's `parent` field is a plain non-owning back-handle.
//!
//! ## Deferred structural mutation
//!
//! The per-frame passes iterate the live child/component lists, so those
//! lists must never be resized mid-pass. The discipline:
//!
//! - **Additions** ([`make_child`](Scene::make_child),
//!   [`add_component`](Scene::add_component), …) always go through a
//!   pending-add queue. Queues drain at the entry of the update pass and
//!   again at the end-of-frame drain, so a new child or component starts
//!   participating on a later pass, never the one in progress.
//! - **Removals** ([`destroy`](Scene::destroy),
//!   [`destroy_component`](Scene::destroy_component), …) mark the target and
//!   queue it; detachment happens only at the end-of-frame drain. A
//!   destroyed *component* keeps participating through the rest of its frame
//!   (it still receives `late_update`); a destroyed *entity* drops out of
//!   every later pass immediately, taking its subtree with it, even though
//!   deallocation is deferred.
//! - Reordering and detaching ([`make_child_first`](Scene::make_child_first),
//!   [`detach_child`](Scene::detach_child)) are immediate and therefore
//!   refuse to run while the list is being iterated — that is a programmer
//!   error, not a queued request.
//!
//! Queries ([`find_child`](Scene::find_child),
//! [`get_component`](Scene::get_component)) see only the committed lists,
//! never pending additions.
//!
//! ## Pass order within one entity
//!
//! Self first — own components in attachment order, skipping disabled ones —
//! then children left to right, recursively. Disabled or destroy-pending
//! subtrees are skipped entirely. Tasks resume right after their owner's
//! update slot, in start order.

use crate::arena::Arena;
use crate::component::{Component, ComponentSlot};
use crate::context::Context;
use crate::handle::{ComponentHandle, EntityHandle, Handle, TaskHandle};
use crate::id::{Id, IdRegistry};
use crate::render::RenderQueue;
use crate::task::{Suspend, TaskOwner, TaskRoutine, TaskSlot, TaskStep};
use crate::time::Time;
use crate::transform::Transform;

// ── EntityNode ───────────────────────────────────────────────────────────

/// Tree-side state of one entity.
struct EntityNode {
    /// Identity registered in the scene's [`IdRegistry`].
    id: Id,
    /// Disabled entities (and their whole subtree) skip every pass.
    enabled: bool,
    is_root: bool,
    /// Render layer this entity's drawing components submit to.
    layer: usize,
    /// Non-owning back-reference; invalid for the root and detached subtrees.
    parent: EntityHandle,
    /// Sibling index within the parent.
    index: usize,
    /// Owned children, in order. Index 0 has no special meaning.
    children: Vec<EntityHandle>,
    /// Owned components, in attachment order. Index 0 is always Transform.
    components: Vec<ComponentHandle>,
    children_add: Vec<EntityHandle>,
    children_del: Vec<EntityHandle>,
    components_add: Vec<ComponentHandle>,
    components_del: Vec<ComponentHandle>,
    /// Guards: a flagged list may be read but not structurally mutated.
    iterating_children: bool,
    iterating_components: bool,
    /// Set by a destroy request; cuts pass participation immediately.
    pending_destroy: bool,
    /// Tasks hosted by the entity itself, in start order.
    tasks: Vec<TaskHandle>,
}

impl EntityNode {
    fn new(id: Id, parent: EntityHandle) -> Self {
        Self {
            id,
            enabled: true,
            is_root: false,
            layer: 0,
            parent,
            index: 0,
            children: Vec::new(),
            components: Vec::new(),
            children_add: Vec::new(),
            children_del: Vec::new(),
            components_add: Vec::new(),
            components_del: Vec::new(),
            iterating_children: false,
            iterating_components: false,
            pending_destroy: false,
            tasks: Vec::new(),
        }
    }
}

// ── Scene ────────────────────────────────────────────────────────────────

/// The entity tree: arenas for entities, components, and tasks, the identity
/// registry, and the root entity.
pub struct Scene {
    entities: Arena<EntityNode>,
    components: Arena<ComponentSlot>,
    tasks: Arena<TaskSlot>,
    ids: IdRegistry,
    root: EntityHandle,
    layer_count: usize,
    time: Time,
    /// Counter for generated default entity names (`obj0`, `obj1`, ...).
    name_counter: u64,
    /// Owner whose task list is currently swapped out for resumption.
    resuming: Option<TaskOwner>,
    /// Set when a stop-all request arrives for the owner being resumed.
    resume_stopped: bool,
}

impl Scene {
    /// Create a scene with a single render layer.
    pub fn new() -> Self {
        Self::with_layers(1)
    }

    /// Create a scene with the given number of render layers. The root
    /// entity (named `"root"`) is created along with it.
    pub fn with_layers(layer_count: usize) -> Self {
        assert!(layer_count > 0, "A scene needs at least one render layer");
        let mut scene = Self {
            entities: Arena::new(),
            components: Arena::new(),
            tasks: Arena::new(),
            ids: IdRegistry::new(),
            root: EntityHandle::invalid(),
            layer_count,
            time: Time::new(),
            name_counter: 0,
            resuming: None,
            resume_stopped: false,
        };
        let root = scene.create_entity(Some("root"), EntityHandle::invalid());
        scene.node_mut(root).is_root = true;
        scene.root = root;
        scene
    }

    /// The root entity. Always valid, never destroyable.
    pub fn root(&self) -> EntityHandle {
        self.root
    }

    /// Number of live entities, including the root.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of render layers drawing components may submit to.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Frame timing for the current frame (copied in by the engine).
    pub fn time(&self) -> Time {
        self.time
    }

    /// The identity registry backing entity names.
    pub fn ids(&self) -> &IdRegistry {
        &self.ids
    }

    pub(crate) fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    // ── Internal node access ─────────────────────────────────────────

    fn node(&self, entity: EntityHandle) -> &EntityNode {
        self.entities
            .get(entity.raw())
            .unwrap_or_else(|| panic!("Dereferenced a stale entity handle {:?}", entity))
    }

    fn node_mut(&mut self, entity: EntityHandle) -> &mut EntityNode {
        self.entities
            .get_mut(entity.raw())
            .unwrap_or_else(|| panic!("Dereferenced a stale entity handle {:?}", entity))
    }

    // ── Entity creation ──────────────────────────────────────────────

    /// Insert a fresh node with its mandatory Transform at component index 0.
    fn create_entity(&mut self, name: Option<&str>, parent: EntityHandle) -> EntityHandle {
        let name = match name {
            Some(name) => name.to_string(),
            None => loop {
                let candidate = format!("obj{}", self.name_counter);
                self.name_counter += 1;
                if self.ids.try_get_id(&candidate).is_none() {
                    break candidate;
                }
            },
        };
        let id = self.ids.make_id(&name);
        let entity = EntityHandle(self.entities.insert(EntityNode::new(id, parent)));

        // The Transform is created atomically with the entity: it is live at
        // index 0 immediately, never queued, never removable.
        let transform = ComponentHandle(
            self.components
                .insert(ComponentSlot::new(entity, Box::new(Transform::new()))),
        );
        self.node_mut(entity).components.push(transform);

        log::trace!("Created entity \"{}\" ({:?})", name, entity);
        entity
    }

    /// Construct a named child entity under `parent` and queue it for
    /// attachment. The returned handle is usable immediately, even though
    /// the child is not yet visible to traversal or [`find_child`].
    ///
    /// # Panics
    ///
    /// Panics if `parent` is stale or the name is already registered.
    pub fn make_child(&mut self, parent: EntityHandle, name: &str) -> EntityHandle {
        self.node(parent); // assert the parent is alive
        let child = self.create_entity(Some(name), parent);
        self.node_mut(parent).children_add.push(child);
        child
    }

    /// Like [`make_child`](Scene::make_child), with a generated name
    /// (`obj0`, `obj1`, ...).
    pub fn make_child_unnamed(&mut self, parent: EntityHandle) -> EntityHandle {
        self.node(parent);
        let child = self.create_entity(None, parent);
        self.node_mut(parent).children_add.push(child);
        child
    }

    /// Transfer an already-constructed, currently parentless subtree under
    /// `parent` (queued, like any addition).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` already has a parent.
    pub fn attach_child(&mut self, parent: EntityHandle, child: EntityHandle) {
        self.node(parent);
        let current_parent = self.node(child).parent;
        assert!(
            !self.entities.contains(current_parent.raw()),
            "attach_child: {:?} already has a parent",
            child
        );
        self.node_mut(child).parent = parent;
        self.node_mut(parent).children_add.push(child);
    }

    /// Detach the child at `index`, transferring the subtree out of the
    /// tree. The subtree stays alive (and is no longer traversed) until
    /// re-attached or destroyed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the child list is being iterated.
    pub fn detach_child(&mut self, parent: EntityHandle, index: usize) -> EntityHandle {
        let node = self.node(parent);
        assert!(
            !node.iterating_children,
            "detach_child: the child list of {:?} is being iterated",
            parent
        );
        assert!(
            index < node.children.len(),
            "detach_child: index {} out of range ({} children)",
            index,
            node.children.len()
        );
        let child = self.node_mut(parent).children.remove(index);
        let child_node = self.node_mut(child);
        child_node.parent = EntityHandle::invalid();
        child_node.index = 0;
        self.update_child_indices(parent);
        child
    }

    // ── Entity destruction ───────────────────────────────────────────

    /// Queue an entity (and transitively its whole subtree) for destruction.
    /// Idempotent: repeat calls before the deletions pass are no-ops. The
    /// entity stops participating in passes immediately; deallocation is
    /// deferred to the end-of-frame drain.
    ///
    /// A stale handle is a no-op. A parentless (detached) entity is
    /// destroyed immediately, since no traversal can be iterating it.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is the root.
    pub fn destroy(&mut self, entity: EntityHandle) {
        let Some(node) = self.entities.get_mut(entity.raw()) else {
            return;
        };
        if node.pending_destroy {
            return;
        }
        assert!(!node.is_root, "The root entity cannot be destroyed");
        node.pending_destroy = true;
        let parent = node.parent;
        if self.entities.contains(parent.raw()) {
            self.node_mut(parent).children_del.push(entity);
        } else {
            self.destroy_entity_now(entity);
        }
    }

    /// Queue the child at `index` for destruction.
    pub fn destroy_child(&mut self, parent: EntityHandle, index: usize) {
        let child = self.child(parent, index);
        self.destroy(child);
    }

    /// Queue every committed child of `parent` for destruction.
    pub fn destroy_children(&mut self, parent: EntityHandle) {
        for child in self.node(parent).children.clone() {
            self.destroy(child);
        }
    }

    /// Tear an entity and its subtree down right now: children first,
    /// bottom-up, then components and tasks, then the node itself.
    fn destroy_entity_now(&mut self, entity: EntityHandle) {
        let Some(node) = self.entities.get(entity.raw()) else {
            return;
        };
        let children: Vec<_> = node
            .children
            .iter()
            .chain(node.children_add.iter())
            .copied()
            .collect();
        let components: Vec<_> = node
            .components
            .iter()
            .chain(node.components_add.iter())
            .copied()
            .collect();
        let tasks = node.tasks.clone();
        let parent = node.parent;
        let id = node.id;

        for child in children {
            self.destroy_entity_now(child);
        }
        for component in components {
            self.remove_component_storage(component);
        }
        for task in tasks {
            self.tasks.remove(task.raw());
        }
        log::trace!("Destroyed entity \"{}\" ({:?})", self.ids.name(id), entity);
        self.ids.free_id(id);

        if let Some(parent_node) = self.entities.get_mut(parent.raw()) {
            parent_node.children.retain(|&c| c != entity);
            parent_node.children_add.retain(|&c| c != entity);
            self.update_child_indices(parent);
        }
        self.entities.remove(entity.raw());
    }

    // ── Entity state ─────────────────────────────────────────────────

    /// `true` while the handle addresses a live entity. Becomes `false`
    /// starting from the deletions pass that follows the destroy request.
    pub fn is_alive(&self, entity: EntityHandle) -> bool {
        self.entities.contains(entity.raw())
    }

    /// The entity's registered name.
    pub fn name(&self, entity: EntityHandle) -> &str {
        self.ids.name(self.node(entity).id)
    }

    /// The entity's stable id.
    pub fn id(&self, entity: EntityHandle) -> Id {
        self.node(entity).id
    }

    pub fn is_root(&self, entity: EntityHandle) -> bool {
        self.node(entity).is_root
    }

    /// Enable or disable the entity. A disabled entity and its whole subtree
    /// skip every pass; the structure itself is untouched. On a transition,
    /// the entity's own enabled components are notified via
    /// `on_enable`/`on_disable`.
    pub fn set_enabled(&mut self, entity: EntityHandle, enabled: bool) {
        let node = self.node_mut(entity);
        if node.enabled == enabled {
            return;
        }
        node.enabled = enabled;
        for component in self.committed_components(entity) {
            if !self.is_component_enabled(component) {
                continue;
            }
            if enabled {
                self.with_component(component, |c, ctx| c.on_enable(ctx));
            } else {
                self.with_component(component, |c, ctx| c.on_disable(ctx));
            }
        }
    }

    pub fn is_enabled(&self, entity: EntityHandle) -> bool {
        self.node(entity).enabled
    }

    /// Enabled AND every ancestor up to the root enabled.
    pub fn is_active(&self, entity: EntityHandle) -> bool {
        let node = self.node(entity);
        if !node.enabled {
            return false;
        }
        match self.entities.get(node.parent.raw()) {
            Some(_) => self.is_active(node.parent),
            None => true,
        }
    }

    pub fn has_parent(&self, entity: EntityHandle) -> bool {
        self.entities.contains(self.node(entity).parent.raw())
    }

    /// The parent handle, or an invalid handle for the root and detached
    /// subtrees.
    pub fn parent_of(&self, entity: EntityHandle) -> EntityHandle {
        self.node(entity).parent
    }

    /// Sibling index within the parent. Stable until a removal or reorder
    /// re-packs indices.
    pub fn entity_index(&self, entity: EntityHandle) -> usize {
        self.node(entity).index
    }

    pub fn is_parent_of(&self, parent: EntityHandle, child: EntityHandle) -> bool {
        self.node(child).parent == parent
    }

    pub fn is_child_of(&self, child: EntityHandle, parent: EntityHandle) -> bool {
        self.is_parent_of(parent, child)
    }

    // ── Children ─────────────────────────────────────────────────────

    /// Committed children, in order. Pending additions are not included.
    pub fn children(&self, entity: EntityHandle) -> &[EntityHandle] {
        &self.node(entity).children
    }

    pub fn child_count(&self, entity: EntityHandle) -> usize {
        self.node(entity).children.len()
    }

    /// The committed child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn child(&self, parent: EntityHandle, index: usize) -> EntityHandle {
        let node = self.node(parent);
        *node.children.get(index).unwrap_or_else(|| {
            panic!(
                "Child index {} out of range ({} children)",
                index,
                node.children.len()
            )
        })
    }

    /// Linear search among committed children by id. Invalid handle if none
    /// matches.
    pub fn find_child(&self, parent: EntityHandle, id: Id) -> EntityHandle {
        for &child in &self.node(parent).children {
            if self.node(child).id == id {
                return child;
            }
        }
        EntityHandle::invalid()
    }

    /// Linear search among committed children by name.
    pub fn find_child_by_name(&self, parent: EntityHandle, name: &str) -> EntityHandle {
        match self.ids.try_get_id(name) {
            Some(id) => self.find_child(parent, id),
            None => EntityHandle::invalid(),
        }
    }

    /// First committed child carrying a component of type `T`.
    pub fn find_child_with<T: Component>(&self, parent: EntityHandle) -> EntityHandle {
        for &child in &self.node(parent).children {
            if self.get_component::<T>(child) != Handle::invalid() {
                return child;
            }
        }
        EntityHandle::invalid()
    }

    /// Move the child at `index` to the front of the sibling order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the child list is being iterated.
    pub fn make_child_first(&mut self, parent: EntityHandle, index: usize) {
        let node = self.node_mut(parent);
        assert!(
            !node.iterating_children,
            "make_child_first: the child list of {:?} is being iterated",
            parent
        );
        assert!(index < node.children.len(), "Child index {} out of range", index);
        let child = node.children.remove(index);
        node.children.insert(0, child);
        self.update_child_indices(parent);
    }

    /// Move the child at `index` to the back of the sibling order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the child list is being iterated.
    pub fn make_child_last(&mut self, parent: EntityHandle, index: usize) {
        let node = self.node_mut(parent);
        assert!(
            !node.iterating_children,
            "make_child_last: the child list of {:?} is being iterated",
            parent
        );
        assert!(index < node.children.len(), "Child index {} out of range", index);
        let child = node.children.remove(index);
        node.children.push(child);
        self.update_child_indices(parent);
    }

    fn update_child_indices(&mut self, parent: EntityHandle) {
        let children = match self.entities.get(parent.raw()) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for (index, child) in children.into_iter().enumerate() {
            if let Some(node) = self.entities.get_mut(child.raw()) {
                node.index = index;
            }
        }
    }

    // ── Layers ───────────────────────────────────────────────────────

    /// Set the render layer this entity's drawing components submit to.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= layer_count()`.
    pub fn set_layer(&mut self, entity: EntityHandle, layer: usize) {
        assert!(
            layer < self.layer_count,
            "Layer {} out of range (layer count {})",
            layer,
            self.layer_count
        );
        self.node_mut(entity).layer = layer;
    }

    pub fn layer(&self, entity: EntityHandle) -> usize {
        self.node(entity).layer
    }

    /// Set the entity's layer to the topmost layer.
    pub fn send_to_front(&mut self, entity: EntityHandle) {
        let top = self.layer_count - 1;
        self.node_mut(entity).layer = top;
    }

    /// Set the entity's layer to the bottom layer.
    pub fn send_to_back(&mut self, entity: EntityHandle) {
        self.node_mut(entity).layer = 0;
    }

    // ── Components ──────────────────────────────────────────────────

    /// Queue a new component for attachment to `entity` and return a typed
    /// handle to it, usable immediately. Once attached, every component on
    /// the entity (including the new one) is notified via
    /// `on_component_added`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is stale.
    pub fn add_component<T: Component>(&mut self, entity: EntityHandle, component: T) -> Handle<T> {
        self.node(entity);
        let handle = ComponentHandle(
            self.components
                .insert(ComponentSlot::new(entity, Box::new(component))),
        );
        self.node_mut(entity).components_add.push(handle);
        Handle::from_raw(handle.raw())
    }

    /// Number of committed components on the entity (at least 1: Transform).
    pub fn component_count(&self, entity: EntityHandle) -> usize {
        self.node(entity).components.len()
    }

    /// The committed component at `index` (0 is always the Transform).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn component_at(&self, entity: EntityHandle, index: usize) -> ComponentHandle {
        let node = self.node(entity);
        *node.components.get(index).unwrap_or_else(|| {
            panic!(
                "Component index {} out of range ({} components)",
                index,
                node.components.len()
            )
        })
    }

    /// First committed component of type `T` on the entity, or an invalid
    /// handle. Pending additions are never visible to this query.
    pub fn get_component<T: Component>(&self, entity: EntityHandle) -> Handle<T> {
        for &component in &self.node(entity).components {
            if let Some(slot) = self.components.get(component.raw()) {
                if slot.is_type::<T>() {
                    return Handle::from_raw(component.raw());
                }
            }
        }
        Handle::invalid()
    }

    /// Narrow an untyped component handle to a concrete type. Returns an
    /// *invalid* handle — never panics — if the handle is stale or the
    /// dynamic type does not match.
    pub fn cast<T: Component>(&self, component: ComponentHandle) -> Handle<T> {
        match self.components.get(component.raw()) {
            Some(slot) if slot.is_type::<T>() => Handle::from_raw(component.raw()),
            _ => Handle::invalid(),
        }
    }

    /// Borrow the component behind a typed handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid (stale, or mid-hook on this very
    /// component) — dereferencing an invalid handle is a defined failure.
    pub fn component<T: Component>(&self, handle: Handle<T>) -> &T {
        self.try_component(handle)
            .unwrap_or_else(|| panic!("Dereferenced an invalid component handle {:?}", handle))
    }

    /// Mutably borrow the component behind a typed handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    pub fn component_mut<T: Component>(&mut self, handle: Handle<T>) -> &mut T {
        self.components
            .get_mut(handle.raw())
            .and_then(|slot| slot.as_type_mut::<T>())
            .unwrap_or_else(|| panic!("Dereferenced an invalid component handle {:?}", handle))
    }

    /// Borrow the component behind a typed handle, or `None` if the handle
    /// no longer validates.
    pub fn try_component<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        self.components
            .get(handle.raw())
            .and_then(|slot| slot.as_type::<T>())
    }

    pub fn try_component_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.components
            .get_mut(handle.raw())
            .and_then(|slot| slot.as_type_mut::<T>())
    }

    /// `true` while the handle addresses a live (attached or pending)
    /// component.
    pub fn component_alive(&self, component: impl Into<ComponentHandle>) -> bool {
        self.components.contains(component.into().raw())
    }

    /// The entity owning a component.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn owner_of(&self, component: impl Into<ComponentHandle>) -> EntityHandle {
        let component = component.into();
        self.components
            .get(component.raw())
            .unwrap_or_else(|| panic!("Dereferenced a stale component handle {:?}", component))
            .owner
    }

    /// Sibling index of a component within its owner. Stable until a removal
    /// re-packs indices.
    pub fn component_index(&self, component: impl Into<ComponentHandle>) -> usize {
        let component = component.into();
        self.components
            .get(component.raw())
            .unwrap_or_else(|| panic!("Dereferenced a stale component handle {:?}", component))
            .index
    }

    /// Enable or disable a component. Disabled components skip every pass
    /// but stay attached. On a transition the component is notified via
    /// `on_enable`/`on_disable`.
    pub fn set_component_enabled(&mut self, component: impl Into<ComponentHandle>, enabled: bool) {
        let component = component.into();
        let Some(slot) = self.components.get_mut(component.raw()) else {
            return;
        };
        if slot.enabled == enabled {
            return;
        }
        slot.enabled = enabled;
        if enabled {
            self.with_component(component, |c, ctx| c.on_enable(ctx));
        } else {
            self.with_component(component, |c, ctx| c.on_disable(ctx));
        }
    }

    pub fn is_component_enabled(&self, component: impl Into<ComponentHandle>) -> bool {
        self.components
            .get(component.into().raw())
            .is_some_and(|slot| slot.enabled)
    }

    /// Enabled AND the owning entity is active.
    pub fn is_component_active(&self, component: impl Into<ComponentHandle>) -> bool {
        match self.components.get(component.into().raw()) {
            Some(slot) => slot.enabled && self.is_active(slot.owner),
            None => false,
        }
    }

    /// Queue a component for removal. Idempotent; a stale handle is a no-op.
    /// The component keeps participating in passes through the rest of the
    /// current frame and is detached at the end-of-frame drain.
    ///
    /// # Panics
    ///
    /// Panics if the component is the mandatory Transform (index 0).
    pub fn destroy_component(&mut self, component: impl Into<ComponentHandle>) {
        let component = component.into();
        let Some(slot) = self.components.get(component.raw()) else {
            return;
        };
        if slot.pending_destroy {
            return;
        }
        let owner = slot.owner;
        // The Transform is the owner's committed component 0; a still-queued
        // component also carries index 0, so check against the list itself.
        if let Some(node) = self.entities.get(owner.raw()) {
            assert!(
                node.components.first() != Some(&component),
                "The Transform component cannot be removed from {:?}",
                owner
            );
        }
        if let Some(slot) = self.components.get_mut(component.raw()) {
            slot.pending_destroy = true;
        }
        if let Some(node) = self.entities.get_mut(owner.raw()) {
            node.components_del.push(component);
        }
    }

    /// Queue the committed component at `index` for removal.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 (Transform) or out of range.
    pub fn remove_component(&mut self, entity: EntityHandle, index: usize) {
        assert!(
            index != 0,
            "The Transform component cannot be removed from {:?}",
            entity
        );
        let component = self.component_at(entity, index);
        self.destroy_component(component);
    }

    /// Detach a component right now: notify every committed component on the
    /// owner (including the departing one), unlink it, drop it, and re-pack
    /// sibling indices.
    fn detach_component_now(&mut self, entity: EntityHandle, component: ComponentHandle) {
        if !self.components.contains(component.raw()) {
            return;
        }
        let listeners = match self.entities.get(entity.raw()) {
            Some(node) => node.components.clone(),
            None => return,
        };
        for listener in listeners {
            self.with_component(listener, |c, ctx| c.on_component_removed(ctx, component));
        }
        if let Some(node) = self.entities.get_mut(entity.raw()) {
            node.components.retain(|&c| c != component);
            node.components_add.retain(|&c| c != component);
        }
        self.remove_component_storage(component);
        self.update_component_indices(entity);
    }

    /// Drop a component's storage and every task it hosts.
    fn remove_component_storage(&mut self, component: ComponentHandle) {
        if let Some(slot) = self.components.remove(component.raw()) {
            for task in slot.tasks {
                self.tasks.remove(task.raw());
            }
        }
    }

    fn update_component_indices(&mut self, entity: EntityHandle) {
        let components = match self.entities.get(entity.raw()) {
            Some(node) => node.components.clone(),
            None => return,
        };
        for (index, component) in components.into_iter().enumerate() {
            if let Some(slot) = self.components.get_mut(component.raw()) {
                slot.index = index;
            }
        }
    }

    // ── Transform convenience ────────────────────────────────────────

    /// The entity's mandatory Transform (always component index 0).
    pub fn transform(&self, entity: EntityHandle) -> &Transform {
        let handle = self.component_at(entity, 0);
        self.component(self.cast::<Transform>(handle))
    }

    pub fn transform_mut(&mut self, entity: EntityHandle) -> &mut Transform {
        let handle = self.component_at(entity, 0);
        let typed = self.cast::<Transform>(handle);
        self.component_mut(typed)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Start a task hosted by an entity. The routine's body first runs on
    /// the next resumption pass (right after the owner's update slot).
    ///
    /// # Panics
    ///
    /// Panics if `entity` is stale.
    pub fn start_entity_task(&mut self, entity: EntityHandle, routine: TaskRoutine) -> TaskHandle {
        self.node(entity);
        let handle = TaskHandle(
            self.tasks
                .insert(TaskSlot::new(TaskOwner::Entity(entity), routine)),
        );
        self.node_mut(entity).tasks.push(handle);
        handle
    }

    /// Start a task hosted by a component.
    ///
    /// # Panics
    ///
    /// Panics if the component handle is stale.
    pub fn start_component_task(
        &mut self,
        component: impl Into<ComponentHandle>,
        routine: TaskRoutine,
    ) -> TaskHandle {
        let component = component.into();
        assert!(
            self.components.contains(component.raw()),
            "Cannot start a task on stale component handle {:?}",
            component
        );
        let handle = TaskHandle(
            self.tasks
                .insert(TaskSlot::new(TaskOwner::Component(component), routine)),
        );
        if let Some(slot) = self.components.get_mut(component.raw()) {
            slot.tasks.push(handle);
        }
        handle
    }

    /// Stop a specific task. No-op if it already completed or was stopped.
    pub fn stop_task(&mut self, task: TaskHandle) {
        if let Some(slot) = self.tasks.remove(task.raw()) {
            if let Some(list) = self.owner_tasks_mut(slot.owner) {
                list.retain(|&t| t != task);
            }
        }
    }

    /// Stop every task hosted by an entity. Called from inside one of those
    /// tasks, it also cancels the rest of the in-flight resumption.
    pub fn stop_all_entity_tasks(&mut self, entity: EntityHandle) {
        for task in std::mem::take(&mut self.node_mut(entity).tasks) {
            self.tasks.remove(task.raw());
        }
        if self.resuming == Some(TaskOwner::Entity(entity)) {
            self.resume_stopped = true;
        }
    }

    /// Stop every task hosted by a component. Called from inside one of those
    /// tasks, it also cancels the rest of the in-flight resumption.
    pub fn stop_all_component_tasks(&mut self, component: impl Into<ComponentHandle>) {
        let component = component.into();
        let Some(slot) = self.components.get_mut(component.raw()) else {
            return;
        };
        for task in std::mem::take(&mut slot.tasks) {
            self.tasks.remove(task.raw());
        }
        if self.resuming == Some(TaskOwner::Component(component)) {
            self.resume_stopped = true;
        }
    }

    /// `true` while the handle addresses a live (not yet completed) task.
    pub fn task_alive(&self, task: TaskHandle) -> bool {
        self.tasks.contains(task.raw())
    }

    /// Number of live tasks hosted by an entity.
    pub fn entity_task_count(&self, entity: EntityHandle) -> usize {
        self.node(entity)
            .tasks
            .iter()
            .filter(|t| self.tasks.contains(t.raw()))
            .count()
    }

    /// Number of live tasks hosted by a component.
    pub fn component_task_count(&self, component: impl Into<ComponentHandle>) -> usize {
        match self.components.get(component.into().raw()) {
            Some(slot) => slot
                .tasks
                .iter()
                .filter(|t| self.tasks.contains(t.raw()))
                .count(),
            None => 0,
        }
    }

    fn owner_tasks_mut(&mut self, owner: TaskOwner) -> Option<&mut Vec<TaskHandle>> {
        match owner {
            TaskOwner::Entity(entity) => {
                self.entities.get_mut(entity.raw()).map(|node| &mut node.tasks)
            }
            TaskOwner::Component(component) => self
                .components
                .get_mut(component.raw())
                .map(|slot| &mut slot.tasks),
        }
    }

    /// Human-readable owner attribution for task failure logs.
    fn owner_label(&self, owner: TaskOwner) -> String {
        match owner {
            TaskOwner::Entity(entity) => match self.entities.get(entity.raw()) {
                Some(node) => format!("entity \"{}\"", self.ids.name(node.id)),
                None => format!("destroyed entity {:?}", entity),
            },
            TaskOwner::Component(component) => match self.components.get(component.raw()) {
                Some(slot) => {
                    let owner_name = match self.entities.get(slot.owner.raw()) {
                        Some(node) => self.ids.name(node.id),
                        None => "<destroyed>",
                    };
                    format!("component {} of entity \"{}\"", slot.index, owner_name)
                }
                None => format!("destroyed component {:?}", component),
            },
        }
    }

    /// Resume every due task of one owner, in start order.
    ///
    /// The owner's list is swapped out for the duration so routines may
    /// freely start or stop tasks; tasks started mid-resumption are appended
    /// after the survivors, preserving start order across frames.
    fn resume_tasks(&mut self, owner: TaskOwner) {
        let dt = self.time.delta().as_secs_f64();
        let Some(list) = self.owner_tasks_mut(owner) else {
            return;
        };
        if list.is_empty() {
            return;
        }
        let pending = std::mem::take(list);
        let mut survivors = Vec::with_capacity(pending.len());
        self.resuming = Some(owner);
        self.resume_stopped = false;

        for task in pending {
            // A routine earlier in the list stopped the whole owner; the
            // swapped-out remainder is cancelled here, not resumed.
            if self.resume_stopped {
                self.tasks.remove(task.raw());
                continue;
            }
            let suspend = match self.tasks.get(task.raw()) {
                Some(slot) => slot.suspend,
                None => continue, // stopped since last frame
            };
            // A wait condition is evaluated once per resumption attempt.
            // For timed waits the check runs against time accumulated on
            // *previous* attempts; this frame's delta counts only toward
            // the next attempt.
            let due = match suspend {
                Suspend::NextFrame => true,
                Suspend::Until(other) => !self.tasks.contains(other.raw()),
                Suspend::Seconds(duration) => {
                    let Some(slot) = self.tasks.get_mut(task.raw()) else {
                        continue;
                    };
                    if slot.waited >= duration {
                        true
                    } else {
                        slot.waited += dt;
                        false
                    }
                }
            };
            if !due {
                survivors.push(task);
                continue;
            }

            // Take the routine out so a re-entrant resume is impossible.
            let Some(mut routine) = self
                .tasks
                .get_mut(task.raw())
                .and_then(|slot| slot.routine.take())
            else {
                survivors.push(task);
                continue;
            };
            let result = {
                let mut ctx = match owner {
                    TaskOwner::Entity(entity) => Context::for_entity(self, entity),
                    TaskOwner::Component(component) => {
                        let entity = self
                            .components
                            .get(component.raw())
                            .map(|slot| slot.owner)
                            .unwrap_or(EntityHandle::invalid());
                        Context::for_component(self, entity, component)
                    }
                };
                routine(&mut ctx)
            };
            match result {
                Ok(TaskStep::Yield(suspend)) => {
                    // The routine may have stopped its own task; only keep
                    // it if the slot is still live.
                    if let Some(slot) = self.tasks.get_mut(task.raw()) {
                        slot.suspend = suspend;
                        slot.waited = 0.0;
                        slot.routine = Some(routine);
                        survivors.push(task);
                    }
                }
                Ok(TaskStep::Done) => {
                    self.tasks.remove(task.raw());
                }
                Err(error) => {
                    log::error!("Task on {} failed: {:#}", self.owner_label(owner), error);
                    self.tasks.remove(task.raw());
                }
            }
        }

        if self.resume_stopped {
            for task in survivors.drain(..) {
                self.tasks.remove(task.raw());
            }
        }
        self.resuming = None;
        self.resume_stopped = false;
        // Tasks started during the resumption (or after a stop-all) are in
        // the owner's list already; survivors go back in front of them.
        if let Some(list) = self.owner_tasks_mut(owner) {
            let started_meanwhile = std::mem::take(list);
            survivors.extend(started_meanwhile);
            *list = survivors;
        }
    }

    // ── Hook dispatch ────────────────────────────────────────────────

    /// Run one hook on one component. The boxed component is taken out of
    /// its slot for the duration so the hook can borrow the whole scene; the
    /// slot itself stays occupied, so handles to the component remain valid.
    fn with_component<F>(&mut self, component: ComponentHandle, hook: F)
    where
        F: FnOnce(&mut dyn Component, &mut Context),
    {
        let Some(slot) = self.components.get_mut(component.raw()) else {
            return;
        };
        let Some(mut boxed) = slot.component.take() else {
            return; // already executing a hook (re-entrant dispatch)
        };
        let entity = slot.owner;
        {
            let mut ctx = Context::for_component(self, entity, component);
            hook(boxed.as_mut(), &mut ctx);
        }
        // The hook may have torn the slot down (e.g. destroyed the whole
        // entity immediately); only put the component back if it survived.
        if let Some(slot) = self.components.get_mut(component.raw()) {
            slot.component = Some(boxed);
        }
    }

    fn set_iterating_components(&mut self, entity: EntityHandle, on: bool) {
        if let Some(node) = self.entities.get_mut(entity.raw()) {
            node.iterating_components = on;
        }
    }

    fn set_iterating_children(&mut self, entity: EntityHandle, on: bool) {
        if let Some(node) = self.entities.get_mut(entity.raw()) {
            node.iterating_children = on;
        }
    }

    fn committed_components(&self, entity: EntityHandle) -> Vec<ComponentHandle> {
        self.entities
            .get(entity.raw())
            .map(|node| node.components.clone())
            .unwrap_or_default()
    }

    fn committed_children(&self, entity: EntityHandle) -> Vec<EntityHandle> {
        self.entities
            .get(entity.raw())
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// `true` if the entity should run hooks this pass.
    fn participates(&self, entity: EntityHandle) -> bool {
        self.entities
            .get(entity.raw())
            .is_some_and(|node| node.enabled && !node.pending_destroy)
    }

    fn component_enabled(&self, component: ComponentHandle) -> bool {
        self.components
            .get(component.raw())
            .is_some_and(|slot| slot.enabled)
    }

    // ── Frame passes (driven by the engine) ──────────────────────────

    pub(crate) fn physics_pass(&mut self) {
        let root = self.root;
        self.physics_all(root);
    }

    fn physics_all(&mut self, entity: EntityHandle) {
        if !self.participates(entity) {
            return;
        }
        self.set_iterating_components(entity, true);
        for component in self.committed_components(entity) {
            if self.component_enabled(component) {
                self.with_component(component, |c, ctx| c.on_physics(ctx));
            }
        }
        self.set_iterating_components(entity, false);
        self.set_iterating_children(entity, true);
        for child in self.committed_children(entity) {
            self.physics_all(child);
        }
        self.set_iterating_children(entity, false);
    }

    pub(crate) fn update_pass(&mut self) {
        let root = self.root;
        self.update_all(root);
    }

    fn update_all(&mut self, entity: EntityHandle) {
        // Additions queued since the last frame attach here, so a child made
        // before the frame began is visible (and started) this very frame.
        self.process_additions(entity);
        if !self.participates(entity) {
            return;
        }
        self.set_iterating_components(entity, true);
        for component in self.committed_components(entity) {
            self.update_component(component);
        }
        self.set_iterating_components(entity, false);
        self.resume_tasks(TaskOwner::Entity(entity));
        self.set_iterating_children(entity, true);
        for child in self.committed_children(entity) {
            self.update_all(child);
        }
        self.set_iterating_children(entity, false);
    }

    /// `start` (first active frame only), `update`, then the component's
    /// tasks, in that order.
    fn update_component(&mut self, component: ComponentHandle) {
        let Some(slot) = self.components.get_mut(component.raw()) else {
            return;
        };
        if !slot.enabled {
            return;
        }
        let needs_start = !slot.start_called;
        if needs_start {
            slot.start_called = true;
            self.with_component(component, |c, ctx| c.start(ctx));
        }
        self.with_component(component, |c, ctx| c.update(ctx));
        self.resume_tasks(TaskOwner::Component(component));
    }

    pub(crate) fn late_update_pass(&mut self) {
        let root = self.root;
        self.late_update_all(root);
    }

    fn late_update_all(&mut self, entity: EntityHandle) {
        if !self.participates(entity) {
            return;
        }
        self.set_iterating_components(entity, true);
        for component in self.committed_components(entity) {
            if self.component_enabled(component) {
                self.with_component(component, |c, ctx| c.late_update(ctx));
            }
        }
        self.set_iterating_components(entity, false);
        self.set_iterating_children(entity, true);
        for child in self.committed_children(entity) {
            self.late_update_all(child);
        }
        self.set_iterating_children(entity, false);
    }

    pub(crate) fn render_pass(&mut self, queue: &mut RenderQueue) {
        let root = self.root;
        self.render_all(root, queue);
    }

    fn render_all(&mut self, entity: EntityHandle, queue: &mut RenderQueue) {
        if !self.participates(entity) {
            return;
        }
        self.set_iterating_components(entity, true);
        for component in self.committed_components(entity) {
            if self.component_enabled(component) {
                self.with_component(component, |c, ctx| c.on_render(ctx, queue));
            }
        }
        self.set_iterating_components(entity, false);
        self.set_iterating_children(entity, true);
        for child in self.committed_children(entity) {
            self.render_all(child, queue);
        }
        self.set_iterating_children(entity, false);
    }

    pub(crate) fn gizmo_pass(&mut self) {
        let root = self.root;
        self.gizmo_all(root);
    }

    fn gizmo_all(&mut self, entity: EntityHandle) {
        if !self.participates(entity) {
            return;
        }
        self.set_iterating_components(entity, true);
        for component in self.committed_components(entity) {
            if self.component_enabled(component) {
                self.with_component(component, |c, ctx| c.on_gizmo(ctx));
            }
        }
        self.set_iterating_components(entity, false);
        self.set_iterating_children(entity, true);
        for child in self.committed_children(entity) {
            self.gizmo_all(child);
        }
        self.set_iterating_children(entity, false);
    }

    /// The end-of-frame drain: per entity, recursively — additions, then the
    /// subtree, then deletions (so a removed child's own subtree is torn
    /// down bottom-up). Runs over the whole tree, including disabled
    /// subtrees, so destroy requests never stall.
    pub(crate) fn apply_pending(&mut self) {
        let root = self.root;
        self.apply_pending_all(root);
    }

    fn apply_pending_all(&mut self, entity: EntityHandle) {
        self.process_additions(entity);
        for child in self.committed_children(entity) {
            self.apply_pending_all(child);
        }
        self.process_deletions(entity);
    }

    /// Move queued children and components into the live lists, firing
    /// `on_component_added` notifications. Loops until the queues are empty,
    /// since a notification hook may queue further additions.
    fn process_additions(&mut self, entity: EntityHandle) {
        loop {
            let Some(node) = self.entities.get_mut(entity.raw()) else {
                return;
            };
            if node.children_add.is_empty() && node.components_add.is_empty() {
                return;
            }
            let children: Vec<_> = node.children_add.drain(..).collect();
            let components: Vec<_> = node.components_add.drain(..).collect();
            for child in children {
                self.attach_child_now(entity, child);
            }
            for component in components {
                self.attach_component_now(entity, component);
            }
        }
    }

    fn attach_child_now(&mut self, parent: EntityHandle, child: EntityHandle) {
        // The child may have been destroyed while still queued.
        let Some(child_node) = self.entities.get_mut(child.raw()) else {
            return;
        };
        child_node.parent = parent;
        let Some(parent_node) = self.entities.get_mut(parent.raw()) else {
            return;
        };
        parent_node.children.push(child);
        let index = parent_node.children.len() - 1;
        self.node_mut(child).index = index;
    }

    fn attach_component_now(&mut self, entity: EntityHandle, component: ComponentHandle) {
        if !self.components.contains(component.raw()) {
            return; // destroyed while still queued
        }
        let Some(node) = self.entities.get_mut(entity.raw()) else {
            self.remove_component_storage(component);
            return;
        };
        node.components.push(component);
        let index = node.components.len() - 1;
        if let Some(slot) = self.components.get_mut(component.raw()) {
            slot.index = index;
        }
        // Notify every attached component, including the new one.
        for listener in self.committed_components(entity) {
            self.with_component(listener, |c, ctx| c.on_component_added(ctx, component));
        }
    }

    /// Destroy queued children (recursively, bottom-up) and detach queued
    /// components. Loops until the queues are empty, since removal
    /// notifications may queue further removals.
    fn process_deletions(&mut self, entity: EntityHandle) {
        loop {
            let Some(node) = self.entities.get_mut(entity.raw()) else {
                return;
            };
            if node.children_del.is_empty() && node.components_del.is_empty() {
                return;
            }
            let children: Vec<_> = node.children_del.drain(..).collect();
            let components: Vec<_> = node.components_del.drain(..).collect();
            for child in children {
                self.destroy_entity_now(child);
            }
            for component in components {
                self.detach_component_now(entity, component);
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::engine::Engine;

    const DT: Duration = Duration::from_millis(16);

    type Log = Rc<RefCell<Vec<String>>>;
    type Events = Rc<RefCell<Vec<ComponentHandle>>>;

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn entries_ending(log: &Log, suffix: &str) -> Vec<String> {
        log.borrow()
            .iter()
            .filter(|e| e.ends_with(suffix))
            .cloned()
            .collect()
    }

    /// Logs every lifecycle hook as `"<name>.<hook>"`.
    struct Tracer {
        name: &'static str,
        log: Log,
    }

    impl Tracer {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
            }
        }
        fn push(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}.{}", self.name, hook));
        }
    }

    impl Component for Tracer {
        fn start(&mut self, _ctx: &mut Context) {
            self.push("start");
        }
        fn update(&mut self, _ctx: &mut Context) {
            self.push("update");
        }
        fn late_update(&mut self, _ctx: &mut Context) {
            self.push("late");
        }
        fn on_physics(&mut self, _ctx: &mut Context) {
            self.push("physics");
        }
        fn on_render(&mut self, _ctx: &mut Context, _queue: &mut RenderQueue) {
            self.push("render");
        }
    }

    /// Destroys its own component on first update, logging around it.
    struct Fleeting {
        log: Log,
    }

    impl Component for Fleeting {
        fn update(&mut self, ctx: &mut Context) {
            self.log.borrow_mut().push("fleeting.update".into());
            ctx.destroy_self();
        }
        fn late_update(&mut self, _ctx: &mut Context) {
            self.log.borrow_mut().push("fleeting.late".into());
        }
    }

    /// Destroys its own entity on update.
    struct KillOwner;

    impl Component for KillOwner {
        fn update(&mut self, ctx: &mut Context) {
            let entity = ctx.entity();
            ctx.scene.destroy(entity);
        }
    }

    /// Records sibling attach/detach notifications.
    struct SiblingWatcher {
        added: Events,
        removed: Events,
    }

    impl Component for SiblingWatcher {
        fn on_component_added(&mut self, _ctx: &mut Context, added: ComponentHandle) {
            self.added.borrow_mut().push(added);
        }
        fn on_component_removed(&mut self, _ctx: &mut Context, removed: ComponentHandle) {
            self.removed.borrow_mut().push(removed);
        }
    }

    /// Spawns one traced child of the root during its first update.
    struct SpawnOnce {
        done: bool,
        log: Log,
    }

    impl Component for SpawnOnce {
        fn update(&mut self, ctx: &mut Context) {
            if self.done {
                return;
            }
            self.done = true;
            let root = ctx.scene.root();
            let spawned = ctx.scene.make_child(root, "spawned");
            let tracer = Tracer::new("spawned", &self.log);
            ctx.scene.add_component(spawned, tracer);
        }
    }

    // ── Tree construction and identity ───────────────────────────────

    #[test]
    fn root_has_a_transform_and_a_name() {
        let scene = Scene::new();
        let root = scene.root();
        assert!(scene.is_alive(root));
        assert!(scene.is_root(root));
        assert_eq!(scene.name(root), "root");
        assert_eq!(scene.component_count(root), 1);
        assert_eq!(*scene.transform(root), Transform::new());
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn make_child_queues_until_the_update_pass() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");

        // The handle is usable immediately, but the child is invisible to
        // traversal and queries until the next drain.
        assert!(engine.scene().is_alive(kid));
        assert_eq!(engine.scene().child_count(root), 0);
        assert_eq!(
            engine.scene().find_child_by_name(root, "kid"),
            EntityHandle::invalid()
        );

        engine.advance(DT);
        assert_eq!(engine.scene().child_count(root), 1);
        assert_eq!(engine.scene().find_child_by_name(root, "kid"), kid);
        assert_eq!(engine.scene().parent_of(kid), root);
        assert_eq!(engine.scene().entity_index(kid), 0);
    }

    #[test]
    fn handle_is_usable_before_attachment() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.scene_mut().transform_mut(kid).position.x = 5.0;
        engine.advance(DT);
        assert_eq!(engine.scene().transform(kid).position.x, 5.0);
    }

    #[test]
    fn two_children_made_same_frame_both_start() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let a = engine.scene_mut().make_child(root, "a");
        let b = engine.scene_mut().make_child(root, "b");
        engine.scene_mut().add_component(a, Tracer::new("a", &log));
        engine.scene_mut().add_component(b, Tracer::new("b", &log));

        engine.advance(DT);
        assert_eq!(engine.scene().child_count(root), 2);
        assert_eq!(
            entries_ending(&log, ".start"),
            vec!["a.start".to_string(), "b.start".to_string()]
        );
        assert_eq!(
            entries_ending(&log, ".update"),
            vec!["a.update".to_string(), "b.update".to_string()]
        );
    }

    #[test]
    fn update_order_is_self_then_children_left_to_right() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let a = engine.scene_mut().make_child(root, "a");
        let b = engine.scene_mut().make_child(root, "b");
        let a1 = engine.scene_mut().make_child(a, "a1");
        engine.scene_mut().add_component(a, Tracer::new("a", &log));
        engine.scene_mut().add_component(b, Tracer::new("b", &log));
        engine.scene_mut().add_component(a1, Tracer::new("a1", &log));

        engine.advance(DT);
        assert_eq!(
            entries_ending(&log, ".update"),
            vec![
                "a.update".to_string(),
                "a1.update".to_string(),
                "b.update".to_string()
            ]
        );
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_names_panic() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.make_child(root, "twin");
        scene.make_child(root, "twin");
    }

    #[test]
    fn generated_names_are_unique() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.make_child_unnamed(root);
        let b = scene.make_child_unnamed(root);
        assert_ne!(scene.name(a), scene.name(b));
    }

    #[test]
    fn find_child_variants() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let a = engine.scene_mut().make_child(root, "a");
        let b = engine.scene_mut().make_child(root, "b");
        engine.scene_mut().add_component(b, KillOwnerNever);
        engine.advance(DT);

        let scene = engine.scene();
        assert_eq!(scene.find_child(root, scene.id(a)), a);
        assert_eq!(scene.find_child_by_name(root, "b"), b);
        assert_eq!(
            scene.find_child_by_name(root, "nope"),
            EntityHandle::invalid()
        );
        assert_eq!(scene.find_child_with::<KillOwnerNever>(root), b);
        assert_eq!(
            scene.find_child_with::<Fleeting>(root),
            EntityHandle::invalid()
        );
    }

    /// Marker type for `find_child_with`; no behavior.
    struct KillOwnerNever;
    impl Component for KillOwnerNever {}

    #[test]
    fn reordering_children_repacks_indices() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let a = engine.scene_mut().make_child(root, "a");
        let b = engine.scene_mut().make_child(root, "b");
        let c = engine.scene_mut().make_child(root, "c");
        engine.advance(DT);

        engine.scene_mut().make_child_first(root, 2);
        assert_eq!(engine.scene().children(root), &[c, a, b]);
        assert_eq!(engine.scene().entity_index(c), 0);
        assert_eq!(engine.scene().entity_index(a), 1);
        assert_eq!(engine.scene().entity_index(b), 2);

        engine.scene_mut().make_child_last(root, 0);
        assert_eq!(engine.scene().children(root), &[a, b, c]);
    }

    // ── Destruction ──────────────────────────────────────────────────

    #[test]
    fn destroy_takes_effect_at_the_end_of_frame_drain() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.advance(DT);

        engine.scene_mut().destroy(kid);
        // Deallocation is deferred; the handle still validates.
        assert!(engine.scene().is_alive(kid));

        engine.advance(DT);
        assert!(!engine.scene().is_alive(kid));
        assert_eq!(engine.scene().child_count(root), 0);
        assert_eq!(engine.scene().entity_count(), 1);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.advance(DT);

        engine.scene_mut().destroy(kid);
        engine.scene_mut().destroy(kid);
        engine.advance(DT);
        assert_eq!(engine.scene().child_count(root), 0);

        // Destroying through the now-stale handle is a no-op.
        engine.scene_mut().destroy(kid);
        engine.advance(DT);
        assert_eq!(engine.scene().entity_count(), 1);
    }

    #[test]
    #[should_panic(expected = "root entity cannot be destroyed")]
    fn destroying_the_root_panics() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene.destroy(root);
    }

    #[test]
    fn destroying_a_subtree_frees_every_name() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let parent = engine.scene_mut().make_child(root, "parent");
        engine.scene_mut().make_child(parent, "inner");
        engine.advance(DT);
        assert_eq!(engine.scene().entity_count(), 3);

        engine.scene_mut().destroy(parent);
        engine.advance(DT);
        assert_eq!(engine.scene().entity_count(), 1);

        // Both names are free again; re-registering must not panic.
        let parent = engine.scene_mut().make_child(root, "parent");
        engine.scene_mut().make_child(parent, "inner");
        engine.advance(DT);
        assert_eq!(engine.scene().entity_count(), 3);
    }

    #[test]
    fn destroy_children_clears_the_whole_list() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        for name in ["a", "b", "c"] {
            engine.scene_mut().make_child(root, name);
        }
        engine.advance(DT);
        engine.scene_mut().destroy_children(root);
        engine.advance(DT);
        assert_eq!(engine.scene().child_count(root), 0);
    }

    #[test]
    fn destroyed_component_still_receives_late_update_that_frame() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let c = engine
            .scene_mut()
            .add_component(kid, Fleeting { log: Rc::clone(&log) });

        engine.advance(DT);
        // Destroyed itself during update, but late_update still arrived.
        assert_eq!(
            *log.borrow(),
            vec!["fleeting.update".to_string(), "fleeting.late".to_string()]
        );
        assert!(!engine.scene().component_alive(c));

        engine.advance(DT);
        // And nothing more on the following frame.
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn destroyed_entity_skips_every_later_pass() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.scene_mut().add_component(kid, KillOwner);
        engine.scene_mut().add_component(kid, Tracer::new("kid", &log));

        engine.advance(DT);
        // The sibling component still ran its update (the in-progress pass
        // is never re-shaped), but late/render never reached the entity.
        assert!(log.borrow().contains(&"kid.update".to_string()));
        assert!(!log.borrow().contains(&"kid.late".to_string()));
        assert!(!log.borrow().contains(&"kid.render".to_string()));
        assert!(!engine.scene().is_alive(kid));
    }

    #[test]
    fn destroying_a_detached_entity_is_immediate() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.advance(DT);

        let detached = engine.scene_mut().detach_child(root, 0);
        assert_eq!(detached, kid);
        engine.scene_mut().destroy(detached);
        // No traversal can be iterating a detached subtree.
        assert!(!engine.scene().is_alive(detached));
    }

    // ── Structural stability during iteration ────────────────────────

    #[test]
    fn children_spawned_mid_pass_join_the_next_frame() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let spawner = engine.scene_mut().make_child(root, "spawner");
        engine.scene_mut().add_component(
            spawner,
            SpawnOnce {
                done: false,
                log: Rc::clone(&log),
            },
        );
        engine.advance(DT);

        // Spawn frame: attached at the end-of-frame drain, but no hooks ran.
        assert_eq!(engine.scene().child_count(root), 2);
        assert!(!log.borrow().iter().any(|e| e.starts_with("spawned.")));

        engine.advance(DT);
        assert!(log.borrow().contains(&"spawned.start".to_string()));
        assert!(log.borrow().contains(&"spawned.update".to_string()));
    }

    #[test]
    fn detach_and_reattach_pauses_and_resumes_participation() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.scene_mut().add_component(kid, Tracer::new("kid", &log));
        engine.advance(DT);
        log.borrow_mut().clear();

        let detached = engine.scene_mut().detach_child(root, 0);
        assert!(engine.scene().is_alive(detached));
        assert!(!engine.scene().has_parent(detached));
        engine.advance(DT);
        assert!(log.borrow().is_empty());

        engine.scene_mut().attach_child(root, detached);
        engine.advance(DT);
        assert!(log.borrow().contains(&"kid.update".to_string()));
    }

    // ── Enabled / active ─────────────────────────────────────────────

    #[test]
    fn disabled_subtrees_are_skipped_entirely() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let parent = engine.scene_mut().make_child(root, "parent");
        let inner = engine.scene_mut().make_child(parent, "inner");
        let c = engine
            .scene_mut()
            .add_component(inner, Tracer::new("inner", &log));
        engine.advance(DT);
        log.borrow_mut().clear();

        engine.scene_mut().set_enabled(parent, false);
        engine.advance(DT);
        assert!(log.borrow().is_empty());
        assert!(engine.scene().is_enabled(inner));
        assert!(!engine.scene().is_active(inner));
        assert!(!engine.scene().is_component_active(c));

        engine.scene_mut().set_enabled(parent, true);
        engine.advance(DT);
        assert!(log.borrow().contains(&"inner.update".to_string()));
    }

    #[test]
    fn start_is_deferred_until_first_active_frame() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.scene_mut().set_enabled(kid, false);
        engine.scene_mut().add_component(kid, Tracer::new("kid", &log));

        engine.advance_frames(3, DT);
        assert!(log.borrow().is_empty());

        engine.scene_mut().set_enabled(kid, true);
        engine.advance(DT);
        assert_eq!(
            entries_ending(&log, ".start"),
            vec!["kid.start".to_string()]
        );
    }

    #[test]
    fn disabled_component_skips_hooks_but_stays_attached() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let c = engine.scene_mut().add_component(kid, Tracer::new("kid", &log));
        engine.advance(DT);
        log.borrow_mut().clear();

        engine.scene_mut().set_component_enabled(c, false);
        engine.advance(DT);
        assert!(log.borrow().is_empty());
        assert_eq!(engine.scene().component_count(kid), 2);
        assert!(engine.scene().component_alive(c));
    }

    #[test]
    fn enable_transitions_notify_components() {
        struct EnableWatch {
            log: Log,
        }
        impl Component for EnableWatch {
            fn on_enable(&mut self, _ctx: &mut Context) {
                self.log.borrow_mut().push("on".into());
            }
            fn on_disable(&mut self, _ctx: &mut Context) {
                self.log.borrow_mut().push("off".into());
            }
        }

        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let c = engine
            .scene_mut()
            .add_component(kid, EnableWatch { log: Rc::clone(&log) });
        engine.advance(DT);

        engine.scene_mut().set_component_enabled(c, false);
        engine.scene_mut().set_component_enabled(c, false); // no transition
        engine.scene_mut().set_component_enabled(c, true);
        engine.scene_mut().set_enabled(kid, false);
        engine.scene_mut().set_enabled(kid, true);
        assert_eq!(
            *log.borrow(),
            vec![
                "off".to_string(),
                "on".to_string(),
                "off".to_string(),
                "on".to_string()
            ]
        );

        // A disabled component does not hear about its entity's toggles.
        log.borrow_mut().clear();
        engine.scene_mut().set_component_enabled(c, false);
        engine.scene_mut().set_enabled(kid, false);
        engine.scene_mut().set_enabled(kid, true);
        assert_eq!(*log.borrow(), vec!["off".to_string()]);
    }

    // ── Component queries and removal ────────────────────────────────

    #[test]
    fn get_component_sees_committed_only() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let added = engine.scene_mut().add_component(kid, KillOwnerNever);
        assert_eq!(
            engine.scene().get_component::<KillOwnerNever>(kid),
            Handle::invalid()
        );
        engine.advance(DT);
        assert_eq!(engine.scene().get_component::<KillOwnerNever>(kid), added);
    }

    #[test]
    fn cast_narrows_only_matching_types() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let transform = engine.scene().component_at(root, 0);
        assert_ne!(
            engine.scene().cast::<Transform>(transform),
            Handle::invalid()
        );
        assert_eq!(
            engine.scene().cast::<KillOwnerNever>(transform),
            Handle::<KillOwnerNever>::invalid()
        );
    }

    #[test]
    #[should_panic(expected = "invalid component handle")]
    fn dereferencing_a_stale_handle_panics() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let c = engine.scene_mut().add_component(kid, KillOwnerNever);
        engine.advance(DT);
        engine.scene_mut().destroy_component(c);
        engine.advance(DT);
        engine.scene().component(c);
    }

    #[test]
    #[should_panic(expected = "Transform component cannot be removed")]
    fn removing_the_transform_panics() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.advance(DT);
        engine.scene_mut().remove_component(kid, 0);
    }

    #[test]
    fn component_removal_repacks_sibling_indices() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let a = engine.scene_mut().add_component(kid, KillOwnerNever);
        let log = new_log();
        let b = engine.scene_mut().add_component(kid, Tracer::new("b", &log));
        engine.advance(DT);
        assert_eq!(engine.scene().component_index(a), 1);
        assert_eq!(engine.scene().component_index(b), 2);

        engine.scene_mut().remove_component(kid, 1);
        engine.advance(DT);
        assert!(!engine.scene().component_alive(a));
        assert_eq!(engine.scene().component_count(kid), 2);
        assert_eq!(engine.scene().component_index(b), 1);
    }

    #[test]
    fn sibling_attach_and_detach_notifications() {
        let mut engine = Engine::new();
        let added: Events = Rc::new(RefCell::new(Vec::new()));
        let removed: Events = Rc::new(RefCell::new(Vec::new()));
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let watcher = engine.scene_mut().add_component(
            kid,
            SiblingWatcher {
                added: Rc::clone(&added),
                removed: Rc::clone(&removed),
            },
        );
        let other = engine.scene_mut().add_component(kid, KillOwnerNever);
        engine.advance(DT);

        // The watcher heard about its own attachment, then the sibling's.
        assert_eq!(*added.borrow(), vec![watcher.untyped(), other.untyped()]);

        engine.scene_mut().destroy_component(other);
        engine.advance(DT);
        assert_eq!(*removed.borrow(), vec![other.untyped()]);
    }

    // ── Tasks ────────────────────────────────────────────────────────

    fn logging_task(log: &Log, name: &'static str) -> TaskRoutine {
        let log = Rc::clone(log);
        Box::new(move |_ctx| {
            log.borrow_mut().push(name.to_string());
            Ok(TaskStep::Yield(Suspend::NextFrame))
        })
    }

    #[test]
    fn tasks_resume_after_owner_update_in_start_order() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        engine.scene_mut().add_component(kid, Tracer::new("kid", &log));
        engine.scene_mut().start_entity_task(kid, logging_task(&log, "t1"));
        engine.scene_mut().start_entity_task(kid, logging_task(&log, "t2"));

        engine.advance(DT);
        let interesting: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| *e == "kid.update" || e.starts_with('t'))
            .cloned()
            .collect();
        assert_eq!(
            interesting,
            vec!["kid.update".to_string(), "t1".to_string(), "t2".to_string()]
        );
    }

    #[test]
    fn stopping_one_task_leaves_the_rest() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let _t1 = engine.scene_mut().start_entity_task(root, logging_task(&log, "t1"));
        let t2 = engine.scene_mut().start_entity_task(root, logging_task(&log, "t2"));
        let _t3 = engine.scene_mut().start_entity_task(root, logging_task(&log, "t3"));

        engine.scene_mut().stop_task(t2);
        assert!(!engine.scene().task_alive(t2));
        engine.advance(DT);
        assert_eq!(engine.scene().entity_task_count(root), 2);
        assert_eq!(*log.borrow(), vec!["t1".to_string(), "t3".to_string()]);
    }

    #[test]
    fn stop_all_tasks_clears_the_owner() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        engine.scene_mut().start_entity_task(root, logging_task(&log, "t1"));
        engine.scene_mut().start_entity_task(root, logging_task(&log, "t2"));
        engine.scene_mut().stop_all_entity_tasks(root);
        engine.advance(DT);
        assert_eq!(engine.scene().entity_task_count(root), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn stop_all_from_within_a_task_clears_the_owner() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let mut resumes = 0;
        engine.scene_mut().start_entity_task(
            root,
            Box::new(move |ctx| {
                resumes += 1;
                if resumes == 2 {
                    let entity = ctx.entity();
                    ctx.scene.stop_all_entity_tasks(entity);
                }
                Ok(TaskStep::Yield(Suspend::NextFrame))
            }),
        );
        engine.scene_mut().start_entity_task(root, logging_task(&log, "sibling"));

        engine.advance(DT);
        assert_eq!(engine.scene().entity_task_count(root), 2);

        // The first task stops everything mid-resumption: the sibling never
        // runs again, and neither does the caller itself.
        engine.advance(DT);
        assert_eq!(engine.scene().entity_task_count(root), 0);
        assert_eq!(*log.borrow(), vec!["sibling".to_string()]);
        engine.advance(DT);
        assert_eq!(*log.borrow(), vec!["sibling".to_string()]);
    }

    #[test]
    fn stop_all_from_within_a_component_task_clears_the_owner() {
        struct Stopper;
        impl Component for Stopper {
            fn start(&mut self, ctx: &mut Context) {
                let mut resumes = 0;
                ctx.start_task(move |ctx| {
                    resumes += 1;
                    if resumes == 2 {
                        let me = ctx.component();
                        ctx.scene.stop_all_component_tasks(me);
                    }
                    Ok(TaskStep::Yield(Suspend::NextFrame))
                });
                ctx.start_task(|_ctx| Ok(TaskStep::Yield(Suspend::NextFrame)));
            }
        }

        let mut engine = Engine::new();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let host = engine.scene_mut().add_component(kid, Stopper);
        engine.advance(DT);
        assert_eq!(engine.scene().component_task_count(host), 2);
        engine.advance(DT);
        assert_eq!(engine.scene().component_task_count(host), 0);
    }

    #[test]
    fn done_tasks_are_removed() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let t = engine
            .scene_mut()
            .start_entity_task(root, Box::new(|_ctx| Ok(TaskStep::Done)));
        assert!(engine.scene().task_alive(t));
        engine.advance(DT);
        assert!(!engine.scene().task_alive(t));
        assert_eq!(engine.scene().entity_task_count(root), 0);
    }

    #[test]
    fn timed_wait_accumulates_across_attempts() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let runs = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&runs);
        engine.scene_mut().start_entity_task(
            root,
            Box::new(move |_ctx| {
                counter.set(counter.get() + 1);
                Ok(TaskStep::Yield(Suspend::Seconds(0.1)))
            }),
        );

        engine.advance(Duration::from_millis(50)); // body runs, yields 0.1s
        assert_eq!(runs.get(), 1);
        engine.advance(Duration::from_millis(50)); // waited 0.00 → 0.05
        assert_eq!(runs.get(), 1);
        engine.advance(Duration::from_millis(50)); // waited 0.05 → 0.10
        assert_eq!(runs.get(), 1);
        engine.advance(Duration::from_millis(10)); // 0.10 ≥ 0.1: due
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn until_wait_resumes_after_the_awaited_task_completes() {
        let mut engine = Engine::new();
        let root = engine.scene().root();
        let a_runs = Rc::new(Cell::new(0u32));
        let awaited = Rc::new(Cell::new(TaskHandle::invalid()));

        // The awaiter starts first so it is checked before the awaited task
        // each pass.
        let counter = Rc::clone(&a_runs);
        let handle_cell = Rc::clone(&awaited);
        engine.scene_mut().start_entity_task(
            root,
            Box::new(move |_ctx| {
                counter.set(counter.get() + 1);
                Ok(TaskStep::Yield(Suspend::Until(handle_cell.get())))
            }),
        );
        let mut b_runs = 0;
        let b = engine.scene_mut().start_entity_task(
            root,
            Box::new(move |_ctx| {
                b_runs += 1;
                if b_runs < 2 {
                    Ok(TaskStep::Yield(Suspend::NextFrame))
                } else {
                    Ok(TaskStep::Done)
                }
            }),
        );
        awaited.set(b);

        engine.advance(DT); // a yields Until(b); b still running
        assert_eq!(a_runs.get(), 1);
        engine.advance(DT); // a waits (b alive at check time); b completes
        assert_eq!(a_runs.get(), 1);
        assert!(!engine.scene().task_alive(b));
        engine.advance(DT); // next pass: the wait is satisfied
        assert_eq!(a_runs.get(), 2);
    }

    #[test]
    fn failing_task_is_removed_without_harming_siblings() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let bad = engine
            .scene_mut()
            .start_entity_task(
                root,
                Box::new(|_ctx| -> anyhow::Result<TaskStep> { anyhow::bail!("boom") }),
            );
        engine.scene_mut().start_entity_task(root, logging_task(&log, "ok"));

        engine.advance(DT);
        assert!(!engine.scene().task_alive(bad));
        assert_eq!(engine.scene().entity_task_count(root), 1);
        engine.advance(DT);
        assert_eq!(*log.borrow(), vec!["ok".to_string(), "ok".to_string()]);
    }

    #[test]
    fn component_tasks_die_with_their_component() {
        struct TaskHost {
            task: Rc<Cell<TaskHandle>>,
        }
        impl Component for TaskHost {
            fn start(&mut self, ctx: &mut Context) {
                let handle = ctx.start_task(|_ctx| Ok(TaskStep::Yield(Suspend::NextFrame)));
                self.task.set(handle);
            }
        }

        let mut engine = Engine::new();
        let task = Rc::new(Cell::new(TaskHandle::invalid()));
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let host = engine.scene_mut().add_component(
            kid,
            TaskHost {
                task: Rc::clone(&task),
            },
        );
        engine.advance(DT);
        assert!(engine.scene().task_alive(task.get()));
        assert_eq!(engine.scene().component_task_count(host), 1);

        engine.scene_mut().destroy_component(host);
        engine.advance(DT);
        assert!(!engine.scene().task_alive(task.get()));
    }

    #[test]
    fn entity_tasks_die_with_their_entity() {
        let mut engine = Engine::new();
        let log = new_log();
        let root = engine.scene().root();
        let kid = engine.scene_mut().make_child(root, "kid");
        let t = engine.scene_mut().start_entity_task(kid, logging_task(&log, "t"));
        engine.advance(DT);
        assert!(engine.scene().task_alive(t));

        engine.scene_mut().destroy(kid);
        engine.advance(DT);
        assert!(!engine.scene().task_alive(t));
    }
}
