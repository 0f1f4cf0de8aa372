//! # Handles — Generation-Checked Weak References
//!
//! A handle names an arena slot plus the generation the slot had when the
//! handle was created. It never keeps its target alive and never dangles:
//! once the target is destroyed the handle simply stops validating.
//!
//! Handles are validated against the [`Scene`](crate::scene::Scene) that owns
//! the storage (`scene.is_alive(entity)`, `scene.component_alive(handle)`).
//! Validity checks are O(1) and allocation-free. Dereferencing an invalid
//! handle through a panicking accessor is a defined failure — a panic with a
//! message — never silent reuse of a recycled slot.
//!
//! Four flavors share the same representation:
//!
//! - [`EntityHandle`] — a node in the scene tree
//! - [`ComponentHandle`] — any component, type-erased
//! - [`Handle<T>`] — a component of a known concrete type
//! - [`TaskHandle`] — a running cooperative task
//!
//! Two handles compare equal iff they name the same slot *and* generation, so
//! a handle to a destroyed object never equals a handle to its replacement.

use std::fmt;
use std::marker::PhantomData;

use crate::component::Component;

// ── RawHandle ────────────────────────────────────────────────────────────

/// Slot index + generation. The shared representation behind every handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl RawHandle {
    /// The reserved sentinel that no arena slot ever has.
    pub const INVALID: RawHandle = RawHandle {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Raw slot index. Useful for diagnostics, not for general use.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation captured when the handle was created.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RawHandle {
    /// `3v1` for slot 3, generation 1; `invalid` for the sentinel.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "invalid")
        } else {
            write!(f, "{}v{}", self.index, self.generation)
        }
    }
}

// ── EntityHandle ─────────────────────────────────────────────────────────

/// Handle to an entity in the scene tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub(crate) RawHandle);

impl EntityHandle {
    /// An always-invalid handle, for "no entity" sentinels.
    pub const fn invalid() -> Self {
        EntityHandle(RawHandle::INVALID)
    }

    pub fn raw(self) -> RawHandle {
        self.0
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({:?})", self.0)
    }
}

// ── ComponentHandle ──────────────────────────────────────────────────────

/// Type-erased handle to a component on some entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentHandle(pub(crate) RawHandle);

impl ComponentHandle {
    /// An always-invalid handle, for "no component" sentinels.
    pub const fn invalid() -> Self {
        ComponentHandle(RawHandle::INVALID)
    }

    pub fn raw(self) -> RawHandle {
        self.0
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({:?})", self.0)
    }
}

// ── Handle<T> ────────────────────────────────────────────────────────────

/// Handle to a component of a known concrete type.
///
/// Produced by [`Scene::add_component`](crate::scene::Scene::add_component),
/// [`Scene::get_component`](crate::scene::Scene::get_component), and
/// [`Scene::cast`](crate::scene::Scene::cast). Narrowing an untyped handle
/// whose dynamic type does not match yields an *invalid* typed handle rather
/// than a panic.
pub struct Handle<T: Component> {
    raw: RawHandle,
    marker: PhantomData<fn() -> T>,
}

impl<T: Component> Handle<T> {
    /// An always-invalid handle.
    pub const fn invalid() -> Self {
        Handle {
            raw: RawHandle::INVALID,
            marker: PhantomData,
        }
    }

    pub(crate) fn from_raw(raw: RawHandle) -> Self {
        Handle {
            raw,
            marker: PhantomData,
        }
    }

    pub fn raw(self) -> RawHandle {
        self.raw
    }

    /// Forget the compile-time type, keeping the slot address.
    pub fn untyped(self) -> ComponentHandle {
        ComponentHandle(self.raw)
    }
}

impl<T: Component> From<Handle<T>> for ComponentHandle {
    fn from(handle: Handle<T>) -> Self {
        handle.untyped()
    }
}

// Manual impls: deriving would require `T: Copy` etc. on the phantom type.
impl<T: Component> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: Component> Copy for Handle<T> {}

impl<T: Component> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<T: Component> Eq for Handle<T> {}

impl<T: Component> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle<{}>({:?})",
            std::any::type_name::<T>().rsplit("::").next().unwrap_or("?"),
            self.raw
        )
    }
}

// ── TaskHandle ───────────────────────────────────────────────────────────

/// Handle to a running cooperative task.
///
/// Goes stale the moment the task completes, errors, or is stopped — which
/// is exactly what a `Suspend::Until` wait checks for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub(crate) RawHandle);

impl TaskHandle {
    /// An always-invalid handle.
    pub const fn invalid() -> Self {
        TaskHandle(RawHandle::INVALID)
    }

    pub fn raw(self) -> RawHandle {
        self.0
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({:?})", self.0)
    }
}
