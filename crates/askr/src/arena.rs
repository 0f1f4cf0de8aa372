//! # Generational Arena — Slot Storage Behind Every Handle
//!
//! All entities, components, and tasks live in [`Arena`]s. An arena slot
//! pairs a value with a **generation** counter that is bumped every time the
//! slot is vacated, so a stale [`RawHandle`](crate::handle::RawHandle) from a
//! previous occupant can always be detected:
//!
//! ```text
//! slot 3, generation 0  ← original occupant
//! slot 3, generation 1  ← after remove + reuse
//! ```
//!
//! A handle that still says `generation: 0` fails every lookup safely. This
//! is the same scheme used by generational entity allocators in hecs,
//! bevy_ecs, and EnTT — here generalized over the stored type so the scene
//! can run one arena each for entities, components, and tasks.

use crate::handle::RawHandle;

struct Slot<T> {
    /// Bumped each time the slot is vacated, so old handles go stale.
    generation: u32,
    /// `None` while the slot is free.
    value: Option<T>,
}

/// Generation-checked slot storage.
///
/// Insertion returns a [`RawHandle`] (slot index + generation). All accessors
/// re-check the generation, so handles to removed values yield `None` rather
/// than aliasing a reused slot.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacated slots, available for reuse.
    free: Vec<u32>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a value, reusing a free slot if one is available.
    pub fn insert(&mut self, value: T) -> RawHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            RawHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            RawHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Remove and return the value, bumping the slot generation so every
    /// outstanding handle to it goes stale. Returns `None` if the handle is
    /// already stale or was never valid.
    pub fn remove(&mut self, handle: RawHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return None;
        }
        let value = slot.value.take();
        slot.generation += 1;
        self.free.push(handle.index);
        value
    }

    /// `true` if the handle still addresses a live value.
    pub fn contains(&self, handle: RawHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.generation == handle.generation && slot.value.is_some())
    }

    pub fn get(&self, handle: RawHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: RawHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::new();
        let h = arena.insert("hello");
        assert_eq!(arena.get(h), Some(&"hello"));
        assert!(arena.contains(h));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn remove_invalidates_handle() {
        let mut arena = Arena::new();
        let h = arena.insert(7u32);
        assert_eq!(arena.remove(h), Some(7));
        assert!(!arena.contains(h));
        assert!(arena.get(h).is_none());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn reuse_bumps_generation() {
        let mut arena = Arena::new();
        let h0 = arena.insert(1u32);
        arena.remove(h0);
        let h1 = arena.insert(2u32);
        assert_eq!(h1.index, h0.index); // same slot
        assert_eq!(h1.generation, h0.generation + 1); // bumped

        // The stale handle must not see the new occupant.
        assert!(!arena.contains(h0));
        assert!(arena.get(h0).is_none());
        assert_eq!(arena.get(h1), Some(&2));
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = Arena::new();
        let h = arena.insert(1u32);
        assert_eq!(arena.remove(h), Some(1));
        assert_eq!(arena.remove(h), None);
    }

    #[test]
    fn get_mut_mutates() {
        let mut arena = Arena::new();
        let h = arena.insert(10u32);
        *arena.get_mut(h).unwrap() = 20;
        assert_eq!(arena.get(h), Some(&20));
    }
}
