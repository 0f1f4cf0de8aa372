//! # Identity Registry — Stable Ids for Human-Readable Names
//!
//! A bidirectional `name ↔ id` table used to name entities and look them up
//! cheaply by number instead of by string compare. Ids are plain `u64`s,
//! stable while registered; freeing an id releases it for reuse.
//!
//! Misuse (registering a duplicate name, querying an unknown name or id) is a
//! programmer error and panics with a message. The `try_` accessors return
//! `Option` for callers that want to probe.
//!
//! The registry is owned by the [`Scene`](crate::scene::Scene) rather than
//! being process-global, so independent scenes (and parallel tests) cannot
//! collide on names.

use std::collections::HashMap;

/// Stable numeric identifier for a registered name.
pub type Id = u64;

/// Bidirectional `name -> Id` / `Id -> name` table with id recycling.
pub struct IdRegistry {
    names: HashMap<String, Id>,
    ids: HashMap<Id, String>,
    /// Next fresh id (if `free` is empty).
    next: Id,
    /// Released ids, available for reuse.
    free: Vec<Id>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            ids: HashMap::new(),
            next: 0,
            free: Vec::new(),
        }
    }

    /// Register a new name and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the name is already registered.
    pub fn make_id(&mut self, name: &str) -> Id {
        if let Some(&existing) = self.names.get(name) {
            panic!("Name \"{}\" is already registered as id {}", name, existing);
        }
        let id = self.free.pop().unwrap_or_else(|| {
            let id = self.next;
            self.next += 1;
            id
        });
        self.names.insert(name.to_string(), id);
        self.ids.insert(id, name.to_string());
        id
    }

    /// Look up the id of a registered name.
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown.
    pub fn get_id(&self, name: &str) -> Id {
        *self
            .names
            .get(name)
            .unwrap_or_else(|| panic!("No id registered for name \"{}\"", name))
    }

    /// Look up the id of a name, or `None` if unknown.
    pub fn try_get_id(&self, name: &str) -> Option<Id> {
        self.names.get(name).copied()
    }

    /// Release an id, making it (and its name) available again.
    pub fn free_id(&mut self, id: Id) {
        if let Some(name) = self.ids.remove(&id) {
            self.names.remove(&name);
            self.free.push(id);
        }
    }

    /// Look up the name registered for an id.
    ///
    /// # Panics
    ///
    /// Panics if the id is unknown.
    pub fn name(&self, id: Id) -> &str {
        self.ids
            .get(&id)
            .unwrap_or_else(|| panic!("No name registered for id {}", id))
    }

    /// Look up the name for an id, or `None` if unknown.
    pub fn try_name(&self, id: Id) -> Option<&str> {
        self.ids.get(&id).map(String::as_str)
    }

    /// Number of currently registered names.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}
