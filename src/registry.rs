//! Group Registry Module
//!
//! Name to group mapping with creation-time uniqueness and an optional hook
//! run for every new group.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::info;

use crate::cache::{rw_read, rw_write, Getter, Value};
use crate::error::{CacheError, Result};
use crate::group::Group;

const SOURCE: &str = "registry";

type CreationHook<V> = Box<dyn Fn(&Arc<Group<V>>) + Send + Sync>;

// == Group Registry ==
/// Owns every group created through it for the registry's lifetime.
///
/// Groups are never removed, so a name maps to the same group from creation
/// onwards. Share one registry (usually behind an `Arc`) wherever groups are
/// created or looked up.
pub struct GroupRegistry<V> {
    groups: RwLock<HashMap<String, Arc<Group<V>>>>,
    creation_hook: OnceLock<CreationHook<V>>,
}

impl<V: Value> GroupRegistry<V> {
    // == Constructor ==
    /// Creates an empty registry with no creation hook.
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            creation_hook: OnceLock::new(),
        }
    }

    // == Creation Hook ==
    /// Installs a hook run each time a group is created.
    ///
    /// The hook runs synchronously while the registry's write lock is held,
    /// before `create` returns. It must not create or look up groups on this
    /// registry.
    ///
    /// # Panics
    /// If a hook is already installed.
    pub fn register_creation_hook<F>(&self, hook: F)
    where
        F: Fn(&Arc<Group<V>>) + Send + Sync + 'static,
    {
        if let Err(err) = self.try_register_creation_hook(hook) {
            panic!("{err}");
        }
    }

    /// Installs the creation hook, returning
    /// [`CacheError::HookAlreadyRegistered`] if one is already set.
    pub fn try_register_creation_hook<F>(&self, hook: F) -> Result<()>
    where
        F: Fn(&Arc<Group<V>>) + Send + Sync + 'static,
    {
        self.creation_hook
            .set(Box::new(hook))
            .map_err(|_| CacheError::HookAlreadyRegistered)
    }

    // == Create ==
    /// Creates and registers a group caching at most `max_entries` values
    /// (0 = unbounded) loaded by `getter`.
    ///
    /// # Panics
    /// If a group named `name` already exists. Reusing a name is a wiring
    /// bug; use [`GroupRegistry::try_create`] to report it instead.
    pub fn create<G>(&self, name: &str, max_entries: usize, getter: G) -> Arc<Group<V>>
    where
        G: Getter<V> + 'static,
    {
        match self.try_create(name, max_entries, getter) {
            Ok(group) => group,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates and registers a group, returning
    /// [`CacheError::DuplicateGroup`] if the name is taken.
    pub fn try_create<G>(&self, name: &str, max_entries: usize, getter: G) -> Result<Arc<Group<V>>>
    where
        G: Getter<V> + 'static,
    {
        let mut groups = rw_write(&self.groups, SOURCE, "create");
        if groups.contains_key(name) {
            return Err(CacheError::DuplicateGroup(name.to_string()));
        }

        let group = Arc::new(Group::new(name, max_entries, Box::new(getter)));
        // a panicking hook leaves the name free
        if let Some(hook) = self.creation_hook.get() {
            hook(&group);
        }
        groups.insert(name.to_string(), group.clone());

        info!(group = name, max_entries, "Created cache group");
        Ok(group)
    }

    // == Lookup ==
    /// Returns the group previously created under `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Arc<Group<V>>> {
        rw_read(&self.groups, SOURCE, "lookup").get(name).cloned()
    }

    /// Returns the registered group names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = rw_read(&self.groups, SOURCE, "names")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl<V: Value> Default for GroupRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
