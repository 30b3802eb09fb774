//! The container: materialised values, lazy definitions and scoping.
//!
//! `get` looks at materialised values first, then at definitions (resolving
//! the recipe on every call), then at the parent scope. A container is meant
//! to serve one bootstrap or request lifecycle. It is `Send + Sync`, and each
//! thread resolving through it gets its own resolution stack.

use crate::{
    class::ClassRegistry,
    configurator::Configurator,
    error::{AirError, AirResult},
    recipe::RecipeRef,
    value::{Array, Value},
};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

/// Dependency injection container.
pub struct Container {
    values: RwLock<HashMap<String, Value>>,
    recipes: RwLock<HashMap<String, RecipeRef>>,
    classes: Arc<ClassRegistry>,
    parent: Option<Arc<Container>>,
    resolving: Mutex<HashMap<ThreadId, Vec<String>>>,
}

impl Container {
    /// Create an empty container with its own empty class registry
    #[must_use]
    pub fn new() -> Self {
        Self::with_classes(Arc::new(ClassRegistry::new()))
    }

    /// Create an empty container over a shared class registry
    #[must_use]
    pub fn with_classes(classes: Arc<ClassRegistry>) -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            recipes: RwLock::new(HashMap::new()),
            classes,
            parent: None,
            resolving: Mutex::new(HashMap::new()),
        }
    }

    /// Create a container and apply `config` to it.
    pub fn from_config(classes: Arc<ClassRegistry>, config: Array) -> AirResult<Self> {
        let container = Self::with_classes(classes);
        container.configure(config, true)?;
        Ok(container)
    }

    /// Create a child scope. Misses fall through to `parent`; writes stay local.
    #[must_use]
    pub fn child(parent: &Arc<Container>) -> Self {
        let mut container = Self::with_classes(Arc::clone(&parent.classes));
        container.parent = Some(Arc::clone(parent));
        container
    }

    /// The class registry used for construction
    #[must_use]
    pub fn classes(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    /// The parent scope, if any
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// Check if `id` resolves here or in a parent scope
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.has_local(id) || self.parent.as_ref().is_some_and(|p| p.has(id))
    }

    /// Check if `id` is stored in this scope
    #[must_use]
    pub fn has_local(&self, id: &str) -> bool {
        self.values.read().contains_key(id) || self.recipes.read().contains_key(id)
    }

    /// Get an entry, resolving its definition if it has not been materialised.
    pub fn get(&self, id: &str) -> AirResult<Value> {
        let stored = self.values.read().get(id).cloned();
        if let Some(value) = stored {
            return Ok(value);
        }

        let recipe = self.recipes.read().get(id).cloned();
        if let Some(recipe) = recipe {
            let _guard = self.enter(id.to_string())?;
            trace!(id, "resolving definition");
            return recipe.resolve(self, Some(id));
        }

        match &self.parent {
            Some(parent) if parent.has(id) => parent.get(id),
            _ => Err(AirError::not_found(id)),
        }
    }

    /// Store a materialised value
    pub fn set<S: Into<String>>(&self, id: S, value: Value) {
        self.values.write().insert(id.into(), value);
    }

    /// Install a lazy definition
    pub fn define<S: Into<String>>(&self, id: S, recipe: RecipeRef) {
        let id = id.into();
        debug!(id = %id, kind = ?recipe.kind(), "defining entry");
        self.recipes.write().insert(id, recipe);
    }

    /// Drop both the materialised value and the definition stored at `id`.
    pub fn flush(&self, id: &str) {
        let had_value = self.values.write().remove(id).is_some();
        let had_recipe = self.recipes.write().remove(id).is_some();
        if had_value || had_recipe {
            debug!(id, had_value, had_recipe, "flushed entry");
        }
    }

    /// The materialised value stored in this scope, without resolving anything
    #[must_use]
    pub fn local_value(&self, id: &str) -> Option<Value> {
        self.values.read().get(id).cloned()
    }

    /// The definition stored in this scope
    #[must_use]
    pub fn definition(&self, id: &str) -> Option<RecipeRef> {
        self.recipes.read().get(id).cloned()
    }

    /// Keys stored in this scope, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: BTreeSet<String> = self.values.read().keys().cloned().collect();
        keys.extend(self.recipes.read().keys().cloned());
        keys.into_iter().collect()
    }

    /// Merge `params` into the parameter bag of `class_name`.
    ///
    /// The bag lives at `ClassName::` and is consulted when the class is
    /// constructed. Later calls override earlier entries with the same key.
    pub fn provide_parameter(&self, class_name: &str, params: Array) {
        let key = Configurator::join([class_name, ""]);
        let mut bag = match self.local_value(&key) {
            Some(Value::Array(existing)) => existing,
            _ => Array::new(),
        };
        for (k, v) in params {
            bag.insert(k, v);
        }
        self.set(key, Value::Array(bag));
    }

    /// Write a configuration mapping into this container.
    pub fn configure(&self, config: Array, force: bool) -> AirResult<()> {
        Configurator::for_container(self).config(self, config, force)
    }

    /// Push a frame on the calling thread's resolution stack, failing if it
    /// is already there.
    pub(crate) fn enter(&self, frame: String) -> AirResult<ResolutionGuard<'_>> {
        let thread = thread::current().id();
        let mut stacks = self.resolving.lock();
        let stack = stacks.entry(thread).or_default();
        if stack.contains(&frame) {
            let mut chain = stack.clone();
            chain.push(frame);
            return Err(AirError::CircularDependency { chain });
        }
        stack.push(frame);
        Ok(ResolutionGuard {
            container: self,
            thread,
        })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("keys", &self.keys())
            .field("has_parent", &self.parent.is_some())
            .finish_non_exhaustive()
    }
}

/// Pops its frame from the owning thread's resolution stack when dropped.
pub(crate) struct ResolutionGuard<'c> {
    container: &'c Container,
    thread: ThreadId,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        let mut stacks = self.container.resolving.lock();
        if let Some(stack) = stacks.get_mut(&self.thread) {
            stack.pop();
            if stack.is_empty() {
                stacks.remove(&self.thread);
            }
        }
    }
}
