//! Registry of constructible classes.
//!
//! A class is a name plus a constructor [`Callable`]. The registry is the
//! source of truth for "does this class exist" checks made by the
//! configurator and for autowiring typed parameters.

use crate::{
    callable::{Callable, Param},
    error::AirResult,
    value::Value,
};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A registered class.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    constructor: Callable,
}

impl ClassDef {
    /// Define a class from its constructor parameters and body
    pub fn new<S, F>(name: S, params: Vec<Param>, constructor: F) -> Self
    where
        S: Into<String>,
        F: Fn(Vec<Value>) -> AirResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let constructor = Callable::new(params, constructor).named(&name);
        Self { name, constructor }
    }

    /// Class name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor parameters
    #[must_use]
    pub fn params(&self) -> &[Param] {
        self.constructor.params()
    }

    /// Constructor callable
    #[must_use]
    pub fn constructor(&self) -> &Callable {
        &self.constructor
    }
}

/// Name → class table shared by a container and its child scopes.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, ClassDef>>,
}

impl ClassRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a class
    pub fn register(&self, class: ClassDef) {
        tracing::debug!(class = class.name(), "registering class");
        self.classes.write().insert(class.name.clone(), class);
    }

    /// Shorthand for `register(ClassDef::new(..))`
    pub fn define<S, F>(&self, name: S, params: Vec<Param>, constructor: F)
    where
        S: Into<String>,
        F: Fn(Vec<Value>) -> AirResult<Value> + Send + Sync + 'static,
    {
        self.register(ClassDef::new(name, params, constructor));
    }

    /// Check if a class with this name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(name)
    }

    /// Get a copy of the class definition
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ClassDef> {
        self.classes.read().get(name).cloned()
    }

    /// Registered class names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }
}
