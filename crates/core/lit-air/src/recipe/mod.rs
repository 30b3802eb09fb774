//! Recipes: deferred descriptions of how to produce a container value.
//!
//! Building a recipe never runs user code. Work happens only in
//! [`Recipe::resolve`], which may re-enter the container to fetch
//! dependencies.

pub mod decorator;

use crate::{
    callable::Callable,
    container::Container,
    error::{AirError, AirResult},
    factory::Factory,
    value::{Array, Value},
};
use std::sync::Arc;

pub use decorator::{
    decorator_names, register_decorator, CallbackDecorator, RecipeDecorator, SingletonDecorator,
};

/// A unit of deferred construction.
pub trait Recipe: Send + Sync {
    /// Produce the value. `id` is the container key being resolved, if any.
    fn resolve(&self, container: &Container, id: Option<&str>) -> AirResult<Value>;

    /// Which built-in variant this is
    fn kind(&self) -> RecipeKind {
        RecipeKind::Custom
    }

    /// The literal for recipes that always resolve to the same value.
    ///
    /// The configurator stores such values directly instead of registering
    /// a definition.
    fn fixed_value(&self) -> Option<&Value> {
        None
    }
}

/// Shared handle to a recipe
pub type RecipeRef = Arc<dyn Recipe>;

/// Built-in recipe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeKind {
    /// [`FixedValueRecipe`]
    Value,
    /// [`AliasRecipe`]
    Alias,
    /// [`AutowireRecipe`]
    Autowire,
    /// [`InstanceRecipe`]
    Instance,
    /// [`BuilderRecipe`]
    Builder,
    /// [`SingletonDecorator`]
    Singleton,
    /// [`CallbackDecorator`]
    Callback,
    /// Anything implemented outside this crate
    Custom,
}

/// Always resolves to the same value.
#[derive(Debug, Clone)]
pub struct FixedValueRecipe {
    value: Value,
}

impl FixedValueRecipe {
    /// Wrap a value
    pub fn new<V: Into<Value>>(value: V) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The wrapped value
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Recipe for FixedValueRecipe {
    fn resolve(&self, _container: &Container, _id: Option<&str>) -> AirResult<Value> {
        Ok(self.value.clone())
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Value
    }

    fn fixed_value(&self) -> Option<&Value> {
        Some(&self.value)
    }
}

/// Forwards to another container entry.
#[derive(Debug, Clone)]
pub struct AliasRecipe {
    target: String,
}

impl AliasRecipe {
    /// Point at `target`
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The aliased key
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Recipe for AliasRecipe {
    fn resolve(&self, container: &Container, _id: Option<&str>) -> AirResult<Value> {
        container.get(&self.target)
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Alias
    }
}

/// Constructs a class, filling missing parameters from the container.
///
/// Without a class name the entry id being resolved names the class.
#[derive(Debug, Clone)]
pub struct AutowireRecipe {
    class_name: Option<String>,
    extra: Array,
    cached: bool,
}

impl AutowireRecipe {
    /// `cached` stores the first instance in the container under the class name.
    pub fn new<S: Into<String>>(class_name: S, extra: Array, cached: bool) -> Self {
        Self {
            class_name: Some(class_name.into()),
            extra,
            cached,
        }
    }

    /// Autowire the class named by the entry this recipe is defined under
    #[must_use]
    pub fn for_entry(extra: Array, cached: bool) -> Self {
        Self {
            class_name: None,
            extra,
            cached,
        }
    }

    /// Class to construct, if fixed
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Explicit parameters
    #[must_use]
    pub fn extra(&self) -> &Array {
        &self.extra
    }

    /// Whether the instance is persisted after the first resolution
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cached
    }
}

impl Recipe for AutowireRecipe {
    fn resolve(&self, container: &Container, id: Option<&str>) -> AirResult<Value> {
        let class_name = self
            .class_name
            .as_deref()
            .or(id)
            .ok_or_else(|| AirError::config("autowire recipe without a class name needs an entry id"))?;
        let factory = Factory::of(container);

        // defined under its own class name, so the cache is this entry
        if id == Some(class_name) {
            let instance = factory.instantiate(class_name, &self.extra)?;
            if self.cached {
                factory.cache(class_name, &instance);
            }
            return Ok(instance);
        }
        factory.produce(class_name, &self.extra, self.cached)
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Autowire
    }
}

/// Constructs a fresh instance of a class on every resolution.
///
/// Only the explicit parameters and the constructor defaults are used.
#[derive(Debug, Clone)]
pub struct InstanceRecipe {
    class_name: String,
    extra: Array,
}

impl InstanceRecipe {
    /// Instantiate `class_name` with `extra`
    pub fn new<S: Into<String>>(class_name: S, extra: Array) -> Self {
        Self {
            class_name: class_name.into(),
            extra,
        }
    }

    /// Class to construct
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Explicit parameters
    #[must_use]
    pub fn extra(&self) -> &Array {
        &self.extra
    }
}

impl Recipe for InstanceRecipe {
    fn resolve(&self, container: &Container, _id: Option<&str>) -> AirResult<Value> {
        Factory::of(container).construct(&self.class_name, &self.extra)
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Instance
    }
}

/// Invokes a user callable with injected parameters.
#[derive(Debug, Clone)]
pub struct BuilderRecipe {
    builder: Callable,
    extra: Array,
}

impl BuilderRecipe {
    /// Call `builder` with `extra` plus injected parameters
    #[must_use]
    pub fn new(builder: Callable, extra: Array) -> Self {
        Self { builder, extra }
    }

    /// The builder function
    #[must_use]
    pub fn builder(&self) -> &Callable {
        &self.builder
    }

    /// Explicit parameters
    #[must_use]
    pub fn extra(&self) -> &Array {
        &self.extra
    }
}

impl Recipe for BuilderRecipe {
    fn resolve(&self, container: &Container, _id: Option<&str>) -> AirResult<Value> {
        Factory::of(container).invoke(&self.builder, &self.extra)
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Builder
    }
}

/// A recipe resolving to `value`
pub fn value<V: Into<Value>>(value: V) -> RecipeRef {
    Arc::new(FixedValueRecipe::new(value))
}

/// A recipe forwarding to `target`
pub fn alias<S: Into<String>>(target: S) -> RecipeRef {
    Arc::new(AliasRecipe::new(target))
}

/// An autowiring recipe
pub fn autowire<S: Into<String>>(class_name: S, extra: Array, cached: bool) -> RecipeRef {
    Arc::new(AutowireRecipe::new(class_name, extra, cached))
}

/// An autowiring recipe for the class named by its own entry
#[must_use]
pub fn autowire_entry(extra: Array, cached: bool) -> RecipeRef {
    Arc::new(AutowireRecipe::for_entry(extra, cached))
}

/// A factory-instantiation recipe
pub fn instance<S: Into<String>>(class_name: S, extra: Array) -> RecipeRef {
    Arc::new(InstanceRecipe::new(class_name, extra))
}

/// A builder recipe
#[must_use]
pub fn builder(builder: Callable, extra: Array) -> RecipeRef {
    Arc::new(BuilderRecipe::new(builder, extra))
}

/// Wrap `recipe` so it resolves only once
#[must_use]
pub fn singleton(recipe: RecipeRef) -> RecipeRef {
    Arc::new(SingletonDecorator::decorate(recipe))
}
