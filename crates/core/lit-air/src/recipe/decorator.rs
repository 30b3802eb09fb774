//! Recipe decorators and the decorator registry.
//!
//! A decorator owns exactly one inner recipe and is itself a recipe, so
//! decorators nest. Configuration refers to decorators by name; the names
//! `singleton` and `callback` are always available and further decorators can
//! be added with [`register_decorator`].

use super::{Recipe, RecipeKind, RecipeRef};
use crate::{
    callable::Callable,
    container::Container,
    error::{AirError, AirResult},
    factory::Factory,
    value::{Array, Value},
};
use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use std::sync::Arc;

/// A recipe wrapping another recipe.
pub trait RecipeDecorator: Recipe + Sized + 'static {
    /// Wrap `recipe`
    fn decorate(recipe: RecipeRef) -> Self;

    /// Receive the (non-empty) option given in configuration.
    ///
    /// The default ignores the option.
    fn set_option(&mut self, option: Value) -> AirResult<()> {
        let _ = option;
        Ok(())
    }
}

type DecorateFn = fn(RecipeRef, Value) -> AirResult<RecipeRef>;

fn decorate_with<D: RecipeDecorator>(recipe: RecipeRef, option: Value) -> AirResult<RecipeRef> {
    let mut decorator = D::decorate(recipe);
    if !option.is_empty() {
        decorator.set_option(option)?;
    }
    Ok(Arc::new(decorator))
}

static DECORATORS: Lazy<RwLock<IndexMap<String, DecorateFn>>> = Lazy::new(|| {
    let mut table: IndexMap<String, DecorateFn> = IndexMap::new();
    table.insert("callback".to_string(), decorate_with::<CallbackDecorator>);
    table.insert("singleton".to_string(), decorate_with::<SingletonDecorator>);
    RwLock::new(table)
});

/// Make decorator `D` available to configuration under `name`.
///
/// Names are never rebound: registering a taken name is an error.
pub fn register_decorator<D: RecipeDecorator>(name: &str) -> AirResult<()> {
    if name.is_empty() {
        return Err(AirError::config("decorator name must not be empty"));
    }
    let mut table = DECORATORS.write();
    if table.contains_key(name) {
        return Err(AirError::config(format!(
            "recipe decorator [{name}] is already registered"
        )));
    }
    tracing::debug!(decorator = name, "registering recipe decorator");
    table.insert(name.to_string(), decorate_with::<D>);
    Ok(())
}

/// Names of all registered decorators, built-ins first
#[must_use]
pub fn decorator_names() -> Vec<String> {
    DECORATORS.read().keys().cloned().collect()
}

/// Wrap `recipe` with the decorator registered as `name`, passing `option`.
pub(crate) fn apply_decorator(name: &str, recipe: RecipeRef, option: Value) -> AirResult<RecipeRef> {
    let decorate = DECORATORS.read().get(name).copied();
    match decorate {
        Some(decorate) => decorate(recipe, option),
        None => Err(AirError::config(format!(
            "cannot understand recipe decorator [{name}]"
        ))),
    }
}

/// Resolves the inner recipe once and returns the cached value afterwards.
///
/// The cache belongs to this decorator instance; a new definition starts
/// empty. A failed resolution leaves the cache empty.
pub struct SingletonDecorator {
    recipe: RecipeRef,
    value: OnceCell<Value>,
}

impl SingletonDecorator {
    /// Check if a value has been cached
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }
}

impl RecipeDecorator for SingletonDecorator {
    fn decorate(recipe: RecipeRef) -> Self {
        Self {
            recipe,
            value: OnceCell::new(),
        }
    }
}

impl Recipe for SingletonDecorator {
    fn resolve(&self, container: &Container, id: Option<&str>) -> AirResult<Value> {
        self.value
            .get_or_try_init(|| self.recipe.resolve(container, id))
            .cloned()
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Singleton
    }
}

/// Passes every resolved value through a callback.
///
/// The callback receives the inner value as its first positional argument;
/// its remaining parameters are injected like a builder's.
pub struct CallbackDecorator {
    recipe: RecipeRef,
    callback: Option<Callable>,
}

impl CallbackDecorator {
    /// Wrap `recipe` with `callback` already set
    #[must_use]
    pub fn with_callback(recipe: RecipeRef, callback: Callable) -> Self {
        Self {
            recipe,
            callback: Some(callback),
        }
    }
}

impl RecipeDecorator for CallbackDecorator {
    fn decorate(recipe: RecipeRef) -> Self {
        Self {
            recipe,
            callback: None,
        }
    }

    fn set_option(&mut self, option: Value) -> AirResult<()> {
        match option {
            Value::Callable(callback) => {
                self.callback = Some(callback);
                Ok(())
            }
            other => Err(AirError::config(format!(
                "callback decorator expects a callable, got {}",
                other.type_name()
            ))),
        }
    }
}

impl Recipe for CallbackDecorator {
    fn resolve(&self, container: &Container, id: Option<&str>) -> AirResult<Value> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| AirError::missing_parameter("callback decorator", "callback"))?;
        let value = self.recipe.resolve(container, id)?;
        Factory::of(container).invoke(callback, &Array::list([value]))
    }

    fn kind(&self) -> RecipeKind {
        RecipeKind::Callback
    }
}
