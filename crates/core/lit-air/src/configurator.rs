//! Turns configuration mappings into recipes and writes them into a container.
//!
//! A configuration mapping associates container keys with plain values,
//! callables, recipes or arrays. Arrays are either explicit recipe
//! descriptors (a `$` discriminator plus positional arguments, built with the
//! helpers on [`Configurator`]) or one of two shorthands:
//!
//! - `["ClassName"]` autowires the class without caching
//! - `["ClassName", {params}]` instantiates a registered class with exactly
//!   those params
//!
//! Anything else is stored as a literal with a warning.
//!
//! ```
//! use lit_air::{Array, Configurator as C, Container, Value};
//!
//! let container = Container::new();
//! let config = Array::new()
//!     .with("db.host", "localhost")
//!     .with("db.primary", C::alias(["db.host"]))
//!     .with("ports", C::value(Array::list([80, 443])));
//! container.configure(config, true)?;
//!
//! assert_eq!(container.get("db.primary")?, Value::from("localhost"));
//! # Ok::<(), lit_air::AirError>(())
//! ```

use crate::{
    callable::Callable,
    class::ClassRegistry,
    container::Container,
    error::{AirError, AirResult},
    recipe::{self, decorator::apply_decorator, RecipeRef},
    value::{Array, Key, Value},
};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Joins the parts of a compound key
pub const SEPARATOR: &str = "::";

/// Descriptor field naming the recipe variant
pub const DISCRIMINATOR: &str = "$";

/// Descriptor field holding the decorator mapping
pub const DECORATOR_KEY: &str = "decorator";

/// How a configuration value will be treated.
pub enum Shape {
    /// Already a recipe; used as is
    Recipe(RecipeRef),
    /// A callable; becomes a singleton builder
    Callable(Callable),
    /// An explicit `$` descriptor
    Descriptor(Array),
    /// `["ClassName"]`
    AutowireShorthand(String),
    /// `["ClassName", {params}]` for a registered class
    InstanceShorthand {
        /// Class to instantiate
        class_name: String,
        /// Constructor parameters
        extra: Array,
    },
    /// An array matching no recipe shape
    Ambiguous(Array),
    /// Any other value
    Literal(Value),
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recipe(r) => f.debug_tuple("Recipe").field(&r.kind()).finish(),
            Self::Callable(c) => f.debug_tuple("Callable").field(c).finish(),
            Self::Descriptor(arr) => f.debug_tuple("Descriptor").field(arr).finish(),
            Self::AutowireShorthand(class_name) => {
                f.debug_tuple("AutowireShorthand").field(class_name).finish()
            }
            Self::InstanceShorthand { class_name, extra } => f
                .debug_struct("InstanceShorthand")
                .field("class_name", class_name)
                .field("extra", extra)
                .finish(),
            Self::Ambiguous(arr) => f.debug_tuple("Ambiguous").field(arr).finish(),
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
        }
    }
}

/// What a single configuration entry becomes in the container.
enum Entry {
    Literal(Value),
    ParameterBag(Array),
    Definition(RecipeRef),
}

/// Configuration compiler.
#[derive(Debug, Clone)]
pub struct Configurator {
    classes: Arc<ClassRegistry>,
}

impl Configurator {
    /// Configurator checking class names against `classes`
    #[must_use]
    pub fn new(classes: Arc<ClassRegistry>) -> Self {
        Self { classes }
    }

    /// Configurator sharing the container's class registry
    #[must_use]
    pub fn for_container(container: &Container) -> Self {
        Self::new(Arc::clone(container.classes()))
    }

    /// Write every entry of `config` into `container`.
    ///
    /// With `force` unset, keys the container already has are skipped. All
    /// remaining entries are compiled before anything is written, so a
    /// configuration error leaves the container untouched.
    pub fn config(&self, container: &Container, config: Array, force: bool) -> AirResult<()> {
        let mut compiled = Vec::with_capacity(config.len());
        for (key, value) in config {
            let key = key.to_string();
            if !force && container.has(&key) {
                continue;
            }
            let entry = self.compile_entry(&key, value)?;
            compiled.push((key, entry));
        }

        for (key, entry) in compiled {
            store(container, key, entry);
        }
        Ok(())
    }

    /// Write a single entry into `container`.
    pub fn write(&self, container: &Container, key: &str, value: Value) -> AirResult<()> {
        let entry = self.compile_entry(key, value)?;
        store(container, key.to_string(), entry);
        Ok(())
    }

    fn compile_entry(&self, key: &str, value: Value) -> AirResult<Entry> {
        if value.is_scalar() || matches!(value, Value::Object(_)) {
            return Ok(Entry::Literal(value));
        }

        if let Some(class_name) = key.strip_suffix(SEPARATOR) {
            if self.classes.contains(class_name) {
                return match value {
                    Value::Array(arr) => Ok(Entry::ParameterBag(self.map_array_value_to_recipe(arr)?)),
                    other => Err(AirError::config(format!(
                        "parameters of [{class_name}] must be an array, got {}",
                        other.type_name()
                    ))),
                };
            }
        }

        let recipe = self.convert_to_recipe(value)?;
        match recipe.fixed_value() {
            Some(value) => Ok(Entry::Literal(value.clone())),
            None => Ok(Entry::Definition(recipe)),
        }
    }

    /// Determine how `value` would be normalised, without building anything.
    #[must_use]
    pub fn classify(&self, value: Value) -> Shape {
        match value {
            Value::Recipe(r) => Shape::Recipe(r),
            Value::Callable(c) => Shape::Callable(c),
            Value::Array(arr) => self.classify_array(arr),
            other => Shape::Literal(other),
        }
    }

    fn classify_array(&self, arr: Array) -> Shape {
        let discriminated = arr
            .get_named(DISCRIMINATOR)
            .is_some_and(|d| !d.is_empty());
        if arr.get_index(0).is_some() && discriminated {
            return Shape::Descriptor(arr);
        }

        if arr.is_sequential(1) {
            if let Some(Value::String(class_name)) = arr.get_index(0) {
                return Shape::AutowireShorthand(class_name.clone());
            }
        }

        if arr.is_sequential(2) {
            if let (Some(Value::String(class_name)), Some(Value::Array(extra))) =
                (arr.get_index(0), arr.get_index(1))
            {
                if self.classes.contains(class_name) {
                    return Shape::InstanceShorthand {
                        class_name: class_name.clone(),
                        extra: extra.clone(),
                    };
                }
            }
        }

        Shape::Ambiguous(arr)
    }

    /// Normalise any configuration value into a recipe.
    pub fn convert_to_recipe(&self, value: Value) -> AirResult<RecipeRef> {
        match self.classify(value) {
            Shape::Recipe(r) => Ok(r),
            Shape::Callable(c) => Ok(recipe::singleton(recipe::builder(c, Array::new()))),
            Shape::Descriptor(arr) => self.make_recipe(arr),
            Shape::AutowireShorthand(class_name) => {
                Ok(recipe::autowire(class_name, Array::new(), false))
            }
            Shape::InstanceShorthand { class_name, extra } => Ok(recipe::instance(
                class_name,
                self.map_array_value_to_recipe(extra)?,
            )),
            Shape::Ambiguous(arr) => {
                warn!(
                    entries = arr.len(),
                    "array should be wrapped with Configurator::value"
                );
                Ok(recipe::value(arr))
            }
            Shape::Literal(v) => Ok(recipe::value(v)),
        }
    }

    /// Normalise each value of a parameter bag.
    ///
    /// Values that normalise to a fixed value are stored as plain literals;
    /// everything else is kept as a recipe to be resolved by the consumer.
    pub fn map_array_value_to_recipe(&self, arr: Array) -> AirResult<Array> {
        let mut result = Array::new();
        for (key, value) in arr {
            let recipe = self.convert_to_recipe(value)?;
            match recipe.fixed_value() {
                Some(literal) => result.insert(key, literal.clone()),
                None => result.insert(key, Value::Recipe(recipe)),
            };
        }
        Ok(result)
    }

    /// Build the recipe described by an explicit `$` descriptor.
    ///
    /// Explicit parameter arrays are normalised like parameter bags, so
    /// they may hold descriptors. Callables meant as arguments must be
    /// wrapped with [`Configurator::value`].
    pub fn make_recipe(&self, mut descriptor: Array) -> AirResult<RecipeRef> {
        let kind = match descriptor.remove(&Key::from(DISCRIMINATOR)) {
            Some(Value::String(kind)) => kind,
            _ => return Err(AirError::config("cannot understand given recipe")),
        };
        let decorators = descriptor.remove(&Key::from(DECORATOR_KEY));
        let mut args = descriptor.positional().cloned().collect::<Vec<_>>().into_iter();

        let recipe = match kind.as_str() {
            "alias" => recipe::alias(string_arg(&kind, "key", args.next())?),
            "autowire" => {
                let class_name = match args.next() {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s),
                    other => return Err(bad_arg(&kind, "classname", "a string or null", other.as_ref())),
                };
                let extra = self.map_array_value_to_recipe(array_arg(&kind, "extra", args.next())?)?;
                let cached = bool_arg(&kind, "cached", args.next(), true)?;
                match class_name {
                    Some(class_name) => recipe::autowire(class_name, extra, cached),
                    None => recipe::autowire_entry(extra, cached),
                }
            }
            "instance" => {
                let class_name = string_arg(&kind, "classname", args.next())?;
                let extra = self.map_array_value_to_recipe(array_arg(&kind, "extra", args.next())?)?;
                recipe::instance(class_name, extra)
            }
            "builder" => {
                let builder = match args.next() {
                    Some(Value::Callable(c)) => c,
                    other => return Err(bad_arg(&kind, "builder", "callable", other.as_ref())),
                };
                let extra = self.map_array_value_to_recipe(array_arg(&kind, "extra", args.next())?)?;
                recipe::builder(builder, extra)
            }
            "value" => match args.next() {
                Some(v) => recipe::value(v),
                None => return Err(bad_arg(&kind, "value", "a value", None)),
            },
            _ => {
                return Err(AirError::config(format!(
                    "cannot understand given recipe [{kind}]"
                )))
            }
        };

        match decorators {
            Some(Value::Array(decorators)) if !decorators.is_empty() => {
                Self::wrap_recipe_with_decorators(decorators, recipe)
            }
            Some(other) if !other.is_empty() => Err(AirError::config(format!(
                "recipe decorators must be an array, got {}",
                other.type_name()
            ))),
            _ => Ok(recipe),
        }
    }

    /// Apply decorators in mapping order; the last one ends up outermost.
    pub fn wrap_recipe_with_decorators(decorators: Array, recipe: RecipeRef) -> AirResult<RecipeRef> {
        let mut recipe = recipe;
        for (name, option) in decorators {
            recipe = apply_decorator(&name.to_string(), recipe, option)?;
        }
        Ok(recipe)
    }

    /// Join key parts with `::`.
    #[must_use]
    pub fn join<I, S>(parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<S> = parts.into_iter().collect();
        let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
        parts.join(SEPARATOR)
    }

    /// Descriptor aliasing another entry; multiple parts are joined.
    #[must_use]
    pub fn alias<I, S>(parts: I) -> Array
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        descriptor("alias").with_item(Self::join(parts))
    }

    /// Descriptor autowiring `class_name`.
    ///
    /// `cached` stores the instance under the class name after the first
    /// resolution.
    #[must_use]
    pub fn produce(class_name: &str, extra: Array, cached: bool) -> Array {
        descriptor("autowire")
            .with_item(class_name)
            .with_item(extra)
            .with_item(cached)
    }

    /// Descriptor autowiring the class named by the entry's own key.
    ///
    /// `extra` supplies explicit parameters; the rest come from the
    /// container. The instance is cached under the key.
    #[must_use]
    pub fn provide_parameter(extra: Array) -> Array {
        descriptor("autowire")
            .with_item(Value::Null)
            .with_item(extra)
            .with_item(true)
    }

    /// Descriptor instantiating `class_name` on every resolution
    #[must_use]
    pub fn instance(class_name: &str, extra: Array) -> Array {
        descriptor("instance").with_item(class_name).with_item(extra)
    }

    /// Descriptor invoking a builder callable
    #[must_use]
    pub fn builder(builder: Callable, extra: Array) -> Array {
        descriptor("builder").with_item(builder).with_item(extra)
    }

    /// Descriptor for a literal. Arrays meant as data should always be wrapped.
    #[must_use]
    pub fn value<V: Into<Value>>(value: V) -> Array {
        descriptor("value").with_item(value)
    }

    /// Descriptor for a singleton instance of `class_name`
    #[must_use]
    pub fn singleton(class_name: &str, extra: Array) -> Array {
        Self::decorate_singleton(Self::instance(class_name, extra))
    }

    /// Add the singleton decorator to a descriptor
    #[must_use]
    pub fn decorate_singleton(config: Array) -> Array {
        Self::decorate(config, "singleton", true)
    }

    /// Add the callback decorator to a descriptor
    #[must_use]
    pub fn decorate_callback(config: Array, callback: Callable) -> Array {
        Self::decorate(config, "callback", callback)
    }

    /// Add the decorator registered as `name` with `option`.
    #[must_use]
    pub fn decorate<V: Into<Value>>(mut config: Array, name: &str, option: V) -> Array {
        let mut decorators = match config.remove(&Key::from(DECORATOR_KEY)) {
            Some(Value::Array(existing)) => existing,
            _ => Array::new(),
        };
        decorators.insert(name, option);
        config.insert(DECORATOR_KEY, decorators);
        config
    }
}

fn store(container: &Container, key: String, entry: Entry) {
    match entry {
        Entry::Literal(value) => container.set(key, value),
        Entry::ParameterBag(bag) => container.set(key, Value::Array(bag)),
        Entry::Definition(recipe) => {
            container.flush(&key);
            container.define(key, recipe);
        }
    }
}

fn descriptor(kind: &str) -> Array {
    Array::new().with(DISCRIMINATOR, kind)
}

fn bad_arg(kind: &str, name: &str, expected: &str, found: Option<&Value>) -> AirError {
    AirError::config(format!(
        "{kind} recipe: argument ${name} must be {expected}, got {}",
        found.map_or("nothing", Value::type_name)
    ))
}

fn string_arg(kind: &str, name: &str, arg: Option<Value>) -> AirResult<String> {
    match arg {
        Some(Value::String(s)) => Ok(s),
        other => Err(bad_arg(kind, name, "a string", other.as_ref())),
    }
}

fn array_arg(kind: &str, name: &str, arg: Option<Value>) -> AirResult<Array> {
    match arg {
        None | Some(Value::Null) => Ok(Array::new()),
        Some(Value::Array(arr)) => Ok(arr),
        other => Err(bad_arg(kind, name, "an array", other.as_ref())),
    }
}

fn bool_arg(kind: &str, name: &str, arg: Option<Value>, default: bool) -> AirResult<bool> {
    match arg {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(b),
        other => Err(bad_arg(kind, name, "a bool", other.as_ref())),
    }
}
