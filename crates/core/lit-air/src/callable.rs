//! Callables with explicit parameter metadata.
//!
//! Constructors and builder functions declare their parameters up front as a
//! list of [`Param`] slots. The [`Factory`](crate::Factory) fills each slot
//! from explicit arguments or from the container before invoking the function.

use crate::{error::AirResult, value::Value};
use std::fmt;
use std::sync::Arc;

/// A declared parameter slot: name, optional type key, optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name, matched against named arguments and `Owner::name` keys
    pub name: String,
    /// Container key of the parameter's type (usually a class name)
    pub type_name: Option<String>,
    /// Value used when nothing else supplies the parameter
    pub default: Option<Value>,
}

impl Param {
    /// An untyped parameter without default
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            default: None,
        }
    }

    /// A parameter whose type is looked up in the container
    pub fn typed<S: Into<String>, T: Into<String>>(name: S, type_name: T) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            default: None,
        }
    }

    /// Attach a default value
    #[must_use]
    pub fn with_default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Check if the slot can fall back to a default
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

type CallableFn = dyn Fn(Vec<Value>) -> AirResult<Value> + Send + Sync;

/// A shareable function plus its parameter list.
///
/// Clones share the same function; equality is identity.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    params: Arc<[Param]>,
    func: Arc<CallableFn>,
}

impl Callable {
    /// Create a callable receiving one argument per declared parameter
    pub fn new<F>(params: Vec<Param>, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> AirResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from("{closure}"),
            params: params.into(),
            func: Arc::new(func),
        }
    }

    /// Create a callable taking no parameters
    pub fn nullary<F>(func: F) -> Self
    where
        F: Fn() -> AirResult<Value> + Send + Sync + 'static,
    {
        Self::new(Vec::new(), move |_| func())
    }

    /// Give the callable a name for diagnostics
    #[must_use]
    pub fn named<S: AsRef<str>>(mut self, name: S) -> Self {
        self.name = Arc::from(name.as_ref());
        self
    }

    /// Diagnostic name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Invoke with already resolved arguments
    pub fn call(&self, args: Vec<Value>) -> AirResult<Value> {
        (self.func)(args)
    }

    /// Check if both handles share the same function
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
