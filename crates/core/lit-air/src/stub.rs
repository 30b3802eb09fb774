//! Deferred instantiation handles.

use crate::{
    class::ClassRegistry,
    container::Container,
    error::AirResult,
    factory::Factory,
    value::{Array, Value},
};

/// A class name plus default parameters, instantiated on demand.
///
/// Handy wherever configuration names "something to construct later", such
/// as handler tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStub {
    class_name: String,
    extra: Array,
}

impl ContainerStub {
    /// Stub for `class_name` with default parameters `extra`
    pub fn of<S: Into<String>>(class_name: S, extra: Array) -> Self {
        Self {
            class_name: class_name.into(),
            extra,
        }
    }

    /// Recognise `"ClassName"` or `["ClassName", {params}]` for a registered class.
    #[must_use]
    pub fn try_parse(value: &Value, classes: &ClassRegistry) -> Option<Self> {
        match value {
            Value::String(class_name) if classes.contains(class_name) => {
                Some(Self::of(class_name.as_str(), Array::new()))
            }
            Value::Array(arr) if arr.is_sequential(2) => match (arr.get_index(0), arr.get_index(1)) {
                (Some(Value::String(class_name)), Some(Value::Array(extra)))
                    if classes.contains(class_name) =>
                {
                    Some(Self::of(class_name.as_str(), extra.clone()))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Class this stub constructs
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Default parameters
    #[must_use]
    pub fn extra(&self) -> &Array {
        &self.extra
    }

    /// Construct a new instance; entries of `extra` override the stub's own.
    pub fn instantiate_from(&self, container: &Container, extra: Array) -> AirResult<Value> {
        let mut params = extra;
        params.merge_missing(&self.extra);
        Factory::of(container).instantiate(&self.class_name, &params)
    }
}
