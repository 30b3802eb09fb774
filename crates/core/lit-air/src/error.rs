//! Error handling types for the container, recipes and configurator.
//!
//! Errors fall into two families. Configuration errors are raised while a
//! configuration mapping is being turned into recipes and are never deferred.
//! Resolution errors surface from `Container::get` once a lazy definition is
//! actually materialised.

use std::fmt;
use thiserror::Error;

/// The main error type for the Air container.
#[derive(Error, Debug)]
pub enum AirError {
    /// Malformed configuration: unknown recipe discriminator, unknown
    /// decorator, bad descriptor arguments.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No entry with this id exists in the container or any parent scope
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// The class is not registered in the class registry
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// A constructor or callable parameter could not be satisfied
    #[error("Cannot resolve parameter ${parameter} of {owner}")]
    MissingParameter {
        /// Class or callable owning the parameter
        owner: String,
        /// Parameter name
        parameter: String,
    },

    /// Resolution re-entered an id that is still being resolved
    #[error("Circular dependency detected: {}", chain.join(" -> "))]
    CircularDependency {
        /// Resolution frames from the outermost request to the repeated one
        chain: Vec<String>,
    },

    /// A value had a different shape than the consumer required
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the consumer wanted
        expected: String,
        /// What it actually got
        found: String,
    },

    /// I/O errors while reading configuration sources
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse errors while reading configuration sources
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors raised by user constructors, builders and callbacks
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AirError {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Create a new not found error
    pub fn not_found<T: fmt::Display>(id: T) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Create a new class not found error
    pub fn class_not_found<T: fmt::Display>(class: T) -> Self {
        Self::ClassNotFound(class.to_string())
    }

    /// Create a new missing parameter error
    pub fn missing_parameter<T: fmt::Display, U: fmt::Display>(owner: T, parameter: U) -> Self {
        Self::MissingParameter {
            owner: owner.to_string(),
            parameter: parameter.to_string(),
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch<T: fmt::Display, U: fmt::Display>(expected: T, found: U) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<T: fmt::Display>(msg: T) -> Self {
        Self::Serialization(msg.to_string())
    }

    /// Check if this error must abort configuration loading
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Io(_) | Self::Serialization(_))
    }

    /// Check if this error was raised while resolving an entry
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::ClassNotFound(_)
                | Self::MissingParameter { .. }
                | Self::CircularDependency { .. }
                | Self::TypeMismatch { .. }
                | Self::Other(_)
        )
    }
}

/// Result type alias for Air operations
pub type AirResult<T> = Result<T, AirError>;

impl From<serde_json::Error> for AirError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "config")]
impl From<toml::de::Error> for AirError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
