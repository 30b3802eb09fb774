//! # Lit Air
//!
//! A recipe-based dependency injection container.
//!
//! Configuration is a plain ordered mapping. The [`Configurator`] turns each
//! entry into either a literal, stored directly, or a [`Recipe`] that the
//! [`Container`] resolves lazily on first access. Recipes can be wrapped by
//! decorators, such as singleton caching or callback post-processing.
//!
//! ## Features
//!
//! - **Recipes**: value, alias, autowire, instance and builder
//! - **Decorators**: `singleton`, `callback`, plus user decorators registered by name
//! - **Autowiring**: constructor parameters filled by name, type or class parameter bag
//! - **Scopes**: child containers falling back to their parent
//! - **Cycle detection**: circular definitions fail with the resolution chain
//! - **Configuration files**: JSON and TOML sources
//!
//! ## Quick Start
//!
//! ```rust
//! use lit_air::{Array, ClassRegistry, Configurator as C, Container, Param, Value};
//! use std::sync::Arc;
//!
//! struct Mailer {
//!     host: String,
//! }
//!
//! let classes = Arc::new(ClassRegistry::new());
//! classes.define("Mailer", vec![Param::new("host")], |args| {
//!     let host = args[0].as_str().unwrap_or_default().to_string();
//!     Ok(Value::object(Mailer { host }))
//! });
//!
//! let config = Array::new()
//!     .with("smtp.host", "mail.local")
//!     .with("Mailer::", Array::new().with("host", C::alias(["smtp.host"])))
//!     .with("mailer", C::decorate_singleton(C::produce("Mailer", Array::new(), false)));
//! let container = Container::from_config(classes, config)?;
//!
//! let mailer = container.get("mailer")?;
//! assert_eq!(mailer.downcast_ref::<Mailer>().map(|m| m.host.as_str()), Some("mail.local"));
//! assert!(mailer.same(&container.get("mailer")?));
//! # Ok::<(), lit_air::AirError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod callable;
pub mod class;
pub mod config;
pub mod configurator;
pub mod container;
pub mod error;
pub mod factory;
pub mod recipe;
pub mod stub;
pub mod value;

// Re-export commonly used items
pub use callable::{Callable, Param};
pub use class::{ClassDef, ClassRegistry};
pub use config::{ConfigFormat, ConfigLoader, ConfigSource, EnvConfigSource, FileConfigSource};
pub use configurator::{Configurator, Shape};
pub use container::Container;
pub use error::{AirError, AirResult};
pub use factory::Factory;
pub use recipe::{
    register_decorator, CallbackDecorator, Recipe, RecipeDecorator, RecipeKind, RecipeRef,
    SingletonDecorator,
};
pub use stub::ContainerStub;
pub use value::{Array, Key, Value};

/// Version information for the Lit Air library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the Lit Air library
pub const NAME: &str = env!("CARGO_PKG_NAME");
