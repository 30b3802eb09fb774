//! Sample classes and configuration for lit-air tests

use lit_air::{AirError, AirResult, Array, ClassRegistry, Configurator as C, Param, Value};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct Logger {
    pub prefix: String,
}

#[derive(Debug)]
pub struct Database {
    pub dsn: String,
    pub logger: Arc<Logger>,
}

#[derive(Debug)]
pub struct UserRepository {
    pub db: Arc<Database>,
    pub table: String,
}

fn object_arg<T: Any + Send + Sync>(args: &[Value], index: usize, class: &str) -> AirResult<Arc<T>> {
    let arg = args.get(index);
    arg.and_then(Value::downcast::<T>).ok_or_else(|| {
        AirError::type_mismatch(class, arg.map_or("nothing", Value::type_name))
    })
}

fn string_arg(args: &[Value], index: usize) -> String {
    args.get(index)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Logger <- Database <- UserRepository
pub fn app_classes() -> Arc<ClassRegistry> {
    let classes = Arc::new(ClassRegistry::new());
    classes.define("Logger", vec![Param::new("prefix").with_default("app")], |args| {
        Ok(Value::object(Logger {
            prefix: string_arg(&args, 0),
        }))
    });
    classes.define(
        "Database",
        vec![Param::new("dsn"), Param::typed("logger", "Logger")],
        |args| {
            Ok(Value::object(Database {
                dsn: string_arg(&args, 0),
                logger: object_arg(&args, 1, "Logger")?,
            }))
        },
    );
    classes.define(
        "UserRepository",
        vec![
            Param::typed("db", "Database"),
            Param::new("table").with_default("users"),
        ],
        |args| {
            Ok(Value::object(UserRepository {
                db: object_arg(&args, 0, "Database")?,
                table: string_arg(&args, 1),
            }))
        },
    );
    classes
}

/// Configuration wiring the sample classes together
pub fn app_config() -> Array {
    Array::new()
        .with("db.dsn", "sqlite::memory:")
        .with("Database::", Array::new().with("dsn", C::alias(["db.dsn"])))
        .with("Logger::", Array::new().with("prefix", "test"))
        .with(
            "users",
            C::decorate_singleton(C::produce("UserRepository", Array::new(), false)),
        )
        .with("users.alias", C::alias(["users"]))
}

/// The same wiring as [`app_config`], as a JSON document
pub const APP_CONFIG_JSON: &str = r#"{
    "db.dsn": "sqlite::memory:",
    "Database::": { "dsn": { "$": "alias", "0": "db.dsn" } },
    "Logger::": { "prefix": "json" },
    "users": {
        "$": "autowire",
        "0": "UserRepository",
        "1": { "table": "people" },
        "2": false,
        "decorator": { "singleton": true }
    }
}"#;
