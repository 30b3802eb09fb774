//! Integration tests for file-based configuration

use crate::utils::*;
use lit_air::{
    AirError, ConfigFormat, ConfigLoader, ConfigSource, Container, FileConfigSource, Value,
};

#[test]
fn test_object_graph_from_json_file() {
    init_test_logging();
    let dir = ConfigDir::new();
    let path = dir.write("app.json", APP_CONFIG_JSON);

    let container = Container::with_classes(app_classes());
    ConfigLoader::new()
        .add_source(FileConfigSource::auto_detect(&path).unwrap())
        .apply(&container)
        .unwrap();

    let users = container.get("users").unwrap();
    let repo = users.downcast_ref::<UserRepository>().unwrap();
    assert_eq!(repo.table, "people");
    assert_eq!(repo.db.dsn, "sqlite::memory:");
    assert_eq!(repo.db.logger.prefix, "json");
    assert!(users.same(&container.get("users").unwrap()));

    // autowire with cached = false does not persist the repository itself
    assert!(container.local_value("UserRepository").is_none());
}

#[cfg(feature = "config")]
#[test]
fn test_toml_overrides_json() {
    let dir = ConfigDir::new();
    let json = dir.write("base.json", APP_CONFIG_JSON);
    let toml = dir.write(
        "local.toml",
        r#"
"db.dsn" = "postgres://local"

["Logger::"]
prefix = "toml"
"#,
    );

    let loader = ConfigLoader::new()
        .add_source(FileConfigSource::auto_detect(&json).unwrap())
        .add_source(FileConfigSource::new(&toml, ConfigFormat::Toml));
    let merged = loader.load().unwrap();
    let keys: Vec<String> = merged.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["db.dsn", "Database::", "Logger::", "users"]);

    let container = Container::with_classes(app_classes());
    loader.apply(&container).unwrap();

    let users = container.get("users").unwrap();
    let repo = users.downcast_ref::<UserRepository>().unwrap();
    assert_eq!(repo.db.dsn, "postgres://local");
    assert_eq!(repo.db.logger.prefix, "toml");
}

#[test]
fn test_defaults_do_not_clobber_application_setup() {
    let dir = ConfigDir::new();
    let path = dir.write("defaults.json", r#"{ "db.dsn": "default", "debug": false }"#);

    let container = Container::new();
    container.set("db.dsn", Value::from("from-app"));
    ConfigLoader::new()
        .force(false)
        .add_source(FileConfigSource::new(&path, ConfigFormat::Json))
        .apply(&container)
        .unwrap();

    assert_eq!(container.get("db.dsn").unwrap(), Value::from("from-app"));
    assert_eq!(container.get("debug").unwrap(), Value::from(false));
}

#[test]
fn test_bad_descriptor_in_file_is_reported() {
    let dir = ConfigDir::new();
    let path = dir.write(
        "broken.json",
        r#"{ "fine": 1, "broken": { "$": "teleport", "0": "x" } }"#,
    );

    let container = Container::new();
    let err = ConfigLoader::new()
        .add_source(FileConfigSource::new(&path, ConfigFormat::Json))
        .apply(&container)
        .unwrap_err();

    assert!(matches!(err, AirError::Configuration(ref msg) if msg.contains("[teleport]")));
    assert!(!container.has("fine"));
}

#[test]
fn test_missing_file_names_the_source() {
    let source = FileConfigSource::new("/no/such/config.json", ConfigFormat::Json);
    assert_eq!(source.source_name(), "/no/such/config.json");

    let err = ConfigLoader::new().add_source(source).load().unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("/no/such/config.json"));
}

#[test]
fn test_json_autowire_without_class_uses_entry_key() {
    let dir = ConfigDir::new();
    let path = dir.write(
        "logger.json",
        r#"{ "Logger": { "$": "autowire", "0": null, "1": { "prefix": "keyed" } } }"#,
    );

    let container = Container::with_classes(app_classes());
    ConfigLoader::new()
        .add_source(FileConfigSource::auto_detect(&path).unwrap())
        .apply(&container)
        .unwrap();

    let logger = container.get("Logger").unwrap();
    assert_eq!(logger.downcast_ref::<Logger>().unwrap().prefix, "keyed");
    assert!(logger.same(&container.get("Logger").unwrap()));
}
