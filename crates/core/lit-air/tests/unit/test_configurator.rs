//! Unit tests for configuration normalisation

use crate::utils::*;
use lit_air::{
    recipe::{AutowireRecipe, InstanceRecipe},
    Array, Configurator as C, Container, RecipeKind, Shape, Value,
};

fn configurator() -> C {
    C::new(app_classes())
}

#[test]
fn test_single_class_name_is_uncached_autowire() {
    let recipe = configurator()
        .convert_to_recipe(Array::list(["Logger"]).into())
        .unwrap();
    assert_eq!(recipe.kind(), RecipeKind::Autowire);

    let container = Container::with_classes(app_classes());
    let first = recipe.resolve(&container, None).unwrap();
    let second = recipe.resolve(&container, None).unwrap();
    assert!(!first.same(&second));
    assert!(container.local_value("Logger").is_none());
}

#[test]
fn test_class_with_params_is_instance() {
    let value: Value = Array::new()
        .with_item("Logger")
        .with_item(Array::new().with("prefix", "x"))
        .into();

    match configurator().classify(value.clone()) {
        Shape::InstanceShorthand { class_name, extra } => {
            assert_eq!(class_name, "Logger");
            assert_eq!(extra.get_named("prefix"), Some(&Value::from("x")));
        }
        other => panic!("expected instance shorthand, got {other:?}"),
    }

    let recipe = configurator().convert_to_recipe(value).unwrap();
    assert_eq!(recipe.kind(), RecipeKind::Instance);
    let logger = recipe
        .resolve(&Container::with_classes(app_classes()), None)
        .unwrap();
    assert_eq!(logger.downcast_ref::<Logger>().unwrap().prefix, "x");
}

#[test]
fn test_plain_list_becomes_literal_with_warning() {
    let list = Array::list([1, 2, 3]);
    let (recipe, events) = capture_events(|| {
        configurator()
            .convert_to_recipe(list.clone().into())
            .unwrap()
    });

    assert_eq!(recipe.fixed_value(), Some(&Value::from(list)));
    let warnings = events.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Configurator::value"));
}

#[test]
fn test_wrapped_list_does_not_warn() {
    let (recipe, events) = capture_events(|| {
        configurator()
            .convert_to_recipe(C::value(Array::list([1, 2, 3])).into())
            .unwrap()
    });

    assert_eq!(recipe.kind(), RecipeKind::Value);
    assert!(events.warnings().is_empty());
}

#[test]
fn test_descriptor_wins_over_shorthand() {
    // `["Logger"]` plus a discriminator is a descriptor, not autowire shorthand
    let descriptor = C::value("Logger");
    let recipe = configurator().convert_to_recipe(descriptor.into()).unwrap();
    assert_eq!(recipe.fixed_value(), Some(&Value::from("Logger")));
}

#[test]
fn test_recipes_pass_through_unchanged() {
    let original = lit_air::recipe::alias("somewhere");
    let recipe = configurator()
        .convert_to_recipe(Value::Recipe(original.clone()))
        .unwrap();
    assert!(std::sync::Arc::ptr_eq(&original, &recipe));
}

#[test]
fn test_typed_recipe_accessors() {
    let autowire = AutowireRecipe::new("Logger", Array::new(), false);
    assert_eq!(autowire.class_name(), Some("Logger"));
    assert_eq!(AutowireRecipe::for_entry(Array::new(), true).class_name(), None);
    assert!(!autowire.is_cached());

    let instance = InstanceRecipe::new("Logger", Array::new().with("prefix", "p"));
    assert_eq!(instance.extra().len(), 1);
}

#[test]
fn test_join_builds_compound_keys() {
    assert_eq!(C::join(["Foo", "bar"]), "Foo::bar");
    let alias = C::alias(["Foo", "bar"]);
    assert_eq!(alias.get_index(0), Some(&Value::from("Foo::bar")));
}

#[test]
fn test_property_bag_requires_array() {
    let container = Container::with_classes(app_classes());
    let err = container
        .configure(
            Array::new().with("Logger::", lit_air::Callable::nullary(|| Ok(Value::Null))),
            true,
        )
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert!(!container.has("Logger::"));
}

#[test]
fn test_scalar_under_bag_key_is_stored_directly() {
    let container = Container::with_classes(app_classes());
    container
        .configure(Array::new().with("Logger::", "plain"), true)
        .unwrap();
    assert_eq!(container.get("Logger::").unwrap(), Value::from("plain"));
}

#[test]
fn test_unknown_class_bag_is_a_plain_entry() {
    let container = Container::with_classes(app_classes());
    container
        .configure(
            Array::new().with("Unknown::", C::value(Array::new().with("a", 1))),
            true,
        )
        .unwrap();
    let stored = container.get("Unknown::").unwrap();
    assert_eq!(stored.as_array().unwrap().get_named("a"), Some(&Value::from(1)));
}

#[test]
fn test_provide_parameter_descriptor_has_no_class() {
    let descriptor = C::provide_parameter(Array::new().with("prefix", "p"));
    assert_eq!(descriptor.get_index(0), Some(&Value::Null));
    assert_eq!(descriptor.get_index(2), Some(&Value::from(true)));

    let recipe = configurator().convert_to_recipe(descriptor.into()).unwrap();
    assert_eq!(recipe.kind(), RecipeKind::Autowire);

    let container = Container::with_classes(app_classes());
    container.define("Logger", recipe);
    let logger = container.get("Logger").unwrap();
    assert_eq!(logger.downcast_ref::<Logger>().unwrap().prefix, "p");
    assert!(container.local_value("Logger").is_some());
}

#[test]
fn test_explicit_parameters_may_hold_descriptors() {
    let container = Container::with_classes(app_classes());
    container
        .configure(
            Array::new()
                .with("log.prefix", "from-alias")
                .with(
                    "logger",
                    C::instance("Logger", Array::new().with("prefix", C::alias(["log.prefix"]))),
                ),
            true,
        )
        .unwrap();

    let logger = container.get("logger").unwrap();
    assert_eq!(logger.downcast_ref::<Logger>().unwrap().prefix, "from-alias");
}
