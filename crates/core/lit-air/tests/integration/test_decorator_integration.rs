//! Integration tests for decorator composition

use crate::utils::*;
use lit_air::{
    recipe, register_decorator, AirResult, Array, Configurator as C, Container, Recipe,
    RecipeDecorator, RecipeKind, RecipeRef, Value,
};

fn resolve_twice(descriptor: Array) -> (Value, Value) {
    let container = Container::new();
    container
        .configure(Array::new().with("service", descriptor), true)
        .unwrap();
    (
        container.get("service").unwrap(),
        container.get("service").unwrap(),
    )
}

#[test]
fn test_callback_outside_singleton_runs_every_time() {
    let mut source = MockSource::new();
    source.expect_produce().times(1).return_const(10_i64);
    let mut transformer = MockTransformer::new();
    transformer.expect_apply().times(2).returning(|x| x + 1);

    let descriptor = C::decorate_callback(
        C::decorate_singleton(C::builder(source_callable(source), Array::new())),
        transform_callable(transformer),
    );
    let (first, second) = resolve_twice(descriptor);

    assert_eq!(first, Value::from(11));
    assert_eq!(second, Value::from(11));
}

#[test]
fn test_singleton_outside_callback_runs_once() {
    let mut source = MockSource::new();
    source.expect_produce().times(1).return_const(10_i64);
    let mut transformer = MockTransformer::new();
    transformer.expect_apply().times(1).returning(|x| x * 2);

    let descriptor = C::decorate_singleton(C::decorate_callback(
        C::builder(source_callable(source), Array::new()),
        transform_callable(transformer),
    ));
    let (first, second) = resolve_twice(descriptor);

    assert_eq!(first, Value::from(20));
    assert_eq!(second, Value::from(20));
}

#[test]
fn test_singleton_is_per_definition() {
    let (builder, _) = counting_callable();
    let container = Container::new();
    container
        .configure(
            Array::new()
                .with("one", C::decorate_singleton(C::builder(builder.clone(), Array::new())))
                .with("two", C::decorate_singleton(C::builder(builder, Array::new()))),
            true,
        )
        .unwrap();

    assert_eq!(container.get("one").unwrap(), Value::from(1));
    assert_eq!(container.get("two").unwrap(), Value::from(2));
    assert_eq!(container.get("one").unwrap(), Value::from(1));
}

#[test]
fn test_callback_receives_injected_parameters() {
    let container = Container::new();
    let suffix = lit_air::Callable::new(
        vec![
            lit_air::Param::new("value"),
            lit_air::Param::typed("separator", "separator"),
        ],
        |args| {
            Ok(Value::from(format!(
                "{}{}end",
                args[0].as_str().unwrap_or_default(),
                args[1].as_str().unwrap_or_default()
            )))
        },
    );
    container
        .configure(
            Array::new()
                .with("separator", "-")
                .with("word", C::decorate_callback(C::value("start"), suffix)),
            true,
        )
        .unwrap();

    assert_eq!(container.get("word").unwrap(), Value::from("start-end"));
}

struct Doubled {
    recipe: RecipeRef,
    factor: i64,
}

impl RecipeDecorator for Doubled {
    fn decorate(recipe: RecipeRef) -> Self {
        Self { recipe, factor: 2 }
    }

    fn set_option(&mut self, option: Value) -> AirResult<()> {
        self.factor = option.as_integer().unwrap_or(2);
        Ok(())
    }
}

impl Recipe for Doubled {
    fn resolve(&self, container: &Container, id: Option<&str>) -> AirResult<Value> {
        let inner = self.recipe.resolve(container, id)?;
        Ok(Value::from(inner.as_integer().unwrap_or_default() * self.factor))
    }
}

#[test]
fn test_registered_decorator_is_available_to_configuration() {
    register_decorator::<Doubled>("integration_multiply").unwrap();
    assert!(lit_air::recipe::decorator_names().contains(&"integration_multiply".to_string()));

    let (builder, _) = counting_callable();
    let container = Container::new();
    container
        .configure(
            Array::new()
                .with("default", C::decorate(C::builder(builder.clone(), Array::new()), "integration_multiply", Value::Null))
                .with("tripled", C::decorate(C::builder(builder, Array::new()), "integration_multiply", 3)),
            true,
        )
        .unwrap();

    assert_eq!(container.definition("default").unwrap().kind(), RecipeKind::Custom);
    assert_eq!(container.get("default").unwrap(), Value::from(2));
    assert_eq!(container.get("tripled").unwrap(), Value::from(6));
}

#[test]
fn test_decorators_wrap_recipes_directly() {
    let wrapped = C::wrap_recipe_with_decorators(
        Array::new().with("singleton", true),
        recipe::value(5),
    )
    .unwrap();
    assert_eq!(wrapped.kind(), RecipeKind::Singleton);
    assert_eq!(wrapped.resolve(&Container::new(), None).unwrap(), Value::from(5));
}
