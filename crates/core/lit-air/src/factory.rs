//! Construction of classes and invocation of callables with injected parameters.

use crate::{
    callable::{Callable, Param},
    configurator::Configurator,
    container::Container,
    error::{AirError, AirResult},
    value::{Array, Key, Value},
};
use tracing::{debug, trace};

/// Builds instances and calls functions against a container.
///
/// Each parameter slot is filled from the first source that has it:
///
/// 1. explicit argument by name, then by type, then by position
/// 2. the owning class's parameter bag (`Owner::`), by name then by type
/// 3. the container entry `Owner::name`
/// 4. the container entry named by the slot's type, or an autowired instance
///    of that type when it is a registered class
/// 5. the slot's default
///
/// Values that are recipes are resolved when they are picked.
/// [`Factory::construct`] only uses steps 1 and 5.
#[derive(Debug, Clone, Copy)]
pub struct Factory<'c> {
    container: &'c Container,
}

impl<'c> Factory<'c> {
    /// Factory bound to `container`
    #[must_use]
    pub fn of(container: &'c Container) -> Self {
        Self { container }
    }

    /// Construct a new instance of `class_name`.
    pub fn instantiate(&self, class_name: &str, extra: &Array) -> AirResult<Value> {
        let class = self
            .container
            .classes()
            .get(class_name)
            .ok_or_else(|| AirError::class_not_found(class_name))?;

        let _guard = self.container.enter(format!("new {class_name}"))?;
        let args = self.resolve_params(class_name, Some(class_name), class.params(), extra)?;
        trace!(class = class_name, "instantiating");
        class.constructor().call(args)
    }

    /// Construct `class_name` from explicit arguments and slot defaults only.
    pub fn construct(&self, class_name: &str, extra: &Array) -> AirResult<Value> {
        let class = self
            .container
            .classes()
            .get(class_name)
            .ok_or_else(|| AirError::class_not_found(class_name))?;

        let _guard = self.container.enter(format!("new {class_name}"))?;
        let args = class
            .params()
            .iter()
            .enumerate()
            .map(|(index, param)| match lookup(extra, param, Some(index)) {
                Some(value) => self.materialize(value),
                None => param
                    .default
                    .clone()
                    .ok_or_else(|| AirError::missing_parameter(class_name, &param.name)),
            })
            .collect::<AirResult<Vec<_>>>()?;
        trace!(class = class_name, "constructing");
        class.constructor().call(args)
    }

    /// Construct `class_name`, reusing and storing the instance when `cached`.
    ///
    /// A cached lookup returns whatever the container holds under the class
    /// name, definitions included. Only an absent class name is instantiated
    /// and stored as a materialised value.
    pub fn produce(&self, class_name: &str, extra: &Array, cached: bool) -> AirResult<Value> {
        if cached && self.container.has(class_name) {
            return self.container.get(class_name);
        }

        let instance = self.instantiate(class_name, extra)?;
        if cached {
            self.cache(class_name, &instance);
        }
        Ok(instance)
    }

    /// Store `instance` as the materialised value of `class_name`.
    pub(crate) fn cache(&self, class_name: &str, instance: &Value) {
        debug!(class = class_name, "caching produced instance");
        self.container.set(class_name, instance.clone());
    }

    /// Call `callable` with its parameters resolved.
    pub fn invoke(&self, callable: &Callable, extra: &Array) -> AirResult<Value> {
        let args = self.resolve_params(callable.name(), None, callable.params(), extra)?;
        callable.call(args)
    }

    fn resolve_params(
        &self,
        label: &str,
        owner: Option<&str>,
        params: &[Param],
        extra: &Array,
    ) -> AirResult<Vec<Value>> {
        params
            .iter()
            .enumerate()
            .map(|(index, param)| self.resolve_param(label, owner, index, param, extra))
            .collect()
    }

    fn resolve_param(
        &self,
        label: &str,
        owner: Option<&str>,
        index: usize,
        param: &Param,
        extra: &Array,
    ) -> AirResult<Value> {
        if let Some(value) = lookup(extra, param, Some(index)) {
            return self.materialize(value);
        }

        if let Some(owner) = owner {
            let bag_key = Configurator::join([owner, ""]);
            if self.container.has(&bag_key) {
                if let Value::Array(bag) = self.container.get(&bag_key)? {
                    if let Some(value) = lookup(&bag, param, None) {
                        return self.materialize(value);
                    }
                }
            }

            let entry_key = Configurator::join([owner, param.name.as_str()]);
            if self.container.has(&entry_key) {
                return self.container.get(&entry_key);
            }
        }

        if let Some(type_name) = &param.type_name {
            if self.container.has(type_name) {
                return self.container.get(type_name);
            }
            if self.container.classes().contains(type_name) {
                return self.produce(type_name, &Array::new(), true);
            }
        }

        if let Some(default) = &param.default {
            return Ok(default.clone());
        }

        Err(AirError::missing_parameter(label, &param.name))
    }

    fn materialize(&self, value: &Value) -> AirResult<Value> {
        match value {
            Value::Recipe(recipe) => recipe.resolve(self.container, None),
            other => Ok(other.clone()),
        }
    }
}

fn lookup<'a>(source: &'a Array, param: &Param, index: Option<usize>) -> Option<&'a Value> {
    source
        .get(&Key::from(param.name.as_str()))
        .or_else(|| {
            param
                .type_name
                .as_ref()
                .and_then(|t| source.get(&Key::from(t.as_str())))
        })
        .or_else(|| index.and_then(|i| source.get(&Key::from(i))))
}
