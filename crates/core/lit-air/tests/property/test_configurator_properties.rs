//! Property-based tests for configuration writes

use crate::utils::generators::*;
use lit_air::{Array, Configurator as C, Container, Value};
use proptest::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_scalar_write_is_read_back_without_recipe(key in arb_key(), value in arb_scalar()) {
            let container = Container::new();
            container.configure(Array::new().with(key.as_str(), value.clone()), true).unwrap();

            prop_assert!(container.definition(&key).is_none());
            prop_assert_eq!(container.get(&key).unwrap(), value);
        }

        #[test]
        fn test_force_false_never_overwrites(
            key in arb_key(),
            first in arb_scalar(),
            second in arb_scalar(),
        ) {
            let container = Container::new();
            container.configure(Array::new().with(key.as_str(), first.clone()), true).unwrap();
            container.configure(Array::new().with(key.as_str(), second.clone()), false).unwrap();
            prop_assert_eq!(container.get(&key).unwrap(), first);

            container.configure(Array::new().with(key.as_str(), second.clone()), true).unwrap();
            prop_assert_eq!(container.get(&key).unwrap(), second);
        }

        #[test]
        fn test_join_uses_separator(owner in arb_identifier(), name in arb_identifier()) {
            let joined = C::join([owner.as_str(), name.as_str()]);
            prop_assert_eq!(&joined, &format!("{owner}::{name}"));

            let descriptor = C::alias([owner.as_str(), name.as_str()]);
            prop_assert_eq!(descriptor.get_index(0), Some(&Value::from(joined)));
        }

        #[test]
        fn test_wrapped_values_are_stored_verbatim(
            key in arb_key(),
            items in prop::collection::vec(arb_scalar(), 0..8),
        ) {
            let list = Array::list(items);
            let container = Container::new();
            container.configure(Array::new().with(key.as_str(), C::value(list.clone())), true).unwrap();

            prop_assert_eq!(container.local_value(&key), Some(Value::from(list)));
        }

        #[test]
        fn test_alias_chain_resolves_to_target(depth in 1usize..12, value in arb_scalar()) {
            let container = Container::new();
            let mut config = Array::new().with("link0", value.clone());
            for i in 1..=depth {
                config.insert(format!("link{i}"), C::alias([format!("link{}", i - 1)]));
            }
            container.configure(config, true).unwrap();

            prop_assert_eq!(container.get(&format!("link{depth}")).unwrap(), value);
        }
    }
}
