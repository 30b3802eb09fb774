//! Dynamic values stored in and produced by the container.
//!
//! Configuration mappings, constructor arguments and resolved entries all
//! share one value model. [`Array`] is an insertion-ordered map whose keys are
//! either integer positions or names, so a single literal can carry both
//! positional recipe arguments and named options such as the `$`
//! discriminator.

use crate::{callable::Callable, recipe::RecipeRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque shared instance: a constructed object or an external resource handle.
pub type Object = Arc<dyn Any + Send + Sync>;

/// A value held by the container.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Integer(i64),
    /// Float scalar
    Float(f64),
    /// String scalar
    String(String),
    /// Ordered mapping / list
    Array(Array),
    /// Constructed instance or resource handle
    Object(Object),
    /// A function with parameter metadata
    Callable(Callable),
    /// A deferred recipe
    Recipe(RecipeRef),
}

impl Value {
    /// Wrap an arbitrary instance as an opaque object.
    pub fn object<T: Any + Send + Sync>(instance: T) -> Self {
        Self::Object(Arc::new(instance))
    }

    /// Short name of the variant, used in diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Callable(_) => "callable",
            Self::Recipe(_) => "recipe",
        }
    }

    /// Booleans, integers, floats and strings.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Integer(_) | Self::Float(_) | Self::String(_)
        )
    }

    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Emptiness as understood by configuration checks: null, `false`, `0`,
    /// `0.0`, `""`, `"0"` and the empty array are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Integer(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::String(s) => s.is_empty() || s == "0",
            Self::Array(arr) => arr.is_empty(),
            Self::Object(_) | Self::Callable(_) | Self::Recipe(_) => false,
        }
    }

    /// Borrow as string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Read as float, widening integers
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Read as boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Borrow as callable
    #[must_use]
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as recipe
    #[must_use]
    pub fn as_recipe(&self) -> Option<&RecipeRef> {
        match self {
            Self::Recipe(r) => Some(r),
            _ => None,
        }
    }

    /// Get a typed handle to an object value.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(obj) => Arc::clone(obj).downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Borrow an object value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Object(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Same object, callable or recipe instance (or equal scalar data).
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Callable(a), Self::Callable(b)) => a.ptr_eq(b),
            (Self::Recipe(a), Self::Recipe(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(arr) => arr.fmt(f),
            Self::Object(_) => f.write_str("<object>"),
            Self::Callable(c) => write!(f, "<callable {}>", c.name()),
            Self::Recipe(r) => write!(f, "<recipe {:?}>", r.kind()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Self::Array(arr)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Self::Callable(c)
    }
}

impl From<RecipeRef> for Value {
    fn from(r: RecipeRef) -> Self {
        Self::Recipe(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(Array::list(items))
    }
}

/// Key of an [`Array`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Integer position
    Index(i64),
    /// Named entry
    Name(String),
}

impl Key {
    /// Parse a textual key, treating canonical decimal integers as positions.
    ///
    /// `"0"` and `"-3"` become indexes; `"01"`, `"+1"` and `"1.0"` stay names.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(i) if i.to_string() == s => Self::Index(i),
            _ => Self::Name(s.to_string()),
        }
    }

    /// Borrow the name, if this is a named key
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(n) => Some(n),
            Self::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Self::Name(s.clone())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Self::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Self::Index(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

/// Insertion-ordered mapping with integer and named keys.
///
/// [`Array::push`] appends under the next free integer index, one past the
/// largest index inserted so far.
#[derive(Clone, Default)]
pub struct Array {
    entries: IndexMap<Key, Value>,
    next_index: i64,
}

impl Array {
    /// Create an empty array
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list with keys `0..n`
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut arr = Self::new();
        for item in items {
            arr.push(item);
        }
        arr
    }

    /// Append under the next free integer index
    pub fn push<V: Into<Value>>(&mut self, value: V) {
        let key = Key::Index(self.next_index);
        self.insert(key, value);
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn insert<K: Into<Key>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        let key = key.into();
        if let Key::Index(i) = key {
            if i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }
        self.entries.insert(key, value.into())
    }

    /// Builder-style [`Array::insert`]
    #[must_use]
    pub fn with<K: Into<Key>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style [`Array::push`]
    #[must_use]
    pub fn with_item<V: Into<Value>>(mut self, value: V) -> Self {
        self.push(value);
        self
    }

    /// Look up any key
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a positional entry
    #[must_use]
    pub fn get_index(&self, index: i64) -> Option<&Value> {
        self.entries.get(&Key::Index(index))
    }

    /// Look up a named entry
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.entries.get(&Key::Name(name.to_string()))
    }

    /// Check if the key is present
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, preserving the order of the rest
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Values stored under integer keys, in insertion order.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.entries
            .iter()
            .filter(|(k, _)| matches!(k, Key::Index(_)))
            .map(|(_, v)| v)
    }

    /// True when the keys are exactly `0..len`, in that order.
    #[must_use]
    pub fn is_sequential(&self, len: usize) -> bool {
        self.entries.len() == len
            && self
                .entries
                .keys()
                .enumerate()
                .all(|(expected, key)| matches!(key, Key::Index(i) if usize::try_from(*i) == Ok(expected)))
    }

    /// Insert every entry of `other` that is not already present here.
    pub fn merge_missing(&mut self, other: &Array) {
        for (key, value) in other.iter() {
            if !self.contains_key(key) {
                self.insert(key.clone(), value.clone());
            }
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl IntoIterator for Array {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Array {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut arr = Self::new();
        for (k, v) in iter {
            arr.insert(k, v);
        }
        arr
    }
}
