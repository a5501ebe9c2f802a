//! State Representation
//!
//! A store holds snapshots of a state type that knows how to shallow-merge
//! a partial update into itself. Two forms are provided:
//!
//! - Record state declared with [`shallow_state!`](crate::shallow_state),
//!   where the partial is a companion struct of `Option` fields and the
//!   compiler checks every key.
//! - [`StateMap`], an insertion-ordered `String -> serde_json::Value` map
//!   for state whose shape is only known at runtime.
//!
//! In both cases merging produces a new value. The current snapshot is
//! never touched, which is what keeps previously handed-out snapshots valid.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Single-level merge of a partial update into a state value.
pub trait ShallowMerge: Sized {
    /// The partial update accepted by [`merge`](ShallowMerge::merge).
    type Partial;

    /// Produce the next state.
    ///
    /// Top-level fields present in `partial` replace the current ones
    /// wholesale. Fields absent from `partial` are carried over from `self`.
    fn merge(&self, partial: Self::Partial) -> Self;
}

/// Declare a record state type together with its partial update type.
///
/// ```rust
/// use beacon_core::{shallow_state, ShallowMerge};
///
/// shallow_state! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Counter => CounterPatch {
///         pub count: i64,
///         pub label: String,
///     }
/// }
///
/// let state = Counter { count: 0, label: "clicks".into() };
/// let next = state.merge(CounterPatch { count: Some(3), ..Default::default() });
///
/// assert_eq!(next, Counter { count: 3, label: "clicks".into() });
/// assert_eq!(state.count, 0);
/// ```
#[macro_export]
macro_rules! shallow_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $partial:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field: $ty, )*
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`]. `None` keeps the current field.")]
        #[derive(Clone, Default)]
        $vis struct $partial {
            $( $field_vis $field: ::core::option::Option<$ty>, )*
        }

        impl $crate::ShallowMerge for $name {
            type Partial = $partial;

            fn merge(&self, partial: $partial) -> Self {
                Self {
                    $(
                        $field: match partial.$field {
                            ::core::option::Option::Some(value) => value,
                            ::core::option::Option::None => ::core::clone::Clone::clone(&self.$field),
                        },
                    )*
                }
            }
        }
    };
}

/// Key-value state with string keys and arbitrary JSON values.
///
/// Key order is insertion order. Overwriting an existing key keeps its
/// position; new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateMap {
    entries: IndexMap<String, Value>,
}

impl StateMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a JSON value into a map. Only JSON objects are accepted.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(object.into_iter().collect()),
            other => Err(Error::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Builder-style insert, mostly for composing partial updates.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Render the map as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

impl ShallowMerge for StateMap {
    type Partial = StateMap;

    fn merge(&self, partial: StateMap) -> Self {
        let mut entries = self.entries.clone();
        for (key, value) in partial.entries {
            entries.insert(key, value);
        }
        Self { entries }
    }
}

impl<K, V> FromIterator<(K, V)> for StateMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::shallow_state! {
        #[derive(Debug, Clone, PartialEq)]
        struct Profile => ProfilePatch {
            name: String,
            tags: Vec<String>,
            age: u32,
        }
    }

    #[test]
    fn merge_keeps_unmentioned_keys() {
        let state = StateMap::new().with("a", 1);
        let next = state.merge(StateMap::new().with("b", 2));

        assert_eq!(next, StateMap::new().with("a", 1).with("b", 2));
    }

    #[test]
    fn merge_replaces_mentioned_keys() {
        let state = StateMap::new().with("a", 1).with("b", 2);
        let next = state.merge(StateMap::new().with("a", 3));

        assert_eq!(next.get("a"), Some(&json!(3)));
        assert_eq!(next.get("b"), Some(&json!(2)));
    }

    #[test]
    fn merge_does_not_touch_the_original() {
        let state = StateMap::new().with("a", 1);
        let _next = state.merge(StateMap::new().with("a", 2));

        assert_eq!(state.get("a"), Some(&json!(1)));
    }

    #[test]
    fn nested_values_are_replaced_not_merged() {
        let state = StateMap::new().with("user", json!({ "name": "ada", "admin": true }));
        let next = state.merge(StateMap::new().with("user", json!({ "name": "bob" })));

        assert_eq!(next.get("user"), Some(&json!({ "name": "bob" })));
    }

    #[test]
    fn overwritten_key_keeps_its_position() {
        let state = StateMap::new().with("a", 1).with("b", 2);
        let next = state.merge(StateMap::new().with("c", 3).with("a", 9));

        let keys: Vec<&str> = next.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn from_json_accepts_objects_only() {
        let map = StateMap::from_json(json!({ "a": 1, "b": [1, 2] })).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.to_json(), json!({ "a": 1, "b": [1, 2] }));

        let err = StateMap::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { found: "array" }));

        let err = StateMap::from_json(json!(null)).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { found: "null" }));
    }

    #[test]
    fn serde_round_trips_as_object() {
        let map = StateMap::new().with("a", 1).with("b", "two");
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"a":1,"b":"two"}"#);

        let back: StateMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn record_merge_replaces_named_fields() {
        let state = Profile {
            name: "ada".into(),
            tags: vec!["math".into()],
            age: 36,
        };

        let next = state.merge(ProfilePatch {
            tags: Some(vec![]),
            ..Default::default()
        });

        assert_eq!(
            next,
            Profile {
                name: "ada".into(),
                tags: vec![],
                age: 36,
            }
        );
        assert_eq!(state.tags, vec!["math".to_string()]);
    }

    #[test]
    fn empty_record_patch_is_identity() {
        let state = Profile {
            name: "ada".into(),
            tags: vec![],
            age: 1,
        };
        assert_eq!(state.merge(ProfilePatch::default()), state);
    }
}
