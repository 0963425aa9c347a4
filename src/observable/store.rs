//! Observable JSON object with path access and a remembered initial value

use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

use super::value::{lock, ListenerId, ObservableValue};
use crate::path::FieldPath;

/// Coerce an arbitrary value into an object root
pub(crate) fn object_root(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        Value::Null => Value::Object(Map::new()),
        other => {
            tracing::warn!("form values must be an object, ignoring {other}");
            Value::Object(Map::new())
        }
    }
}

/// Structured counterpart of [`ObservableValue`] for object-shaped state.
///
/// The root is always a JSON object.
#[derive(Clone)]
pub struct ObservableStore {
    value: ObservableValue<Value>,
    initial: Arc<Mutex<Value>>,
}

impl ObservableStore {
    pub fn new(initial: Value) -> Self {
        let initial = object_root(initial);
        Self {
            value: ObservableValue::new(initial.clone()),
            initial: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn get(&self) -> Value {
        self.value.get()
    }

    pub fn set(&self, value: Value) {
        self.value.set(object_root(value));
    }

    /// Shallow-merge the top-level keys of `partial` into the current value
    pub fn add(&self, partial: Value) {
        let Value::Object(partial) = object_root(partial) else {
            return;
        };
        self.value.update(|current| {
            if let Value::Object(map) = current {
                map.extend(partial);
            }
        });
    }

    pub fn get_at(&self, path: &str) -> Option<Value> {
        FieldPath::parse(path).get(&self.value.get()).cloned()
    }

    pub fn set_at(&self, path: &str, value: Value) {
        let path = FieldPath::parse(path);
        if path.is_root() {
            self.set(value);
            return;
        }
        self.value.update(|current| path.set(current, value));
    }

    pub fn has_at(&self, path: &str) -> bool {
        FieldPath::parse(path).exists(&self.value.get())
    }

    pub fn initial_value(&self) -> Value {
        lock(&self.initial).clone()
    }

    pub fn initial_at(&self, path: &str) -> Option<Value> {
        FieldPath::parse(path).get(&lock(&self.initial)).cloned()
    }

    /// Restore the initial value, optionally replacing it first
    pub fn reset(&self, initial: Option<Value>) {
        let restored = {
            let mut remembered = lock(&self.initial);
            if let Some(initial) = initial {
                *remembered = object_root(initial);
            }
            remembered.clone()
        };
        self.value.set(restored);
    }

    pub fn listen(
        &self,
        callback: impl Fn(&Value) + Send + Sync + 'static,
        notify_immediately: bool,
    ) -> ListenerId {
        self.value.listen(callback, notify_immediately)
    }

    pub fn unlisten(&self, id: ListenerId) {
        self.value.unlisten(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_null_becomes_empty_object() {
        let store = ObservableStore::new(Value::Null);
        assert_eq!(store.get(), json!({}));
    }

    #[test]
    fn test_scalar_root_is_rejected() {
        let store = ObservableStore::new(json!({"a": 1}));
        store.set(json!(42));
        assert_eq!(store.get(), json!({}));
    }

    #[test]
    fn test_add_merges_top_level_keys() {
        let store = ObservableStore::new(json!({"foo": "bar", "nested": {"a": 1}}));
        store.add(json!({"yolo": "swag", "nested": {"b": 2}}));
        assert_eq!(
            store.get(),
            json!({"foo": "bar", "yolo": "swag", "nested": {"b": 2}})
        );
    }

    #[test]
    fn test_path_access() {
        let store = ObservableStore::new(json!({"foo": {"bar": "baz"}}));
        assert_eq!(store.get_at("foo.bar"), Some(json!("baz")));
        store.set_at("foo.bar", json!("yolo"));
        assert_eq!(store.get(), json!({"foo": {"bar": "yolo"}}));
        assert!(store.has_at("foo.bar"));
        assert!(!store.has_at("foo.qux"));
    }

    #[test]
    fn test_initial_value_is_not_mutated_by_set_at() {
        let store = ObservableStore::new(json!({"foo": "bar"}));
        store.set_at("foo", json!("baz"));
        assert_eq!(store.initial_at("foo"), Some(json!("bar")));
    }

    #[test]
    fn test_reset_with_and_without_new_initial() {
        let store = ObservableStore::new(json!({"foo": "bar"}));
        store.set(json!({"foo": "changed"}));
        store.reset(None);
        assert_eq!(store.get(), json!({"foo": "bar"}));

        store.reset(Some(json!({"foo": "baz"})));
        assert_eq!(store.get(), json!({"foo": "baz"}));
        assert_eq!(store.initial_value(), json!({"foo": "baz"}));
    }

    #[test]
    fn test_set_at_notifies_once() {
        let store = ObservableStore::new(json!({}));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.listen(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            false,
        );

        store.set_at("a.b", json!(1));
        store.set_at("a.b", json!(1));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
