//! Current and initial form values, kept in sync with dirty/changed fields

use serde_json::Value;

use super::field_set::FieldSet;
use crate::observable::{ListenerId, ObservableStore};

#[derive(Clone)]
pub struct ValueStore {
    store: ObservableStore,
    dirty_fields: FieldSet,
    changed_fields: FieldSet,
}

impl ValueStore {
    pub fn new(initial: Value, dirty_fields: FieldSet, changed_fields: FieldSet) -> Self {
        Self {
            store: ObservableStore::new(initial),
            dirty_fields,
            changed_fields,
        }
    }

    pub fn get(&self) -> Value {
        self.store.get()
    }

    /// Whole-value replace; does not touch dirty/changed tracking
    pub fn set(&self, value: Value) {
        self.store.set(value);
    }

    /// Shallow merge; does not touch dirty/changed tracking
    pub fn add(&self, partial: Value) {
        self.store.add(partial);
    }

    pub fn get_at(&self, path: &str) -> Option<Value> {
        self.store.get_at(path)
    }

    /// Write a single field and record it as dirty, and as changed when it
    /// differs from the initial value
    pub fn set_at(&self, path: &str, value: Value) {
        let initial = self.store.initial_at(path).unwrap_or(Value::Null);
        let changed = initial != value;

        self.store.set_at(path, value);

        if changed {
            self.changed_fields.add(path);
        } else {
            self.changed_fields.remove(path);
        }
        self.dirty_fields.add(path);
    }

    pub fn has_at(&self, path: &str) -> bool {
        self.store.has_at(path)
    }

    pub fn initial_value(&self) -> Value {
        self.store.initial_value()
    }

    /// Restore the initial value, optionally replacing it first.
    ///
    /// Dirty and changed fields are left to the owning form.
    pub fn reset(&self, initial: Option<Value>) {
        self.store.reset(initial);
    }

    pub fn listen(
        &self,
        callback: impl Fn(&Value) + Send + Sync + 'static,
        notify_immediately: bool,
    ) -> ListenerId {
        self.store.listen(callback, notify_immediately)
    }

    pub fn unlisten(&self, id: ListenerId) {
        self.store.unlisten(id);
    }
}
