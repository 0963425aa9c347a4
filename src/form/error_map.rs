//! Validation errors keyed by field path

use std::collections::BTreeMap;

use super::field_set::IntoPaths;
use crate::observable::{ListenerId, ObservableValue};

/// Field path to error messages
pub type Errors = BTreeMap<String, Vec<String>>;

/// One message or a list of messages
pub trait IntoMessages {
    fn into_messages(self) -> Vec<String>;
}

impl IntoMessages for &str {
    fn into_messages(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoMessages for String {
    fn into_messages(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoMessages for Vec<String> {
    fn into_messages(self) -> Vec<String> {
        self
    }
}

impl IntoMessages for Vec<&str> {
    fn into_messages(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoMessages for &[&str] {
    fn into_messages(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoMessages for [&str; N] {
    fn into_messages(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// Drop empty lists; `None` when nothing is left
pub fn normalize(errors: &Errors) -> Option<Errors> {
    let normalized: Errors = errors
        .iter()
        .filter(|(_, messages)| !messages.is_empty())
        .map(|(path, messages)| (path.clone(), messages.clone()))
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

/// Combine error maps from several sources.
///
/// Lists under the same key are merged by position: a later source replaces
/// the message at each index it has and earlier messages past its length stay.
pub fn merge(sources: impl IntoIterator<Item = Errors>) -> Errors {
    let mut merged = Errors::new();
    for source in sources {
        for (path, messages) in source {
            let list = merged.entry(path).or_default();
            for (index, message) in messages.into_iter().enumerate() {
                match list.get_mut(index) {
                    Some(slot) => *slot = message,
                    None => list.push(message),
                }
            }
        }
    }
    merged
}

/// Observable error map.
///
/// A missing key, an empty list and an empty map all mean "no error"; every
/// read goes through [`normalize`].
#[derive(Clone, Debug)]
pub struct ErrorMap {
    value: ObservableValue<Errors>,
}

impl Default for ErrorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorMap {
    pub fn new() -> Self {
        Self {
            value: ObservableValue::new(Errors::new()),
        }
    }

    pub fn get(&self) -> Option<Errors> {
        normalize(&self.value.get())
    }

    pub fn get_at(&self, path: &str) -> Option<Vec<String>> {
        self.value
            .get()
            .get(path)
            .filter(|messages| !messages.is_empty())
            .cloned()
    }

    pub fn set(&self, errors: Option<Errors>) {
        self.value.set(errors.unwrap_or_default());
    }

    pub fn set_at(&self, path: &str, messages: impl IntoMessages) {
        let messages = messages.into_messages();
        self.value.update(|errors| {
            errors.insert(path.to_string(), messages);
        });
    }

    /// Merge by key: a key present in `errors` replaces the stored list
    pub fn add(&self, errors: Option<Errors>) {
        let Some(errors) = errors else {
            return;
        };
        self.value.update(|current| current.extend(errors));
    }

    /// Append to whatever list already exists at `path`
    pub fn add_at(&self, path: &str, messages: impl IntoMessages) {
        let messages = messages.into_messages();
        self.value.update(|errors| {
            errors.entry(path.to_string()).or_default().extend(messages);
        });
    }

    pub fn has(&self) -> bool {
        self.get().is_some()
    }

    /// True if *any* of the given paths has errors
    pub fn has_at(&self, paths: impl IntoPaths) -> bool {
        paths
            .into_paths()
            .iter()
            .any(|path| self.get_at(path).is_some())
    }

    pub fn clear(&self) {
        self.value.reset();
    }

    pub fn clear_at(&self, paths: impl IntoPaths) {
        let paths = paths.into_paths();
        self.value.update(|errors| {
            for path in &paths {
                errors.remove(path);
            }
        });
    }

    /// Subscribe; the callback receives the normalized map
    pub fn listen(
        &self,
        callback: impl Fn(Option<&Errors>) + Send + Sync + 'static,
        notify_immediately: bool,
    ) -> ListenerId {
        self.value.listen(
            move |errors| callback(normalize(errors).as_ref()),
            notify_immediately,
        )
    }

    pub fn unlisten(&self, id: ListenerId) {
        self.value.unlisten(id);
    }
}
