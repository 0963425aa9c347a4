//! Ordered, duplicate-free set of field paths (dirty / changed fields)

use crate::observable::{ListenerId, ObservableValue};

/// One path or a list of paths
pub trait IntoPaths {
    fn into_paths(self) -> Vec<String>;
}

impl IntoPaths for &str {
    fn into_paths(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPaths for String {
    fn into_paths(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoPaths for &String {
    fn into_paths(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoPaths for Vec<String> {
    fn into_paths(self) -> Vec<String> {
        self
    }
}

impl IntoPaths for Vec<&str> {
    fn into_paths(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoPaths for &[&str] {
    fn into_paths(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoPaths for &[String] {
    fn into_paths(self) -> Vec<String> {
        self.to_vec()
    }
}

impl<const N: usize> IntoPaths for [&str; N] {
    fn into_paths(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

fn dedup(paths: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}

/// Field paths in insertion order, never containing duplicates
#[derive(Clone, Debug)]
pub struct FieldSet {
    value: ObservableValue<Vec<String>>,
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSet {
    pub fn new() -> Self {
        Self {
            value: ObservableValue::new(Vec::new()),
        }
    }

    pub fn with_paths(paths: impl IntoPaths) -> Self {
        let set = Self::new();
        set.set(paths);
        set
    }

    pub fn get(&self) -> Vec<String> {
        self.value.get()
    }

    pub fn is_empty(&self) -> bool {
        self.value.get().is_empty()
    }

    /// True only if *every* given path is a member
    pub fn has(&self, paths: impl IntoPaths) -> bool {
        let members = self.value.get();
        paths.into_paths().iter().all(|path| members.contains(path))
    }

    pub fn set(&self, paths: impl IntoPaths) {
        self.value.set(dedup(paths.into_paths()));
    }

    pub fn add(&self, paths: impl IntoPaths) {
        let paths = paths.into_paths();
        self.value.update(|members| {
            for path in paths {
                if !members.contains(&path) {
                    members.push(path);
                }
            }
        });
    }

    pub fn remove(&self, paths: impl IntoPaths) {
        let paths = paths.into_paths();
        self.value
            .update(|members| members.retain(|member| !paths.contains(member)));
    }

    pub fn clear(&self) {
        self.value.reset();
    }

    pub fn listen(
        &self,
        callback: impl Fn(&Vec<String>) + Send + Sync + 'static,
        notify_immediately: bool,
    ) -> ListenerId {
        self.value.listen(callback, notify_immediately)
    }

    pub fn unlisten(&self, id: ListenerId) {
        self.value.unlisten(id);
    }
}
