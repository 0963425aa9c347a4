//! Dot-delimited field paths over a `serde_json::Value` tree
//!
//! Paths such as `address.street` or `items.0.name` address nested values.
//! Bracket indices (`items[0].name`) are accepted as an alias for the dotted
//! form.

use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// How far past the end of an array a write may land; the gap is padded
/// with `null`
pub const MAX_INDEX_GAP: usize = 10_000;

/// A single step in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Canonical non-negative integers (`0`, `12`) are indexes; anything
    /// else, including `007`, stays a key
    fn from_raw(raw: &str) -> Self {
        let canonical = match raw.as_bytes() {
            [b'0'] => true,
            [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
            _ => false,
        };
        if canonical {
            if let Ok(index) = raw.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }

    /// The segment as an object key
    fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }
}

/// Parsed field path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        let normalized = path.replace('[', ".").replace(']', "");
        let segments = normalized
            .split('.')
            .filter(|s| !s.is_empty())
            .map(Segment::from_raw)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve the path inside `root`
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| step(current, segment))
    }

    /// Write `value` at the path, creating intermediate containers as needed.
    ///
    /// A write whose index lands more than [`MAX_INDEX_GAP`] past the end of
    /// its array is dropped.
    pub fn set(&self, root: &mut Value, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return;
        };
        if !self.within_bounds(root) {
            tracing::warn!("Ignoring write to {self}: array index too far past the end");
            return;
        }

        let mut current = root;
        for (position, segment) in parents.iter().enumerate() {
            let next = &self.segments[position + 1];
            current = child_mut(current, segment, next);
        }

        match (current, last) {
            (Value::Array(items), Segment::Index(index)) => {
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                items[*index] = value;
            }
            (Value::Object(map), segment) => {
                map.insert(segment.as_key(), value);
            }
            (slot, segment) => {
                let mut container = empty_container_for(segment);
                insert_into(&mut container, segment, value);
                *slot = container;
            }
        }
    }

    /// Whether something (including an explicit `null`) exists at the path
    pub fn exists(&self, root: &Value) -> bool {
        self.get(root).is_some()
    }

    fn within_bounds(&self, root: &Value) -> bool {
        let mut current = Some(root);
        for segment in &self.segments {
            if let Segment::Index(index) = segment {
                let len = match current {
                    Some(Value::Array(items)) => Some(items.len()),
                    // objects take the index as a key
                    Some(Value::Object(_)) => None,
                    _ => Some(0),
                };
                if len.is_some_and(|len| *index > len.saturating_add(MAX_INDEX_GAP)) {
                    return false;
                }
            }
            current = current.and_then(|value| step(value, segment));
        }
        true
    }
}

fn step<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), segment) => map.get(&segment.as_key()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .segments
            .iter()
            .map(Segment::as_key)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

fn empty_container_for(segment: &Segment) -> Value {
    match segment {
        Segment::Index(_) => Value::Array(Vec::new()),
        Segment::Key(_) => Value::Object(Map::new()),
    }
}

fn insert_into(container: &mut Value, segment: &Segment, value: Value) {
    match (container, segment) {
        (Value::Array(items), Segment::Index(index)) => {
            items.resize(*index + 1, Value::Null);
            items[*index] = value;
        }
        (Value::Object(map), segment) => {
            map.insert(segment.as_key(), value);
        }
        _ => {}
    }
}

/// Descend one level, replacing anything that cannot hold `next`
fn child_mut<'a>(current: &'a mut Value, segment: &Segment, next: &Segment) -> &'a mut Value {
    let fits = match (&*current, segment) {
        (Value::Object(_), _) => true,
        (Value::Array(_), Segment::Index(_)) => true,
        _ => false,
    };
    if !fits {
        *current = empty_container_for(segment);
    }

    let slot = match (current, segment) {
        (Value::Array(items), Segment::Index(index)) => {
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            &mut items[*index]
        }
        (Value::Object(map), segment) => map.entry(segment.as_key()).or_insert(Value::Null),
        // `fits` guarantees one of the arms above
        (other, _) => other,
    };

    if !matches!(slot, Value::Object(_) | Value::Array(_)) {
        *slot = empty_container_for(next);
    }
    slot
}

/// Read the value at `path`
pub fn get_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    FieldPath::parse(path).get(root)
}

/// Write `value` at `path`
pub fn set_at(root: &mut Value, path: &str, value: Value) {
    FieldPath::parse(path).set(root, value)
}

/// Check whether `path` exists
pub fn has_at(root: &Value, path: &str) -> bool {
    FieldPath::parse(path).exists(root)
}
