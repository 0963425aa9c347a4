//! Form configuration: behavior flags plus the attached collaborators

use anyhow::Result;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::traits::{FormHandler, FormValidator, SchemaSource, SubmitResult};

/// Behavior flags, loadable from JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Trailing debounce for external listeners, in milliseconds
    pub debounce_ms: u64,
    /// Re-validate changed fields whenever values change
    pub reactive: bool,
    /// Validate before calling the submit handler
    pub validate: bool,
    /// Run the schema sanitizer before validating
    pub sanitize: bool,
    /// Only report errors for changed fields
    pub changed: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 10,
            reactive: true,
            validate: true,
            sanitize: true,
            changed: false,
        }
    }
}

impl FormSettings {
    /// Load settings from a JSON file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: FormSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Complete form configuration.
///
/// Read fresh on every operation, so changes apply to whatever runs next.
pub struct FormConfig<R: SubmitResult> {
    pub settings: FormSettings,
    pub validator: Option<Arc<dyn FormValidator<R>>>,
    pub schema: Option<SchemaSource<R>>,
    pub handler: Option<Arc<dyn FormHandler<R>>>,
}

impl<R: SubmitResult> Default for FormConfig<R> {
    fn default() -> Self {
        Self {
            settings: FormSettings::default(),
            validator: None,
            schema: None,
            handler: None,
        }
    }
}

impl<R: SubmitResult> Clone for FormConfig<R> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings,
            validator: self.validator.clone(),
            schema: self.schema.clone(),
            handler: self.handler.clone(),
        }
    }
}

fn same_arc<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// Collaborators compare by identity.
impl<R: SubmitResult> PartialEq for FormConfig<R> {
    fn eq(&self, other: &Self) -> bool {
        let same_schema = match (&self.schema, &other.schema) {
            (Some(a), Some(b)) => a.same_as(b),
            (None, None) => true,
            _ => false,
        };
        self.settings == other.settings
            && same_arc(&self.validator, &other.validator)
            && same_arc(&self.handler, &other.handler)
            && same_schema
    }
}

impl<R: SubmitResult> std::fmt::Debug for FormConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormConfig")
            .field("settings", &self.settings)
            .field("validator", &self.validator.is_some())
            .field("schema", &self.schema.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl<R: SubmitResult> Serialize for FormConfig<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FormConfig", 8)?;
        state.serialize_field("debounce", &self.settings.debounce_ms)?;
        state.serialize_field("reactive", &self.settings.reactive)?;
        state.serialize_field("validate", &self.settings.validate)?;
        state.serialize_field("sanitize", &self.settings.sanitize)?;
        state.serialize_field("changed", &self.settings.changed)?;
        state.serialize_field("validator", &self.validator.is_some())?;
        state.serialize_field("schema", &self.schema.is_some())?;
        state.serialize_field("handler", &self.handler.is_some())?;
        state.end()
    }
}
