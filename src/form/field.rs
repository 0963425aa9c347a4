//! Per-field view over a form

use serde_json::Value;

use super::deps::DepsOptions;
use super::error_map::IntoMessages;
use super::form_state::Form;
use crate::traits::SubmitResult;

/// A form scoped to one field path; every call delegates to the form
pub struct FormField<R: SubmitResult = Value> {
    form: Form<R>,
    key: String,
}

impl<R: SubmitResult> Clone for FormField<R> {
    fn clone(&self) -> Self {
        Self {
            form: self.form.clone(),
            key: self.key.clone(),
        }
    }
}

impl<R: SubmitResult> std::fmt::Debug for FormField<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("key", &self.key)
            .field("value", &self.get_value())
            .finish()
    }
}

impl<R: SubmitResult> FormField<R> {
    pub fn new(form: Form<R>, key: impl Into<String>) -> Self {
        Self {
            form,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get_value(&self) -> Option<Value> {
        self.form.get_at(&self.key)
    }

    pub fn set_value(&self, value: impl Into<Value>) {
        self.form.set_at(&self.key, value);
    }

    pub fn get_errors(&self) -> Option<Vec<String>> {
        self.form.get_errors_at(&self.key)
    }

    pub fn set_errors(&self, messages: impl IntoMessages) {
        self.form.set_errors_at(&self.key, messages);
    }

    pub fn add_errors(&self, messages: impl IntoMessages) {
        self.form.add_errors_at(&self.key, messages);
    }

    pub fn has_errors(&self) -> bool {
        self.form.has_errors_at(self.key.as_str())
    }

    pub fn clear_errors(&self) {
        self.form.clear_errors_at(self.key.as_str());
    }

    pub fn is_dirty(&self) -> bool {
        self.form.is_dirty_at(self.key.as_str())
    }

    pub fn set_dirty(&self) {
        self.form.add_dirty_fields(self.key.as_str());
    }

    pub fn clear_dirty(&self) {
        self.form.clear_dirty_at(self.key.as_str());
    }

    pub fn is_changed(&self) -> bool {
        self.form.is_changed_at(self.key.as_str())
    }

    pub fn set_changed(&self) {
        self.form.add_changed_fields(self.key.as_str());
    }

    pub fn clear_changed(&self) {
        self.form.clear_changed_at(self.key.as_str());
    }

    pub fn form(&self) -> &Form<R> {
        &self.form
    }

    pub fn get_deps(&self, options: DepsOptions) -> Vec<Option<String>> {
        self.form.get_deps(self.key.as_str(), options)
    }

    /// Nested field below this one, e.g. `address` -> `address.city`
    pub fn field(&self, path: &str) -> FormField<R> {
        FormField::new(self.form.clone(), format!("{}.{}", self.key, path))
    }
}

/// Lazily built field views for a form
pub struct Fields<R: SubmitResult = Value> {
    form: Form<R>,
}

impl<R: SubmitResult> Fields<R> {
    pub fn get(&self, path: &str) -> FormField<R> {
        FormField::new(self.form.clone(), path)
    }

    /// Top-level keys of the current values
    pub fn keys(&self) -> Vec<String> {
        match self.form.get() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FormField<R>> + '_ {
        self.keys().into_iter().map(move |key| self.get(&key))
    }
}

impl<R: SubmitResult> Form<R> {
    pub fn fields(&self) -> Fields<R> {
        Fields { form: self.clone() }
    }

    pub fn field(&self, path: &str) -> FormField<R> {
        FormField::new(self.clone(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn quiet_form(initial: Value) -> Form {
        let form = Form::new(initial);
        form.configure(|config| config.settings.reactive = false);
        form
    }

    #[test]
    fn test_reads_and_writes_value() {
        let form = quiet_form(json!({"foo": "bar"}));
        let field = form.fields().get("foo");

        assert_eq!(field.key(), "foo");
        assert_eq!(field.get_value(), Some(json!("bar")));

        field.set_value("baz");
        assert_eq!(form.get_at("foo"), Some(json!("baz")));
        assert!(field.is_dirty());
        assert!(field.is_changed());
    }

    #[test]
    fn test_errors() {
        let form = quiet_form(json!({"foo": "bar"}));
        let field = form.field("foo");

        assert!(!field.has_errors());
        field.set_errors("error");
        field.add_errors(["another"]);
        assert_eq!(
            field.get_errors(),
            Some(vec!["error".to_string(), "another".to_string()])
        );
        assert!(field.has_errors());

        field.clear_errors();
        assert_eq!(field.get_errors(), None);
    }

    #[test]
    fn test_dirty_and_changed_flags() {
        let form = quiet_form(json!({"foo": "bar"}));
        let field = form.field("foo");

        field.set_dirty();
        field.set_changed();
        assert!(form.is_dirty_at("foo"));
        assert!(form.is_changed_at("foo"));

        field.clear_dirty();
        field.clear_changed();
        assert!(!field.is_dirty());
        assert!(!field.is_changed());
    }

    #[test]
    fn test_keys_and_nested_fields() {
        let form = quiet_form(json!({"foo": "bar", "address": {"city": "Oslo"}}));
        let fields = form.fields();

        assert_eq!(fields.keys(), vec!["address", "foo"]);
        assert_eq!(fields.iter().count(), 2);

        let city = fields.get("address").field("city");
        assert_eq!(city.key(), "address.city");
        assert_eq!(city.get_value(), Some(json!("Oslo")));
    }

    #[test]
    fn test_deps_match_form_deps() {
        let form = quiet_form(json!({"foo": "bar"}));
        let field = form.field("foo");

        assert_eq!(
            field.get_deps(DepsOptions::default()),
            form.get_deps("foo", DepsOptions::default())
        );
        assert_eq!(field.form(), &form);
    }
}
