//! The form: owns every sub-store and exposes the path-scoped API

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Weak};

use super::error_map::{ErrorMap, Errors, IntoMessages};
use super::field_set::{FieldSet, IntoPaths};
use super::value_store::ValueStore;
use crate::config::{FormConfig, FormSettings};
use crate::error::FormError;
use crate::observable::ObservableValue;
use crate::traits::{FormHandler, FormSchema, FormValidator, SchemaSource, SubmitResult};

pub(crate) struct FormInner<R: SubmitResult> {
    pub(crate) configuration: ObservableValue<FormConfig<R>>,
    pub(crate) values: ValueStore,
    pub(crate) dirty_fields: FieldSet,
    pub(crate) changed_fields: FieldSet,
    pub(crate) errors: ErrorMap,
    pub(crate) submitting: ObservableValue<bool>,
    pub(crate) submitted: ObservableValue<bool>,
    pub(crate) result: ObservableValue<Option<R>>,
}

/// Reactive form state container.
///
/// `Form` is a cheap handle; clones share the same state. Validators and
/// handlers receive the form itself so they can read or write any of it.
pub struct Form<R: SubmitResult = Value> {
    pub(crate) inner: Arc<FormInner<R>>,
}

/// Non-owning handle used by listeners and background tasks
pub(crate) struct WeakForm<R: SubmitResult> {
    inner: Weak<FormInner<R>>,
}

impl<R: SubmitResult> Clone for WeakForm<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<R: SubmitResult> WeakForm<R> {
    pub(crate) fn upgrade(&self) -> Option<Form<R>> {
        self.inner.upgrade().map(|inner| Form { inner })
    }
}

impl<R: SubmitResult> Clone for Form<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: SubmitResult> PartialEq for Form<R> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: SubmitResult + std::fmt::Debug> std::fmt::Debug for Form<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("values", &self.get())
            .field("errors", &self.get_errors())
            .field("dirty_fields", &self.get_dirty_fields())
            .field("changed_fields", &self.get_changed_fields())
            .field("submitting", &self.is_submitting())
            .field("submitted", &self.is_submitted())
            .field("result", &self.get_result())
            .finish()
    }
}

impl Form<Value> {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self::with_values(initial)
    }
}

impl<R: SubmitResult> Form<R> {
    /// Create a form for any result type
    pub fn with_values(initial: impl Into<Value>) -> Self {
        let dirty_fields = FieldSet::new();
        let changed_fields = FieldSet::new();
        let values = ValueStore::new(
            initial.into(),
            dirty_fields.clone(),
            changed_fields.clone(),
        );

        let form = Self {
            inner: Arc::new(FormInner {
                configuration: ObservableValue::new(FormConfig::default()),
                values,
                dirty_fields,
                changed_fields,
                errors: ErrorMap::new(),
                submitting: ObservableValue::new(false),
                submitted: ObservableValue::new(false),
                result: ObservableValue::new(None),
            }),
        };
        form.install_reactive_validation();
        form
    }

    pub(crate) fn downgrade(&self) -> WeakForm<R> {
        WeakForm {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Restore values to the initial value (optionally a new one) and clear
    /// every piece of derived state. Configuration is kept.
    pub fn reset(&self, initial: Option<Value>) {
        let inner = &self.inner;
        inner.values.reset(initial);
        inner.submitting.reset();
        inner.submitted.reset();
        inner.dirty_fields.clear();
        inner.changed_fields.clear();
        inner.errors.clear();
        inner.result.reset();
    }

    // Values

    pub fn get(&self) -> Value {
        self.inner.values.get()
    }

    pub fn get_at(&self, path: &str) -> Option<Value> {
        self.inner.values.get_at(path)
    }

    pub fn has_at(&self, path: &str) -> bool {
        self.inner.values.has_at(path)
    }

    pub fn set(&self, values: impl Into<Value>) {
        self.inner.values.set(values.into());
    }

    pub fn set_at(&self, path: &str, value: impl Into<Value>) {
        self.inner.values.set_at(path, value.into());
    }

    /// Shallow-merge top-level keys into the current values
    pub fn put(&self, partial: impl Into<Value>) {
        self.inner.values.add(partial.into());
    }

    pub fn initial_value(&self) -> Value {
        self.inner.values.initial_value()
    }

    /// Deserialize the current values into a typed model
    pub fn get_as<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        Ok(serde_json::from_value(self.get())?)
    }

    /// Replace the values with a serialized typed model
    pub fn set_from<T: Serialize>(&self, model: &T) -> Result<(), FormError> {
        self.set(serde_json::to_value(model)?);
        Ok(())
    }

    // Errors

    pub fn get_errors(&self) -> Option<Errors> {
        self.inner.errors.get()
    }

    pub fn get_errors_at(&self, path: &str) -> Option<Vec<String>> {
        self.inner.errors.get_at(path)
    }

    pub fn set_errors(&self, errors: Option<Errors>) {
        self.inner.errors.set(errors);
    }

    pub fn set_errors_at(&self, path: &str, messages: impl IntoMessages) {
        self.inner.errors.set_at(path, messages);
    }

    pub fn add_errors(&self, errors: Option<Errors>) {
        self.inner.errors.add(errors);
    }

    pub fn add_errors_at(&self, path: &str, messages: impl IntoMessages) {
        self.inner.errors.add_at(path, messages);
    }

    pub fn has_errors(&self) -> bool {
        self.inner.errors.has()
    }

    pub fn has_errors_at(&self, paths: impl IntoPaths) -> bool {
        self.inner.errors.has_at(paths)
    }

    pub fn clear_errors(&self) {
        self.inner.errors.clear();
    }

    pub fn clear_errors_at(&self, paths: impl IntoPaths) {
        self.inner.errors.clear_at(paths);
    }

    // Dirty fields

    pub fn is_dirty(&self) -> bool {
        !self.inner.dirty_fields.is_empty()
    }

    pub fn is_dirty_at(&self, paths: impl IntoPaths) -> bool {
        self.inner.dirty_fields.has(paths)
    }

    pub fn get_dirty_fields(&self) -> Vec<String> {
        self.inner.dirty_fields.get()
    }

    pub fn set_dirty_fields(&self, paths: impl IntoPaths) {
        self.inner.dirty_fields.set(paths);
    }

    pub fn add_dirty_fields(&self, paths: impl IntoPaths) {
        self.inner.dirty_fields.add(paths);
    }

    pub fn clear_dirty_fields(&self) {
        self.inner.dirty_fields.clear();
    }

    pub fn clear_dirty_at(&self, paths: impl IntoPaths) {
        self.inner.dirty_fields.remove(paths);
    }

    // Changed fields

    pub fn is_changed(&self) -> bool {
        !self.inner.changed_fields.is_empty()
    }

    pub fn is_changed_at(&self, paths: impl IntoPaths) -> bool {
        self.inner.changed_fields.has(paths)
    }

    pub fn get_changed_fields(&self) -> Vec<String> {
        self.inner.changed_fields.get()
    }

    pub fn set_changed_fields(&self, paths: impl IntoPaths) {
        self.inner.changed_fields.set(paths);
    }

    pub fn add_changed_fields(&self, paths: impl IntoPaths) {
        self.inner.changed_fields.add(paths);
    }

    pub fn clear_changed_fields(&self) {
        self.inner.changed_fields.clear();
    }

    pub fn clear_changed_at(&self, paths: impl IntoPaths) {
        self.inner.changed_fields.remove(paths);
    }

    // Submission state

    pub fn get_result(&self) -> Option<R> {
        self.inner.result.get()
    }

    pub fn set_result(&self, result: Option<R>) {
        self.inner.result.set(result);
    }

    pub fn clear_result(&self) {
        self.inner.result.reset();
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.submitting.get()
    }

    pub fn set_submitting(&self, submitting: bool) {
        self.inner.submitting.set(submitting);
    }

    pub fn is_submitted(&self) -> bool {
        self.inner.submitted.get()
    }

    pub fn set_submitted(&self, submitted: bool) {
        self.inner.submitted.set(submitted);
    }

    // Configuration

    pub fn configuration(&self) -> FormConfig<R> {
        self.inner.configuration.get()
    }

    pub fn settings(&self) -> FormSettings {
        self.inner.configuration.get().settings
    }

    /// Mutate the configuration in place
    pub fn configure(&self, mutate: impl FnOnce(&mut FormConfig<R>)) -> &Self {
        self.inner.configuration.update(mutate);
        self
    }

    pub fn validator(&self, validator: impl FormValidator<R> + 'static) -> &Self {
        let validator: Arc<dyn FormValidator<R>> = Arc::new(validator);
        self.configure(|config| config.validator = Some(validator))
    }

    pub fn schema(&self, schema: impl FormSchema + 'static) -> &Self {
        self.schema_source(SchemaSource::schema(schema))
    }

    pub fn schema_factory(
        &self,
        factory: impl Fn(&Form<R>) -> Arc<dyn FormSchema> + Send + Sync + 'static,
    ) -> &Self {
        self.schema_source(SchemaSource::factory(factory))
    }

    pub fn schema_source(&self, source: SchemaSource<R>) -> &Self {
        self.configure(|config| config.schema = Some(source))
    }

    pub fn handler(&self, handler: impl FormHandler<R> + 'static) -> &Self {
        let handler: Arc<dyn FormHandler<R>> = Arc::new(handler);
        self.configure(|config| config.handler = Some(handler))
    }

    // Underlying stores

    pub fn values_store(&self) -> &ValueStore {
        &self.inner.values
    }

    pub fn errors_store(&self) -> &ErrorMap {
        &self.inner.errors
    }

    pub fn dirty_fields_store(&self) -> &FieldSet {
        &self.inner.dirty_fields
    }

    pub fn changed_fields_store(&self) -> &FieldSet {
        &self.inner.changed_fields
    }

    pub fn submitting_store(&self) -> &ObservableValue<bool> {
        &self.inner.submitting
    }

    pub fn submitted_store(&self) -> &ObservableValue<bool> {
        &self.inner.submitted
    }

    pub fn result_store(&self) -> &ObservableValue<Option<R>> {
        &self.inner.result
    }

    pub fn configuration_store(&self) -> &ObservableValue<FormConfig<R>> {
        &self.inner.configuration
    }
}
