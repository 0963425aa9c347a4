//! Validate and submit orchestration

use serde_json::Value;
use std::sync::Arc;

use super::error_map::{merge, normalize, Errors};
use super::form_state::Form;
use crate::error::FormError;
use crate::path::FieldPath;
use crate::traits::{FormSchema, FormValidator, SubmitResult};

/// Per-call overrides for [`Form::validate`]; `None` falls back to the
/// form configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Only report errors for changed fields
    pub changed: Option<bool>,
    /// Run the schema sanitizer first
    pub sanitize: Option<bool>,
    /// Write the result into the form errors (default: true)
    pub persist: Option<bool>,
    /// With `changed`, keep errors on fields that already had one (default: true)
    pub keep_previous_errors: Option<bool>,
}

fn top_level_keys(current: &Value, sanitized: &Value) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for value in [current, sanitized] {
        if let Value::Object(map) = value {
            for key in map.keys() {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
    }
    keys
}

/// Per-call overrides for [`Form::submit`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub validate: Option<bool>,
    pub sanitize: Option<bool>,
    pub changed: Option<bool>,
}

impl<R: SubmitResult> Form<R> {
    /// Run the configured validator and schema and return the errors found.
    ///
    /// Returns `Ok(None)` when the form is valid. A failing collaborator
    /// aborts validation and leaves the stored errors untouched.
    pub async fn validate(&self, options: ValidateOptions) -> Result<Option<Errors>, FormError> {
        let config = self.configuration();
        let changed_only = options.changed.unwrap_or(config.settings.changed);
        let sanitize = options.sanitize.unwrap_or(config.settings.sanitize);
        let persist = options.persist.unwrap_or(true);
        let keep_previous_errors = options.keep_previous_errors.unwrap_or(true);

        let schema = config.schema.as_ref().map(|source| source.resolve(self));

        if sanitize {
            if let Some(schema) = &schema {
                self.sanitize_with(schema.as_ref(), changed_only).await?;
            }
        }

        let (validator_errors, schema_errors) = tokio::join!(
            self.run_validator(config.validator.clone()),
            self.run_schema(schema.clone()),
        );
        let mut errors = merge([validator_errors?, schema_errors?].into_iter().flatten());

        if changed_only {
            let previous = self.get_errors().unwrap_or_default();
            let changed = self.get_changed_fields();
            errors.retain(|path, _| {
                changed.contains(path) || (keep_previous_errors && previous.contains_key(path))
            });
        }

        if persist {
            self.inner.errors.set(Some(errors.clone()));
        }

        Ok(normalize(&errors))
    }

    /// Validate (unless disabled), then call the handler and record its result.
    ///
    /// Returns `Ok(None)` without calling the handler when a submit is
    /// already in flight or validation reported errors.
    pub async fn submit(&self, options: SubmitOptions) -> Result<Option<R>, FormError> {
        if self.is_submitting() {
            tracing::debug!("Form is already submitting, ignoring submit");
            return Ok(None);
        }

        let settings = self.settings();
        let validate = options.validate.unwrap_or(settings.validate);
        let sanitize = options.sanitize.unwrap_or(settings.sanitize);
        let changed_only = options.changed.unwrap_or(settings.changed);

        self.inner.result.set(None);
        self.inner.errors.clear();
        self.inner.submitting.set(true);

        let outcome = self.run_submit(validate, sanitize, changed_only).await;
        self.inner.submitting.set(false);

        if !outcome? {
            tracing::debug!("Form submit aborted by validation errors");
            return Ok(None);
        }

        self.inner.submitted.set(true);
        Ok(self.get_result())
    }

    /// Returns `false` when validation stopped the submit
    async fn run_submit(
        &self,
        validate: bool,
        sanitize: bool,
        changed_only: bool,
    ) -> Result<bool, FormError> {
        if sanitize {
            if let Some(schema) = self.resolve_schema() {
                self.sanitize_with(schema.as_ref(), changed_only).await?;
            }
        }

        if validate {
            let errors = self
                .validate(ValidateOptions {
                    changed: Some(changed_only),
                    sanitize: Some(false),
                    persist: Some(true),
                    keep_previous_errors: None,
                })
                .await?;
            if errors.is_some() {
                return Ok(false);
            }
        }

        if let Some(handler) = self.configuration().handler {
            let result = handler.handle(self).await.map_err(|error| {
                tracing::error!("There was an error in form handler: {error:#}");
                FormError::Handler(error)
            })?;
            self.inner.result.set(result);
        }

        Ok(true)
    }

    fn resolve_schema(&self) -> Option<Arc<dyn FormSchema>> {
        self.configuration()
            .schema
            .map(|source| source.resolve(self))
    }

    /// Write sanitized values back through `set_at`: every top-level field
    /// the sanitizer touched, or only the changed fields.
    ///
    /// Fields whose sanitized value equals the current one are left alone so
    /// their dirty and changed state is not recomputed.
    async fn sanitize_with(&self, schema: &dyn FormSchema, changed_only: bool) -> Result<(), FormError> {
        let changed = self.get_changed_fields();
        if changed_only && changed.is_empty() {
            return Ok(());
        }

        let current = self.get();
        let sanitized = schema.sanitize(&current).await.map_err(|error| {
            tracing::error!("There was an error in form schema sanitizer: {error:#}");
            FormError::Sanitizer(error)
        })?;

        let paths = if changed_only {
            changed
        } else {
            top_level_keys(&current, &sanitized)
        };

        for path in paths {
            let field = FieldPath::parse(&path);
            let Some(value) = field.get(&sanitized) else {
                continue;
            };
            if field.get(&current) != Some(value) {
                self.set_at(&path, value.clone());
            }
        }

        // keys the sanitizer dropped
        if !changed_only && self.get() != sanitized {
            self.set(sanitized);
        }
        Ok(())
    }

    async fn run_validator(
        &self,
        validator: Option<Arc<dyn FormValidator<R>>>,
    ) -> Result<Option<Errors>, FormError> {
        let Some(validator) = validator else {
            return Ok(None);
        };
        validator.validate(self).await.map_err(|error| {
            tracing::error!("There was an error in form validator: {error:#}");
            FormError::Validator(error)
        })
    }

    async fn run_schema(
        &self,
        schema: Option<Arc<dyn FormSchema>>,
    ) -> Result<Option<Errors>, FormError> {
        let Some(schema) = schema else {
            return Ok(None);
        };
        schema.validate(&self.get()).await.map_err(|error| {
            tracing::error!("There was an error in form schema: {error:#}");
            FormError::Schema(error)
        })
    }

    /// Re-validate changed fields in the background whenever values change
    pub(crate) fn install_reactive_validation(&self) {
        let weak = self.downgrade();
        self.inner.values.listen(
            move |_| {
                let Some(form) = weak.upgrade() else {
                    return;
                };
                if !form.settings().reactive {
                    return;
                }
                let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                    tracing::debug!("No async runtime available, skipping reactive validation");
                    return;
                };
                runtime.spawn(async move {
                    let options = ValidateOptions {
                        changed: Some(true),
                        ..Default::default()
                    };
                    if let Err(error) = form.validate(options).await {
                        tracing::warn!("Reactive validation failed: {error}");
                    }
                });
            },
            false,
        );
    }
}
