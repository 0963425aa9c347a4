//! Serialized state snapshots for memoizing consumers

use serde::Serialize;

use super::field_set::IntoPaths;
use super::form_state::Form;
use crate::traits::SubmitResult;

/// Which slots of [`Form::get_deps`] to fill; everything is on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepsOptions {
    pub values: bool,
    pub errors: bool,
    pub dirty_fields: bool,
    pub changed_fields: bool,
    pub result: bool,
    pub submitting: bool,
    pub submitted: bool,
    pub config: bool,
}

impl Default for DepsOptions {
    fn default() -> Self {
        Self {
            values: true,
            errors: true,
            dirty_fields: true,
            changed_fields: true,
            result: true,
            submitting: true,
            submitted: true,
            config: true,
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(error) => {
            tracing::warn!("Failed to serialize form dependency: {error}");
            None
        }
    }
}

impl<R: SubmitResult> Form<R> {
    /// Fixed-order fingerprint of the state relevant to `paths`.
    ///
    /// Slots: values, errors, dirty flags, changed flags, result, submitting,
    /// submitted, configuration. Disabled per-field slots hold `"[]"`, other
    /// disabled or absent slots hold `None`.
    pub fn get_deps(&self, paths: impl IntoPaths, options: DepsOptions) -> Vec<Option<String>> {
        let paths = paths.into_paths();
        let per_field = |enabled: bool, read: &dyn Fn(&str) -> serde_json::Value| {
            let entries: Vec<serde_json::Value> = if enabled {
                paths.iter().map(|path| read(path.as_str())).collect()
            } else {
                Vec::new()
            };
            to_json(&entries)
        };

        let values = per_field(options.values, &|path| {
            self.get_at(path).unwrap_or(serde_json::Value::Null)
        });
        let errors = per_field(options.errors, &|path| {
            self.get_errors_at(path)
                .map(serde_json::Value::from)
                .unwrap_or(serde_json::Value::Null)
        });
        let dirty = per_field(options.dirty_fields, &|path| {
            serde_json::Value::Bool(self.is_dirty_at(path))
        });
        let changed = per_field(options.changed_fields, &|path| {
            serde_json::Value::Bool(self.is_changed_at(path))
        });

        let result = options
            .result
            .then(|| self.get_result())
            .flatten()
            .and_then(|result| to_json(&result));
        let submitting = options
            .submitting
            .then(|| to_json(&self.is_submitting()))
            .flatten();
        let submitted = options
            .submitted
            .then(|| to_json(&self.is_submitted()))
            .flatten();
        let config = options
            .config
            .then(|| to_json(&self.configuration()))
            .flatten();

        vec![
            values, errors, dirty, changed, result, submitting, submitted, config,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn deps(entries: [Option<&str>; 7], config: &str) -> Vec<Option<String>> {
        entries
            .into_iter()
            .chain([Some(config)])
            .map(|entry| entry.map(str::to_string))
            .collect()
    }

    const CONFIG: &str = r#"{"debounce":10,"reactive":false,"validate":true,"sanitize":true,"changed":false,"validator":false,"schema":false,"handler":false}"#;

    #[test]
    fn test_tracks_every_slot() {
        let form = Form::new(json!({"foo": "foo", "bar": "bar"}));
        form.configure(|config| config.settings.reactive = false);

        assert_eq!(
            form.get_deps(["foo", "bar"], DepsOptions::default()),
            deps(
                [
                    Some(r#"["foo","bar"]"#),
                    Some("[null,null]"),
                    Some("[false,false]"),
                    Some("[false,false]"),
                    None,
                    Some("false"),
                    Some("false"),
                ],
                CONFIG
            )
        );

        form.set_at("foo", "fooz");
        form.set_errors_at("foo", ["error"]);
        form.set_submitting(true);

        assert_eq!(
            form.get_deps(["foo", "bar"], DepsOptions::default()),
            deps(
                [
                    Some(r#"["fooz","bar"]"#),
                    Some(r#"[["error"],null]"#),
                    Some("[true,false]"),
                    Some("[true,false]"),
                    None,
                    Some("true"),
                    Some("false"),
                ],
                CONFIG
            )
        );

        form.set_submitted(true);
        form.set_result(Some(json!({"status": "ok"})));
        form.set_at("bar", "barz");
        form.set_errors_at("bar", ["yolo"]);

        assert_eq!(
            form.get_deps(["foo", "bar"], DepsOptions::default()),
            deps(
                [
                    Some(r#"["fooz","barz"]"#),
                    Some(r#"[["error"],["yolo"]]"#),
                    Some("[true,true]"),
                    Some("[true,true]"),
                    Some(r#"{"status":"ok"}"#),
                    Some("true"),
                    Some("true"),
                ],
                CONFIG
            )
        );
    }

    #[test]
    fn test_disabled_slots_keep_their_position() {
        let form = Form::new(json!({"foo": "foo", "bar": "bar"}));
        form.configure(|config| config.settings.reactive = false);
        form.set_result(Some(json!({"status": "ok"})));

        let scalars_off = form.get_deps(
            ["foo", "bar"],
            DepsOptions {
                result: false,
                submitting: false,
                submitted: false,
                ..Default::default()
            },
        );
        assert_eq!(scalars_off.len(), 8);
        assert_eq!(&scalars_off[4..7], &[None::<String>, None, None]);

        let everything_off = form.get_deps(
            "foo",
            DepsOptions {
                values: false,
                errors: false,
                dirty_fields: false,
                changed_fields: false,
                result: false,
                submitting: false,
                submitted: false,
                config: false,
            },
        );
        assert_eq!(
            everything_off,
            vec![
                Some("[]".to_string()),
                Some("[]".to_string()),
                Some("[]".to_string()),
                Some("[]".to_string()),
                None,
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_config_slot_follows_configuration() {
        let form = Form::new(json!({}));
        form.configure(|config| config.settings.debounce_ms = 0);

        let before = form.get_deps("foo", DepsOptions::default());
        form.handler(|_form: Form| async { anyhow::Ok(None::<serde_json::Value>) });
        let after = form.get_deps("foo", DepsOptions::default());

        assert_eq!(before[..7], after[..7]);
        assert_ne!(before[7], after[7]);
        assert!(after[7].as_deref().unwrap_or_default().contains(r#""handler":true"#));
    }
}
