//! Test-only schema with a handful of string rules

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::form::Errors;
use crate::path::FieldPath;
use crate::traits::FormSchema;

#[derive(Debug, Clone, Default)]
struct Rule {
    field: String,
    min_len: Option<usize>,
    one_of: Option<Vec<String>>,
    default: Option<String>,
    trim: bool,
}

/// Minimal schema: string fields with length, choice, default and trim rules
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleSchema {
    rules: Vec<Rule>,
    pub(crate) validate_calls: Arc<AtomicUsize>,
    pub(crate) sanitize_calls: Arc<AtomicUsize>,
}

impl RuleSchema {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn rule(mut self, field: &str, update: impl FnOnce(&mut Rule)) -> Self {
        let index = match self.rules.iter().position(|rule| rule.field == field) {
            Some(index) => index,
            None => {
                self.rules.push(Rule {
                    field: field.to_string(),
                    ..Default::default()
                });
                self.rules.len() - 1
            }
        };
        update(&mut self.rules[index]);
        self
    }

    pub(crate) fn min_len(self, field: &str, min_len: usize) -> Self {
        self.rule(field, |rule| rule.min_len = Some(min_len))
    }

    pub(crate) fn one_of(self, field: &str, choices: &[&str]) -> Self {
        let choices = choices.iter().map(|c| c.to_string()).collect();
        self.rule(field, |rule| rule.one_of = Some(choices))
    }

    pub(crate) fn default_value(self, field: &str, default: &str) -> Self {
        let default = default.to_string();
        self.rule(field, |rule| rule.default = Some(default))
    }

    pub(crate) fn trimmed(self, field: &str) -> Self {
        self.rule(field, |rule| rule.trim = true)
    }
}

#[async_trait]
impl FormSchema for RuleSchema {
    async fn validate(&self, value: &Value) -> Result<Option<Errors>> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        let mut errors = Errors::new();
        for rule in &self.rules {
            let text = FieldPath::parse(&rule.field)
                .get(value)
                .and_then(Value::as_str);
            let mut messages = Vec::new();
            match text {
                None => messages.push("must be a string".to_string()),
                Some(text) => {
                    if let Some(min_len) = rule.min_len {
                        if text.chars().count() < min_len {
                            messages.push(format!("must be at least {min_len} characters"));
                        }
                    }
                    if let Some(choices) = &rule.one_of {
                        if !choices.iter().any(|choice| choice == text) {
                            messages.push(format!("must be one of {}", choices.join(", ")));
                        }
                    }
                }
            }
            if !messages.is_empty() {
                errors.insert(rule.field.clone(), messages);
            }
        }
        Ok((!errors.is_empty()).then_some(errors))
    }

    async fn sanitize(&self, value: &Value) -> Result<Value> {
        self.sanitize_calls.fetch_add(1, Ordering::SeqCst);
        let mut sanitized = value.clone();
        for rule in &self.rules {
            let path = FieldPath::parse(&rule.field);
            let current = path.get(&sanitized).cloned().unwrap_or(Value::Null);
            match (current, &rule.default) {
                (Value::String(text), _) if rule.trim => {
                    path.set(&mut sanitized, Value::String(text.trim().to_string()));
                }
                (Value::Null, Some(default)) => {
                    path.set(&mut sanitized, Value::String(default.clone()));
                }
                _ => {}
            }
        }
        Ok(sanitized)
    }
}
