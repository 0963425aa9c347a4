//! Error types surfaced by form validation and submission

use thiserror::Error;

/// Failure raised while validating, sanitizing or submitting a form.
///
/// Validation *failures* (a non-empty error map) are not errors; they are
/// reported through the return value of `validate`/`submit`. This type only
/// covers collaborators that failed to run.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("form validator failed: {0}")]
    Validator(#[source] anyhow::Error),

    #[error("form schema validation failed: {0}")]
    Schema(#[source] anyhow::Error),

    #[error("form schema sanitizer failed: {0}")]
    Sanitizer(#[source] anyhow::Error),

    #[error("form handler failed: {0}")]
    Handler(#[source] anyhow::Error),

    #[error("form value conversion failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormError {
    /// Name of the collaborator that produced the error
    pub fn source_name(&self) -> &'static str {
        match self {
            FormError::Validator(_) => "validator",
            FormError::Schema(_) => "schema",
            FormError::Sanitizer(_) => "sanitizer",
            FormError::Handler(_) => "handler",
            FormError::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_display_includes_cause() {
        let error = FormError::Handler(anyhow!("connection refused"));
        assert_eq!(
            error.to_string(),
            "form handler failed: connection refused"
        );
    }

    #[test]
    fn test_source_name() {
        assert_eq!(FormError::Validator(anyhow!("x")).source_name(), "validator");
        assert_eq!(FormError::Schema(anyhow!("x")).source_name(), "schema");
        assert_eq!(FormError::Sanitizer(anyhow!("x")).source_name(), "sanitizer");
        assert_eq!(FormError::Handler(anyhow!("x")).source_name(), "handler");
    }

    #[test]
    fn test_serialization_from_serde_error() {
        let parse_error = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error: FormError = parse_error.into();
        assert!(matches!(error, FormError::Serialization(_)));
        assert_eq!(error.source_name(), "serialization");
    }
}
