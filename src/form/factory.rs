//! Form constructors

use serde_json::{json, Value};

use super::form_state::Form;
use crate::error::FormError;
use crate::traits::{SchemaSource, SubmitResult};

pub fn create_form<R: SubmitResult>(initial: impl Into<Value>) -> Form<R> {
    Form::with_values(initial)
}

/// Build a form whose initial values are the schema's defaults.
///
/// A factory source is resolved once against the fresh form and the
/// resulting schema stays attached.
pub async fn create_form_from_schema<R: SubmitResult>(
    source: SchemaSource<R>,
) -> Result<Form<R>, FormError> {
    let form = Form::with_values(json!({}));
    let schema = source.resolve(&form);

    let initial = schema.sanitize(&json!({})).await.map_err(|error| {
        tracing::error!("There was an error in form schema sanitizer: {error:#}");
        FormError::Sanitizer(error)
    })?;

    form.reset(Some(initial));
    form.schema_source(SchemaSource::Schema(schema));
    tracing::debug!("Created form from schema");
    Ok(form)
}
