//! Centy Form - reactive form state container
//!
//! Holds field values, tracks dirty and changed fields, runs pluggable
//! validation (function and schema based), drives the submit lifecycle and
//! notifies observers of every change, optionally debounced.

pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod observable;
pub mod path;
pub mod traits;

#[cfg(test)]
mod testing;

pub use config::{FormConfig, FormSettings};
pub use error::FormError;
pub use form::{
    create_form, create_form_from_schema, DepsOptions, ErrorMap, Errors, FieldSet, Fields, Form,
    FormField, ListenOptions, SubmitOptions, Subscription, ValidateOptions, ValueStore,
};
pub use observable::{ListenerId, ObservableStore, ObservableValue};
pub use path::FieldPath;
pub use traits::{FormHandler, FormSchema, FormValidator, SchemaFactory, SchemaSource, SubmitResult};
