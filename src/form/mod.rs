//! The form and its sub-stores

mod deps;
mod error_map;
mod factory;
mod field;
mod field_set;
mod form_state;
mod listen;
mod validation;
mod value_store;

pub use deps::DepsOptions;
pub use error_map::{merge, normalize, ErrorMap, Errors, IntoMessages};
pub use factory::{create_form, create_form_from_schema};
pub use field::{Fields, FormField};
pub use field_set::{FieldSet, IntoPaths};
pub use form_state::Form;
pub use listen::{ListenOptions, Subscription};
pub use validation::{SubmitOptions, ValidateOptions};
pub use value_store::ValueStore;
