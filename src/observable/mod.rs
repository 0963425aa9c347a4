//! Observable primitives the form state is built from

mod store;
mod value;

pub use store::ObservableStore;
pub use value::{ListenerId, ObservableValue};
