//! API type system input and its naming-convention classifier.

pub mod classify;
pub mod types;

pub use classify::{Role, SchemaType, base_name, classify, role_of};
pub use types::*;
