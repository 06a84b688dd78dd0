//! Naming rules shared by every SchemaLink stage.
//!
//! Everything in here is a pure string function. The generated relational
//! source and the API schema only line up through naming conventions, so each
//! convention lives here on its own where it can be tested in isolation.

pub mod inflect;
pub mod naming;
pub mod type_name;

pub use inflect::{pluralize, singularize};
pub use naming::*;
pub use type_name::{canonical_type_token, shorten_type_name};
