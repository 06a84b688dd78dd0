//! Relational model graph recovered from generated ORM sources.
//!
//! [`build_models`] turns the scanner's field table into a
//! [`RelationalSchema`]: an arena of [`RelationalModel`]s whose relation
//! fields point at each other by [`ModelId`].

mod build;
mod node;

pub use build::{ModelBuilder, build_models};
pub use node::*;
