//! SchemaLink: reconcile generated ORM models with an API type system.
//!
//! This is the public meta-crate. It wires the stages together in
//! [`Pipeline`] and re-exports them:
//!   - `schemalink-source` (Go scanner and registries)
//!   - `schemalink-model`  (relational model graph)
//!   - `schemalink-schema` (API type system and classifier)
//!   - `schemalink-build`  (reconciler, converters, preloads)
//!   - `schemalink-config` (TOML configuration)

mod error;
mod pipeline;

pub use error::Error;
pub use pipeline::{Output, Pipeline};

pub use schemalink_build as build;
pub use schemalink_config as config;
pub use schemalink_model as model;
pub use schemalink_schema as schema;
pub use schemalink_source as source;
pub use schemalink_utils as utils;

pub mod prelude {
    pub use crate::{Error, Output, Pipeline};
    pub use schemalink_build::{EnumBinding, PreloadEntry, UnifiedField, UnifiedModel};
    pub use schemalink_config::Config;
    pub use schemalink_model::{RelationalModel, RelationalSchema};
    pub use schemalink_schema::{Role, TypeSystem};
}
