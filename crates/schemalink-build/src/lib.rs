//! Reconciliation of API types with relational models, plus the directives
//! an emitter needs: converter names, opaque identifier pipelines, preload
//! paths and enum bindings.

pub mod api_type;
pub mod convert;
pub mod enums;
pub mod opaque;
pub mod preload;
pub mod reconcile;

use thiserror::Error as ThisError;

pub use api_type::ApiType;
pub use convert::{ConvertConfig, Converters, IdTarget};
pub use enums::{EnumBinding, EnumValueBinding, build_enum_bindings};
pub use opaque::{IdValue, OpaqueError};
pub use preload::{PreloadEntry, build_preloads};
pub use reconcile::{Reconciler, UnifiedField, UnifiedModel, reconcile};

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    /// A field references a type the type system does not define.
    #[error("type '{0}' is not defined by the type system")]
    UnknownType(String),
}
