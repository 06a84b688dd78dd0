//! Static recovery of a relational schema from generated ORM model sources.
//!
//! ## Layout
//! - `lex` / `parse`: Go lexer and type-declaration parser.
//! - `scan`: directory walk producing the flat `"Model.Field"` table.
//! - `registry`: table, view and enum registries read by pattern.
//!
//! Nothing here compiles or executes the sources.

pub mod lex;
pub mod parse;
pub mod registry;
pub mod scan;

use std::path::PathBuf;
use thiserror::Error as ThisError;

pub use parse::{DeclaredType, ParseError, parse_file};
pub use registry::{
    EnumDef, EnumValue, RegistryEntry, TableKind, TableRegistry, read_enums, read_table_names,
    read_view_names,
};
pub use scan::{FieldTable, ScannedField, field_key, scan_dir, split_key};

///
/// SourceError
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("failed to read source directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
