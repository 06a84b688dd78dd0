//! Run configuration for the SchemaLink pipeline.
//!
//! Every section has working defaults, so an empty TOML document is a valid
//! configuration for a stock ORM output directory.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Hard upper bound on nested preload expansion.
pub const MAX_PRELOAD_DEPTH: usize = 5;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source: SourceConfig,
    pub schema: SchemaConfig,
    pub build: BuildConfig,
}

impl Config {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.relation_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "source.relation_suffix must not be empty".to_string(),
            ));
        }
        if self.build.backend_package.is_empty() {
            return Err(ConfigError::Invalid(
                "build.backend_package must not be empty".to_string(),
            ));
        }
        if self.build.preload_depth > MAX_PRELOAD_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "build.preload_depth {} exceeds max {MAX_PRELOAD_DEPTH}",
                self.build.preload_depth
            )));
        }

        Ok(())
    }
}

///
/// SourceConfig
/// Where the generated relational sources live and which files to skip.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub ignore_files: Vec<String>,
    pub relation_suffix: String,
    pub table_names_file: String,
    pub view_names_file: String,
    pub enums_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ignore_files: [
                "boil_queries.go",
                "boil_table_names.go",
                "boil_view_names.go",
                "boil_types.go",
                "boil_main_test.go",
                "mysql_upsert.go",
                "psql_upsert.go",
                "sqlite_upsert.go",
                "mssql_upsert.go",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            relation_suffix: "R".to_string(),
            table_names_file: "boil_table_names.go".to_string(),
            view_names_file: "boil_view_names.go".to_string(),
            enums_file: "boil_types.go".to_string(),
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn is_ignored(&self, file_name: &str) -> bool {
        file_name.ends_with("_test.go") || self.ignore_files.iter().any(|f| f == file_name)
    }
}

///
/// SchemaConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Literal names of pagination wrapper types.
    pub pagination_types: Vec<String>,

    /// Root operation types, never classified.
    pub root_types: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            pagination_types: [
                "ConnectionBackwardPagination",
                "ConnectionForwardPagination",
                "ConnectionPagination",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            root_types: ["Query", "Mutation", "Subscription"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

///
/// BuildConfig
/// Naming knobs for converters and preload paths.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Package holding the generated relational models (`models`).
    pub backend_package: String,

    /// Package the built-in converters are called through.
    pub converter_namespace: String,

    /// Package qualifiers dropped when shortening API type spellings.
    pub strip_packages: Vec<String>,

    /// API type name -> explicit Go type spelling.
    pub type_overrides: BTreeMap<String, String>,

    /// Nested preload levels; 1 keeps direct relations only.
    pub preload_depth: usize,

    /// Extra field names tolerated without a backing column.
    pub placeholder_fields: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            backend_package: "models".to_string(),
            converter_namespace: "boilergql".to_string(),
            strip_packages: vec!["graphql_models".to_string()],
            type_overrides: BTreeMap::new(),
            preload_depth: 1,
            placeholder_fields: Vec::new(),
        }
    }
}

impl BuildConfig {
    #[must_use]
    pub fn effective_preload_depth(&self) -> usize {
        self.preload_depth.min(MAX_PRELOAD_DEPTH)
    }
}

///
/// TESTS
///
