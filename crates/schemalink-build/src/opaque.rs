//! Opaque, entity-namespaced identifiers.
//!
//! An identifier is encoded as base64 of `"<namespace>-<value>"`, where the
//! namespace is a model name. Model names never contain `-`, so the first
//! dash always separates namespace from value.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use schemalink_model::PrimaryKeyKind;
use serde::Serialize;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

const SEPARATOR: char = '-';

///
/// OpaqueError
///

#[derive(Debug, ThisError)]
pub enum OpaqueError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("identifier has no namespace separator")]
    MissingSeparator,

    #[error("identifier value '{0}' is not numeric")]
    InvalidNumber(String),

    #[error("identifier belongs to '{found}', expected '{expected}'")]
    NamespaceMismatch { expected: String, found: String },
}

///
/// IdValue
///

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum IdValue {
    Number(u64),
    Text(String),
}

impl IdValue {
    #[must_use]
    pub const fn kind(&self) -> PrimaryKeyKind {
        match self {
            Self::Number(_) => PrimaryKeyKind::Numeric,
            Self::Text(_) => PrimaryKeyKind::Text,
        }
    }
}

impl Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for IdValue {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for IdValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[must_use]
pub fn encode(namespace: &str, value: &IdValue) -> String {
    STANDARD.encode(format!("{namespace}{SEPARATOR}{value}"))
}

/// Decode an identifier into its namespace and value.
pub fn decode(encoded: &str, kind: PrimaryKeyKind) -> Result<(String, IdValue), OpaqueError> {
    let raw = String::from_utf8(STANDARD.decode(encoded)?)?;
    let (namespace, value) = raw
        .split_once(SEPARATOR)
        .ok_or(OpaqueError::MissingSeparator)?;

    let value = match kind {
        PrimaryKeyKind::Numeric => value
            .parse()
            .map(IdValue::Number)
            .map_err(|_| OpaqueError::InvalidNumber(value.to_string()))?,
        PrimaryKeyKind::Text => IdValue::Text(value.to_string()),
    };

    Ok((namespace.to_string(), value))
}

/// Decode an identifier that must belong to `namespace`.
pub fn decode_for(
    namespace: &str,
    kind: PrimaryKeyKind,
    encoded: &str,
) -> Result<IdValue, OpaqueError> {
    let (found, value) = decode(encoded, kind)?;
    if found != namespace {
        return Err(OpaqueError::NamespaceMismatch {
            expected: namespace.to_string(),
            found,
        });
    }

    Ok(value)
}

///
/// TESTS
///
