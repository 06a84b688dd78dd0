//! Converter naming between API and column types.
//!
//! Plain converters are function names (`boilergql.PointerStringToNullDotString`).
//! Identifier pipelines are nested call expressions over the placeholder
//! [`VALUE`], so an emitter only has to substitute its own expression.

use crate::api_type::ApiType;
use schemalink_model::{PrimaryKeyKind, RelationalField};
use schemalink_utils::canonical_type_token;
use serde::Serialize;

/// Placeholder for the converted value inside pipeline expressions.
pub const VALUE: &str = "v";

const JSON_MARKER: &str = "JSON";

///
/// ConvertConfig
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ConvertConfig {
    pub is_custom: bool,

    /// API value -> column value.
    pub to_column: String,

    /// Column value -> API value.
    pub to_api: String,

    pub api_type: String,
    pub column_type: String,
}

impl ConvertConfig {
    /// No conversion needed; both sides share a representation.
    #[must_use]
    pub fn identity(api: &ApiType, column: Option<&RelationalField>) -> Self {
        Self {
            api_type: canonical_type_token(&api.spelling),
            column_type: column.map(|c| canonical_type_token(&c.token)).unwrap_or_default(),
            ..Self::default()
        }
    }
}

///
/// IdTarget
/// Which identifier an id pipeline encodes.
///

#[derive(Clone, Debug)]
pub struct IdTarget<'a> {
    /// Model name used as the identifier namespace.
    pub namespace: &'a str,
    pub kind: PrimaryKeyKind,
}

///
/// Converters
///

pub struct Converters<'a> {
    namespace: &'a str,
}

impl<'a> Converters<'a> {
    #[must_use]
    pub const fn new(namespace: &'a str) -> Self {
        Self { namespace }
    }

    /// Converter pair for an enum-bound column.
    #[must_use]
    pub fn for_enum(&self, api: &ApiType, column: &RelationalField) -> ConvertConfig {
        let api_type = canonical_type_token(&api.spelling);
        let column_type = canonical_type_token(&column.token);

        ConvertConfig {
            is_custom: true,
            to_column: format!("{api_type}To{column_type}"),
            to_api: format!("{column_type}To{api_type}"),
            api_type,
            column_type,
        }
    }

    /// Generic converter pair; identity when both tokens agree.
    #[must_use]
    pub fn for_value(&self, api: &ApiType, column: &RelationalField) -> ConvertConfig {
        let api_type = canonical_type_token(&api.spelling);
        let column_type = canonical_type_token(&column.token);
        if api_type == column_type {
            return ConvertConfig::identity(api, Some(column));
        }

        let mut config = ConvertConfig {
            is_custom: true,
            to_column: self.qualified(&format!("{api_type}To{column_type}")),
            to_api: self.qualified(&format!("{column_type}To{api_type}")),
            api_type,
            column_type,
        };
        if column.token.contains(JSON_MARKER) {
            self.strip_namespace(&mut config);
        }

        config
    }

    ///
    /// for_id
    ///
    /// Opaque identifier pipeline:
    /// - to API: unwrap nullable column, coerce to `uint`, encode, wrap pointer;
    /// - to column: unwrap pointer, decode, coerce from `uint`, wrap nullable column.
    ///
    #[must_use]
    pub fn for_id(
        &self,
        api: &ApiType,
        column: &RelationalField,
        target: &IdTarget,
    ) -> ConvertConfig {
        let api_type = canonical_type_token(&api.spelling);
        let column_type = canonical_type_token(&column.token);
        let base = base_token(&column.token);
        let base_type = canonical_type_token(base);
        let column_nullable = base != column.token;
        let ns = format!("\"{}\"", target.namespace);

        let (encode, decode, wire) = match target.kind {
            PrimaryKeyKind::Numeric => ("IDToGraphQL", "IDToBoiler", "Uint"),
            PrimaryKeyKind::Text => ("StringIDToGraphQL", "StringIDToBoiler", "String"),
        };

        // column -> API
        let mut to_api = VALUE.to_string();
        if column_nullable {
            to_api = self.call(&format!("{column_type}To{base_type}"), &to_api);
        }
        if base_type != wire {
            to_api = self.call(&format!("{base_type}To{wire}"), &to_api);
        }
        to_api = format!("{}({to_api}, {ns})", self.qualified(encode));
        if api.nullable {
            to_api = self.call("StringToPointerString", &to_api);
        }

        // API -> column
        let mut to_column = VALUE.to_string();
        if api.nullable {
            to_column = self.call("PointerStringToString", &to_column);
        }
        to_column = format!("{}({to_column}, {ns})", self.qualified(decode));
        if base_type != wire {
            to_column = self.call(&format!("{wire}To{base_type}"), &to_column);
        }
        if column_nullable {
            to_column = self.call(&format!("{base_type}To{column_type}"), &to_column);
        }

        ConvertConfig {
            is_custom: true,
            to_column,
            to_api,
            api_type,
            column_type,
        }
    }

    fn qualified(&self, func: &str) -> String {
        format!("{}.{func}", self.namespace)
    }

    fn call(&self, func: &str, arg: &str) -> String {
        format!("{}({arg})", self.qualified(func))
    }

    // strip_namespace
    // JSON converters live in the caller's own package
    fn strip_namespace(&self, config: &mut ConvertConfig) {
        let prefix = format!("{}.", self.namespace);
        for name in [&mut config.to_column, &mut config.to_api] {
            *name = name.replace(&prefix, "");
        }
    }
}

// base_token
// scalar a nullable column wraps: null.Int64 -> int64, null.String -> string
fn base_token(token: &str) -> &str {
    match token.strip_prefix("null.") {
        Some(inner) => NULL_BASES
            .iter()
            .find(|(wrapper, _)| *wrapper == inner)
            .map_or(token, |(_, base)| *base),
        None => token,
    }
}

const NULL_BASES: [(&str, &str); 14] = [
    ("Int", "int"),
    ("Int8", "int8"),
    ("Int16", "int16"),
    ("Int32", "int32"),
    ("Int64", "int64"),
    ("Uint", "uint"),
    ("Uint8", "uint8"),
    ("Uint16", "uint16"),
    ("Uint32", "uint32"),
    ("Uint64", "uint64"),
    ("String", "string"),
    ("Float32", "float32"),
    ("Float64", "float64"),
    ("Bool", "bool"),
];

///
/// TESTS
///
