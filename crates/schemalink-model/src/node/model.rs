use crate::node::{ModelId, RelationalField};
use derive_more::Display;
use schemalink_source::EnumDef;
use schemalink_utils::{PRIMARY_KEY_FIELD, is_textual_token};
use serde::Serialize;

///
/// PrimaryKeyKind
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum PrimaryKeyKind {
    #[default]
    Numeric,
    Text,
}

impl PrimaryKeyKind {
    /// Key kind implied by the `ID` column's type token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if is_textual_token(token) {
            Self::Text
        } else {
            Self::Numeric
        }
    }
}

///
/// RelationalModel
///
/// One generated record type, with its columns and relations. Built once per
/// run by [`crate::build_models`] and never mutated afterwards.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelationalModel {
    pub id: ModelId,
    pub name: String,
    pub table_name: String,
    pub plural_name: String,
    pub fields: Vec<RelationalField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDef>,

    pub primary_key: PrimaryKeyKind,
    pub soft_delete: bool,
    pub is_view: bool,
}

impl RelationalModel {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RelationalField> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn field_ignore_case(&self, name: &str) -> Option<&RelationalField> {
        self.field(name)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    #[must_use]
    pub fn primary_key_field(&self) -> Option<&RelationalField> {
        self.field(PRIMARY_KEY_FIELD)
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationalField> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    /// Enum attached to the given field, if any.
    #[must_use]
    pub fn enum_for(&self, field: &RelationalField) -> Option<&EnumDef> {
        let name = field.enum_name.as_deref()?;

        self.enums.iter().find(|e| e.name == name)
    }
}

///
/// TESTS
///
