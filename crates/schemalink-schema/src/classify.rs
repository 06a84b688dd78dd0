//! Naming-convention classification of API types.

use crate::types::{DefinitionKind, TypeDefinition, TypeSystem};
use derive_more::Display;
use log::{debug, trace, warn};
use schemalink_config::SchemaConfig;
use schemalink_model::{ModelId, RelationalSchema};
use schemalink_utils::{has_suffix, singularize, trim_suffix};
use serde::Serialize;

///
/// Role
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum Role {
    Connection,
    CreateInput,
    Edge,
    Filter,
    Input,
    Normal,
    Ordering,
    PageInfo,
    Pagination,
    Payload,
    UpdateInput,
    Where,
}

impl Role {
    /// Roles expected to exist without a table of their own.
    #[must_use]
    pub const fn is_exempt(self) -> bool {
        matches!(
            self,
            Self::Input
                | Self::CreateInput
                | Self::UpdateInput
                | Self::Where
                | Self::Filter
                | Self::Payload
                | Self::PageInfo
                | Self::Pagination
        )
    }

    #[must_use]
    pub const fn is_input_family(self) -> bool {
        matches!(self, Self::Input | Self::CreateInput | Self::UpdateInput)
    }
}

// suffix roles, highest priority first
const SUFFIX_ROLES: [(&str, Role); 8] = [
    ("CreateInput", Role::CreateInput),
    ("UpdateInput", Role::UpdateInput),
    ("Input", Role::Input),
    ("Filter", Role::Filter),
    ("Where", Role::Where),
    ("Payload", Role::Payload),
    ("Edge", Role::Edge),
    ("Connection", Role::Connection),
];

const PAGE_INFO: &str = "PageInfo";
const ORDERING: &str = "Ordering";

///
/// SchemaType
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SchemaType {
    pub name: String,
    pub kind: DefinitionKind,
    pub role: Role,
    pub base_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,
}

/// Role of an API type name; the first matching rule wins.
#[must_use]
pub fn role_of(name: &str, config: &SchemaConfig) -> Role {
    if let Some((_, role)) = SUFFIX_ROLES
        .iter()
        .find(|(suffix, _)| has_suffix(name, suffix))
    {
        return *role;
    }

    if name == PAGE_INFO {
        Role::PageInfo
    } else if has_suffix(name, ORDERING) {
        Role::Ordering
    } else if config.pagination_types.iter().any(|p| p == name) {
        Role::Pagination
    } else {
        Role::Normal
    }
}

/// Strip every recognized suffix, in priority order.
#[must_use]
pub fn base_name(name: &str) -> &str {
    SUFFIX_ROLES
        .iter()
        .map(|(suffix, _)| *suffix)
        .chain([ORDERING])
        .fold(name, |base, suffix| trim_suffix(base, suffix).unwrap_or(base))
}

///
/// classify
///
/// Classify every object and input type of the type system and link it to
/// its relational model. Types without a model are dropped. The result is
/// sorted by type name.
///

#[must_use]
pub fn classify(
    types: &TypeSystem,
    schema: &RelationalSchema,
    config: &SchemaConfig,
) -> Vec<SchemaType> {
    let roots: Vec<&str> = types
        .root_type_names()
        .chain(config.root_types.iter().map(String::as_str))
        .collect();

    let mut classified: Vec<SchemaType> = types
        .types
        .iter()
        .filter(|def| !def.name.starts_with("__") && !roots.contains(&def.name.as_str()))
        .filter(|def| def.kind.is_object())
        .filter_map(|def| classify_type(def, schema, config))
        .collect();

    classified.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("classified {} api types", classified.len());

    classified
}

fn classify_type(
    def: &TypeDefinition,
    schema: &RelationalSchema,
    config: &SchemaConfig,
) -> Option<SchemaType> {
    let role = role_of(&def.name, config);
    let base = base_name(&def.name);

    let model = schema
        .by_name_ignore_case(base)
        .or_else(|| schema.by_name_ignore_case(&singularize(base)));

    let Some(model) = model else {
        if role.is_exempt() {
            trace!("{role} type '{}' has no model, skipping", def.name);
        } else {
            warn!("{role} type '{}' has no model '{base}', skipping", def.name);
        }
        return None;
    };

    Some(SchemaType {
        name: def.name.clone(),
        kind: def.kind,
        role,
        base_name: model.name.clone(),
        model: Some(model.id),
    })
}

///
/// TESTS
///
