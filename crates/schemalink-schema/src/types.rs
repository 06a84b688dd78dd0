//! Already-parsed API type system handed over by the schema collaborator.
//!
//! The shape follows GraphQL introspection closely enough that an
//! introspection result can be deserialized with little massaging.

use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// BUILTIN_SCALARS
///

pub const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

///
/// TypeSystem
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeSystem {
    pub types: Vec<TypeDefinition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
}

impl TypeSystem {
    #[must_use]
    pub fn new(types: Vec<TypeDefinition>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Declared root operation type names.
    pub fn root_type_names(&self) -> impl Iterator<Item = &str> {
        [&self.query_type, &self.mutation_type, &self.subscription_type]
            .into_iter()
            .filter_map(Option::as_deref)
    }

    /// Kind of a named type; built-in scalars resolve even when undeclared.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<DefinitionKind> {
        self.get(name).map(|t| t.kind).or_else(|| {
            is_builtin_scalar(name).then_some(DefinitionKind::Scalar)
        })
    }
}

///
/// DefinitionKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefinitionKind {
    Enum,
    InputObject,
    Interface,
    Object,
    Scalar,
    Union,
}

impl DefinitionKind {
    /// Object and input types are the only ones with a struct representation.
    #[must_use]
    pub const fn is_object(self) -> bool {
        matches!(self, Self::Object | Self::InputObject)
    }
}

///
/// TypeDefinition
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub kind: DefinitionKind,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, alias = "inputFields", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValueDefinition>,
}

impl TypeDefinition {
    #[must_use]
    pub fn new(kind: DefinitionKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            fields: Vec::new(),
            interfaces: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_enum_value(mut self, value: impl Into<String>) -> Self {
        self.enum_values.push(EnumValueDefinition {
            name: value.into(),
            description: None,
        });
        self
    }

    #[must_use]
    pub fn with_interface(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

///
/// FieldDefinition
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FieldDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
        }
    }
}

///
/// EnumValueDefinition
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EnumValueDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

///
/// TypeRef
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Named {
        name: String,
        #[serde(default)]
        non_null: bool,
    },
    List {
        of: Box<Self>,
        #[serde(default)]
        non_null: bool,
    },
}

impl TypeRef {
    /// Nullable reference to a named type.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            non_null: false,
        }
    }

    /// Nullable list of `of`.
    #[must_use]
    pub fn list(of: Self) -> Self {
        Self::List {
            of: Box::new(of),
            non_null: false,
        }
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::Named { name, .. } => Self::Named {
                name,
                non_null: true,
            },
            Self::List { of, .. } => Self::List { of, non_null: true },
        }
    }

    #[must_use]
    pub const fn is_non_null(&self) -> bool {
        match self {
            Self::Named { non_null, .. } | Self::List { non_null, .. } => *non_null,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }

    /// Innermost named type.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named { name, .. } => name,
            Self::List { of, .. } => of.base_name(),
        }
    }
}

///
/// TESTS
///
