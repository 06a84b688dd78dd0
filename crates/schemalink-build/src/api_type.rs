use crate::BuildError;
use schemalink_config::BuildConfig;
use schemalink_schema::{DefinitionKind, TypeRef, TypeSystem};
use schemalink_utils::shorten_type_name;
use serde::Serialize;

///
/// ApiType
/// Go-side descriptor of an API field's type.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ApiType {
    /// Full spelling with modifiers (`*string`, `[]*Post`).
    pub spelling: String,
    /// Innermost API type name (`String`, `Post`).
    pub name: String,
    pub kind: DefinitionKind,
    pub nullable: bool,
    pub list: bool,
    pub overridden: bool,
}

impl ApiType {
    /// Resolve the descriptor for a field type reference.
    pub fn resolve(
        ty: &TypeRef,
        types: &TypeSystem,
        config: &BuildConfig,
    ) -> Result<Self, BuildError> {
        let name = ty.base_name();
        let kind = types
            .kind_of(name)
            .ok_or_else(|| BuildError::UnknownType(name.to_string()))?;

        let (base, overridden) = match config.type_overrides.get(name) {
            Some(spelling) => (shorten_type_name(spelling, &config.strip_packages), true),
            None => (builtin_spelling(name, kind), false),
        };

        Ok(Self {
            spelling: spell(ty, &base, kind.is_object()),
            name: name.to_string(),
            kind,
            nullable: !ty.is_non_null(),
            list: ty.is_list(),
            overridden,
        })
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        self.kind.is_object()
    }
}

// builtin_spelling
// custom scalars travel as strings unless overridden
fn builtin_spelling(name: &str, kind: DefinitionKind) -> String {
    match kind {
        DefinitionKind::Scalar => match name {
            "Int" => "int",
            "Float" => "float64",
            "Boolean" => "bool",
            _ => "string",
        }
        .to_string(),
        _ => name.to_string(),
    }
}

fn spell(ty: &TypeRef, base: &str, is_object: bool) -> String {
    match ty {
        TypeRef::Named { non_null, .. } => {
            if (!non_null || is_object) && !base.starts_with('*') {
                format!("*{base}")
            } else {
                base.to_string()
            }
        }
        TypeRef::List { of, .. } => format!("[]{}", spell(of, base, is_object)),
    }
}

///
/// TESTS
///
