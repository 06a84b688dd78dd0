//! Field reconciliation: API fields onto relational columns.

use crate::{
    BuildError,
    api_type::ApiType,
    convert::{ConvertConfig, Converters, IdTarget},
};
use log::{debug, warn};
use schemalink_config::BuildConfig;
use schemalink_model::{ModelId, PrimaryKeyKind, RelationalField, RelationalModel, RelationalSchema};
use schemalink_schema::{
    DefinitionKind, FieldDefinition, Role, SchemaType, TypeDefinition, TypeSystem, base_name,
};
use schemalink_source::EnumDef;
use schemalink_utils::{
    eq_ignore_case, foreign_key_name, has_suffix, is_id_name, is_primary_id_name,
    is_textual_token,
};
use serde::Serialize;

// fields that exist for pagination, filtering or mutation plumbing and
// never have a column behind them
const PLACEHOLDER_FIELDS: [&str; 19] = [
    "and",
    "clientMutationId",
    "cursor",
    "direction",
    "edges",
    "endCursor",
    "field",
    "hasNextPage",
    "hasPreviousPage",
    "ids",
    "node",
    "or",
    "pageInfo",
    "search",
    "sort",
    "startCursor",
    "totalCount",
    "where",
    "withDeleted",
];

///
/// UnifiedModel
///

#[derive(Clone, Debug, Serialize)]
pub struct UnifiedModel {
    pub name: String,
    pub kind: DefinitionKind,
    pub role: Role,
    pub base_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    pub fields: Vec<UnifiedField>,
}

impl UnifiedModel {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&UnifiedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relations(&self) -> impl Iterator<Item = &UnifiedField> {
        self.fields.iter().filter(|f| f.is_relation)
    }
}

///
/// UnifiedField
///

#[derive(Clone, Debug, Serialize)]
pub struct UnifiedField {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub api_type: ApiType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<RelationalField>,

    pub is_primary_id: bool,
    pub is_number_id: bool,
    pub is_primary_number_id: bool,
    pub is_primary_string_id: bool,
    pub is_relation: bool,
    pub is_plural: bool,
    pub is_object: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_def: Option<EnumDef>,

    pub convert: ConvertConfig,
}

/// Reconcile every classified type against the relational schema.
pub fn reconcile(
    types: &TypeSystem,
    schema: &RelationalSchema,
    classified: Vec<SchemaType>,
    config: &BuildConfig,
) -> Result<Vec<UnifiedModel>, BuildError> {
    Reconciler::new(types, schema, config).reconcile(classified)
}

///
/// Reconciler
///

pub struct Reconciler<'a> {
    types: &'a TypeSystem,
    schema: &'a RelationalSchema,
    config: &'a BuildConfig,
    converters: Converters<'a>,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(
        types: &'a TypeSystem,
        schema: &'a RelationalSchema,
        config: &'a BuildConfig,
    ) -> Self {
        Self {
            types,
            schema,
            config,
            converters: Converters::new(&config.converter_namespace),
        }
    }

    pub fn reconcile(&self, classified: Vec<SchemaType>) -> Result<Vec<UnifiedModel>, BuildError> {
        let mut models = Vec::with_capacity(classified.len());

        for schema_type in classified {
            let Some(def) = self.types.get(&schema_type.name) else {
                return Err(BuildError::UnknownType(schema_type.name));
            };
            let Some(model) = schema_type.model.and_then(|id| self.schema.get(id)) else {
                if !schema_type.role.is_exempt() {
                    warn!(
                        "{} '{}' has no relational model, excluding",
                        schema_type.role, schema_type.name
                    );
                }
                continue;
            };

            models.push(self.model(def, schema_type, model)?);
        }

        Ok(models)
    }

    fn model(
        &self,
        def: &TypeDefinition,
        schema_type: SchemaType,
        model: &RelationalModel,
    ) -> Result<UnifiedModel, BuildError> {
        let mut fields = Vec::with_capacity(def.fields.len());

        for field_def in &def.fields {
            let field = self.field(field_def, model)?;

            if field.column.is_none()
                && !self.is_placeholder(field_def, &field, schema_type.role, model)
            {
                debug!("{}.{} has no column on {}", def.name, field.name, model.name);
                if schema_type.role == Role::Normal {
                    continue;
                }
            }

            fields.push(field);
        }

        Ok(UnifiedModel {
            name: schema_type.name,
            kind: schema_type.kind,
            role: schema_type.role,
            base_name: schema_type.base_name,
            model: Some(model.id),
            description: def.description.clone(),
            interfaces: def.interfaces.clone(),
            fields,
        })
    }

    fn field(
        &self,
        def: &FieldDefinition,
        model: &RelationalModel,
    ) -> Result<UnifiedField, BuildError> {
        let api_type = ApiType::resolve(&def.ty, self.types, self.config)?;
        let is_object = api_type.is_object();
        let column = match_column(&def.name, is_object, model);

        let is_primary_id = is_primary_id_name(&def.name);
        let is_number_id = is_id_name(&def.name)
            && column.is_some_and(|c| !is_textual_token(&c.token));
        let is_relation = column.is_some_and(RelationalField::is_relation);
        let enum_def = column.and_then(|c| model.enum_for(c)).cloned();

        let convert = match column {
            Some(column) => self.convert(&api_type, column, model, is_primary_id, is_number_id),
            None => ConvertConfig::identity(&api_type, None),
        };

        Ok(UnifiedField {
            name: def.name.clone(),
            description: def.description.clone(),
            is_primary_id,
            is_number_id,
            is_primary_number_id: is_primary_id && model.primary_key == PrimaryKeyKind::Numeric,
            is_primary_string_id: is_primary_id && model.primary_key == PrimaryKeyKind::Text,
            is_relation,
            is_plural: api_type.list,
            is_object,
            column: column.cloned(),
            enum_def,
            convert,
            api_type,
        })
    }

    fn convert(
        &self,
        api: &ApiType,
        column: &RelationalField,
        model: &RelationalModel,
        is_primary_id: bool,
        is_number_id: bool,
    ) -> ConvertConfig {
        if column.is_enum() {
            return self.converters.for_enum(api, column);
        }
        if api.is_object() {
            return ConvertConfig::identity(api, Some(column));
        }

        if is_primary_id {
            let target = IdTarget {
                namespace: &model.name,
                kind: model.primary_key,
            };
            return self.converters.for_id(api, column, &target);
        }
        if is_number_id && let Some(related) = self.schema.related(column) {
            let target = IdTarget {
                namespace: &related.name,
                kind: related.primary_key,
            };
            return self.converters.for_id(api, column, &target);
        }

        self.converters.for_value(api, column)
    }

    // is_placeholder
    // structural fields that are fine without a column
    fn is_placeholder(
        &self,
        def: &FieldDefinition,
        field: &UnifiedField,
        role: Role,
        model: &RelationalModel,
    ) -> bool {
        if PLACEHOLDER_FIELDS.contains(&def.name.as_str())
            || self.config.placeholder_fields.iter().any(|p| *p == def.name)
            || field.is_plural
        {
            return true;
        }

        // payload wrapper: `user: User` on `UserPayload`
        field.is_object
            && (has_suffix(&field.api_type.name, "Payload")
                || (role == Role::Payload
                    && eq_ignore_case(base_name(&field.api_type.name), &model.name)))
    }
}

// match_column
// object-kinded fields prefer their foreign-key column
fn match_column<'m>(
    name: &str,
    is_object: bool,
    model: &'m RelationalModel,
) -> Option<&'m RelationalField> {
    let by_fk = || model.field_ignore_case(&foreign_key_name(name));

    if is_object {
        by_fk().or_else(|| model.field_ignore_case(name))
    } else {
        model.field_ignore_case(name)
    }
}

///
/// TESTS
///
