//! Bindings between API enums and relational enum columns.

use log::{debug, warn};
use schemalink_model::RelationalSchema;
use schemalink_schema::{DefinitionKind, TypeDefinition, TypeSystem};
use schemalink_source::{EnumDef, EnumValue};
use serde::Serialize;

///
/// EnumBinding
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnumBinding {
    pub api_enum: String,
    pub db_enum: String,
    pub model: String,
    pub field: String,
    pub values: Vec<EnumValueBinding>,
}

///
/// EnumValueBinding
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnumValueBinding {
    /// API value (`IN_PROGRESS`).
    pub api: String,
    /// Generated constant (`TaskStatusInProgress`).
    pub constant: String,
    /// Stored value (`in_progress`).
    pub value: String,
}

/// Pair every API enum with the relational enum of the same name.
///
/// Names compare case-insensitively; values pair by normalized name.
#[must_use]
pub fn build_enum_bindings(types: &TypeSystem, schema: &RelationalSchema) -> Vec<EnumBinding> {
    let mut api_enums: Vec<&TypeDefinition> = types
        .types
        .iter()
        .filter(|t| t.kind == DefinitionKind::Enum && !t.name.starts_with("__"))
        .collect();
    api_enums.sort_by(|a, b| a.name.cmp(&b.name));

    api_enums
        .into_iter()
        .filter_map(|api| {
            let Some(def) = find_enum(schema, &api.name) else {
                debug!("api enum '{}' has no relational enum", api.name);
                return None;
            };

            Some(bind(api, def))
        })
        .collect()
}

fn find_enum<'a>(schema: &'a RelationalSchema, name: &str) -> Option<&'a EnumDef> {
    schema.iter().flat_map(|m| m.enums.iter()).find(|def| {
        def.name.eq_ignore_ascii_case(name)
            || format!("{}{}", def.model, def.field).eq_ignore_ascii_case(name)
    })
}

fn bind(api: &TypeDefinition, def: &EnumDef) -> EnumBinding {
    let mut values = Vec::with_capacity(api.enum_values.len());

    for api_value in &api.enum_values {
        let wanted = normalize(&api_value.name);
        let Some(db) = def
            .values
            .iter()
            .find(|v| normalize(&v.name) == wanted || normalize(&v.value) == wanted)
        else {
            warn!(
                "api enum value {}.{} has no match in '{}'",
                api.name, api_value.name, def.name
            );
            continue;
        };

        values.push(value_binding(&api_value.name, db));
    }

    EnumBinding {
        api_enum: api.name.clone(),
        db_enum: def.name.clone(),
        model: def.model.clone(),
        field: def.field.clone(),
        values,
    }
}

fn value_binding(api: &str, db: &EnumValue) -> EnumValueBinding {
    EnumValueBinding {
        api: api.to_string(),
        constant: db.constant.clone(),
        value: db.value.clone(),
    }
}

// normalize
// IN_PROGRESS, InProgress, in-progress -> inprogress
fn normalize(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use schemalink_model::build_models;
    use schemalink_source::{
        FieldTable, TableRegistry,
        registry::{parse_enums, parse_registry},
    };

    const TABLES: &str = "var TableNames = struct{}{\n\tTasks: \"tasks\",\n}\n";

    const TYPES: &str = r#"
// Enum values for TaskStatus
const (
	TaskStatusInProgress string = "in_progress"
	TaskStatusDone       string = "done"
)
"#;

    fn schema() -> RelationalSchema {
        let registry = TableRegistry::new(parse_registry(TABLES), Vec::new());
        let mut table = FieldTable::new();
        table
            .add_source("type Task struct {\n\tID int\n\tStatus string\n}\n")
            .unwrap();

        build_models(&table, &registry, parse_enums(TYPES, &registry))
    }

    #[test]
    fn binds_values_by_normalized_name() {
        let types = TypeSystem::new(vec![
            TypeDefinition::new(DefinitionKind::Enum, "TaskStatus")
                .with_enum_value("IN_PROGRESS")
                .with_enum_value("DONE")
                .with_enum_value("ARCHIVED"),
            TypeDefinition::new(DefinitionKind::Enum, "Unrelated").with_enum_value("A"),
        ]);

        let bindings = build_enum_bindings(&types, &schema());
        assert_eq!(bindings.len(), 1);

        let binding = &bindings[0];
        assert_eq!(binding.db_enum, "TaskStatus");
        assert_eq!(binding.model, "Task");
        assert_eq!(binding.field, "Status");

        let pairs: Vec<_> = binding
            .values
            .iter()
            .map(|v| (v.api.as_str(), v.constant.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("IN_PROGRESS", "TaskStatusInProgress", "in_progress"),
                ("DONE", "TaskStatusDone", "done"),
            ]
        );
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize("IN_PROGRESS"), "inprogress");
        assert_eq!(normalize("InProgress"), "inprogress");
        assert_eq!(normalize("in-progress"), "inprogress");
    }
}
