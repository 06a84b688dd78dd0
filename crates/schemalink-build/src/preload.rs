//! Eager-load paths for relation fields.

use crate::reconcile::{UnifiedField, UnifiedModel};
use log::trace;
use schemalink_config::BuildConfig;
use schemalink_model::{ModelId, RelationalSchema};
use schemalink_schema::Role;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// PreloadEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PreloadEntry {
    /// API field key, dotted for nested entries (`organization.users`).
    pub key: String,

    /// One `<backend>.<Model>Rels.<Accessor>` segment per level.
    pub path: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_model: Option<String>,
}

impl PreloadEntry {
    /// Go expression joining the segments with dots.
    #[must_use]
    pub fn expression(&self) -> String {
        self.path.join(" + \".\" + ")
    }
}

/// Preload entries per `Normal` API type, keyed by type name.
#[must_use]
pub fn build_preloads(
    models: &[UnifiedModel],
    schema: &RelationalSchema,
    config: &BuildConfig,
) -> BTreeMap<String, Vec<PreloadEntry>> {
    PreloadBuilder::new(models, schema, config).build()
}

///
/// PreloadBuilder
///

struct PreloadBuilder<'a> {
    models: &'a [UnifiedModel],
    schema: &'a RelationalSchema,
    backend: &'a str,
    depth: usize,
    normal: BTreeMap<ModelId, &'a UnifiedModel>,
}

impl<'a> PreloadBuilder<'a> {
    fn new(
        models: &'a [UnifiedModel],
        schema: &'a RelationalSchema,
        config: &'a BuildConfig,
    ) -> Self {
        let mut normal = BTreeMap::new();
        for model in models.iter().filter(|m| m.role == Role::Normal) {
            if let Some(id) = model.model {
                normal.entry(id).or_insert(model);
            }
        }

        Self {
            models,
            schema,
            backend: &config.backend_package,
            depth: config.effective_preload_depth(),
            normal,
        }
    }

    fn build(&self) -> BTreeMap<String, Vec<PreloadEntry>> {
        let mut out = BTreeMap::new();

        for model in self.models.iter().filter(|m| m.role == Role::Normal) {
            let Some(id) = model.model else {
                continue;
            };

            let mut entries = Vec::new();
            let mut trail = vec![id];
            self.expand(model, "", &[], &mut trail, &mut entries);

            entries.sort_by(|a, b| a.key.cmp(&b.key));
            out.insert(model.name.clone(), entries);
        }

        out
    }

    // expand
    // `trail` holds the models on the current path; nested entries never
    // lead back onto it
    fn expand(
        &self,
        model: &UnifiedModel,
        prefix: &str,
        path: &[String],
        trail: &mut Vec<ModelId>,
        out: &mut Vec<PreloadEntry>,
    ) {
        let Some(relational) = model.model.and_then(|id| self.schema.get(id)) else {
            return;
        };

        for field in model.relations().filter(|f| f.is_object) {
            let Some((segment, target)) = self.segment(&relational.name, field) else {
                continue;
            };

            if !prefix.is_empty() && trail.contains(&target) {
                trace!("preload cycle at {prefix}.{}, skipping", field.name);
                continue;
            }

            let key = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let mut full = path.to_vec();
            full.push(segment);

            let related = self.schema.get(target).map(|m| m.name.clone());
            out.push(PreloadEntry {
                key: key.clone(),
                path: full.clone(),
                related_model: related,
            });

            if full.len() >= self.depth {
                continue;
            }
            let Some(next) = self.normal.get(&target) else {
                continue;
            };

            trail.push(target);
            self.expand(next, &key, &full, trail, out);
            trail.pop();
        }
    }

    fn segment(&self, model: &str, field: &UnifiedField) -> Option<(String, ModelId)> {
        let relation = field.column.as_ref()?.relation.as_ref()?;
        let segment = format!("{}.{model}Rels.{}", self.backend, relation.accessor);

        Some((segment, relation.target))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile;
    use schemalink_config::SchemaConfig;
    use schemalink_model::build_models;
    use schemalink_schema::{
        DefinitionKind, FieldDefinition, TypeDefinition, TypeRef, TypeSystem, classify,
    };
    use schemalink_source::{FieldTable, TableRegistry};

    const MODELS: &str = r"
type Organization struct {
	ID int
}

type organizationR struct {
	Users UserSlice
}

type User struct {
	ID             int
	OrganizationID int
}

type userR struct {
	Organization *Organization
	Posts        PostSlice
}

type Post struct {
	ID     int
	UserID int
}

type postR struct {
	User *User
}
";

    fn object(name: &str, fields: &[(&str, TypeRef)]) -> TypeDefinition {
        fields.iter().fold(
            TypeDefinition::new(DefinitionKind::Object, name),
            |def, (field, ty)| def.with_field(FieldDefinition::new(*field, ty.clone())),
        )
    }

    fn preloads(depth: usize) -> BTreeMap<String, Vec<PreloadEntry>> {
        let mut table = FieldTable::new();
        table.add_source(MODELS).unwrap();
        let schema = build_models(&table, &TableRegistry::default(), Vec::new());

        let many = |name: &str| TypeRef::list(TypeRef::named(name).non_null()).non_null();
        let types = TypeSystem::new(vec![
            object(
                "Organization",
                &[("id", TypeRef::named("ID").non_null()), ("users", many("User"))],
            ),
            object(
                "User",
                &[
                    ("id", TypeRef::named("ID").non_null()),
                    ("posts", many("Post")),
                    ("organization", TypeRef::named("Organization").non_null()),
                ],
            ),
            object(
                "Post",
                &[
                    ("id", TypeRef::named("ID").non_null()),
                    ("user", TypeRef::named("User").non_null()),
                ],
            ),
            object("UserPayload", &[("user", TypeRef::named("User"))]),
        ]);

        let classified = classify(&types, &schema, &SchemaConfig::default());
        let config = BuildConfig {
            preload_depth: depth,
            ..BuildConfig::default()
        };
        let unified = reconcile(&types, &schema, classified, &config).unwrap();

        build_preloads(&unified, &schema, &config)
    }

    fn keys(entries: &[PreloadEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn direct_relations_only_by_default() {
        let preloads = preloads(1);

        let user = &preloads["User"];
        assert_eq!(keys(user), vec!["organization", "posts"]);
        assert_eq!(user[0].path, vec!["models.UserRels.Organization".to_string()]);
        assert_eq!(user[0].related_model.as_deref(), Some("Organization"));
        assert_eq!(user[1].expression(), "models.UserRels.Posts");

        assert!(!preloads.contains_key("UserPayload"));
    }

    #[test]
    fn nested_expansion_stops_at_cycles() {
        let preloads = preloads(3);

        let org = &preloads["Organization"];
        assert_eq!(keys(org), vec!["users", "users.posts"]);
        assert_eq!(
            org[1].expression(),
            "models.OrganizationRels.Users + \".\" + models.UserRels.Posts"
        );

        let post = &preloads["Post"];
        assert_eq!(keys(post), vec!["user", "user.organization"]);
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(preloads(2), preloads(2));
    }
}
