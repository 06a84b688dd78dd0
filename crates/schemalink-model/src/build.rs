//! Relational model builder.
//!
//! Folds the scanner's flat `"Model.Field"` table into a graph of models.
//! Each phase is a separate pass over the drafts; nothing is shared between
//! runs.

use crate::node::{
    ModelId, PrimaryKeyKind, Relation, RelationKind, RelationalField, RelationalModel,
    RelationalSchema,
};
use log::{debug, info, trace, warn};
use schemalink_source::{EnumDef, FieldTable, ScannedField, TableRegistry, split_key};
use schemalink_utils::{
    RELATION_VIEW_SUFFIX, SOFT_DELETE_FIELD, foreign_key_name, pluralize, relation_target,
    relation_view_owner, timestamp_rank,
};
use std::collections::BTreeMap;

/// Build the relational schema with the generator's default `R` suffix.
#[must_use]
pub fn build_models(
    table: &FieldTable,
    registry: &TableRegistry,
    enums: Vec<EnumDef>,
) -> RelationalSchema {
    ModelBuilder::new(table, registry).enums(enums).build()
}

///
/// ModelBuilder
///

pub struct ModelBuilder<'a> {
    table: &'a FieldTable,
    registry: &'a TableRegistry,
    enums: Vec<EnumDef>,
    relation_suffix: String,
}

///
/// Draft
///

struct Draft {
    name: String,
    fields: Vec<DraftField>,
}

impl Draft {
    fn field_mut(&mut self, name: &str) -> Option<&mut DraftField> {
        self.fields.iter_mut().find(|f| f.field.name == name)
    }
}

struct DraftField {
    field: RelationalField,
    sort_key: usize,
    link: Option<Link>,
}

// relation before its target is resolved
struct Link {
    target: String,
    kind: RelationKind,
    accessor: String,
    to_many: bool,
}

// relation accessor seen on a `<model>R` struct
struct Candidate<'t> {
    owner: String,
    name: &'t str,
    scanned: &'t ScannedField,
    sort_key: usize,
}

impl<'a> ModelBuilder<'a> {
    #[must_use]
    pub fn new(table: &'a FieldTable, registry: &'a TableRegistry) -> Self {
        Self {
            table,
            registry,
            enums: Vec::new(),
            relation_suffix: RELATION_VIEW_SUFFIX.to_string(),
        }
    }

    #[must_use]
    pub fn enums(mut self, enums: Vec<EnumDef>) -> Self {
        self.enums = enums;
        self
    }

    #[must_use]
    pub fn relation_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.relation_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn build(self) -> RelationalSchema {
        // Phase 1: timestamp-boosted ordering
        let entries = self.sorted_entries();

        // Phase 2: partition into columns and relation candidates
        let (mut drafts, candidates) = self.partition(&entries);

        // Phase 3: foreign-key or virtual attachment
        for candidate in candidates {
            attach_relation(&mut drafts, candidate);
        }
        for draft in &mut drafts {
            draft.fields.sort_by_key(|f| f.sort_key);
        }

        // Phase 4: resolve targets, demoting anything dangling
        let ids = model_ids(&drafts);
        let mut models: Vec<RelationalModel> = drafts
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| resolve(ModelId::new(idx), draft, &ids))
            .collect();

        // Phase 5: enums
        for def in self.enums {
            attach_enum(&mut models, def);
        }

        // Phase 6: model-level flags
        for model in &mut models {
            derive_flags(self.registry, model);
        }

        info!("built {} relational models", models.len());

        RelationalSchema::new(models)
    }

    // sorted_entries
    // CreatedAt, UpdatedAt, DeletedAt are pushed past every other order
    // index by one, two and three stages
    fn sorted_entries(&self) -> Vec<(&'a str, &'a ScannedField, usize)> {
        let stage = self
            .table
            .iter()
            .map(|(_, f)| f.order)
            .max()
            .map_or(1, |max| max + 1);

        let mut entries: Vec<_> = self
            .table
            .iter()
            .map(|(key, field)| {
                let name = split_key(key).map_or(key, |(_, name)| name);
                let boost = timestamp_rank(name).unwrap_or(0) * stage;

                (key, field, field.order + boost)
            })
            .collect();
        entries.sort_by_key(|(_, _, sort_key)| *sort_key);

        entries
    }

    fn partition<'t>(
        &self,
        entries: &[(&'t str, &'t ScannedField, usize)],
    ) -> (Vec<Draft>, Vec<Candidate<'t>>) {
        let mut drafts: Vec<Draft> = Vec::new();
        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut candidates = Vec::new();

        for &(key, scanned, sort_key) in entries {
            let Some((model, name)) = split_key(key) else {
                continue;
            };

            if let Some(owner) = relation_view_owner(model, &self.relation_suffix) {
                candidates.push(Candidate {
                    owner,
                    name,
                    scanned,
                    sort_key,
                });
                continue;
            }
            if model.starts_with(|c: char| c.is_lowercase()) {
                trace!("ignoring unexported type field {key}");
                continue;
            }

            let slot = *index.entry(model).or_insert_with(|| {
                drafts.push(Draft {
                    name: model.to_string(),
                    fields: Vec::new(),
                });
                drafts.len() - 1
            });

            drafts[slot].fields.push(DraftField {
                field: RelationalField {
                    name: name.to_string(),
                    token: scanned.token.clone(),
                    order: scanned.order,
                    required: !scanned.declared.is_nullable(),
                    owner: model.to_string(),
                    enum_name: None,
                    relation: None,
                },
                sort_key,
                link: None,
            });
        }

        (drafts, candidates)
    }
}

fn derive_flags(registry: &TableRegistry, model: &mut RelationalModel) {
    model.primary_key = model
        .primary_key_field()
        .map_or(PrimaryKeyKind::Numeric, |f| PrimaryKeyKind::from_token(&f.token));
    model.soft_delete = model.field(SOFT_DELETE_FIELD).is_some();
    model.is_view = registry.is_view(&model.name);
    model.table_name = registry
        .table_for(&model.name)
        .unwrap_or(&model.name)
        .to_string();
    model.plural_name = pluralize(&model.name);
}

// owner_index
// exact name first; the lower-cased view name loses initialisms (`apiKeyR`)
fn owner_index(drafts: &[Draft], owner: &str) -> Option<usize> {
    drafts
        .iter()
        .position(|d| d.name == owner)
        .or_else(|| drafts.iter().position(|d| d.name.eq_ignore_ascii_case(owner)))
}

fn attach_relation(drafts: &mut [Draft], candidate: Candidate<'_>) {
    let Some(idx) = owner_index(drafts, &candidate.owner) else {
        debug!(
            "relation {}.{} has no owning model, skipping",
            candidate.owner, candidate.name
        );
        return;
    };
    let draft = &mut drafts[idx];

    let (target, to_many) = relation_target(&candidate.scanned.token);
    let link = |kind| Link {
        target: target.to_string(),
        kind,
        accessor: candidate.name.to_string(),
        to_many,
    };

    let fk = foreign_key_name(candidate.name);
    if let Some(column) = draft.field_mut(&fk)
        && column.link.is_none()
    {
        column.link = Some(link(RelationKind::ForeignKey));
        return;
    }

    if draft.field_mut(candidate.name).is_some() {
        warn!(
            "relation {}.{} collides with a column of the same name, skipping",
            draft.name, candidate.name
        );
        return;
    }

    draft.fields.push(DraftField {
        field: RelationalField {
            name: candidate.name.to_string(),
            token: candidate.scanned.token.clone(),
            order: candidate.scanned.order,
            required: false,
            owner: draft.name.clone(),
            enum_name: None,
            relation: None,
        },
        sort_key: candidate.sort_key,
        link: Some(link(RelationKind::Virtual)),
    });
}

fn model_ids(drafts: &[Draft]) -> BTreeMap<String, (ModelId, String)> {
    drafts
        .iter()
        .enumerate()
        .rev()
        .map(|(idx, d)| {
            (
                d.name.to_ascii_lowercase(),
                (ModelId::new(idx), d.name.clone()),
            )
        })
        .collect()
}

fn resolve(
    id: ModelId,
    draft: Draft,
    ids: &BTreeMap<String, (ModelId, String)>,
) -> RelationalModel {
    let mut fields = Vec::with_capacity(draft.fields.len());

    for DraftField {
        mut field, link, ..
    } in draft.fields
    {
        if let Some(link) = link {
            match ids.get(&link.target.to_ascii_lowercase()) {
                Some((target, target_name)) => {
                    field.relation = Some(Relation {
                        target: *target,
                        target_name: target_name.clone(),
                        kind: link.kind,
                        accessor: link.accessor,
                        to_many: link.to_many,
                    });
                }
                None if link.kind == RelationKind::Virtual => {
                    warn!(
                        "relation {}.{} targets unknown model '{}', dropping",
                        draft.name, field.name, link.target
                    );
                    continue;
                }
                None => {
                    warn!(
                        "relation {}.{} targets unknown model '{}', demoting to a plain column",
                        draft.name, link.accessor, link.target
                    );
                }
            }
        }

        fields.push(field);
    }

    RelationalModel {
        id,
        name: draft.name,
        table_name: String::new(),
        plural_name: String::new(),
        fields,
        enums: Vec::new(),
        primary_key: PrimaryKeyKind::default(),
        soft_delete: false,
        is_view: false,
    }
}

// enum_owner
// singular model name first, then the title prefix itself (`News`)
fn enum_owner(models: &[RelationalModel], def: &EnumDef) -> Option<usize> {
    models
        .iter()
        .position(|m| m.name == def.model)
        .or_else(|| {
            [def.model.as_str(), def.prefix.as_str()]
                .into_iter()
                .find_map(|name| models.iter().position(|m| m.name.eq_ignore_ascii_case(name)))
        })
}

fn attach_enum(models: &mut [RelationalModel], mut def: EnumDef) {
    let Some(idx) = enum_owner(models, &def) else {
        debug!("enum '{}' has no model '{}', skipping", def.name, def.model);
        return;
    };
    let model = &mut models[idx];
    def.model.clone_from(&model.name);

    let Some(field) = model
        .fields
        .iter_mut()
        .find(|f| f.name.eq_ignore_ascii_case(&def.field))
    else {
        debug!(
            "enum '{}' has no field {}.{}, skipping",
            def.name, model.name, def.field
        );
        return;
    };

    if field.relation.take().is_some() {
        debug!("{}.{} is enum-bound, clearing its relation", model.name, field.name);
    }
    field.enum_name = Some(def.name.clone());
    model.enums.push(def);
}

///
/// TESTS
///
