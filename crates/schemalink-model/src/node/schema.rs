use crate::node::{Relation, RelationalField, RelationalModel};
use derive_more::Display;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// ModelId
/// Index of a model in its [`RelationalSchema`].
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[display("#{_0}")]
pub struct ModelId(usize);

impl ModelId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// RelationalSchema
///
/// Arena owning every model of a run. Relations point into it by
/// [`ModelId`], so every target resolves by construction.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct RelationalSchema {
    models: Vec<RelationalModel>,

    #[serde(skip)]
    by_name: BTreeMap<String, ModelId>,

    #[serde(skip)]
    by_lower_name: BTreeMap<String, ModelId>,
}

impl RelationalSchema {
    pub(crate) fn new(models: Vec<RelationalModel>) -> Self {
        let mut by_name = BTreeMap::new();
        let mut by_lower_name = BTreeMap::new();

        for model in &models {
            by_name.insert(model.name.clone(), model.id);
            by_lower_name
                .entry(model.name.to_ascii_lowercase())
                .or_insert(model.id);
        }

        Self {
            models,
            by_name,
            by_lower_name,
        }
    }

    #[must_use]
    pub fn get(&self, id: ModelId) -> Option<&RelationalModel> {
        self.models.get(id.index())
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&RelationalModel> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Exact match first, then ASCII case-insensitive.
    #[must_use]
    pub fn by_name_ignore_case(&self, name: &str) -> Option<&RelationalModel> {
        self.by_name(name).or_else(|| {
            self.by_lower_name
                .get(&name.to_ascii_lowercase())
                .and_then(|id| self.get(*id))
        })
    }

    /// Model a relation points at.
    #[must_use]
    pub fn target(&self, relation: &Relation) -> Option<&RelationalModel> {
        self.get(relation.target)
    }

    /// Model the field relates to, if it is a relation.
    #[must_use]
    pub fn related(&self, field: &RelationalField) -> Option<&RelationalModel> {
        field.relation.as_ref().and_then(|r| self.target(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationalModel> {
        self.models.iter()
    }

    #[must_use]
    pub fn models(&self) -> &[RelationalModel] {
        &self.models
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
