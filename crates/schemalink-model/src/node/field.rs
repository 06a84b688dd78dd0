use crate::node::ModelId;
use derive_more::Display;
use serde::Serialize;

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationKind {
    /// Reached through an existing `<Accessor>ID` column.
    ForeignKey,
    /// No backing column; the relation is a field of its own.
    Virtual,
}

///
/// Relation
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Relation {
    pub target: ModelId,
    pub target_name: String,
    pub kind: RelationKind,

    /// Name of the eager-load accessor (`Organization`, `Posts`).
    pub accessor: String,
    pub to_many: bool,
}

///
/// RelationalField
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelationalField {
    pub name: String,
    pub token: String,
    pub order: usize,
    pub required: bool,

    /// Name of the owning model.
    pub owner: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<Relation>,
}

impl RelationalField {
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.relation.is_some()
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        self.enum_name.is_some()
    }

    #[must_use]
    pub fn is_foreign_key(&self) -> bool {
        self.relation_kind() == Some(RelationKind::ForeignKey)
    }

    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.relation_kind() == Some(RelationKind::Virtual)
    }

    #[must_use]
    pub fn is_to_many(&self) -> bool {
        self.relation.as_ref().is_some_and(|r| r.to_many)
    }

    #[must_use]
    pub fn relation_kind(&self) -> Option<RelationKind> {
        self.relation.as_ref().map(|r| r.kind)
    }

    /// Virtual relations have no column behind them.
    #[must_use]
    pub fn has_column(&self) -> bool {
        !self.is_virtual()
    }
}
