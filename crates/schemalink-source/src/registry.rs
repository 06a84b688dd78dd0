//! Registry readers for the generator's fixed-name helper files.
//!
//! These files are never parsed as Go; the shapes we need are regular enough
//! for line patterns, and the helpers contain constructs (struct literals,
//! const blocks) the declaration parser deliberately ignores.

use log::{debug, warn};
use regex::Regex;
use schemalink_config::SourceConfig;
use schemalink_utils::{pluralize, singularize, to_pascal};
use serde::Serialize;
use std::{fs, path::Path, sync::LazyLock};

///
/// PATTERNS
///

// `Users: "users",`
static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*"([^"]*)"\s*,?\s*$"#)
        .expect("registry entry pattern is valid")
});

// `// Enum values for UserRole` followed by a `const ( ... )` group
static ENUM_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^\s*//\s*Enum values for\s+([A-Za-z0-9_]+)\s*$\s*const\s*\((.*?)^\s*\)")
        .expect("enum block pattern is valid")
});

// `UserRoleAdmin string = "admin"` or `UserRoleAdmin UserRole = "admin"`
static ENUM_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*([A-Za-z_][A-Za-z0-9_]*)(?:\s+[A-Za-z_][A-Za-z0-9_.]*)?\s*=\s*"([^"]*)""#)
        .expect("enum value pattern is valid")
});

///
/// RegistryEntry
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RegistryEntry {
    /// Field name in the registry struct (`Users`).
    pub key: String,
    /// Literal table or view name (`users`).
    pub value: String,
}

///
/// TableKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum TableKind {
    Table,
    View,
}

/// Extract `Key: "value"` entries in declaration order.
#[must_use]
pub fn parse_registry(text: &str) -> Vec<RegistryEntry> {
    ENTRY_RE
        .captures_iter(text)
        .map(|cap| RegistryEntry {
            key: cap[1].to_string(),
            value: cap[2].to_string(),
        })
        .collect()
}

/// Read a registry file; a missing or unreadable file yields no entries.
#[must_use]
pub fn read_registry(path: &Path) -> Vec<RegistryEntry> {
    match fs::read_to_string(path) {
        Ok(text) => parse_registry(&text),
        Err(e) => {
            warn!("registry file {} unavailable: {e}", path.display());
            Vec::new()
        }
    }
}

/// Table names from the table registry file.
#[must_use]
pub fn read_table_names(dir: &Path, config: &SourceConfig) -> Vec<RegistryEntry> {
    read_registry(&dir.join(&config.table_names_file))
}

/// View names from the view registry file.
#[must_use]
pub fn read_view_names(dir: &Path, config: &SourceConfig) -> Vec<RegistryEntry> {
    read_registry(&dir.join(&config.view_names_file))
}

///
/// TableRegistry
/// Table and view names recovered from the registry files.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct TableRegistry {
    pub tables: Vec<RegistryEntry>,
    pub views: Vec<RegistryEntry>,
}

impl TableRegistry {
    #[must_use]
    pub const fn new(tables: Vec<RegistryEntry>, views: Vec<RegistryEntry>) -> Self {
        Self { tables, views }
    }

    #[must_use]
    pub fn load(dir: &Path, config: &SourceConfig) -> Self {
        let tables = read_table_names(dir, config);
        let views = read_view_names(dir, config);
        debug!("registry: {} tables, {} views", tables.len(), views.len());

        Self::new(tables, views)
    }

    /// Resolve a model name: exact key match first, then the pluralized key.
    #[must_use]
    pub fn lookup(&self, model: &str) -> Option<(&RegistryEntry, TableKind)> {
        let plural = pluralize(model);

        [model, plural.as_str()].into_iter().find_map(|candidate| {
            self.entries().find(|(entry, _)| {
                entry.key == candidate || to_pascal(&entry.value) == candidate
            })
        })
    }

    /// Literal table (or view) name for a model, if registered.
    #[must_use]
    pub fn table_for(&self, model: &str) -> Option<&str> {
        self.lookup(model).map(|(entry, _)| entry.value.as_str())
    }

    #[must_use]
    pub fn is_view(&self, model: &str) -> bool {
        matches!(self.lookup(model), Some((_, TableKind::View)))
    }

    fn entries(&self) -> impl Iterator<Item = (&RegistryEntry, TableKind)> {
        self.tables
            .iter()
            .map(|e| (e, TableKind::Table))
            .chain(self.views.iter().map(|e| (e, TableKind::View)))
    }

    /// Every table-like name in PascalCase (plural and singular forms),
    /// longest first so that prefix matching prefers compound names.
    #[must_use]
    pub fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries()
            .flat_map(|(entry, _)| {
                let value = to_pascal(&entry.value);
                [
                    singularize(&entry.key),
                    singularize(&value),
                    entry.key.clone(),
                    value,
                ]
            })
            .filter(|name| !name.is_empty())
            .collect();

        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        names
    }
}

///
/// EnumValue
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnumValue {
    /// Constant name without the enum title (`Admin`).
    pub name: String,
    /// Full constant name (`UserRoleAdmin`).
    pub constant: String,
    /// Stored value (`admin`).
    pub value: String,
}

///
/// EnumDef
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EnumDef {
    pub name: String,
    /// Owning model, singular form of `prefix` until a model claims it.
    pub model: String,
    /// Table-like name the title starts with (`Users`, `News`).
    pub prefix: String,
    pub field: String,
    pub values: Vec<EnumValue>,
}

/// Split an enum title into (table-like prefix, field) by stripping the
/// longest known table-like name. `known_names` must already be sorted
/// longest first.
#[must_use]
pub fn split_enum_title(title: &str, known_names: &[String]) -> Option<(String, String)> {
    let title = to_pascal(title);

    known_names.iter().find_map(|name| {
        let field = title.strip_prefix(name.as_str())?;
        if field.is_empty() || !field.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }

        Some((name.clone(), field.to_string()))
    })
}

/// Extract enum groups from the enum registry text.
#[must_use]
pub fn parse_enums(text: &str, registry: &TableRegistry) -> Vec<EnumDef> {
    let known = registry.known_names();
    let mut enums = Vec::new();

    for block in ENUM_BLOCK_RE.captures_iter(text) {
        let title = to_pascal(&block[1]);
        let Some((prefix, field)) = split_enum_title(&title, &known) else {
            warn!("enum '{title}' does not start with a known table name, skipping");
            continue;
        };

        let values = ENUM_VALUE_RE
            .captures_iter(&block[2])
            .map(|cap| {
                let constant = cap[1].to_string();
                let name = constant
                    .strip_prefix(title.as_str())
                    .filter(|rest| !rest.is_empty())
                    .unwrap_or(&constant)
                    .to_string();

                EnumValue {
                    name,
                    constant,
                    value: cap[2].to_string(),
                }
            })
            .collect();

        enums.push(EnumDef {
            name: title,
            model: singularize(&prefix),
            prefix,
            field,
            values,
        });
    }

    enums
}

/// Read the enum registry file; a missing file yields no enums.
#[must_use]
pub fn read_enums(dir: &Path, config: &SourceConfig, registry: &TableRegistry) -> Vec<EnumDef> {
    let path = dir.join(&config.enums_file);
    match fs::read_to_string(&path) {
        Ok(text) => parse_enums(&text, registry),
        Err(e) => {
            warn!("enum file {} unavailable: {e}", path.display());
            Vec::new()
        }
    }
}

///
/// TESTS
///
