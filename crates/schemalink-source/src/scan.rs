//! Directory scanner: generated model sources -> flat field table.

use crate::{
    SourceError,
    parse::{DeclaredType, StructDecl, parse_file},
};
use log::{debug, trace, warn};
use schemalink_config::SourceConfig;
use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

///
/// ScannedField
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScannedField {
    pub declared: DeclaredType,
    pub token: String,
    pub order: usize,
}

///
/// FieldTable
///
/// `"Model.Field" -> ScannedField`, plus every struct name seen. Order
/// indices follow physical declaration order, file by file.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct FieldTable {
    fields: BTreeMap<String, ScannedField>,
    type_names: BTreeSet<String>,
    next_order: usize,
}

impl FieldTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one source file and append its struct fields.
    pub fn add_source(&mut self, src: &str) -> Result<(), SourceError> {
        let decls = parse_file(src)?;
        for decl in &decls {
            self.add_struct(decl);
        }

        Ok(())
    }

    fn add_struct(&mut self, decl: &StructDecl) {
        self.type_names.insert(decl.name.clone());

        for field in &decl.fields {
            let declared = DeclaredType::classify(&field.ty);
            if is_bookkeeping_field(&field.name, &declared) {
                continue;
            }

            let Some(token) = declared.token() else {
                debug!(
                    "unsupported type '{}' for {}.{} (line {}), skipping",
                    field.ty, decl.name, field.name, field.line
                );
                continue;
            };

            let key = field_key(&decl.name, &field.name);
            let order = self.next_order;
            self.next_order += 1;

            self.fields.insert(
                key,
                ScannedField {
                    declared,
                    token,
                    order,
                },
            );
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ScannedField> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn type_names(&self) -> &BTreeSet<String> {
        &self.type_names
    }

    /// Entries keyed by `"Model.Field"`, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScannedField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[must_use]
pub fn field_key(model: &str, field: &str) -> String {
    format!("{model}.{field}")
}

/// Split a `"Model.Field"` key at its first dot.
#[must_use]
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('.')
}

// is_bookkeeping_field
// the generator's `R *userR` / `L userL` members are not columns
fn is_bookkeeping_field(name: &str, declared: &DeclaredType) -> bool {
    matches!(name, "R" | "L")
        && matches!(declared, DeclaredType::Pointer(t) | DeclaredType::Ident(t)
            if t.chars().next().is_some_and(char::is_lowercase))
}

///
/// scan_dir
///
/// Scan every `.go` file in `dir` (non-recursive) in path order. Files that
/// fail to read or parse are skipped with a warning.
///

pub fn scan_dir(dir: &Path, config: &SourceConfig) -> Result<FieldTable, SourceError> {
    let mut table = FieldTable::new();

    for path in source_files(dir, config)? {
        let src = match fs::read_to_string(&path) {
            Ok(src) => src,
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                continue;
            }
        };

        if let Err(e) = table.add_source(&src) {
            warn!("skipping unparsable file {}: {e}", path.display());
        }
    }

    debug!(
        "scanned {} fields across {} types in {}",
        table.len(),
        table.type_names.len(),
        dir.display()
    );

    Ok(table)
}

fn source_files(dir: &Path, config: &SourceConfig) -> Result<Vec<PathBuf>, SourceError> {
    let read_dir = |source| SourceError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir)? {
        let path = entry.map_err(read_dir)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.extension().is_none_or(|ext| ext != "go") || !path.is_file() {
            continue;
        }
        if config.is_ignored(name) {
            trace!("ignoring {name}");
            continue;
        }

        files.push(path);
    }
    files.sort();

    Ok(files)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ORGANIZATION: &str = "package models\n\ntype Organization struct {\n\tID int\n\tName string\n\tR *organizationR\n\tL organizationL\n}\n\ntype organizationR struct {\n\tUsers UserSlice\n}\n\ntype organizationL struct{}\n";

    const USER: &str = "package models\n\ntype User struct {\n\tID int\n\tOrganizationID int\n\tAvatar *Image\n\tDeletedAt null.Time\n\tMeta map[string]string\n}\n\ntype userR struct {\n\tOrganization *Organization\n}\n";

    #[test]
    fn builds_keys_and_orders() {
        let mut table = FieldTable::new();
        table.add_source(ORGANIZATION).unwrap();
        table.add_source(USER).unwrap();

        let org_name = table.get("Organization.Name").unwrap();
        let user_id = table.get("User.ID").unwrap();
        assert!(org_name.order < user_id.order);

        assert_eq!(table.get("organizationR.Users").unwrap().token, "UserSlice");
        assert_eq!(table.get("userR.Organization").unwrap().token, "Organization");
        assert_eq!(table.get("User.Avatar").unwrap().token, "Image");
        assert_eq!(table.get("User.DeletedAt").unwrap().token, "null.Time");
    }

    #[test]
    fn skips_bookkeeping_and_unsupported_fields() {
        let mut table = FieldTable::new();
        table.add_source(ORGANIZATION).unwrap();
        table.add_source(USER).unwrap();

        assert!(table.get("Organization.R").is_none());
        assert!(table.get("Organization.L").is_none());
        assert!(table.get("User.Meta").is_none());
        assert!(table.type_names().contains("organizationL"));
    }

    #[test]
    fn keys_split_at_first_dot() {
        assert_eq!(split_key("User.ID"), Some(("User", "ID")));
        assert_eq!(split_key("nodot"), None);
    }

    #[test]
    fn scan_dir_skips_ignored_test_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("organizations.go"), ORGANIZATION).unwrap();
        fs::write(dir.path().join("users.go"), USER).unwrap();
        fs::write(dir.path().join("users_test.go"), "type Junk struct { A int }").unwrap();
        fs::write(dir.path().join("boil_queries.go"), "type Q struct { A int }").unwrap();
        fs::write(dir.path().join("broken.go"), "type Broken struct {\n A int int\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "type Text struct { A int }").unwrap();

        let table = scan_dir(dir.path(), &SourceConfig::default()).unwrap();

        assert!(table.get("User.ID").is_some());
        assert!(table.get("Organization.Name").is_some());
        assert!(table.get("Junk.A").is_none());
        assert!(table.get("Q.A").is_none());
        assert!(table.get("Broken.A").is_none());
        assert!(table.get("Text.A").is_none());
    }

    #[test]
    fn scan_dir_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_users.go"), USER).unwrap();
        fs::write(dir.path().join("a_organizations.go"), ORGANIZATION).unwrap();

        let first = scan_dir(dir.path(), &SourceConfig::default()).unwrap();
        let second = scan_dir(dir.path(), &SourceConfig::default()).unwrap();

        let orders = |t: &FieldTable| {
            t.iter()
                .map(|(k, f)| (k.to_string(), f.order))
                .collect::<Vec<_>>()
        };
        assert_eq!(orders(&first), orders(&second));
        assert!(
            first.get("Organization.ID").unwrap().order < first.get("User.ID").unwrap().order
        );
    }

    #[test]
    fn missing_dir_is_an_error() {
        let err = scan_dir(Path::new("/no/such/dir"), &SourceConfig::default()).unwrap_err();
        assert!(matches!(err, SourceError::ReadDir { .. }));
    }
}
