use convert_case::{Case, Casing};

///
/// CONSTANTS
///

/// Suffix the ORM generator appends to a foreign-key column (`OrganizationID`).
pub const FOREIGN_KEY_SUFFIX: &str = "ID";

/// Suffix of the generated relationship struct (`userR`).
pub const RELATION_VIEW_SUFFIX: &str = "R";

/// Suffix of a to-many relation type token (`PostSlice`).
pub const SLICE_SUFFIX: &str = "Slice";

/// Timestamp columns that always sort last, in this relative order.
pub const TIMESTAMP_FIELDS: [&str; 3] = ["CreatedAt", "UpdatedAt", "DeletedAt"];

/// Column name marking a soft-deletable model.
pub const SOFT_DELETE_FIELD: &str = "DeletedAt";

/// Name of the primary-key column.
pub const PRIMARY_KEY_FIELD: &str = "ID";

// has_suffix
// true only when stripping `suffix` leaves a non-empty base
#[must_use]
pub fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() > suffix.len() && name.ends_with(suffix)
}

/// Case-insensitive variant of [`has_suffix`].
#[must_use]
pub fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
    if name.len() <= suffix.len() {
        return false;
    }

    name.get(name.len() - suffix.len()..)
        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Strip `suffix` from `name`, refusing to produce an empty base.
#[must_use]
pub fn trim_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if has_suffix(name, suffix) {
        Some(&name[..name.len() - suffix.len()])
    } else {
        None
    }
}

#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[must_use]
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn starts_lowercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_lowercase)
}

/// Convert a snake_case or lower-case identifier to PascalCase.
///
/// Identifiers that are already PascalCase are returned untouched so that
/// initialisms such as `UserID` survive.
#[must_use]
pub fn to_pascal(s: &str) -> String {
    if s.contains('_') || starts_lowercase(s) {
        s.to_case(Case::Pascal)
    } else {
        s.to_string()
    }
}

/// Name of the foreign-key column backing a relation.
#[must_use]
pub fn foreign_key_name(relation: &str) -> String {
    format!("{relation}{FOREIGN_KEY_SUFFIX}")
}

/// Relation accessor name for a foreign-key column (`OrganizationID` -> `Organization`).
#[must_use]
pub fn strip_foreign_key_suffix(column: &str) -> &str {
    trim_suffix(column, FOREIGN_KEY_SUFFIX).unwrap_or(column)
}

#[must_use]
pub fn is_primary_id_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("id")
}

// is_id_name
// organizationId, OrganizationID, userID... but never a bare `id`
#[must_use]
pub fn is_id_name(name: &str) -> bool {
    has_suffix_ignore_case(name, FOREIGN_KEY_SUFFIX)
}

/// Resolve the owning model of a relationship-view struct.
///
/// The generator names these structs `<lowerModel><suffix>`, so `userR`
/// belongs to `User`. Exported names and bare suffixes never qualify.
#[must_use]
pub fn relation_view_owner(type_name: &str, suffix: &str) -> Option<String> {
    if !starts_lowercase(type_name) {
        return None;
    }

    trim_suffix(type_name, suffix).map(upper_first)
}

/// Target model of a relation type token plus whether it is to-many.
#[must_use]
pub fn relation_target(token: &str) -> (&str, bool) {
    match trim_suffix(token, SLICE_SUFFIX) {
        Some(target) => (target, true),
        None => (token, false),
    }
}

/// Sort rank of a timestamp column; `None` for regular columns.
#[must_use]
pub fn timestamp_rank(field: &str) -> Option<usize> {
    TIMESTAMP_FIELDS
        .iter()
        .position(|name| *name == field)
        .map(|idx| idx + 1)
}

// is_textual_token
// string, *string, null.String
#[must_use]
pub fn is_textual_token(token: &str) -> bool {
    let body = token.trim_start_matches(['*', '[', ']']);
    let name = body.rsplit('.').next().unwrap_or(body);

    name.eq_ignore_ascii_case("string")
}

///
/// TESTS
///
