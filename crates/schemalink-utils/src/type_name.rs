use crate::naming::upper_first;

///
/// shorten_type_name
///
/// Drop import paths and selected package qualifiers from a Go type spelling.
///
/// - a fully qualified import path always collapses to the bare type name;
/// - a `pkg.Type` selector collapses only when `pkg` is listed in
///   `strip_packages`, anything else stays qualified (`*time.Time`);
/// - pointer and slice markers are preserved.
///
#[must_use]
pub fn shorten_type_name<S: AsRef<str>>(long: &str, strip_packages: &[S]) -> String {
    let (modifiers, body) = split_modifiers(long);
    let deep = body.contains('/');
    let last = body.rsplit('/').next().unwrap_or(body);

    if let Some((package, name)) = last.rsplit_once('.') {
        let stripped = strip_packages.iter().any(|p| p.as_ref() == package);
        if deep || stripped {
            return format!("{modifiers}{name}");
        }
    }

    format!("{modifiers}{last}")
}

///
/// canonical_type_token
///
/// Identifier-safe rendering of a type spelling, used to name converters.
/// `*string` -> `PointerString`, `null.String` -> `NullDotString`,
/// `[]*User` -> `PointerUserSlice`.
///
#[must_use]
pub fn canonical_type_token(spelling: &str) -> String {
    let (modifiers, body) = split_modifiers(spelling);
    let body = body.rsplit('/').next().unwrap_or(body);

    let pointers = modifiers.matches('*').count();
    let slices = modifiers.matches("[]").count();

    let mut out = "Pointer".repeat(pointers);
    let segments: Vec<String> = body.split('.').map(upper_first).collect();
    out.push_str(&segments.join("Dot"));
    out.push_str(&"Slice".repeat(slices));

    out
}

// split_modifiers
// leading run of `*` and `[]` markers, then the remaining type body
fn split_modifiers(spelling: &str) -> (&str, &str) {
    let mut idx = 0;
    let bytes = spelling.as_bytes();

    loop {
        match bytes.get(idx..) {
            Some([b'*', ..]) => idx += 1,
            Some([b'[', b']', ..]) => idx += 2,
            _ => break,
        }
    }

    spelling.split_at(idx)
}

///
/// TESTS
///
