//! English inflection for table and model names.
//!
//! Only the regular rules plus a handful of irregular nouns; that is all the
//! generator itself applies when it titles tables.

const IRREGULAR: [(&str, &str); 2] = [("Person", "People"), ("Child", "Children")];

const SIBILANT_ENDINGS: [&str; 5] = ["s", "x", "z", "ch", "sh"];

#[must_use]
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    for (singular, plural) in IRREGULAR {
        if let Some(stem) = word.strip_suffix(singular) {
            return format!("{stem}{plural}");
        }
    }

    if let Some(stem) = word.strip_suffix('y')
        && stem.chars().last().is_some_and(is_consonant)
    {
        return format!("{stem}ies");
    }

    if SIBILANT_ENDINGS.iter().any(|end| word.ends_with(end)) {
        return format!("{word}es");
    }

    format!("{word}s")
}

#[must_use]
pub fn singularize(word: &str) -> String {
    for (singular, plural) in IRREGULAR {
        if let Some(stem) = word.strip_suffix(plural) {
            return format!("{stem}{singular}");
        }
    }

    if let Some(stem) = word.strip_suffix("ies")
        && !stem.is_empty()
    {
        return format!("{stem}y");
    }

    if let Some(stem) = word.strip_suffix("es")
        && ["ss", "us", "x", "z", "ch", "sh"]
            .iter()
            .any(|end| stem.ends_with(end))
        && !stem.ends_with("ous")
    {
        return stem.to_string();
    }

    if word.ends_with("ss") || word.ends_with("us") {
        return word.to_string();
    }

    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

const fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

///
/// TESTS
///
