//! City list helpers.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Normalisation used for matching labels only, never for display:
/// newlines and whitespace runs collapse to one space, ends are trimmed,
/// and letters are lowercased.
pub fn normalize_label(label: &str) -> String {
    WHITESPACE_RE
        .replace_all(label.trim(), " ")
        .to_lowercase()
}

/// Trim entries, drop blanks and drop repeats while keeping first-seen order.
pub fn dedupe_preserving_order<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }
    out
}

/// Position of `wanted` in `cities`, compared after normalisation.
pub fn find_city(cities: &[String], wanted: &str) -> Option<usize> {
    let wanted = normalize_label(wanted);
    cities.iter().position(|c| normalize_label(c) == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Нижний\nНовгород "), "нижний новгород");
        assert_eq!(normalize_label("Saint   Petersburg"), "saint petersburg");
    }

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let out = dedupe_preserving_order(["Москва", " Казань ", "", "Москва", "Сочи", "Казань"]);
        assert_eq!(out, vec!["Москва", "Казань", "Сочи"]);
    }

    #[test]
    fn test_find_city() {
        let cities = vec!["Москва".to_string(), "Нижний Новгород".to_string()];
        assert_eq!(find_city(&cities, "нижний  новгород"), Some(1));
        assert_eq!(find_city(&cities, "Самара"), None);
    }
}
