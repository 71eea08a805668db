//! Comparator factory
//!
//! Builds the total order used within one tier. Ties cascade through
//! `fallback_sort` chains (or the subgroup-order sentinel); whatever is
//! still tied after that is left to the resolver's stable sort, which
//! preserves source order.

use std::borrow::Cow;
use std::cmp::Ordering;

use ordlint_core::Element;

use crate::config::{CompiledSort, Fallback, SortKind, SortOrder, SpecialCharacters};

/// Compare two elements under one sort spec. `sub_a`/`sub_b` are the
/// elements' sub-group ordinals, consumed by the subgroup-order fallback.
pub fn compare_elements(
    sort: &CompiledSort,
    a: &Element,
    b: &Element,
    sub_a: usize,
    sub_b: usize,
) -> Ordering {
    let ordering = compare_once(sort, a, b);
    if ordering != Ordering::Equal {
        return ordering;
    }
    match sort.fallback.as_deref() {
        None => Ordering::Equal,
        Some(Fallback::SubgroupOrder) => sub_a.cmp(&sub_b),
        Some(Fallback::Sort(inner)) => compare_elements(inner, a, b, sub_a, sub_b),
    }
}

fn compare_once(sort: &CompiledSort, a: &Element, b: &Element) -> Ordering {
    let ordering = match sort.kind {
        SortKind::Unsorted => Ordering::Equal,
        SortKind::LineLength => {
            let len_a = a.text.chars().count();
            let len_b = b.text.chars().count();
            len_a.cmp(&len_b)
        }
        SortKind::Alphabetical => {
            let key_a = sort_key(&a.name, sort.special_characters);
            let key_b = sort_key(&b.name, sort.special_characters);
            collate(&key_a, &key_b)
        }
        SortKind::Natural => {
            let key_a = sort_key(&a.name, sort.special_characters);
            let key_b = sort_key(&b.name, sort.special_characters);
            natural_compare(&key_a, &key_b)
        }
        SortKind::CustomAlphabet => {
            let key_a = sort_key(&a.name, sort.special_characters);
            let key_b = sort_key(&b.name, sort.special_characters);
            let alphabet = sort
                .alphabet
                .as_ref()
                .expect("custom-alphabet sort always compiles with an alphabet");
            alphabet_compare(&key_a, &key_b, alphabet)
        }
    };

    match sort.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn sort_key(name: &str, special: SpecialCharacters) -> Cow<'_, str> {
    match special {
        SpecialCharacters::Keep => Cow::Borrowed(name),
        SpecialCharacters::Trim => {
            Cow::Borrowed(name.trim_start_matches(|c: char| !c.is_alphanumeric()))
        }
        SpecialCharacters::Remove => {
            Cow::Owned(name.chars().filter(|c| c.is_alphanumeric()).collect())
        }
    }
}

/// Case-insensitive Unicode comparison with a case-sensitive tiebreak,
/// the behavior of the root locale.
fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.to_lowercase();
    let folded_b = b.to_lowercase();
    folded_a.cmp(&folded_b).then_with(|| a.cmp(b))
}

/// Like `collate`, but maximal digit runs compare numerically, so
/// "item2" sorts before "item10".
fn natural_compare(a: &str, b: &str) -> Ordering {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    let mut i = 0;
    let mut j = 0;

    while i < chars_a.len() && j < chars_b.len() {
        if chars_a[i].is_ascii_digit() && chars_b[j].is_ascii_digit() {
            let start_i = i;
            while i < chars_a.len() && chars_a[i].is_ascii_digit() {
                i += 1;
            }
            let start_j = j;
            while j < chars_b.len() && chars_b[j].is_ascii_digit() {
                j += 1;
            }

            let run_a: String = chars_a[start_i..i].iter().collect();
            let run_b: String = chars_b[start_j..j].iter().collect();
            let trimmed_a = run_a.trim_start_matches('0');
            let trimmed_b = run_b.trim_start_matches('0');

            let ordering = trimmed_a
                .len()
                .cmp(&trimmed_b.len())
                .then_with(|| trimmed_a.cmp(trimmed_b));
            if ordering != Ordering::Equal {
                return ordering;
            }
        } else {
            let ca = chars_a[i].to_lowercase().to_string();
            let cb = chars_b[j].to_lowercase().to_string();
            let ordering = ca.cmp(&cb);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i += 1;
            j += 1;
        }
    }

    (chars_a.len() - i)
        .cmp(&(chars_b.len() - j))
        .then_with(|| a.cmp(b))
}

/// Characters compare by their position in the user alphabet; characters
/// absent from the alphabet sort lowest.
fn alphabet_compare(
    a: &str,
    b: &str,
    alphabet: &std::collections::HashMap<char, usize>,
) -> Ordering {
    let mut iter_a = a.chars();
    let mut iter_b = b.chars();

    loop {
        match (iter_a.next(), iter_b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                // None < Some: unknown characters rank below the alphabet.
                let ordering = alphabet.get(&ca).cmp(&alphabet.get(&cb));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{compile, OrderingConfig, SortSpec};

    fn compiled(yaml: &str) -> CompiledSort {
        let spec: SortSpec = serde_yaml::from_str(yaml).unwrap();
        let config = OrderingConfig {
            sort: spec,
            ..OrderingConfig::default()
        };
        compile(&config).unwrap().sort
    }

    fn named(name: &str) -> Element {
        Element::new(0, name)
    }

    fn sorted_names(sort: &CompiledSort, names: &[&str]) -> Vec<String> {
        let mut elements: Vec<Element> = names.iter().map(|n| named(n)).collect();
        elements.sort_by(|a, b| compare_elements(sort, a, b, 0, 0));
        elements.into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_alphabetical_case_insensitive() {
        let sort = compiled("type: alphabetical");
        assert_eq!(
            sorted_names(&sort, &["Beta", "alpha", "gamma"]),
            vec!["alpha", "Beta", "gamma"]
        );
    }

    #[test]
    fn test_natural_numeric_runs() {
        let sort = compiled("type: natural");
        assert_eq!(
            sorted_names(&sort, &["item2", "item10", "item1"]),
            vec!["item1", "item2", "item10"]
        );
    }

    #[test]
    fn test_natural_falls_back_to_text() {
        let sort = compiled("type: natural");
        assert_eq!(
            sorted_names(&sort, &["item2b", "item2a", "item"]),
            vec!["item", "item2a", "item2b"]
        );
    }

    #[test]
    fn test_line_length_desc() {
        let sort = compiled("type: line-length\norder: desc");
        assert_eq!(
            sorted_names(&sort, &["a", "ccc", "bb"]),
            vec!["ccc", "bb", "a"]
        );
    }

    #[test]
    fn test_custom_alphabet() {
        let sort = compiled("type: custom-alphabet\nalphabet: \"bac\"");
        assert_eq!(sorted_names(&sort, &["a", "b", "c"]), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_custom_alphabet_unknown_chars_sort_lowest() {
        let sort = compiled("type: custom-alphabet\nalphabet: \"ab\"");
        assert_eq!(sorted_names(&sort, &["a", "z", "b"]), vec!["z", "a", "b"]);
    }

    #[test]
    fn test_unsorted_is_always_equal() {
        let sort = compiled("type: unsorted");
        assert_eq!(
            compare_elements(&sort, &named("b"), &named("a"), 0, 0),
            Ordering::Equal
        );
    }

    #[test]
    fn test_special_characters_trim() {
        let sort = compiled("type: alphabetical\nspecial_characters: trim");
        assert_eq!(
            sorted_names(&sort, &["__z", "a", "_b"]),
            vec!["a", "_b", "__z"]
        );
    }

    #[test]
    fn test_special_characters_remove() {
        let sort = compiled("type: alphabetical\nspecial_characters: remove");
        assert_eq!(sorted_names(&sort, &["a-c", "ab"]), vec!["ab", "a-c"]);
    }

    #[test]
    fn test_fallback_sort_breaks_ties() {
        // Same length, so line-length ties; alphabetical fallback decides.
        let sort = compiled(
            "type: line-length\nfallback_sort:\n  type: alphabetical\n",
        );
        assert_eq!(sorted_names(&sort, &["bb", "aa", "c"]), vec!["c", "aa", "bb"]);
    }

    #[test]
    fn test_subgroup_order_fallback() {
        let sort = compiled("type: unsorted\nfallback_sort: subgroup-order");
        let a = named("a");
        let b = named("b");
        assert_eq!(compare_elements(&sort, &a, &b, 1, 0), Ordering::Greater);
        assert_eq!(compare_elements(&sort, &a, &b, 0, 1), Ordering::Less);
        assert_eq!(compare_elements(&sort, &a, &b, 0, 0), Ordering::Equal);
    }

    #[test]
    fn test_desc_reverses_fallback_host_only() {
        // Desc applies to the primary comparison; the fallback carries its
        // own order.
        let sort = compiled(
            "type: line-length\norder: desc\nfallback_sort:\n  type: alphabetical\n",
        );
        assert_eq!(
            sorted_names(&sort, &["aa", "bb", "c"]),
            vec!["aa", "bb", "c"]
        );
    }
}
