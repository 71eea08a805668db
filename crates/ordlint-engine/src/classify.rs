//! Group classification
//!
//! Custom groups are tried first, in declaration order; the first match
//! wins and short-circuits built-in classification. Built-in labels are
//! generated from the element's selector and modifiers ("static-private-
//! property", "constructor", ...) and ranked so that a more specific
//! selector beats a less specific one and, within one selector, the
//! modifier-priority table decides. The effective group is the best-ranked
//! candidate the configuration actually lists.

use ordlint_core::{Element, Modifier, Selector};

use crate::config::CompiledConfig;

/// Label used for elements no configured group claims.
pub const UNKNOWN_GROUP: &str = "unknown";

/// Classification precedence of modifiers, strongest first. This table,
/// not modifier count, decides which built-in label wins.
pub const MODIFIER_PRIORITY: [Modifier; 14] = [
    Modifier::Static,
    Modifier::Declare,
    Modifier::Abstract,
    Modifier::Override,
    Modifier::Public,
    Modifier::Protected,
    Modifier::Private,
    Modifier::Readonly,
    Modifier::Optional,
    Modifier::Async,
    Modifier::Decorated,
    Modifier::FunctionValued,
    Modifier::Shorthand,
    Modifier::Multiline,
];

// Combinatorial guard: candidates are generated from at most this many of
// the element's highest-priority modifiers.
const MAX_COMBINED_MODIFIERS: usize = 8;

/// Resolve the effective group label for one element.
pub fn classify(element: &Element, config: &CompiledConfig) -> String {
    if element.opaque {
        return UNKNOWN_GROUP.to_string();
    }

    for group in &config.custom_groups {
        if group.name != UNKNOWN_GROUP && group.matches(element) {
            return group.name.clone();
        }
    }

    builtin_group(element, config)
}

fn builtin_group(element: &Element, config: &CompiledConfig) -> String {
    let combos = ranked_modifier_combos(element);

    for selector in element.selector.specificity_chain() {
        for combo in &combos {
            let label = render_label(combo, *selector);
            if config.is_listed(&label) {
                return label;
            }
        }
    }

    UNKNOWN_GROUP.to_string()
}

/// All subsets of the element's modifiers, most specific first. Subsets
/// are rendered in priority order and ranked lexicographically over their
/// priority indices, with a longer subset beating its own prefix.
fn ranked_modifier_combos(element: &Element) -> Vec<Vec<Modifier>> {
    let present: Vec<Modifier> = MODIFIER_PRIORITY
        .into_iter()
        .filter(|m| element.modifiers.contains(*m))
        .take(MAX_COMBINED_MODIFIERS)
        .collect();

    let mut combos: Vec<Vec<Modifier>> = Vec::with_capacity(1 << present.len());
    for mask in 0u32..(1 << present.len()) {
        let combo: Vec<Modifier> = present
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, m)| *m)
            .collect();
        combos.push(combo);
    }

    combos.sort_by(|a, b| compare_combos(a, b));
    combos
}

fn compare_combos(a: &[Modifier], b: &[Modifier]) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let rank = |m: Modifier| MODIFIER_PRIORITY.iter().position(|p| *p == m).unwrap_or(usize::MAX);

    for (ma, mb) in a.iter().zip(b.iter()) {
        match rank(*ma).cmp(&rank(*mb)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    // One is a prefix of the other; the longer (more specific) ranks first.
    b.len().cmp(&a.len())
}

fn render_label(modifiers: &[Modifier], selector: Selector) -> String {
    let mut label = String::new();
    for m in modifiers {
        label.push_str(m.as_str());
        label.push('-');
    }
    label.push_str(selector.as_str());
    label
}
