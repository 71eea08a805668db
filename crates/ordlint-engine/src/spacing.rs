//! Vertical-whitespace resolution
//!
//! Required blank-line counts between target-adjacent elements, resolved
//! through three layers, most specific first: an inline directive between
//! two configured tiers, a per-group `newlines_inside` override, then the
//! global `newlines_between`. Repeated declarations of one named element
//! (overload style) are always forced to zero spacing. Actual spacing is
//! only checked where the pair is also adjacent in source; the rest is the
//! fixer's concern.

use ordlint_core::{Element, Violation};

use crate::config::{CompiledConfig, Newlines};
use crate::resolve::Resolution;

/// Required blank lines per consecutive target pair (`None` = no
/// requirement), plus spacing violations.
pub fn resolve_spacing(
    elements: &[Element],
    config: &CompiledConfig,
    resolution: &Resolution,
) -> (Vec<Option<usize>>, Vec<Violation>) {
    let order = &resolution.target_order;
    let mut required = Vec::with_capacity(order.len().saturating_sub(1));
    let mut violations = Vec::new();

    for window in order.windows(2) {
        let (a, b) = (window[0], window[1]);
        let requirement = requirement_between(elements, config, resolution, a, b);
        required.push(requirement);

        // Actual counts are only known for source-adjacent pairs.
        if b == a + 1 {
            if let Some(expected) = requirement {
                let actual = elements[b].blank_lines_before;
                if actual < expected {
                    violations.push(Violation::missing_spacing(
                        &elements[a].name,
                        &elements[b].name,
                        expected,
                        actual,
                    ));
                } else if actual > expected {
                    violations.push(Violation::extra_spacing(
                        &elements[a].name,
                        &elements[b].name,
                        expected,
                        actual,
                    ));
                }
            }
        }
    }

    (required, violations)
}

fn requirement_between(
    elements: &[Element],
    config: &CompiledConfig,
    resolution: &Resolution,
    a: usize,
    b: usize,
) -> Option<usize> {
    if elements[a].is_anchor() || elements[b].is_anchor() {
        return None;
    }
    if resolution.partition_of[a] != resolution.partition_of[b] {
        return None;
    }

    // Overloads of one named element always sit together.
    if elements[a].name == elements[b].name && elements[a].selector == elements[b].selector {
        return Some(0);
    }

    let tier_a = resolution.placements[a].tier;
    let tier_b = resolution.placements[b].tier;

    let resolved = if tier_a == tier_b {
        within_tier(config, resolution, a, b, tier_a)
    } else {
        across_tiers(config, tier_a, tier_b)
    };

    match resolved {
        Newlines::Ignore => None,
        Newlines::Count(count) => Some(count),
    }
}

/// Same tier: per-custom-group override, then the tier's own
/// `newlines_inside`, then the global setting. When both group and tier
/// declare a count, they combine under the same-group rule.
fn within_tier(
    config: &CompiledConfig,
    resolution: &Resolution,
    a: usize,
    b: usize,
    tier: usize,
) -> Newlines {
    let group_override = if resolution.placements[a].group == resolution.placements[b].group {
        config
            .custom_group(&resolution.placements[a].group)
            .and_then(|g| g.newlines_inside)
    } else {
        None
    };
    let tier_override = config.tiers.get(tier).and_then(|t| t.newlines_inside);

    match (group_override, tier_override) {
        (Some(g), Some(t)) => combine(g, t, true),
        (Some(g), None) => g,
        (None, Some(t)) => t,
        (None, None) => config.newlines_between,
    }
}

/// Different tiers: fold the inline directives declared across the span;
/// without any, the global setting governs.
fn across_tiers(config: &CompiledConfig, tier_a: usize, tier_b: usize) -> Newlines {
    let lo = tier_a.min(tier_b);
    let hi = tier_a.max(tier_b).min(config.gap_directives.len());

    let mut declared = config.gap_directives[lo.min(config.gap_directives.len())..hi]
        .iter()
        .flatten();

    match declared.next() {
        None => config.newlines_between,
        Some(&first) => declared.fold(first, |acc, &next| combine(acc, next, false)),
    }
}

/// Combination rule for two applicable directives. `ignore` yields to an
/// exact count; between different groups an exact 0 beats any count,
/// while within one group a declared nonzero count beats 0.
fn combine(a: Newlines, b: Newlines, same_group: bool) -> Newlines {
    match (a, b) {
        (Newlines::Ignore, other) | (other, Newlines::Ignore) => other,
        (Newlines::Count(x), Newlines::Count(y)) => {
            if !same_group && (x == 0 || y == 0) {
                Newlines::Count(0)
            } else {
                Newlines::Count(x.max(y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{compile, OrderingConfig};
    use crate::deps::analyze;
    use crate::partition::split;
    use crate::resolve::resolve;
    use ordlint_core::{Selector, ViolationKind};

    fn config(yaml: &str) -> CompiledConfig {
        let parsed: OrderingConfig = serde_yaml::from_str(yaml).unwrap();
        compile(&parsed).unwrap()
    }

    fn spacing(
        elements: &[Element],
        config: &CompiledConfig,
    ) -> (Vec<Option<usize>>, Vec<Violation>) {
        let graph = analyze(elements, None, config);
        let partition_of = split(elements, config);
        let resolution = resolve(elements, config, &graph, &partition_of);
        resolve_spacing(elements, config, &resolution)
    }

    fn prop(id: u32, name: &str) -> Element {
        Element::new(id, name).with_selector(Selector::Property)
    }

    fn method(id: u32, name: &str) -> Element {
        Element::new(id, name).with_selector(Selector::Method)
    }

    #[test]
    fn test_no_requirements_by_default() {
        let elements = vec![prop(0, "a"), prop(1, "b")];
        let (required, violations) = spacing(&elements, &config("{}"));
        assert_eq!(required, vec![None]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_global_requirement_applies_between_groups() {
        let elements = vec![prop(0, "a"), method(1, "run")];
        let yaml = r#"
newlines_between: 1
groups:
  - property
  - method
"#;
        let (required, violations) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(1)]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingSpacing);
    }

    #[test]
    fn test_inline_directive_overrides_global() {
        // Global asks for 2; the directive between the tiers asks for 0.
        let elements = vec![
            prop(0, "a"),
            method(1, "run").with_blank_lines_before(2),
            method(2, "stop").with_blank_lines_before(2),
        ];
        let yaml = r#"
newlines_between: 2
groups:
  - property
  - newlines_between: 0
  - method
"#;
        let (required, violations) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(0), Some(2)]);
        // a→run has 2 actual but needs 0; run→stop has 2 and needs 2.
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ExtraSpacing);
    }

    #[test]
    fn test_directive_span_folds_for_non_adjacent_tiers() {
        // No constructor present: property sits next to method, spanning
        // the ignore directive and the count(3) directive; 3 governs.
        let elements = vec![prop(0, "a"), method(1, "run")];
        let yaml = r#"
groups:
  - property
  - newlines_between: ignore
  - constructor
  - newlines_between: 3
  - method
"#;
        let (required, _) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(3)]);
    }

    #[test]
    fn test_zero_beats_nonzero_across_groups() {
        let elements = vec![prop(0, "a"), method(1, "run")];
        let yaml = r#"
groups:
  - property
  - newlines_between: 0
  - constructor
  - newlines_between: 3
  - method
"#;
        let (required, _) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(0)]);
    }

    #[test]
    fn test_nonzero_beats_zero_within_same_group() {
        let elements = vec![prop(0, "alpha"), prop(1, "beta")];
        let yaml = r#"
groups:
  - group: sized
    newlines_inside: 0
custom_groups:
  - group_name: sized
    newlines_inside: 2
    element_name_pattern: "^(alpha|beta)$"
"#;
        let (required, _) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(2)]);
    }

    #[test]
    fn test_tier_newlines_inside() {
        let elements = vec![prop(0, "a"), prop(1, "b")];
        let yaml = r#"
newlines_between: 2
groups:
  - group: property
    newlines_inside: 0
"#;
        let (required, _) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(0)]);
    }

    #[test]
    fn test_overloads_force_zero_spacing() {
        let elements = vec![
            method(0, "create"),
            method(1, "create").with_blank_lines_before(1),
        ];
        let yaml = "newlines_between: 1\n";
        let (required, violations) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(0)]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::ExtraSpacing);
    }

    #[test]
    fn test_partition_boundary_has_no_requirement() {
        let elements = vec![
            prop(0, "a"),
            prop(1, "b").with_blank_lines_before(1),
        ];
        let yaml = "newlines_between: 0\npartition_by_newline: true\n";
        let (required, violations) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![None]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_anchors_have_no_requirement() {
        let elements = vec![prop(0, "a"), Element::new(1, "x").pinned(), prop(2, "b")];
        let yaml = "newlines_between: 1\n";
        let (required, _) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![None, None]);
    }

    #[test]
    fn test_requirement_follows_target_order() {
        // Source order is wrong; requirements are computed for the target
        // adjacency (method after property), not the source one.
        let elements = vec![method(0, "run"), prop(1, "a")];
        let yaml = r#"
newlines_between: 1
groups:
  - property
  - method
"#;
        let (required, violations) = spacing(&elements, &config(yaml));
        assert_eq!(required, vec![Some(1)]);
        // The pair is not source-adjacent in target orientation, so no
        // spacing violation accompanies the ordering violation.
        assert!(violations.is_empty());
    }
}
