//! Rule: enforce ordering of object literal properties
//!
//! Objects have no built-in group order by default; everything sorts in
//! one tier and spread elements act as configured. Initializer
//! dependencies (references through the holding binding) still override
//! the comparator.

use ordlint_core::Selector;
use ordlint_engine::config::OrderingConfig;

use crate::registry::OrderingRule;

const DEFAULT_CONFIG: &str = r#"
sort:
  type: alphabetical
"#;

pub struct SortedObjectPropertiesRule;

impl OrderingRule for SortedObjectPropertiesRule {
    fn name(&self) -> &'static str {
        "sorted_object_properties"
    }

    fn description(&self) -> &'static str {
        "Enforce a deterministic order for object properties"
    }

    fn allowed_selectors(&self) -> &'static [Selector] {
        &[
            Selector::Property,
            Selector::Method,
            Selector::Spread,
            Selector::Unknown,
        ]
    }

    fn default_config(&self) -> OrderingConfig {
        serde_yaml::from_str(DEFAULT_CONFIG).expect("built-in config parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordlint_core::{Element, Modifier, Selector};

    #[test]
    fn test_sorted_object_is_clean() {
        let elements = vec![
            Element::new(0, "alpha"),
            Element::new(1, "beta"),
            Element::new(2, "gamma"),
        ];
        let evaluation = SortedObjectPropertiesRule.check(&elements, None);
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_unsorted_object_is_flagged() {
        let elements = vec![Element::new(0, "beta"), Element::new(1, "alpha")];
        let evaluation = SortedObjectPropertiesRule.check(&elements, None);
        assert_eq!(evaluation.violations.len(), 1);
    }

    #[test]
    fn test_spread_is_a_boundary_when_pinned() {
        // Extractors pin spread elements they cannot safely reorder.
        let elements = vec![
            Element::new(0, "zeta"),
            Element::new(1, "...defaults")
                .with_selector(Selector::Spread)
                .pinned(),
            Element::new(2, "alpha"),
        ];
        let evaluation = SortedObjectPropertiesRule.check(&elements, None);
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_shorthand_and_function_valued_modifiers_accepted() {
        let elements = vec![
            Element::new(0, "handler")
                .with_modifier(Modifier::FunctionValued)
                .with_value("() => {}"),
            Element::new(1, "visible").with_modifier(Modifier::Shorthand),
        ];
        let evaluation = SortedObjectPropertiesRule.check(&elements, None);
        assert!(evaluation.is_clean());
    }
}
