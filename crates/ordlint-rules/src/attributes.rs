//! Rule: enforce ordering of markup attributes
//!
//! Attributes carry no initializer dependencies, so dependency detection
//! is off; shorthand and multiline attributes are kept groupable through
//! custom groups.

use ordlint_core::Selector;
use ordlint_engine::config::OrderingConfig;

use crate::registry::OrderingRule;

const DEFAULT_CONFIG: &str = r#"
sort:
  type: alphabetical
detect_dependencies: false
"#;

pub struct SortedAttributesRule;

impl OrderingRule for SortedAttributesRule {
    fn name(&self) -> &'static str {
        "sorted_attributes"
    }

    fn description(&self) -> &'static str {
        "Enforce a deterministic order for markup attributes"
    }

    fn allowed_selectors(&self) -> &'static [Selector] {
        &[Selector::Attribute, Selector::Spread, Selector::Unknown]
    }

    fn default_config(&self) -> OrderingConfig {
        serde_yaml::from_str(DEFAULT_CONFIG).expect("built-in config parses")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordlint_core::{Element, Selector};
    use ordlint_engine::config::{compile, OrderingConfig};

    fn attr(id: u32, name: &str) -> Element {
        Element::new(id, name).with_selector(Selector::Attribute)
    }

    #[test]
    fn test_sorted_attributes_are_clean() {
        let elements = vec![attr(0, "class"), attr(1, "id"), attr(2, "style")];
        let evaluation = SortedAttributesRule.check(&elements, Some("div"));
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_value_references_do_not_create_edges() {
        // `this.x` in an attribute value must not reorder attributes.
        let elements = vec![
            attr(0, "alt").with_value("this.src"),
            attr(1, "src"),
        ];
        let evaluation = SortedAttributesRule.check(&elements, None);
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_custom_group_config_for_callbacks() {
        let yaml = r#"
sort:
  type: alphabetical
detect_dependencies: false
groups:
  - attribute
  - callbacks
custom_groups:
  - group_name: callbacks
    element_name_pattern: "^on[A-Z]"
"#;
        let config: OrderingConfig = serde_yaml::from_str(yaml).unwrap();
        let compiled = compile(&config).unwrap();

        let elements = vec![
            attr(0, "onClick"),
            attr(1, "class"),
        ];
        let evaluation = SortedAttributesRule.check_with_config(&elements, &compiled, None);
        assert_eq!(evaluation.violations.len(), 1);
        assert_eq!(
            evaluation
                .target_order
                .iter()
                .map(|id| id.index())
                .collect::<Vec<_>>(),
            vec![1, 0]
        );
    }
}
