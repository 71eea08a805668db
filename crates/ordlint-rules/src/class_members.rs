//! Rule: enforce ordering of class-like members
//!
//! Default order follows common convention: index signatures, then static
//! state, then instance state, constructor, static methods, instance
//! methods, with accessors between state and constructor. Dependencies
//! between member initializers always win over the configured order.

use ordlint_core::Selector;
use ordlint_engine::config::OrderingConfig;

use crate::registry::OrderingRule;

const DEFAULT_CONFIG: &str = r#"
sort:
  type: alphabetical
groups:
  - index-signature
  - [static-property, static-readonly-property]
  - static-block
  - [property, readonly-property]
  - accessor
  - constructor
  - static-method
  - method
  - unknown
"#;

pub struct SortedClassMembersRule;

impl OrderingRule for SortedClassMembersRule {
    fn name(&self) -> &'static str {
        "sorted_class_members"
    }

    fn description(&self) -> &'static str {
        "Enforce a deterministic order for class members"
    }

    fn allowed_selectors(&self) -> &'static [Selector] {
        &[
            Selector::Property,
            Selector::Method,
            Selector::Accessor,
            Selector::Constructor,
            Selector::IndexSignature,
            Selector::StaticBlock,
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
    use ordlint_core::{Element, Modifier, Selector, ViolationKind};
    use pretty_assertions::assert_eq;

    fn member(id: u32, name: &str, selector: Selector) -> Element {
        Element::new(id, name).with_selector(selector)
    }

    #[test]
    fn test_conventional_class_is_clean() {
        let elements = vec![
            member(0, "VERSION", Selector::Property).with_modifier(Modifier::Static),
            member(1, "name", Selector::Property),
            member(2, "constructor", Selector::Constructor),
            member(3, "create", Selector::Method).with_modifier(Modifier::Static),
            member(4, "render", Selector::Method),
        ];
        let evaluation = SortedClassMembersRule.check(&elements, Some("Widget"));
        assert!(evaluation.is_clean());
    }

    #[test]
    fn test_method_before_property_is_flagged() {
        let elements = vec![
            member(0, "render", Selector::Method),
            member(1, "name", Selector::Property),
        ];
        let evaluation = SortedClassMembersRule.check(&elements, Some("Widget"));
        assert_eq!(evaluation.violations.len(), 1);
        assert_eq!(
            evaluation.violations.violations()[0].kind,
            ViolationKind::GroupOrder
        );
    }

    #[test]
    fn test_initializer_dependency_wins() {
        let elements = vec![
            member(0, "render", Selector::Method),
            member(1, "total", Selector::Property).with_value("this.price * 2"),
            member(2, "price", Selector::Property),
        ];
        let evaluation = SortedClassMembersRule.check(&elements, Some("Cart"));

        let order: Vec<usize> = evaluation.target_order.iter().map(|id| id.index()).collect();
        let price_at = order.iter().position(|&i| i == 2).unwrap();
        let total_at = order.iter().position(|&i| i == 1).unwrap();
        assert!(price_at < total_at);
    }
}
