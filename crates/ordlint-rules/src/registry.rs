//! Rule trait and registry for ordlint ordering rules

use ordlint_core::{Element, Selector};
use ordlint_engine::config::{compile, CompiledConfig, OrderingConfig};
use ordlint_engine::{evaluate, Evaluation};

/// A sibling-ordering rule: defaults for one construct kind, evaluation
/// delegated to the shared engine.
pub trait OrderingRule: Send + Sync {
    /// The unique identifier for this rule (e.g., "sorted_class_members")
    fn name(&self) -> &'static str;

    /// A short description of what this rule enforces
    fn description(&self) -> &'static str;

    /// Selectors this rule's extractor produces
    fn allowed_selectors(&self) -> &'static [Selector];

    /// The rule's built-in configuration
    fn default_config(&self) -> OrderingConfig;

    /// Evaluate a construct's elements with the built-in configuration
    fn check(&self, elements: &[Element], construct_name: Option<&str>) -> Evaluation {
        let compiled =
            compile(&self.default_config()).expect("built-in rule configuration is valid");
        evaluate(elements, &compiled, construct_name)
    }

    /// Evaluate with a host-supplied compiled configuration
    fn check_with_config(
        &self,
        elements: &[Element],
        config: &CompiledConfig,
        construct_name: Option<&str>,
    ) -> Evaluation {
        evaluate(elements, config, construct_name)
    }
}

/// Registry of all available ordering rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn OrderingRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        let mut registry = Self { rules: Vec::new() };

        registry.register(Box::new(crate::class_members::SortedClassMembersRule));
        registry.register(Box::new(crate::object_properties::SortedObjectPropertiesRule));
        registry.register(Box::new(crate::attributes::SortedAttributesRule));

        registry
    }

    /// Register a new rule
    pub fn register(&mut self, rule: Box<dyn OrderingRule>) {
        self.rules.push(rule);
    }

    /// Get all rule names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&dyn OrderingRule> {
        self.rules
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    /// Get all rules with their descriptions (for --list-rules)
    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules
            .iter()
            .map(|r| (r.name(), r.description()))
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_builtin_rules() {
        let registry = RuleRegistry::new();
        let names = registry.all_names();
        assert!(names.contains(&"sorted_class_members"));
        assert!(names.contains(&"sorted_object_properties"));
        assert!(names.contains(&"sorted_attributes"));
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = RuleRegistry::new();
        assert!(registry.get("sorted_class_members").is_some());
        assert!(registry.get("no_such_rule").is_none());
    }

    #[test]
    fn test_builtin_configs_compile() {
        let registry = RuleRegistry::new();
        for (name, _) in registry.list_rules() {
            let rule = registry.get(name).unwrap();
            assert!(compile(&rule.default_config()).is_ok(), "{} must compile", name);
        }
    }
}
