//! ordlint-rules: sibling-ordering rules built on the shared engine
//!
//! Each rule owns its default configuration (allowed selectors, built-in
//! group order) and delegates evaluation to `ordlint-engine`. Hosts feed
//! rules the extracted element lists and render the returned violations.

mod attributes;
mod class_members;
mod object_properties;
mod registry;

pub use attributes::SortedAttributesRule;
pub use class_members::SortedClassMembersRule;
pub use object_properties::SortedObjectPropertiesRule;
pub use registry::{OrderingRule, RuleRegistry};
