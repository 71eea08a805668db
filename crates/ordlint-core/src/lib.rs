//! ordlint-core: Core abstractions for sibling-element ordering rules
//!
//! This crate provides:
//! - `Element`: One orderable structural unit (field/member/attribute)
//! - `Selector` / `Modifier` / `ModifierSet`: The closed classification vocabulary
//! - `Violation`: A single ordering or spacing diagnostic
//! - `ViolationCollection`: Accumulated diagnostics for one evaluation

mod element;
mod violation;

pub use element::{Element, ElementId, Modifier, ModifierSet, Selector};
pub use violation::{Violation, ViolationCollection, ViolationKind};
