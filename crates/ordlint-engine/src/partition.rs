//! Partitioning of the element sequence
//!
//! A new partition starts at an element preceded by a qualifying comment
//! or, when enabled, by at least one blank line. Ordering and spacing are
//! confined to one partition; only dependencies cross the boundary.

use ordlint_core::Element;

use crate::config::{CommentPartition, CompiledConfig};

/// Partition id per element, in source order.
pub fn split(elements: &[Element], config: &CompiledConfig) -> Vec<usize> {
    let mut partition_of = Vec::with_capacity(elements.len());
    let mut current = 0usize;

    for (i, element) in elements.iter().enumerate() {
        if i > 0 && starts_partition(element, config) {
            current += 1;
        }
        partition_of.push(current);
    }

    partition_of
}

fn starts_partition(element: &Element, config: &CompiledConfig) -> bool {
    if config.partition_by_newline && element.blank_lines_before > 0 {
        return true;
    }
    match &config.partition_by_comment {
        None => false,
        Some(CommentPartition::Any) => !element.comments.is_empty(),
        Some(CommentPartition::Matching(patterns)) => element
            .comments
            .iter()
            .any(|comment| patterns.is_match(comment)),
    }
}
