//! Order resolution
//!
//! Combines group tiers, the comparator, partitions, and the dependency
//! graph into a target permutation plus ordering violations. Pinned and
//! opaque elements are fixed anchors: the sequence is resolved as
//! independent runs around them. Dependencies are applied last, as a
//! stable depth-first emission that moves each dependency to the earliest
//! position consistent with its own satisfied edges; they may cross group
//! and partition boundaries. Cyclic edges are skipped, so the pass
//! terminates on any input.

use std::collections::BTreeMap;

use ordlint_core::{Element, Violation};

use crate::classify::classify;
use crate::compare::compare_elements;
use crate::config::CompiledConfig;
use crate::graph::DependencyGraph;

/// Where one element landed during classification.
#[derive(Debug, Clone)]
pub struct Placement {
    pub group: String,
    pub tier: usize,
    pub subgroup: usize,
}

/// The outcome of order resolution for one element list.
#[derive(Debug)]
pub struct Resolution {
    /// Element indices in target sequence order.
    pub target_order: Vec<usize>,
    /// Target position of each element, indexed by element.
    pub position_of: Vec<usize>,
    pub placements: Vec<Placement>,
    pub partition_of: Vec<usize>,
    pub violations: Vec<Violation>,
}

/// Classify every element and assign tiers. Labels absent from the
/// configured order are appended after the last tier in first-appearance
/// order.
pub fn placements(elements: &[Element], config: &CompiledConfig) -> Vec<Placement> {
    let mut appended: Vec<String> = Vec::new();
    let mut result = Vec::with_capacity(elements.len());

    for element in elements {
        let group = classify(element, config);
        let (tier, subgroup) = match config.tier_of(&group) {
            Some(found) => found,
            None => {
                let idx = match appended.iter().position(|g| *g == group) {
                    Some(idx) => idx,
                    None => {
                        appended.push(group.clone());
                        appended.len() - 1
                    }
                };
                (config.tiers.len() + idx, 0)
            }
        };
        result.push(Placement {
            group,
            tier,
            subgroup,
        });
    }

    result
}

pub fn resolve(
    elements: &[Element],
    config: &CompiledConfig,
    graph: &DependencyGraph,
    partition_of: &[usize],
) -> Resolution {
    let n = elements.len();
    let placements = placements(elements, config);

    let mut target_order: Vec<usize> = (0..n).collect();
    let mut in_segment = vec![false; n];

    for segment in anchor_free_segments(elements) {
        for &i in &segment {
            in_segment[i] = true;
        }

        let mut ordered = Vec::with_capacity(segment.len());
        for run in partition_runs(&segment, partition_of) {
            ordered.extend(sort_run(run, elements, config, &placements));
        }
        let ordered = emit_with_dependencies(&ordered, graph, &in_segment);

        // A segment occupies a contiguous slice of positions.
        for (slot, element) in segment.iter().zip(ordered) {
            target_order[*slot] = element;
        }

        for &i in &segment {
            in_segment[i] = false;
        }
    }

    let mut position_of = vec![0usize; n];
    for (position, &element) in target_order.iter().enumerate() {
        position_of[element] = position;
    }

    let violations = collect_violations(elements, graph, &placements, partition_of, &position_of);

    Resolution {
        target_order,
        position_of,
        placements,
        partition_of: partition_of.to_vec(),
        violations,
    }
}

/// Maximal runs of consecutive non-anchor elements.
fn anchor_free_segments(elements: &[Element]) -> Vec<Vec<usize>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        if element.is_anchor() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push(i);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Split a segment into its partition runs (partition ids never decrease).
fn partition_runs<'a>(segment: &'a [usize], partition_of: &[usize]) -> Vec<&'a [usize]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..segment.len() {
        if partition_of[segment[i]] != partition_of[segment[i - 1]] {
            runs.push(&segment[start..i]);
            start = i;
        }
    }
    if start < segment.len() {
        runs.push(&segment[start..]);
    }
    runs
}

/// Order one partition run: bucket by tier, then stable-sort each bucket
/// with the tier's comparator.
fn sort_run(
    run: &[usize],
    elements: &[Element],
    config: &CompiledConfig,
    placements: &[Placement],
) -> Vec<usize> {
    let mut buckets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &i in run {
        buckets.entry(placements[i].tier).or_default().push(i);
    }

    let mut ordered = Vec::with_capacity(run.len());
    for (tier, mut bucket) in buckets {
        let sort = config.sort_for_tier(tier);
        bucket.sort_by(|&a, &b| {
            compare_elements(
                sort,
                &elements[a],
                &elements[b],
                placements[a].subgroup,
                placements[b].subgroup,
            )
        });
        ordered.extend(bucket);
    }
    ordered
}

/// Depth-first emission: every element is preceded by its (non-cyclic,
/// in-segment) dependencies; elements whose edges are already satisfied
/// keep their order. Acyclic by construction, so this terminates.
fn emit_with_dependencies(
    order: &[usize],
    graph: &DependencyGraph,
    in_segment: &[bool],
) -> Vec<usize> {
    if graph.is_empty() {
        return order.to_vec();
    }

    let mut emitted = vec![false; in_segment.len()];
    let mut result = Vec::with_capacity(order.len());

    for &start in order {
        if emitted[start] {
            continue;
        }
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(&(node, cursor)) = stack.last() {
            let deps = graph.dependencies_of(node);
            if cursor < deps.len() {
                stack.last_mut().expect("stack is non-empty").1 = cursor + 1;
                let next = deps[cursor];
                if in_segment[next] && !emitted[next] {
                    stack.push((next, 0));
                }
            } else {
                stack.pop();
                if !emitted[node] {
                    emitted[node] = true;
                    result.push(node);
                }
            }
        }
    }

    result
}

/// One violation per adjacent source pair whose target positions invert.
fn collect_violations(
    elements: &[Element],
    graph: &DependencyGraph,
    placements: &[Placement],
    partition_of: &[usize],
    position_of: &[usize],
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for left in 0..elements.len().saturating_sub(1) {
        let right = left + 1;
        if elements[left].is_anchor() || elements[right].is_anchor() {
            continue;
        }
        if position_of[right] >= position_of[left] {
            continue;
        }

        let left_name = &elements[left].name;
        let right_name = &elements[right].name;

        if graph.has_dependency(left, right) {
            violations.push(Violation::dependency_order(left_name, right_name));
        } else if partition_of[left] != partition_of[right] {
            // Pulled across a partition boundary by a transitive
            // dependency chain.
            violations.push(Violation::order(left_name, right_name));
        } else if placements[left].group != placements[right].group {
            violations.push(Violation::group_order(
                left_name,
                right_name,
                placements[left].group.clone(),
                placements[right].group.clone(),
            ));
        } else {
            violations.push(Violation::order(left_name, right_name));
        }
    }

    violations
}
