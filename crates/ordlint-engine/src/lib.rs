//! ordlint-engine: the element-ordering engine
//!
//! Consumes a normalized element list (see `ordlint-core`) and a compiled
//! configuration, and produces a target permutation, required blank-line
//! counts, and a violation list. The pipeline per evaluation:
//!
//! Classify -> Analyze dependencies -> Partition -> Resolve order ->
//! Resolve spacing
//!
//! Everything is synchronous and side-effect-free over one immutable
//! snapshot; independent evaluations can run in parallel host-side since
//! no state is shared between them.

pub mod classify;
pub mod compare;
pub mod config;
pub mod deps;
pub mod fix;
pub mod graph;
pub mod logging;
pub mod partition;
pub mod resolve;
pub mod spacing;

use ordlint_core::{Element, ElementId, ViolationCollection};

use config::CompiledConfig;
use graph::DependencyGraph;

/// The full outcome of one evaluation.
#[derive(Debug)]
pub struct Evaluation {
    /// Element ids in target sequence order.
    pub target_order: Vec<ElementId>,
    /// Required blank lines between consecutive target elements; `None`
    /// where no requirement applies.
    pub required_newlines: Vec<Option<usize>>,
    pub violations: ViolationCollection,
}

impl Evaluation {
    /// True when the sequence is already correctly ordered and spaced.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluate one element list under one compiled profile.
///
/// Element ids must be dense and in source order (`elements[i].id` indexes
/// `i`), which is what extractors produce.
pub fn evaluate(
    elements: &[Element],
    config: &CompiledConfig,
    construct_name: Option<&str>,
) -> Evaluation {
    debug_assert!(elements
        .iter()
        .enumerate()
        .all(|(i, e)| e.id.index() == i));

    if logging::is_enabled() {
        logging::log_evaluation_start(construct_name, elements.len());
    }

    let graph = if config.detect_dependencies {
        deps::analyze(elements, construct_name, config)
    } else {
        DependencyGraph::new(elements.len())
    };

    let partition_of = partition::split(elements, config);
    let resolution = resolve::resolve(elements, config, &graph, &partition_of);
    let (required_newlines, spacing_violations) =
        spacing::resolve_spacing(elements, config, &resolution);

    if logging::is_enabled() {
        for (i, placement) in resolution.placements.iter().enumerate() {
            logging::log_classification(&elements[i].name, &placement.group, placement.tier);
        }
        let cyclic = (0..graph.edges().len())
            .filter(|&e| graph.is_cyclic_edge(e))
            .count();
        logging::log_dependencies(graph.edges().len(), cyclic);
        let moved = resolution
            .target_order
            .iter()
            .enumerate()
            .filter(|&(position, &element)| position != element)
            .count();
        logging::log_resolution(
            partition_of.last().map(|p| p + 1).unwrap_or(0),
            moved,
            resolution.violations.len() + spacing_violations.len(),
        );
    }

    let mut violations = ViolationCollection::new();
    violations.extend(resolution.violations);
    violations.extend(spacing_violations);

    Evaluation {
        target_order: resolution
            .target_order
            .iter()
            .map(|&i| elements[i].id)
            .collect(),
        required_newlines,
        violations,
    }
}

/// Evaluate against an ordered profile list: the first profile whose
/// guard accepts the construct is used. Returns `None` when no profile
/// applies.
pub fn evaluate_with_profiles(
    elements: &[Element],
    profiles: &[CompiledConfig],
    construct_name: Option<&str>,
) -> Option<Evaluation> {
    let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
    let profile = config::select_profile(profiles, construct_name, &names)?;
    if logging::is_enabled() {
        let index = profiles
            .iter()
            .position(|p| std::ptr::eq(p, profile))
            .unwrap_or(0);
        logging::log(&format!("Profile {} selected of {}", index, profiles.len()));
    }
    Some(evaluate(elements, profile, construct_name))
}
