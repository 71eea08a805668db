//! Validated runtime form of a configuration
//!
//! Compilation happens once per loaded profile: every pattern becomes a
//! `regex::Regex`, the groups list is flattened into tiers plus gap
//! directives, and the custom-alphabet (if any) becomes a character index.
//! Anything invalid is rejected here so per-element evaluation never fails.

use std::collections::HashMap;

use ordlint_core::{Element, Modifier, Selector};
use regex::Regex;
use thiserror::Error;

use super::schema::{
    CommentPartitionSpec, ConfigGuard, CustomGroupDef, FallbackSpec, GroupMatcher, GroupOrGroups,
    GroupPredicate, GroupsEntry, IgnoreKeyword, NewlinesSpec, OrderingConfig, PatternSpec,
    SortOrderSpec, SortSpec, SortTypeSpec, SpecialCharactersSpec,
};

/// Errors surfaced at configuration-load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("unsupported pattern flags '{0}' (supported: i, m, s, x, u)")]
    InvalidFlags(String),

    #[error("sort type 'custom-alphabet' requires a non-empty alphabet")]
    MissingAlphabet,

    #[error("alphabet contains duplicate character '{0}'")]
    DuplicateAlphabetChar(char),

    #[error("invalid groups list: {0}")]
    GroupsLayout(String),

    #[error("custom group has an empty group_name")]
    EmptyGroupName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Alphabetical,
    Natural,
    LineLength,
    CustomAlphabet,
    Unsorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCharacters {
    Keep,
    Trim,
    Remove,
}

/// Exact blank-line count or no requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Newlines {
    Count(usize),
    Ignore,
}

impl Newlines {
    fn from_spec(spec: NewlinesSpec) -> Self {
        match spec {
            NewlinesSpec::Count(n) => Newlines::Count(n as usize),
            NewlinesSpec::Keyword(IgnoreKeyword::Ignore) => Newlines::Ignore,
        }
    }
}

/// A compiled, validated sort specification.
#[derive(Debug, Clone)]
pub struct CompiledSort {
    pub kind: SortKind,
    pub order: SortOrder,
    pub locale: Option<String>,
    pub special_characters: SpecialCharacters,
    /// Character position index for `custom-alphabet`.
    pub alphabet: Option<HashMap<char, usize>>,
    pub fallback: Option<Box<Fallback>>,
}

#[derive(Debug, Clone)]
pub enum Fallback {
    Sort(CompiledSort),
    /// Order ties by the ordinal of the element's sub-group within its tier.
    SubgroupOrder,
}

/// A set of alternative compiled patterns; matches if any one matches.
#[derive(Debug, Clone)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    pub fn is_match(&self, text: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(text))
    }
}

/// One tier of the configured group order.
#[derive(Debug, Clone)]
pub struct Tier {
    pub labels: Vec<String>,
    pub sort: Option<CompiledSort>,
    pub newlines_inside: Option<Newlines>,
}

/// A compiled custom-group predicate conjunction.
#[derive(Debug, Clone)]
pub struct CompiledPredicate {
    pub selector: Option<Selector>,
    pub modifiers: Vec<Modifier>,
    pub name_pattern: Option<PatternSet>,
    pub value_pattern: Option<PatternSet>,
    pub decorator_pattern: Option<PatternSet>,
}

impl CompiledPredicate {
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(selector) = self.selector {
            if element.selector != selector {
                return false;
            }
        }
        if !element.modifiers.contains_all(&self.modifiers) {
            return false;
        }
        if let Some(pattern) = &self.name_pattern {
            if !pattern.is_match(&element.name) {
                return false;
            }
        }
        if let Some(pattern) = &self.value_pattern {
            match &element.value {
                Some(value) if pattern.is_match(value) => {}
                _ => return false,
            }
        }
        if let Some(pattern) = &self.decorator_pattern {
            if !element.decorators.iter().any(|d| pattern.is_match(d)) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct CompiledCustomGroup {
    pub name: String,
    /// Disjunction of conjunctions; the flat schema form compiles to one.
    pub predicates: Vec<CompiledPredicate>,
    pub sort: Option<CompiledSort>,
    pub newlines_inside: Option<Newlines>,
}

impl CompiledCustomGroup {
    pub fn matches(&self, element: &Element) -> bool {
        self.predicates.iter().any(|p| p.matches(element))
    }
}

#[derive(Debug, Clone)]
pub enum CommentPartition {
    /// Any leading comment starts a new partition.
    Any,
    /// Only comments matching one of the patterns do.
    Matching(PatternSet),
}

#[derive(Debug, Clone)]
pub struct CompiledGuard {
    pub all_names: Option<PatternSet>,
    pub declaration: Option<PatternSet>,
}

impl CompiledGuard {
    pub fn accepts(&self, construct_name: Option<&str>, element_names: &[&str]) -> bool {
        if let Some(pattern) = &self.declaration {
            match construct_name {
                Some(name) if pattern.is_match(name) => {}
                _ => return false,
            }
        }
        if let Some(pattern) = &self.all_names {
            if !element_names.iter().all(|n| pattern.is_match(n)) {
                return false;
            }
        }
        true
    }
}

/// A fully compiled ordering profile.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub sort: CompiledSort,
    pub tiers: Vec<Tier>,
    /// Inline spacing directive for the gap after tier `i`, if declared.
    pub gap_directives: Vec<Option<Newlines>>,
    pub custom_groups: Vec<CompiledCustomGroup>,
    pub newlines_between: Newlines,
    pub partition_by_comment: Option<CommentPartition>,
    pub partition_by_newline: bool,
    pub detect_dependencies: bool,
    pub ignore_callback_patterns: Option<PatternSet>,
    pub guard: Option<CompiledGuard>,
    label_index: HashMap<String, (usize, usize)>,
}

impl CompiledConfig {
    /// Tier and sub-group ordinal for a configured label.
    pub fn tier_of(&self, label: &str) -> Option<(usize, usize)> {
        self.label_index.get(label).copied()
    }

    pub fn is_listed(&self, label: &str) -> bool {
        self.label_index.contains_key(label)
    }

    pub fn custom_group(&self, name: &str) -> Option<&CompiledCustomGroup> {
        self.custom_groups.iter().find(|g| g.name == name)
    }

    /// Comparator for one tier: tier override, else the sort declared by a
    /// same-named custom group when the tier has a single label, else the
    /// global sort.
    pub fn sort_for_tier(&self, tier: usize) -> &CompiledSort {
        if let Some(t) = self.tiers.get(tier) {
            if let Some(sort) = &t.sort {
                return sort;
            }
            if t.labels.len() == 1 {
                if let Some(group) = self.custom_group(&t.labels[0]) {
                    if let Some(sort) = &group.sort {
                        return sort;
                    }
                }
            }
        }
        &self.sort
    }
}

/// Compile one profile, failing fast on any invalid pattern or layout.
pub fn compile(config: &OrderingConfig) -> Result<CompiledConfig, ConfigError> {
    let sort = compile_sort(&config.sort)?;

    let mut tiers: Vec<Tier> = Vec::new();
    let mut gap_directives: Vec<Option<Newlines>> = Vec::new();
    let mut pending_directive: Option<Newlines> = None;

    for entry in &config.groups {
        match entry {
            GroupsEntry::Directive { newlines_between } => {
                if tiers.is_empty() {
                    return Err(ConfigError::GroupsLayout(
                        "spacing directive before the first group".into(),
                    ));
                }
                if pending_directive.is_some() {
                    return Err(ConfigError::GroupsLayout(
                        "two spacing directives without a group between them".into(),
                    ));
                }
                pending_directive = Some(Newlines::from_spec(*newlines_between));
            }
            other => {
                let tier = compile_tier(other)?;
                if !tiers.is_empty() {
                    gap_directives.push(pending_directive.take());
                }
                tiers.push(tier);
            }
        }
    }
    if pending_directive.is_some() {
        return Err(ConfigError::GroupsLayout(
            "spacing directive after the last group".into(),
        ));
    }

    let mut label_index = HashMap::new();
    for (tier_idx, tier) in tiers.iter().enumerate() {
        for (sub_idx, label) in tier.labels.iter().enumerate() {
            if label_index
                .insert(label.clone(), (tier_idx, sub_idx))
                .is_some()
            {
                return Err(ConfigError::GroupsLayout(format!(
                    "group '{}' listed more than once",
                    label
                )));
            }
        }
    }

    let mut custom_groups = Vec::with_capacity(config.custom_groups.len());
    for def in &config.custom_groups {
        custom_groups.push(compile_custom_group(def)?);
    }

    Ok(CompiledConfig {
        sort,
        tiers,
        gap_directives,
        custom_groups,
        newlines_between: config
            .newlines_between
            .map(Newlines::from_spec)
            .unwrap_or(Newlines::Ignore),
        partition_by_comment: match &config.partition_by_comment {
            None | Some(CommentPartitionSpec::Enabled(false)) => None,
            Some(CommentPartitionSpec::Enabled(true)) => Some(CommentPartition::Any),
            Some(CommentPartitionSpec::Matching(spec)) => {
                Some(CommentPartition::Matching(compile_patterns(spec)?))
            }
        },
        partition_by_newline: config.partition_by_newline,
        detect_dependencies: config.detect_dependencies,
        ignore_callback_patterns: config
            .ignore_callback_dependencies_patterns
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
        guard: config
            .use_configuration_if
            .as_ref()
            .map(compile_guard)
            .transpose()?,
        label_index,
    })
}

fn compile_tier(entry: &GroupsEntry) -> Result<Tier, ConfigError> {
    match entry {
        GroupsEntry::Label(label) => Ok(Tier {
            labels: vec![label.clone()],
            sort: None,
            newlines_inside: None,
        }),
        GroupsEntry::Tier(labels) => {
            if labels.is_empty() {
                return Err(ConfigError::GroupsLayout("empty tier".into()));
            }
            Ok(Tier {
                labels: labels.clone(),
                sort: None,
                newlines_inside: None,
            })
        }
        GroupsEntry::TierSpec(spec) => {
            let labels = match &spec.group {
                GroupOrGroups::One(label) => vec![label.clone()],
                GroupOrGroups::Many(labels) => {
                    if labels.is_empty() {
                        return Err(ConfigError::GroupsLayout("empty tier".into()));
                    }
                    labels.clone()
                }
            };
            Ok(Tier {
                labels,
                sort: spec.sort.as_ref().map(compile_sort).transpose()?,
                newlines_inside: spec.newlines_inside.map(Newlines::from_spec),
            })
        }
        GroupsEntry::Directive { .. } => unreachable!("directives are handled by the caller"),
    }
}

fn compile_custom_group(def: &CustomGroupDef) -> Result<CompiledCustomGroup, ConfigError> {
    if def.group_name.is_empty() {
        return Err(ConfigError::EmptyGroupName);
    }
    let predicates = match &def.matcher {
        GroupMatcher::Single(p) => vec![compile_predicate(p)?],
        GroupMatcher::AnyOf { any_of } => {
            let mut compiled = Vec::with_capacity(any_of.len());
            for p in any_of {
                compiled.push(compile_predicate(p)?);
            }
            compiled
        }
    };
    Ok(CompiledCustomGroup {
        name: def.group_name.clone(),
        predicates,
        sort: def.sort.as_ref().map(compile_sort).transpose()?,
        newlines_inside: def.newlines_inside.map(Newlines::from_spec),
    })
}

fn compile_predicate(predicate: &GroupPredicate) -> Result<CompiledPredicate, ConfigError> {
    Ok(CompiledPredicate {
        selector: predicate.selector,
        modifiers: predicate.modifiers.clone(),
        name_pattern: predicate
            .element_name_pattern
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
        value_pattern: predicate
            .element_value_pattern
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
        decorator_pattern: predicate
            .decorator_name_pattern
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
    })
}

fn compile_sort(spec: &SortSpec) -> Result<CompiledSort, ConfigError> {
    let kind = match spec.kind {
        SortTypeSpec::Alphabetical => SortKind::Alphabetical,
        SortTypeSpec::Natural => SortKind::Natural,
        SortTypeSpec::LineLength => SortKind::LineLength,
        SortTypeSpec::CustomAlphabet => SortKind::CustomAlphabet,
        SortTypeSpec::Unsorted => SortKind::Unsorted,
    };

    let alphabet = if kind == SortKind::CustomAlphabet {
        let raw = spec
            .alphabet
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingAlphabet)?;
        let mut index = HashMap::new();
        for (pos, ch) in raw.chars().enumerate() {
            if index.insert(ch, pos).is_some() {
                return Err(ConfigError::DuplicateAlphabetChar(ch));
            }
        }
        Some(index)
    } else {
        None
    };

    let fallback = match &spec.fallback_sort {
        None => None,
        Some(FallbackSpec::Sentinel(_)) => Some(Box::new(Fallback::SubgroupOrder)),
        Some(FallbackSpec::Spec(inner)) => Some(Box::new(Fallback::Sort(compile_sort(inner)?))),
    };

    Ok(CompiledSort {
        kind,
        order: match spec.order {
            SortOrderSpec::Asc => SortOrder::Asc,
            SortOrderSpec::Desc => SortOrder::Desc,
        },
        locale: spec.locale.clone(),
        special_characters: match spec.special_characters {
            SpecialCharactersSpec::Keep => SpecialCharacters::Keep,
            SpecialCharactersSpec::Trim => SpecialCharacters::Trim,
            SpecialCharactersSpec::Remove => SpecialCharacters::Remove,
        },
        fallback,
        alphabet,
    })
}

fn compile_guard(guard: &ConfigGuard) -> Result<CompiledGuard, ConfigError> {
    Ok(CompiledGuard {
        all_names: guard
            .all_names_match_pattern
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
        declaration: guard
            .declaration_matches_pattern
            .as_ref()
            .map(compile_patterns)
            .transpose()?,
    })
}

/// Compile a pattern spec into its OR-set of regexes.
pub fn compile_patterns(spec: &PatternSpec) -> Result<PatternSet, ConfigError> {
    let mut regexes = Vec::new();
    collect_patterns(spec, &mut regexes)?;
    Ok(PatternSet { regexes })
}

fn collect_patterns(spec: &PatternSpec, out: &mut Vec<Regex>) -> Result<(), ConfigError> {
    match spec {
        PatternSpec::Pattern(pattern) => {
            out.push(build_regex(pattern, None)?);
        }
        PatternSpec::WithFlags { pattern, flags } => {
            out.push(build_regex(pattern, flags.as_deref())?);
        }
        PatternSpec::List(specs) => {
            for inner in specs {
                collect_patterns(inner, out)?;
            }
        }
    }
    Ok(())
}

fn build_regex(pattern: &str, flags: Option<&str>) -> Result<Regex, ConfigError> {
    let source = match flags {
        None | Some("") => pattern.to_string(),
        Some(flags) => {
            // "u" is a no-op: the regex crate is always Unicode-aware.
            let inline: String = flags.chars().filter(|c| *c != 'u').collect();
            if !inline.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x')) {
                return Err(ConfigError::InvalidFlags(flags.to_string()));
            }
            if inline.is_empty() {
                pattern.to_string()
            } else {
                format!("(?{}){}", inline, pattern)
            }
        }
    };
    Regex::new(&source).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_yaml(yaml: &str) -> Result<CompiledConfig, ConfigError> {
        let config: OrderingConfig = serde_yaml::from_str(yaml).unwrap();
        compile(&config)
    }

    #[test]
    fn test_groups_flatten_to_tiers() {
        let compiled = compile_yaml(
            r#"
groups:
  - constructor
  - [static-property, property]
  - newlines_between: 2
  - method
"#,
        )
        .unwrap();

        assert_eq!(compiled.tiers.len(), 3);
        assert_eq!(compiled.gap_directives, vec![None, Some(Newlines::Count(2))]);
        assert_eq!(compiled.tier_of("constructor"), Some((0, 0)));
        assert_eq!(compiled.tier_of("property"), Some((1, 1)));
        assert_eq!(compiled.tier_of("method"), Some((2, 0)));
        assert_eq!(compiled.tier_of("unknown"), None);
    }

    #[test]
    fn test_directive_layout_errors() {
        assert!(matches!(
            compile_yaml("groups:\n  - newlines_between: 1\n  - a\n"),
            Err(ConfigError::GroupsLayout(_))
        ));
        assert!(matches!(
            compile_yaml("groups:\n  - a\n  - newlines_between: 1\n"),
            Err(ConfigError::GroupsLayout(_))
        ));
        assert!(matches!(
            compile_yaml("groups:\n  - a\n  - newlines_between: 1\n  - newlines_between: 2\n  - b\n"),
            Err(ConfigError::GroupsLayout(_))
        ));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        assert!(matches!(
            compile_yaml("groups:\n  - a\n  - a\n"),
            Err(ConfigError::GroupsLayout(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_fails_at_load() {
        let result = compile_yaml(
            r#"
custom_groups:
  - group_name: broken
    element_name_pattern: "["
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_pattern_flags() {
        let compiled = compile_yaml(
            r#"
custom_groups:
  - group_name: flagged
    element_name_pattern:
      pattern: "^get"
      flags: iu
"#,
        )
        .unwrap();
        let group = &compiled.custom_groups[0];
        let element = Element::new(0, "GetName");
        assert!(group.matches(&element));

        assert!(matches!(
            compile_yaml(
                r#"
custom_groups:
  - group_name: flagged
    element_name_pattern:
      pattern: "^get"
      flags: "g"
"#,
            ),
            Err(ConfigError::InvalidFlags(_))
        ));
    }

    #[test]
    fn test_custom_alphabet_validation() {
        assert!(matches!(
            compile_yaml("sort:\n  type: custom-alphabet\n"),
            Err(ConfigError::MissingAlphabet)
        ));
        assert!(matches!(
            compile_yaml("sort:\n  type: custom-alphabet\n  alphabet: \"aba\"\n"),
            Err(ConfigError::DuplicateAlphabetChar('a'))
        ));

        let compiled = compile_yaml("sort:\n  type: custom-alphabet\n  alphabet: \"bac\"\n").unwrap();
        let alphabet = compiled.sort.alphabet.as_ref().unwrap();
        assert_eq!(alphabet.get(&'b'), Some(&0));
        assert_eq!(alphabet.get(&'a'), Some(&1));
    }

    #[test]
    fn test_sort_for_tier_prefers_overrides() {
        let compiled = compile_yaml(
            r#"
sort:
  type: alphabetical
groups:
  - group: sized
    sort:
      type: line-length
  - lifecycle
custom_groups:
  - group_name: lifecycle
    sort:
      type: unsorted
    element_name_pattern: "^on"
"#,
        )
        .unwrap();

        assert_eq!(compiled.sort_for_tier(0).kind, SortKind::LineLength);
        assert_eq!(compiled.sort_for_tier(1).kind, SortKind::Unsorted);
        assert_eq!(compiled.sort_for_tier(9).kind, SortKind::Alphabetical);
    }

    #[test]
    fn test_guard_accepts() {
        let compiled = compile_yaml(
            r#"
use_configuration_if:
  declaration_matches_pattern: "Props$"
  all_names_match_pattern: "^[a-z]"
"#,
        )
        .unwrap();
        let guard = compiled.guard.as_ref().unwrap();
        assert!(guard.accepts(Some("ButtonProps"), &["size", "variant"]));
        assert!(!guard.accepts(Some("Button"), &["size"]));
        assert!(!guard.accepts(Some("ButtonProps"), &["Size"]));
        assert!(!guard.accepts(None, &["size"]));
    }
}
