//! Serde-facing configuration schema
//!
//! Mirrors the declarative surface accepted from hosts: sort spec, ordered
//! groups (with tiers and inline spacing directives), custom predicate
//! groups, partitioning toggles, and per-profile guards. Nothing here is
//! validated beyond shape; `compiled` turns a parsed config into its
//! runtime form and rejects bad patterns.

use ordlint_core::{Modifier, Selector};
use serde::{Deserialize, Serialize};

/// How elements within one tier are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortTypeSpec {
    #[default]
    Alphabetical,
    Natural,
    LineLength,
    CustomAlphabet,
    Unsorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrderSpec {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialCharactersSpec {
    #[default]
    Keep,
    /// Strip leading non-alphanumeric characters from sort keys.
    Trim,
    /// Strip all non-alphanumeric characters from sort keys.
    Remove,
}

/// A full sort specification. `fallback_sort` recurses, or names the
/// `subgroup-order` sentinel to order ties by sub-group ordinal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "type", default)]
    pub kind: SortTypeSpec,

    #[serde(default)]
    pub order: SortOrderSpec,

    /// Collation locale hint for alphabetical/natural sorts.
    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub special_characters: SpecialCharactersSpec,

    /// Total character order for `custom-alphabet`.
    #[serde(default)]
    pub alphabet: Option<String>,

    #[serde(default)]
    pub fallback_sort: Option<FallbackSpec>,
}

/// Keyword form of the subgroup-order sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubgroupOrderKeyword {
    SubgroupOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackSpec {
    /// The literal string "subgroup-order".
    Sentinel(SubgroupOrderKeyword),
    /// A nested sort applied on ties.
    Spec(Box<SortSpec>),
}

/// Blank-line requirement: an exact count or the literal "ignore".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NewlinesSpec {
    Count(u32),
    Keyword(IgnoreKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreKeyword {
    Ignore,
}

/// A pattern constraint: a single pattern, a list (OR), or pattern+flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Pattern(String),
    WithFlags {
        pattern: String,
        #[serde(default)]
        flags: Option<String>,
    },
    List(Vec<PatternSpec>),
}

/// One entry in the ordered groups list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupsEntry {
    /// A single group label.
    Label(String),
    /// Co-equal labels forming one tier.
    Tier(Vec<String>),
    /// A tier object carrying overrides.
    TierSpec(TierSpec),
    /// An inline spacing directive between the surrounding tiers.
    Directive { newlines_between: NewlinesSpec },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSpec {
    pub group: GroupOrGroups,

    #[serde(default)]
    pub sort: Option<SortSpec>,

    /// Blank lines between members of this tier.
    #[serde(default)]
    pub newlines_inside: Option<NewlinesSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupOrGroups {
    One(String),
    Many(Vec<String>),
}

/// A user-declared predicate group. The flat form is a conjunction; the
/// `any_of` form matches if any nested conjunction matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomGroupDef {
    pub group_name: String,

    #[serde(default)]
    pub sort: Option<SortSpec>,

    #[serde(default)]
    pub newlines_inside: Option<NewlinesSpec>,

    #[serde(flatten)]
    pub matcher: GroupMatcher,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupMatcher {
    AnyOf { any_of: Vec<GroupPredicate> },
    Single(GroupPredicate),
}

/// Conjunction of constraints; absent constraints always hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupPredicate {
    #[serde(default)]
    pub selector: Option<Selector>,

    /// All listed modifiers must be present.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    #[serde(default)]
    pub element_name_pattern: Option<PatternSpec>,

    #[serde(default)]
    pub element_value_pattern: Option<PatternSpec>,

    /// Matches against any one decorator name.
    #[serde(default)]
    pub decorator_name_pattern: Option<PatternSpec>,
}

/// Partition-by-comment toggle: a plain boolean (any comment) or the
/// pattern(s) a boundary comment must match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentPartitionSpec {
    Enabled(bool),
    Matching(PatternSpec),
}

/// "Apply this configuration only if" guard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigGuard {
    /// Every element name must match.
    #[serde(default)]
    pub all_names_match_pattern: Option<PatternSpec>,

    /// The construct's own name must match.
    #[serde(default)]
    pub declaration_matches_pattern: Option<PatternSpec>,
}

/// One ordering profile. Hosts may configure a single profile or an
/// ordered list of guarded profiles; the first whose guard accepts the
/// construct is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingConfig {
    #[serde(default)]
    pub sort: SortSpec,

    #[serde(default)]
    pub groups: Vec<GroupsEntry>,

    #[serde(default)]
    pub custom_groups: Vec<CustomGroupDef>,

    #[serde(default)]
    pub partition_by_comment: Option<CommentPartitionSpec>,

    #[serde(default)]
    pub partition_by_newline: bool,

    /// Global blank-line requirement between groups. Defaults to "ignore".
    #[serde(default)]
    pub newlines_between: Option<NewlinesSpec>,

    #[serde(default = "default_true")]
    pub detect_dependencies: bool,

    /// Callee names whose callback arguments are not scanned for
    /// dependencies.
    #[serde(default)]
    pub ignore_callback_dependencies_patterns: Option<PatternSpec>,

    #[serde(default)]
    pub use_configuration_if: Option<ConfigGuard>,
}

fn default_true() -> bool {
    true
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            sort: SortSpec::default(),
            groups: Vec::new(),
            custom_groups: Vec::new(),
            partition_by_comment: None,
            partition_by_newline: false,
            newlines_between: None,
            detect_dependencies: true,
            ignore_callback_dependencies_patterns: None,
            use_configuration_if: None,
        }
    }
}
