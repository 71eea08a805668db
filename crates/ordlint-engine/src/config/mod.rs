//! Configuration surface of the ordering engine
//!
//! `schema` holds the serde-facing types, `compiled` the validated runtime
//! form (patterns compiled, groups flattened into tiers), and `loader` the
//! YAML entry points plus profile selection.

pub mod compiled;
pub mod loader;
pub mod schema;

pub use compiled::{
    compile, compile_patterns, CommentPartition, CompiledConfig, CompiledCustomGroup,
    CompiledGuard, CompiledPredicate, CompiledSort, ConfigError, Fallback, Newlines, PatternSet,
    SortKind, SortOrder, SpecialCharacters, Tier,
};
pub use loader::{load_profiles_from_file, load_profiles_from_str, select_profile};
pub use schema::{
    CommentPartitionSpec, ConfigGuard, CustomGroupDef, FallbackSpec, GroupMatcher, GroupOrGroups,
    GroupPredicate, GroupsEntry, IgnoreKeyword, NewlinesSpec, OrderingConfig, PatternSpec,
    SortOrderSpec, SortSpec, SortTypeSpec, SpecialCharactersSpec, SubgroupOrderKeyword, TierSpec,
};
