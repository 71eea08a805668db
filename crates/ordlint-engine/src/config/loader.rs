//! YAML configuration loading and profile selection
//!
//! Hosts hand the engine either a single profile or an ordered list of
//! guarded profiles. Everything is validated and compiled here, so a bad
//! pattern surfaces as a `ConfigError` before any element is evaluated.

use std::fs;
use std::path::Path;

use super::compiled::{compile, CompiledConfig, ConfigError};
use super::schema::OrderingConfig;

/// Load and compile one or more profiles from a YAML string.
pub fn load_profiles_from_str(yaml: &str) -> Result<Vec<CompiledConfig>, ConfigError> {
    // Try a single profile first, then a list.
    if let Ok(config) = serde_yaml::from_str::<OrderingConfig>(yaml) {
        return Ok(vec![compile(&config)?]);
    }

    let configs: Vec<OrderingConfig> = serde_yaml::from_str(yaml)?;
    let mut compiled = Vec::with_capacity(configs.len());
    for config in &configs {
        compiled.push(compile(config)?);
    }
    Ok(compiled)
}

/// Load and compile profiles from a YAML file.
pub fn load_profiles_from_file(path: &Path) -> Result<Vec<CompiledConfig>, ConfigError> {
    let content = fs::read_to_string(path)?;
    load_profiles_from_str(&content)
}

/// Pick the first profile whose guard accepts the construct. A profile
/// without a guard always accepts.
pub fn select_profile<'a>(
    profiles: &'a [CompiledConfig],
    construct_name: Option<&str>,
    element_names: &[&str],
) -> Option<&'a CompiledConfig> {
    profiles.iter().find(|profile| match &profile.guard {
        None => true,
        Some(guard) => guard.accepts(construct_name, element_names),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_single_profile() {
        let yaml = r#"
sort:
  type: natural
groups:
  - property
  - method
"#;
        let profiles = load_profiles_from_str(yaml).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].tiers.len(), 2);
    }

    #[test]
    fn test_load_profile_list() {
        let yaml = r#"
- use_configuration_if:
    declaration_matches_pattern: "Props$"
  sort:
    type: line-length
- sort:
    type: alphabetical
"#;
        let profiles = load_profiles_from_str(yaml).unwrap();
        assert_eq!(profiles.len(), 2);
        assert!(profiles[0].guard.is_some());
        assert!(profiles[1].guard.is_none());
    }

    #[test]
    fn test_invalid_pattern_fails_on_load() {
        let yaml = r#"
- use_configuration_if:
    declaration_matches_pattern: "("
"#;
        assert!(matches!(
            load_profiles_from_str(yaml),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_select_profile_first_match_wins() {
        let yaml = r#"
- use_configuration_if:
    declaration_matches_pattern: "Props$"
  sort:
    type: line-length
- use_configuration_if:
    all_names_match_pattern: "^[a-z]+$"
  sort:
    type: natural
- sort:
    type: alphabetical
"#;
        let profiles = load_profiles_from_str(yaml).unwrap();

        let chosen = select_profile(&profiles, Some("ButtonProps"), &["a"]).unwrap();
        assert!(std::ptr::eq(chosen, &profiles[0]));

        let chosen = select_profile(&profiles, Some("Button"), &["alpha", "beta"]).unwrap();
        assert!(std::ptr::eq(chosen, &profiles[1]));

        let chosen = select_profile(&profiles, None, &["Mixed", "names"]).unwrap();
        assert!(std::ptr::eq(chosen, &profiles[2]));
    }

    #[test]
    fn test_select_profile_none_matches() {
        let yaml = r#"
- use_configuration_if:
    declaration_matches_pattern: "Props$"
"#;
        let profiles = load_profiles_from_str(yaml).unwrap();
        assert!(select_profile(&profiles, Some("Button"), &[]).is_none());
    }
}
