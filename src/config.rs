//! Application-level configuration loading, including the team-name word lists.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TEAM_POACH_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
///
/// Currently holds the adjective and animal word lists the auto-assign
/// heuristic combines into generated team names.
pub struct AppConfig {
    adjectives: Vec<String>,
    animals: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the baked-in word lists.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        adjectives = app_config.adjectives.len(),
                        animals = app_config.animals.len(),
                        "loaded team name word lists from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration from explicit word lists, keeping the defaults
    /// for any empty list.
    pub fn from_lists(adjectives: Vec<String>, animals: Vec<String>) -> Self {
        RawConfig {
            adjectives,
            animals,
        }
        .into()
    }

    /// Combine one random adjective and one random animal into a team name.
    pub fn random_team_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let adjective = self
            .adjectives
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Lucky");
        let animal = self
            .animals
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("Parakeet");
        format!("{adjective}{animal}")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            adjectives: default_adjectives(),
            animals: default_animals(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    adjectives: Vec<String>,
    #[serde(default)]
    animals: Vec<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        // An empty list would make name generation spin; keep the defaults instead.
        let adjectives = if value.adjectives.is_empty() {
            default_adjectives()
        } else {
            value.adjectives
        };
        let animals = if value.animals.is_empty() {
            default_animals()
        } else {
            value.animals
        };
        Self {
            adjectives,
            animals,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in adjective list shipped with the binary.
fn default_adjectives() -> Vec<String> {
    [
        "Lucky", "Happy", "Brave", "Swift", "Mighty", "Clever", "Bold", "Fierce", "Gentle", "Wise",
        "Quick", "Strong", "Bright", "Wild", "Noble", "Proud", "Fearless", "Agile", "Cosmic",
        "Magic",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Built-in animal list shipped with the binary.
fn default_animals() -> Vec<String> {
    [
        "Parakeet", "Monkey", "Tiger", "Eagle", "Dragon", "Phoenix", "Wolf", "Lion", "Falcon",
        "Panther", "Bear", "Fox", "Hawk", "Leopard", "Dolphin", "Shark", "Cobra", "Jaguar",
        "Raven", "Owl",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn generated_names_come_from_the_word_lists() {
        let config = AppConfig {
            adjectives: vec!["Lucky".into()],
            animals: vec!["Parakeet".into()],
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(config.random_team_name(&mut rng), "LuckyParakeet");
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let config = AppConfig::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(
            config.random_team_name(&mut a),
            config.random_team_name(&mut b)
        );
    }

    #[test]
    fn empty_raw_lists_fall_back_to_defaults() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.adjectives.len(), 20);
        assert_eq!(config.animals.len(), 20);
    }

    #[test]
    fn custom_raw_lists_are_kept() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"adjectives":["Shiny"],"animals":["Newt"]}"#).unwrap();
        let config: AppConfig = raw.into();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(config.random_team_name(&mut rng), "ShinyNewt");
    }
}
