use serde::{Deserialize, Serialize};

/// Daily chanting quota used when a participant has not set their own.
pub const DEFAULT_TARGET_ROUNDS: u32 = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_target_rounds")]
    pub default_target_rounds: u32,
    /// Path to a TOML rule table; the standard rules apply when unset.
    #[serde(default)]
    pub rules_path: Option<String>,
}

fn default_target_rounds() -> u32 {
    DEFAULT_TARGET_ROUNDS
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { default_target_rounds: DEFAULT_TARGET_ROUNDS, rules_path: None }
    }
}
