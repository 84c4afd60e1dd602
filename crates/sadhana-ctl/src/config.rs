use anyhow::{Context, Result};
use sadhana_common::config::{GeneralConfig, ScoringConfig};
use sadhana_score::{ScoreEngine, ScoringRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CtlConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl CtlConfig {
    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join("sadhana").join("ctl.toml")
    }

    /// Load configuration from a specific path, falling back to defaults when
    /// the file does not exist
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading ctl configuration from {:?}", config_path);

        if !config_path.exists() {
            info!("Configuration file not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: CtlConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        info!("Loaded ctl configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        debug!("Saving ctl configuration to {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Saved ctl configuration to {:?}", config_path);
        Ok(())
    }

    /// Validate the configuration settings
    pub fn validate(&self) -> Result<()> {
        if let Some(rules_path) = &self.scoring.rules_path {
            if !Path::new(rules_path).exists() {
                anyhow::bail!("Scoring rules file does not exist: {}", rules_path);
            }
        }

        if self.scoring.default_target_rounds == 0 {
            warn!("Default target rounds is 0 - every round will earn only the flat beyond-target credit");
        }

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Rule table named by the configuration, or the standard one
    pub fn scoring_rules(&self) -> Result<ScoringRules> {
        match &self.scoring.rules_path {
            Some(path) => ScoringRules::load_from_path(Path::new(path))
                .with_context(|| format!("Failed to load scoring rules: {}", path)),
            None => Ok(ScoringRules::default()),
        }
    }

    pub fn engine(&self) -> Result<ScoreEngine> {
        ScoreEngine::new(self.scoring_rules()?).context("Invalid scoring rules")
    }

    /// Write the default configuration to `config_path`. An existing file is
    /// only replaced when `force` is set.
    pub fn init_at(config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            anyhow::bail!(
                "Configuration file already exists at {:?}, use --force to overwrite it",
                config_path
            );
        }

        Self::default().save_to_path(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = CtlConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scoring.default_target_rounds, 16);
        assert!(config.scoring.rules_path.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ctl.toml");

        let mut config = CtlConfig::default();
        config.general.log_level = "debug".to_string();
        config.scoring.default_target_rounds = 25;
        config.save_to_path(&path).unwrap();

        let loaded = CtlConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.general.log_level, "debug");
        assert_eq!(loaded.scoring.default_target_rounds, 25);
    }

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sadhana").join("ctl.toml");

        CtlConfig::init_at(&path, false).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[general]"));
        assert!(written.contains("default_target_rounds = 16"));

        let loaded = CtlConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.general.log_level, "info");
        assert!(loaded.scoring.rules_path.is_none());
    }

    #[test]
    fn test_init_keeps_existing_file_unless_forced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctl.toml");
        fs::write(&path, "[scoring]\ndefault_target_rounds = 8\n").unwrap();

        let err = CtlConfig::init_at(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(CtlConfig::load_from_path(&path).unwrap().scoring.default_target_rounds, 8);

        CtlConfig::init_at(&path, true).unwrap();
        assert_eq!(CtlConfig::load_from_path(&path).unwrap().scoring.default_target_rounds, 16);
    }

    #[test]
    fn test_invalid_rules_file_is_rejected() {
        let dir = tempdir().unwrap();
        let rules_path = dir.path().join("rules.toml");
        let rules = ScoringRules::default().to_toml_string().unwrap();
        fs::write(&rules_path, rules.replace("points = 20.0", "points = -5.0")).unwrap();

        let mut config = CtlConfig::default();
        config.scoring.rules_path = Some(rules_path.to_string_lossy().to_string());
        assert!(config.engine().is_err());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctl.toml");
        fs::write(&path, "[scoring]\ndefault_target_rounds = 8\n").unwrap();

        let config = CtlConfig::load_from_path(&path).unwrap();
        assert_eq!(config.scoring.default_target_rounds, 8);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctl.toml");
        fs::write(&path, "[scoring\n").unwrap();

        let err = CtlConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_rules_path_is_loaded() {
        let dir = tempdir().unwrap();
        let rules_path = dir.path().join("rules.toml");
        let mut rules = ScoringRules::default();
        rules.version = "gaura-purnima".to_string();
        fs::write(&rules_path, rules.to_toml_string().unwrap()).unwrap();

        let mut config = CtlConfig::default();
        config.scoring.rules_path = Some(rules_path.to_string_lossy().to_string());
        assert!(config.validate().is_ok());

        let engine = config.engine().unwrap();
        assert_eq!(engine.rules().version, "gaura-purnima");
    }

    #[test]
    fn test_missing_rules_file_fails_validation() {
        let dir = tempdir().unwrap();
        let mut config = CtlConfig::default();
        config.scoring.rules_path = Some(dir.path().join("nope.toml").to_string_lossy().to_string());
        assert!(config.validate().is_err());
        assert!(config.scoring_rules().is_err());
    }
}
