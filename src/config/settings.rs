//! Configuration settings for SkillSprint.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ai: AiSettings,
    pub content: ContentSettings,
    pub store: StoreSettings,
    pub server: ServerSettings,
    pub gamification: GamificationSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level when no `-v` flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.skillsprint".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Hosted model settings shared by every flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Model used by the structured flows.
    pub model: String,
    /// Model used by the course-creator agent.
    pub agent_model: String,
    /// Sampling temperature for flows.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum model calls per agent turn.
    pub max_agent_iterations: usize,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            agent_model: "gpt-4o".to_string(),
            temperature: 0.7,
            timeout_secs: 300,
            max_agent_iterations: 6,
        }
    }
}

/// Course content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ContentSettings {
    /// Directory of course JSON files layered over the bundled courses.
    pub courses_dir: Option<String>,
}

/// Profile store backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// SQLite database on disk (default).
    #[default]
    Sqlite,
    /// Process-local map, lost on exit.
    Memory,
}

impl std::str::FromStr for StoreProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreProvider::Sqlite),
            "memory" | "mem" => Ok(StoreProvider::Memory),
            _ => Err(format!("Unknown store provider: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreProvider::Sqlite => write!(f, "sqlite"),
            StoreProvider::Memory => write!(f, "memory"),
        }
    }
}

/// Profile and leaderboard store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store provider (sqlite, memory).
    pub provider: StoreProvider,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Sqlite,
            sqlite_path: "~/.skillsprint/profiles.db".to_string(),
        }
    }
}

/// HTTP server defaults (overridable on the command line).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// XP, levels and goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamificationSettings {
    /// XP for a correct practice answer.
    pub practice_xp: u64,
    /// XP for a passed assessment.
    pub assessment_xp: u64,
    /// Percentage needed to pass an assessment.
    pub pass_mark: u32,
    /// XP per level.
    pub level_size: u64,
    /// XP target for a full weekly progress bar.
    pub weekly_goal_xp: u64,
}

impl Default for GamificationSettings {
    fn default() -> Self {
        Self {
            practice_xp: 10,
            assessment_xp: 50,
            pass_mark: 70,
            level_size: 1000,
            weekly_goal_xp: 500,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SprintError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillsprint")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.store.sqlite_path)
    }

    /// Get the expanded course directory, if one is configured.
    pub fn courses_dir(&self) -> Option<PathBuf> {
        self.content.courses_dir.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [ai]
            model = "gpt-4.1"

            [store]
            provider = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.ai.model, "gpt-4.1");
        assert_eq!(settings.ai.max_agent_iterations, 6);
        assert_eq!(settings.store.provider, StoreProvider::Memory);
        assert_eq!(settings.gamification.pass_mark, 70);
        assert_eq!(settings.server.port, 3000);
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.content.courses_dir = Some("/srv/courses".to_string());
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.courses_dir(), Some(PathBuf::from("/srv/courses")));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = PathBuf::from("/nonexistent/skillsprint/config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.ai.model, "gpt-4o-mini");
    }

    #[test]
    fn test_store_provider_parse() {
        assert_eq!("SQLite".parse::<StoreProvider>().unwrap(), StoreProvider::Sqlite);
        assert_eq!("mem".parse::<StoreProvider>().unwrap(), StoreProvider::Memory);
        assert!("postgres".parse::<StoreProvider>().is_err());
    }
}
