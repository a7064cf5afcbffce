use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub joke: JokeConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JokeConfig {
    /// GET endpoint returning `{"setup": ..., "punchline": ...}`.
    #[serde(default = "default_joke_endpoint")]
    pub endpoint: String,
}

/// User-configurable file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where preferences (language, selected shop, to-dos) are stored.
    /// Defaults to `~/.local/share/ramen/prefs.json`.
    #[serde(default = "default_prefs_file")]
    pub prefs_file: PathBuf,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_joke_endpoint(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            prefs_file: default_prefs_file(),
        }
    }
}

fn default_joke_endpoint() -> String {
    "https://official-joke-api.appspot.com/jokes/random".to_string()
}

fn default_prefs_file() -> PathBuf {
    platform::data_dir().join("prefs.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.joke.endpoint.starts_with("https://"));
        assert!(config.joke.endpoint.ends_with("/jokes/random"));
        assert!(config.paths.prefs_file.ends_with("ramen/prefs.json"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [joke]
            endpoint = "http://127.0.0.1:9/joke"
            "#,
        )
        .unwrap();
        assert_eq!(config.joke.endpoint, "http://127.0.0.1:9/joke");
        assert!(config.paths.prefs_file.ends_with("prefs.json"));
    }
}
