// Runtime configuration read from the environment (.env is loaded first).

use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_PREFIX: &str = "V!";
pub const DEFAULT_BAD_WORDS: &str = "spam,inappropriate,badword";
pub const DEFAULT_MAX_WARNINGS: u32 = 3;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    pub owner_ids: HashSet<u64>,
    pub bad_words: Vec<String>,
    pub max_warnings: u32,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so tests don't touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let prefix = get("PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let mut owner_ids = HashSet::new();
        if let Some(raw) = get("OWNER_ID") {
            for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let id = part.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    key: "OWNER_ID",
                    value: part.to_string(),
                })?;
                owner_ids.insert(id);
            }
        }

        let bad_words = get("BAD_WORDS")
            .unwrap_or_else(|| DEFAULT_BAD_WORDS.to_string())
            .split(',')
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        let max_warnings = match get("MAX_WARNINGS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MAX_WARNINGS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_WARNINGS,
        };

        let data_dir =
            PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        Ok(Self {
            token,
            prefix,
            owner_ids,
            bad_words,
            max_warnings,
            data_dir,
        })
    }

    pub fn whitelist_path(&self) -> PathBuf {
        self.data_dir.join("whitelist.json")
    }

    pub fn server_logs_path(&self) -> PathBuf {
        self.data_dir.join("server_logs.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.prefix, "V!");
        assert_eq!(config.bad_words, vec!["spam", "inappropriate", "badword"]);
        assert_eq!(config.max_warnings, 3);
        assert!(config.owner_ids.is_empty());
        assert_eq!(config.whitelist_path(), PathBuf::from("data/whitelist.json"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            config_from(&[("PREFIX", "!")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("PREFIX", "!"),
            ("OWNER_ID", "123, 456"),
            ("BAD_WORDS", "Foo, ,bar"),
            ("MAX_WARNINGS", "5"),
            ("DATA_DIR", "/tmp/bot"),
        ])
        .unwrap();
        assert_eq!(config.prefix, "!");
        assert!(config.owner_ids.contains(&123) && config.owner_ids.contains(&456));
        assert_eq!(config.bad_words, vec!["foo", "bar"]);
        assert_eq!(config.max_warnings, 5);
        assert_eq!(
            config.server_logs_path(),
            PathBuf::from("/tmp/bot/server_logs.json")
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("MAX_WARNINGS", "0")]),
            Err(ConfigError::Invalid { key: "MAX_WARNINGS", .. })
        ));
        assert!(matches!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("OWNER_ID", "me")]),
            Err(ConfigError::Invalid { key: "OWNER_ID", .. })
        ));
    }
}
