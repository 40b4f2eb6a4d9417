//! Typed bot configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL};

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Bot credential. Required.
    pub bot_token: String,
    /// Guild to register commands in; `None` registers globally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<u64>,
    /// Delete every registered command on orderly shutdown.
    #[serde(default)]
    pub remove_commands_on_exit: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            guild_id: None,
            remove_commands_on_exit: false,
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

/// Values given on the command line. Empty / false means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub guild: Option<String>,
    pub remove: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_applies_defaults() {
        let cfg: BotConfig = serde_json::from_str(r#"{"botToken": "abc"}"#).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.guild_id, None);
        assert!(!cfg.remove_commands_on_exit);
    }
}
