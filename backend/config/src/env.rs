//! Resolve configuration from command-line overrides and environment variables.
//!
//! Precedence per field: non-empty flag, then environment, then default.
//! `REMOVE_COMMANDS` is true only for the exact string `"true"`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL, ENV_BOT_TOKEN, ENV_GUILD_ID, ENV_LOG_DIR, ENV_LOG_LEVEL,
    ENV_REMOVE_COMMANDS,
};
use crate::schema::{BotConfig, ConfigOverrides};
use crate::ConfigError;

/// Resolve against the process environment.
pub fn resolve_from_env(overrides: &ConfigOverrides) -> Result<BotConfig, ConfigError> {
    resolve_with(overrides, &std::env::vars().collect())
}

/// Resolve against a provided map (useful for testing).
pub fn resolve_with(
    overrides: &ConfigOverrides,
    env: &HashMap<String, String>,
) -> Result<BotConfig, ConfigError> {
    let lookup = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();
    let flag = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    let bot_token = flag(&overrides.token)
        .or_else(|| lookup(ENV_BOT_TOKEN))
        .unwrap_or_default();

    let guild_id = match flag(&overrides.guild).or_else(|| lookup(ENV_GUILD_ID)) {
        Some(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidGuild(raw.clone()))?,
        ),
        None => None,
    };

    let remove_commands_on_exit = overrides.remove
        || lookup(ENV_REMOVE_COMMANDS).is_some_and(|v| v == "true");

    Ok(BotConfig {
        bot_token,
        guild_id,
        remove_commands_on_exit,
        log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        log_dir: lookup(ENV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn reads_environment() {
        let cfg = resolve_with(
            &ConfigOverrides::default(),
            &env(&[("BOT_TOKEN", "abc"), ("GUILD_ID", "1234"), ("REMOVE_COMMANDS", "true")]),
        )
        .unwrap();
        assert_eq!(cfg.bot_token, "abc");
        assert_eq!(cfg.guild_id, Some(1234));
        assert!(cfg.remove_commands_on_exit);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn flags_override_environment() {
        let overrides = ConfigOverrides {
            token: Some("from-flag".into()),
            guild: Some("42".into()),
            remove: true,
        };
        let cfg = resolve_with(
            &overrides,
            &env(&[("BOT_TOKEN", "from-env"), ("GUILD_ID", "1"), ("REMOVE_COMMANDS", "false")]),
        )
        .unwrap();
        assert_eq!(cfg.bot_token, "from-flag");
        assert_eq!(cfg.guild_id, Some(42));
        assert!(cfg.remove_commands_on_exit);
    }

    #[test]
    fn empty_flags_fall_through() {
        let overrides = ConfigOverrides {
            token: Some(String::new()),
            guild: Some(String::new()),
            remove: false,
        };
        let cfg = resolve_with(&overrides, &env(&[("BOT_TOKEN", "env-token")])).unwrap();
        assert_eq!(cfg.bot_token, "env-token");
        assert_eq!(cfg.guild_id, None);
        assert!(!cfg.remove_commands_on_exit);
    }

    #[test]
    fn remove_requires_exact_true() {
        let cfg = resolve_with(&ConfigOverrides::default(), &env(&[("REMOVE_COMMANDS", "1")])).unwrap();
        assert!(!cfg.remove_commands_on_exit);
    }

    #[test]
    fn invalid_guild_is_error() {
        let err = resolve_with(&ConfigOverrides::default(), &env(&[("GUILD_ID", "my-guild")])).unwrap_err();
        assert!(err.to_string().contains("my-guild"));
    }
}
