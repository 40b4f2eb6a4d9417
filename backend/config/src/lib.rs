//! `botforge-config` — bot runtime configuration.
//!
//! Provides:
//! - Typed config (`BotConfig`) with defaults
//! - `.env` loading and flag/environment precedence
//! - Credential validation
//! - Redaction for safe logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{resolve_from_env, resolve_with};
pub use redact::{mask, redact};
pub use schema::{BotConfig, ConfigOverrides};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid guild id '{0}': expected a numeric snowflake")]
    InvalidGuild(String),

    #[error("cannot load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigValidationError),
}

impl BotConfig {
    /// Config as JSON with secrets masked.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .map(|v| redact(&v))
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Load variables from `.env` in the working directory or its parents.
///
/// Existing process variables win. A missing file is reported, not fatal.
pub fn load_dotenv() -> Result<PathBuf, ConfigError> {
    Ok(dotenvy::dotenv()?)
}

/// Validate a resolved config, logging warnings and returning the first error.
pub fn check(config: BotConfig) -> Result<BotConfig, ConfigError> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(error) = report.errors.into_iter().next() {
        return Err(error.into());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn check_rejects_missing_token() {
        let cfg = resolve_with(&ConfigOverrides::default(), &HashMap::new()).unwrap();
        let err = check(cfg).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn redacted_hides_token() {
        let cfg = BotConfig {
            bot_token: "supersecrettoken".into(),
            guild_id: Some(7),
            ..BotConfig::default()
        };
        let v = cfg.redacted();
        assert_eq!(v["botToken"], "supe***");
        assert_eq!(v["guildId"], 7);
    }
}
