//! Config validation: credential checks with user-friendly messages.

use crate::defaults::PLACEHOLDER_TOKEN;
use crate::schema::BotConfig;
use thiserror::Error;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_token(config, &mut report);
    validate_scope(config, &mut report);
    report
}

fn validate_token(config: &BotConfig, report: &mut ValidationReport) {
    let token = config.bot_token.trim();
    if token.is_empty() {
        report.error("botToken", "Bot token is required (-token flag or BOT_TOKEN)");
        return;
    }
    if token == PLACEHOLDER_TOKEN {
        report.error(
            "botToken",
            "Invalid bot token. Did you edit the .env or run the program with --token ?",
        );
        return;
    }
    if token.contains(char::is_whitespace) {
        report.error("botToken", "Bot token must not contain whitespace");
    }
    if token.len() < 50 {
        report.warn("botToken", "Bot token looks too short to be a real credential");
    }
}

fn validate_scope(config: &BotConfig, report: &mut ValidationReport) {
    if config.guild_id.is_none() && config.remove_commands_on_exit {
        report.warn(
            "guildId",
            "Global commands will be removed on exit and take time to propagate again",
        );
    }
}
