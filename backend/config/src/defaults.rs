//! Default values and recognised environment variable names.

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Value shipped in the sample `.env`; never a real credential.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_GUILD_ID: &str = "GUILD_ID";
pub const ENV_REMOVE_COMMANDS: &str = "REMOVE_COMMANDS";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";
pub const ENV_LOG_DIR: &str = "BOTFORGE_LOG_DIR";
