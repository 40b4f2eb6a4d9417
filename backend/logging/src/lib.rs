//! Telemetry and structured logging components for the bot.
//!
//! Handles log redaction, JSON output generation, file rotation, and bot event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{BotEvent, EventLogEntry, EventLogger, EVENT_TARGET};
pub use logger::{default_directives, init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
