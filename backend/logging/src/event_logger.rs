//! Bot Event Logger
//!
//! Structured events (interaction, command lifecycle, error) written to rolling NDJSON logs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum BotEvent {
    Interaction {
        kind: String,
        identifier: String,
        user_id: String,
        handled: bool,
    },
    Command {
        action: String,
        name: String,
        scope: String,
    },
    Error {
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub event: BotEvent,
}

/// Tracing target of every bot event.
pub const EVENT_TARGET: &str = "bot_events";

pub struct EventLogger;

impl EventLogger {
    /// Logs a bot runtime event, scrubbing credentials from free-form text.
    pub fn log_event(source: &str, event: BotEvent) {
        let entry = Self::entry(source, event);
        info!(target: EVENT_TARGET, event = ?entry, "Bot trace event");
    }

    fn entry(source: &str, mut event: BotEvent) -> EventLogEntry {
        match &mut event {
            BotEvent::Interaction { identifier, .. } => {
                *identifier = redact_sensitive_data(identifier);
            }
            BotEvent::Command { .. } => {}
            BotEvent::Error { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }

        EventLogEntry {
            source: source.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}
