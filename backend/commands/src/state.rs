/// Shared bot state handed to every handler.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use botforge_core::{CommandScope, GatewaySession, SessionInfo};

/// Startup options for the command lifecycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BotOptions {
    pub scope: CommandScope,
    pub remove_commands_on_exit: bool,
}

#[derive(Debug, Default)]
pub struct BotState {
    pub options: BotOptions,
    session_info: RwLock<Option<SessionInfo>>,
    /// Settings resolved lazily after startup (e.g. the active model of a command).
    settings: RwLock<HashMap<String, String>>,
}

impl BotState {
    pub fn new(options: BotOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn session_info(&self) -> Option<SessionInfo> {
        self.session_info.read().ok().and_then(|g| g.clone())
    }

    pub(crate) fn set_session_info(&self, info: SessionInfo) {
        if let Ok(mut guard) = self.session_info.write() {
            *guard = Some(info);
        }
    }

    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings.read().ok().and_then(|s| s.get(key).cloned())
    }

    pub fn set_setting(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut settings) = self.settings.write() {
            settings.insert(key.into(), value.into());
        }
    }
}

/// Everything a handler gets besides the interaction itself.
#[derive(Clone)]
pub struct HandlerContext {
    pub state: Arc<BotState>,
    pub session: Arc<dyn GatewaySession>,
}

impl HandlerContext {
    pub fn new(state: Arc<BotState>, session: Arc<dyn GatewaySession>) -> Self {
        Self { state, session }
    }
}
