/// Command registry — declared commands and their live platform registrations.
use std::collections::{BTreeMap, HashMap};

use botforge_core::{
    BotError, ChannelKind, CommandDef, CommandKey, CommandOptionDef, CommandScope, GatewaySession,
    OptionKind, RegisteredCommand, Snowflake,
};
use logging::{BotEvent, EventLogger};
use tracing::{debug, error, info};

pub const HELLO_COMMAND: &str = "hello";
pub const PROMPT_OPTION: &str = "prompt";

pub const MASKED_USER: &str = "user";
pub const MASKED_CHANNEL: &str = "channel";
pub const MASKED_FORUM: &str = "threads";
pub const MASKED_ROLE: &str = "role";

/// Longest command name the platform accepts.
pub const MAX_COMMAND_NAME_LEN: usize = 32;

/// Build the default command catalog.
pub fn builtin_commands() -> BTreeMap<CommandKey, CommandDef> {
    // Every command and option needs a description or registration fails.
    BTreeMap::from([(
        CommandKey::from(HELLO_COMMAND),
        CommandDef::new(HELLO_COMMAND, "Say hello to the bot"),
    )])
}

/// Reusable command options, keyed by option name.
pub fn command_options() -> HashMap<&'static str, CommandOptionDef> {
    HashMap::from([(
        PROMPT_OPTION,
        CommandOptionDef::new(PROMPT_OPTION, OptionKind::String, "The text prompt to imagine")
            .required(true),
    )])
}

/// Reference options restricted by kind (user / channel mask / role).
pub fn masked_options() -> HashMap<&'static str, CommandOptionDef> {
    HashMap::from([
        (
            MASKED_USER,
            CommandOptionDef::new(MASKED_USER, OptionKind::User, "Choose a user"),
        ),
        (
            MASKED_CHANNEL,
            CommandOptionDef::new(MASKED_CHANNEL, OptionKind::Channel, "Choose a channel to close")
                .channel_kinds([ChannelKind::GuildText, ChannelKind::GuildVoice]),
        ),
        (
            MASKED_FORUM,
            CommandOptionDef::new(MASKED_FORUM, OptionKind::Channel, "Choose a thread to mark as solved")
                .channel_kinds([
                    ChannelKind::GuildForum,
                    ChannelKind::NewsThread,
                    ChannelKind::PublicThread,
                    ChannelKind::PrivateThread,
                ]),
        ),
        (
            MASKED_ROLE,
            CommandOptionDef::new(MASKED_ROLE, OptionKind::Role, "Choose a role to add"),
        ),
    ])
}

/// Derive a platform-valid command name from a key that may be a description
/// of some sort: spaces become hyphens, everything is lower-cased, and any
/// character outside `[a-z0-9-]` is dropped.
pub fn sanitize_name(key: &str) -> String {
    key.replace(' ', "-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(MAX_COMMAND_NAME_LEN)
        .collect()
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommandRegistry {
    declared: BTreeMap<CommandKey, CommandDef>,
    registered: HashMap<CommandKey, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.declare(builtin_commands());
        registry
    }

    /// Add (or replace) command declarations. No side effects beyond the catalog.
    pub fn declare(&mut self, defs: impl IntoIterator<Item = (CommandKey, CommandDef)>) {
        self.declared.extend(defs);
    }

    pub fn declared(&self) -> &BTreeMap<CommandKey, CommandDef> {
        &self.declared
    }

    pub fn find_declared(&self, key: &str) -> Option<&CommandDef> {
        self.declared.get(key)
    }

    pub fn registered(&self) -> &HashMap<CommandKey, RegisteredCommand> {
        &self.registered
    }

    pub fn find_registered(&self, key: &str) -> Option<&RegisteredCommand> {
        self.registered.get(key)
    }

    /// Resolve an inbound command name to the key it was declared under.
    pub fn key_for_name(&self, name: &str) -> CommandKey {
        if let Some(cmd) = self.registered.values().find(|c| c.name == name) {
            return cmd.key.clone();
        }
        self.declared
            .iter()
            .find(|(_, def)| def.name == name)
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| CommandKey::from(name))
    }

    /// Create or update every declared command on the platform.
    ///
    /// Stops at the first rejection; commands registered before it stay registered.
    pub async fn register(
        &mut self,
        session: &dyn GatewaySession,
        application_id: Snowflake,
        scope: CommandScope,
    ) -> Result<(), BotError> {
        if let CommandScope::Global = scope {
            info!("Guild ID not provided, commands will be registered globally");
        }

        self.resolve_names()?;

        for (key, def) in self.declared.iter() {
            let remote = session
                .create_command(application_id, scope, def)
                .await
                .map_err(|e| BotError::Registration {
                    command: def.name.clone(),
                    message: e.to_string(),
                })?;

            debug!(key = %key, name = %remote.name, id = %remote.id, "Registered command");
            EventLogger::log_event(
                session.name(),
                BotEvent::Command {
                    action: "create".into(),
                    name: remote.name.clone(),
                    scope: scope.to_string(),
                },
            );
            self.registered
                .insert(key.clone(), RegisteredCommand::new(key.clone(), remote, scope));
        }

        info!(count = self.registered.len(), scope = %scope, "Commands registered");
        Ok(())
    }

    /// Derive empty display names and reject names the platform would merge or refuse.
    ///
    /// Runs before any create call, so a bad catalog registers nothing.
    fn resolve_names(&mut self) -> Result<(), BotError> {
        let mut claimed: HashMap<String, CommandKey> = HashMap::new();
        for (key, def) in self.declared.iter_mut() {
            if def.name.is_empty() {
                def.name = sanitize_name(key.as_str());
            }
            if def.name.is_empty() {
                return Err(BotError::Registration {
                    command: key.to_string(),
                    message: "key has no characters allowed in a command name".into(),
                });
            }
            if let Some(other) = claimed.insert(def.name.clone(), key.clone()) {
                return Err(BotError::Registration {
                    command: def.name.clone(),
                    message: format!("keys '{other}' and '{key}' resolve to the same name"),
                });
            }
        }
        Ok(())
    }

    /// Whether a command other than `except` already uses `key`, as a key or as a display name.
    pub(crate) fn claims(&self, key: &CommandKey, except: &CommandKey) -> bool {
        let taken = |other: &CommandKey, name: &str| other != except && (other == key || name == key.as_str());
        self.declared.iter().any(|(k, def)| taken(k, &def.name))
            || self.registered.iter().any(|(k, cmd)| taken(k, &cmd.name))
    }

    /// Move a declared/registered command to `new_key`, renaming it to match.
    ///
    /// Returns `false` when `old_key` is unknown to the registry.
    pub(crate) fn rekey(&mut self, old_key: &CommandKey, new_key: &CommandKey) -> bool {
        let mut moved = false;
        if let Some(mut def) = self.declared.remove(old_key) {
            def.name = new_key.to_string();
            self.declared.insert(new_key.clone(), def);
            moved = true;
        }
        if let Some(mut cmd) = self.registered.remove(old_key) {
            cmd.key = new_key.clone();
            cmd.name = new_key.to_string();
            self.registered.insert(new_key.clone(), cmd);
            moved = true;
        }
        moved
    }

    /// Delete every registered command from the platform when `remove_on_exit` is set.
    ///
    /// A failed deletion is fatal: a stale remote command pointing at a dead bot is
    /// worse than aborting.
    pub async fn teardown(
        &mut self,
        session: &dyn GatewaySession,
        application_id: Snowflake,
        remove_on_exit: bool,
    ) -> Result<(), BotError> {
        if !remove_on_exit {
            return Ok(());
        }
        info!("Removing all commands added by bot...");

        let keys: Vec<CommandKey> = self.registered.keys().cloned().collect();
        for key in keys {
            let Some(cmd) = self.registered.get(&key) else { continue };
            info!(key = %key, name = %cmd.name, "Removing command");

            if let Err(e) = session
                .delete_command(application_id, cmd.scope, cmd.id)
                .await
            {
                error!(name = %cmd.name, error = %e, "Cannot delete command");
                EventLogger::log_event(
                    session.name(),
                    BotEvent::Error {
                        error_msg: format!("cannot delete '{}' command: {e}", cmd.name),
                    },
                );
                return Err(BotError::Teardown {
                    command: cmd.name.clone(),
                    message: e.to_string(),
                });
            }
            EventLogger::log_event(
                session.name(),
                BotEvent::Command {
                    action: "delete".into(),
                    name: cmd.name.clone(),
                    scope: cmd.scope.to_string(),
                },
            );
            self.registered.remove(&key);
        }
        Ok(())
    }
}
