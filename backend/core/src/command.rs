//! Command declarations submitted to the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CommandKey, CommandScope, OptionKey, Snowflake};

/// How a command is invoked by users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// A `/slash` command typed into the chat box.
    #[default]
    ChatInput,
    /// Right-click on a user → Apps.
    User,
    /// Right-click on a message → Apps.
    Message,
}

/// Declared value kind of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
}

/// Channel kinds an option of kind [`OptionKind::Channel`] may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    GuildText,
    GuildVoice,
    GuildForum,
    NewsThread,
    PublicThread,
    PrivateThread,
}

/// One parameter of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionDef {
    pub key: OptionKey,
    pub kind: OptionKind,
    /// Options without a description are rejected by the platform.
    pub description: String,
    pub required: bool,
    /// Channel kind allow-list; empty means any channel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_kinds: Vec<ChannelKind>,
    #[serde(default)]
    pub autocomplete: bool,
}

impl CommandOptionDef {
    pub fn new(key: impl Into<OptionKey>, kind: OptionKind, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            description: description.into(),
            required: false,
            channel_kinds: Vec::new(),
            autocomplete: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn channel_kinds(mut self, kinds: impl IntoIterator<Item = ChannelKind>) -> Self {
        self.channel_kinds = kinds.into_iter().collect();
        self
    }

    pub fn autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }
}

/// A command as declared by the application, before registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandDef {
    /// Externally visible name. Empty means "derive from the key at registration".
    #[serde(default)]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub kind: CommandKind,
    #[serde(default)]
    pub options: Vec<CommandOptionDef>,
}

impl CommandDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandKind::ChatInput,
            options: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn option(mut self, option: CommandOptionDef) -> Self {
        self.options.push(option);
        self
    }

    pub fn find_option(&self, key: &str) -> Option<&CommandOptionDef> {
        self.options.iter().find(|o| o.key.as_str() == key)
    }
}

/// What the platform hands back after a create-or-update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub id: Snowflake,
    pub name: String,
}

/// A command that is live on the platform and owned by this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredCommand {
    pub key: CommandKey,
    pub id: Snowflake,
    /// Resolved display name as accepted by the platform.
    pub name: String,
    pub scope: CommandScope,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredCommand {
    pub fn new(key: CommandKey, remote: RemoteCommand, scope: CommandScope) -> Self {
        Self {
            key,
            id: remote.id,
            name: remote.name,
            scope,
            registered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let def = CommandDef::new("imagine", "Create an image")
            .option(CommandOptionDef::new("prompt", OptionKind::String, "The text prompt").required(true));
        assert_eq!(def.kind, CommandKind::ChatInput);
        assert!(def.find_option("prompt").is_some_and(|o| o.required));
        assert!(def.find_option("steps").is_none());
    }

    #[test]
    fn test_command_def_deserialize_defaults() {
        let def: CommandDef =
            serde_json::from_str(r#"{"description": "Say hello"}"#).unwrap();
        assert!(def.name.is_empty());
        assert!(def.options.is_empty());
        assert_eq!(def.kind, CommandKind::ChatInput);
    }
}
