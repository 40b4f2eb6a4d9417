use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ComponentId, Snowflake};

/// A raw option value as decoded from the platform payload.
///
/// Numbers are always carried as `f64`, including integer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// A user, channel, role, or mentionable id.
    Reference(Snowflake),
}

impl OptionValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::String(_) => "string",
            OptionValue::Number(_) => "number",
            OptionValue::Boolean(_) => "boolean",
            OptionValue::Reference(_) => "reference",
        }
    }
}

/// One option supplied with a command or autocomplete interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionOption {
    pub name: String,
    pub value: OptionValue,
    /// Set on the option the user is currently typing (autocomplete only).
    #[serde(default)]
    pub focused: bool,
}

/// Enough to answer an interaction: its id and continuation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRef {
    pub id: Snowflake,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInteraction {
    pub reference: InteractionRef,
    /// Display name of the invoked command.
    pub name: String,
    #[serde(default)]
    pub options: Vec<InteractionOption>,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
}

impl CommandInteraction {
    pub fn focused_option(&self) -> Option<&InteractionOption> {
        self.options.iter().find(|o| o.focused)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInteraction {
    pub reference: InteractionRef,
    pub custom_id: ComponentId,
    /// Selected values for select menus; empty for buttons.
    #[serde(default)]
    pub values: Vec<String>,
    pub channel_id: Snowflake,
    /// The message the component is attached to.
    pub message_id: Snowflake,
    pub user_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalField {
    pub custom_id: ComponentId,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalInteraction {
    pub reference: InteractionRef,
    pub custom_id: ComponentId,
    #[serde(default)]
    pub fields: Vec<ModalField>,
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
}

/// An inbound interaction, one payload shape per kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    Command(CommandInteraction),
    Autocomplete(CommandInteraction),
    Component(ComponentInteraction),
    ModalSubmit(ModalInteraction),
}

/// Discriminant of [`Interaction`], used for routing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Command,
    Autocomplete,
    Component,
    Modal,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::Command(_) => InteractionKind::Command,
            Interaction::Autocomplete(_) => InteractionKind::Autocomplete,
            Interaction::Component(_) => InteractionKind::Component,
            Interaction::ModalSubmit(_) => InteractionKind::Modal,
        }
    }

    /// The routing identifier: command name, or the component / modal custom id.
    pub fn identifier(&self) -> &str {
        match self {
            Interaction::Command(c) | Interaction::Autocomplete(c) => &c.name,
            Interaction::Component(c) => c.custom_id.as_str(),
            Interaction::ModalSubmit(m) => m.custom_id.as_str(),
        }
    }

    pub fn reference(&self) -> &InteractionRef {
        match self {
            Interaction::Command(c) | Interaction::Autocomplete(c) => &c.reference,
            Interaction::Component(c) => &c.reference,
            Interaction::ModalSubmit(m) => &m.reference,
        }
    }

    pub fn channel_id(&self) -> Snowflake {
        match self {
            Interaction::Command(c) | Interaction::Autocomplete(c) => c.channel_id,
            Interaction::Component(c) => c.channel_id,
            Interaction::ModalSubmit(m) => m.channel_id,
        }
    }

    pub fn user_id(&self) -> Snowflake {
        match self {
            Interaction::Command(c) | Interaction::Autocomplete(c) => c.user_id,
            Interaction::Component(c) => c.user_id,
            Interaction::ModalSubmit(m) => m.user_id,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}
