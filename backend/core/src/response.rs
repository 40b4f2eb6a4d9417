//! Response payloads a handler sends back through the gateway session.
//!
//! These are plain data; the session adapter translates them into whatever
//! the platform SDK expects.

use serde::{Deserialize, Serialize};

use crate::types::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub style: ButtonStyle,
    /// Routing key; `None` for link buttons.
    pub custom_id: Option<ComponentId>,
    pub url: Option<String>,
    pub emoji: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Button {
    pub fn new(custom_id: impl Into<ComponentId>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            style,
            custom_id: Some(custom_id.into()),
            url: None,
            emoji: None,
            disabled: false,
        }
    }

    pub fn link(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Link,
            custom_id: None,
            url: Some(url.into()),
            emoji: None,
            disabled: false,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectKind {
    String,
    Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub description: Option<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectMenu {
    pub custom_id: ComponentId,
    pub kind: SelectKind,
    pub placeholder: Option<String>,
    pub min_values: u8,
    pub max_values: u8,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputStyle {
    Short,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    pub custom_id: ComponentId,
    pub label: String,
    pub style: TextInputStyle,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub required: bool,
    pub min_length: Option<u16>,
    pub max_length: Option<u16>,
}

/// A single row of interactive components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "components", rename_all = "snake_case")]
pub enum ActionRow {
    Buttons(Vec<Button>),
    Select(SelectMenu),
    TextInput(TextInput),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    pub content: String,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub components: Vec<ActionRow>,
}

impl MessageResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn row(mut self, row: ActionRow) -> Self {
        self.components.push(row);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteChoice {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResponse {
    pub custom_id: ComponentId,
    pub title: String,
    pub rows: Vec<ActionRow>,
}

/// What a handler answers an interaction with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Message(MessageResponse),
    Autocomplete { choices: Vec<AutocompleteChoice> },
    Modal(ModalResponse),
}

impl Response {
    pub fn message(content: impl Into<String>) -> Self {
        Response::Message(MessageResponse::new(content))
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Response::Message(MessageResponse::new(content).ephemeral(true))
    }
}

impl From<MessageResponse> for Response {
    fn from(value: MessageResponse) -> Self {
        Response::Message(value)
    }
}
