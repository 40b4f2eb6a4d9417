pub mod command;
pub mod components;
pub mod error;
pub mod interaction;
pub mod response;
pub mod traits;
pub mod types;

pub use command::{
    ChannelKind, CommandDef, CommandKind, CommandOptionDef, OptionKind, RegisteredCommand,
    RemoteCommand,
};
pub use error::BotError;
pub use interaction::{
    CommandInteraction, ComponentInteraction, Interaction, InteractionKind, InteractionOption,
    InteractionRef, ModalField, ModalInteraction, OptionValue,
};
pub use response::{
    ActionRow, AutocompleteChoice, Button, ButtonStyle, MessageResponse, ModalResponse, Response,
    SelectKind, SelectMenu, SelectOption, TextInput, TextInputStyle,
};
pub use traits::{GatewaySession, SessionInfo};
pub use types::{CommandKey, CommandScope, ComponentId, OptionKey, Snowflake};
