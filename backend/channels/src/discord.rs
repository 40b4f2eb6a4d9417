//! Discord gateway session backed by serenity.
//!
//! Inbound interactions are converted into the platform-neutral model and
//! pushed onto the bot's event channel; outbound responses are translated
//! into serenity builders and sent over the REST client.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ActionRowComponent, ApplicationId, ButtonStyle as SerenityButtonStyle, ChannelId,
    ChannelType, CommandDataOption, CommandDataOptionValue, CommandId, CommandOptionType,
    CommandType, ComponentInteractionDataKind, CreateActionRow, CreateAutocompleteResponse,
    CreateButton, CreateCommand, CreateCommandOption, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateModal, CreateSelectMenu, CreateSelectMenuKind,
    CreateSelectMenuOption, GuildId, Http, InputTextStyle, Interaction as SerenityInteraction,
    InteractionId, MessageId, ReactionType, Ready, ShardManager,
};
use serenity::prelude::*;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use botforge_core::{
    ActionRow, BotError, Button, ButtonStyle, ChannelKind, CommandDef, CommandInteraction,
    CommandKind, CommandOptionDef, CommandScope, ComponentInteraction, GatewaySession,
    Interaction, InteractionOption, InteractionRef, ModalField, ModalInteraction, OptionKind,
    OptionValue, RemoteCommand, Response, SelectKind, SelectMenu, SessionInfo, Snowflake,
    TextInput, TextInputStyle,
};

// ---------------------------------------------------------------------------
// Event handler
// ---------------------------------------------------------------------------

struct Handler {
    events: mpsc::UnboundedSender<Interaction>,
    ready: std::sync::Mutex<Option<oneshot::Sender<SessionInfo>>>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, _ctx: Context, interaction: SerenityInteraction) {
        let Some(converted) = convert_interaction(&interaction) else {
            debug!(kind = ?interaction.kind(), "Ignoring unsupported interaction");
            return;
        };
        if self.events.send(converted).is_err() {
            warn!("Interaction dropped: router is not running");
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged in as: {}", ready.user.tag());
        let info = SessionInfo {
            application_id: Snowflake(ready.application.id.get()),
            user_id: Snowflake(ready.user.id.get()),
            username: ready.user.tag(),
        };
        // Only the first READY completes `open`; reconnects land here again.
        let sender = self.ready.lock().ok().and_then(|mut slot| slot.take());
        if let Some(sender) = sender {
            let _ = sender.send(info);
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Connection {
    http: Arc<Http>,
    shard_manager: Arc<ShardManager>,
    runner: JoinHandle<Result<(), serenity::Error>>,
}

pub struct DiscordSession {
    token: String,
    intents: GatewayIntents,
    connection: Mutex<Option<Connection>>,
}

impl DiscordSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            // Interactions arrive regardless of intents.
            intents: GatewayIntents::GUILDS,
            connection: Mutex::new(None),
        }
    }

    async fn http(&self) -> Result<Arc<Http>, BotError> {
        self.connection
            .lock()
            .await
            .as_ref()
            .map(|c| Arc::clone(&c.http))
            .ok_or_else(|| BotError::NotConnected("discord".into()))
    }
}

#[async_trait]
impl GatewaySession for DiscordSession {
    fn name(&self) -> &str {
        "discord"
    }

    async fn open(&self, events: mpsc::UnboundedSender<Interaction>) -> Result<SessionInfo, BotError> {
        info!("Starting Discord session");
        let (ready_tx, ready_rx) = oneshot::channel();
        let handler = Handler {
            events,
            ready: std::sync::Mutex::new(Some(ready_tx)),
        };

        let mut client = Client::builder(&self.token, self.intents)
            .event_handler(handler)
            .await
            .map_err(gateway_error)?;

        let http = Arc::clone(&client.http);
        let shard_manager = Arc::clone(&client.shard_manager);
        let mut runner = tokio::spawn(async move { client.start().await });

        let outcome = tokio::select! {
            ready = ready_rx => Ok(ready),
            finished = &mut runner => Err(finished),
        };

        match outcome {
            Ok(Ok(info)) => {
                http.set_application_id(ApplicationId::new(nonzero(info.application_id, "application")?));
                *self.connection.lock().await = Some(Connection {
                    http,
                    shard_manager,
                    runner,
                });
                Ok(info)
            }
            Ok(Err(_)) => {
                shard_manager.shutdown_all().await;
                Err(BotError::Gateway("connection closed before ready".into()))
            }
            Err(finished) => {
                let message = match finished {
                    Ok(Err(e)) => e.to_string(),
                    Ok(Ok(())) => "gateway stopped before ready".to_string(),
                    Err(e) => e.to_string(),
                };
                error!(error = %message, "Cannot open the session");
                Err(BotError::Gateway(message))
            }
        }
    }

    async fn close(&self) -> Result<(), BotError> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(());
        };
        connection.shard_manager.shutdown_all().await;
        match connection.runner.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(gateway_error(e)),
            Err(e) => Err(BotError::Gateway(e.to_string())),
        }
    }

    async fn create_command(
        &self,
        application_id: Snowflake,
        scope: CommandScope,
        command: &CommandDef,
    ) -> Result<RemoteCommand, BotError> {
        let http = self.http().await?;
        http.set_application_id(ApplicationId::new(nonzero(application_id, "application")?));
        let builder = command_builder(command);

        let created = match scope {
            CommandScope::Global => http.create_global_command(&builder).await,
            CommandScope::Guild(guild) => {
                let guild = GuildId::new(nonzero(guild, "guild")?);
                http.create_guild_command(guild, &builder).await
            }
        }
        .map_err(gateway_error)?;

        Ok(RemoteCommand {
            id: Snowflake(created.id.get()),
            name: created.name,
        })
    }

    async fn delete_command(
        &self,
        application_id: Snowflake,
        scope: CommandScope,
        command_id: Snowflake,
    ) -> Result<(), BotError> {
        let http = self.http().await?;
        http.set_application_id(ApplicationId::new(nonzero(application_id, "application")?));
        let command_id = CommandId::new(nonzero(command_id, "command")?);

        let deleted = match scope {
            CommandScope::Global => http.delete_global_command(command_id).await,
            CommandScope::Guild(guild) => {
                let guild = GuildId::new(nonzero(guild, "guild")?);
                http.delete_guild_command(guild, command_id).await
            }
        };
        deleted.map_err(gateway_error)
    }

    async fn respond(&self, interaction: &InteractionRef, response: Response) -> Result<(), BotError> {
        let http = self.http().await?;
        let interaction_id = InteractionId::new(nonzero(interaction.id, "interaction")?);
        let response = response_builder(&response);
        http.create_interaction_response(interaction_id, &interaction.token, &response, Vec::new())
            .await
            .map_err(gateway_error)
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<(), BotError> {
        let http = self.http().await?;
        let channel = ChannelId::new(nonzero(channel_id, "channel")?);
        let message = MessageId::new(nonzero(message_id, "message")?);
        http.delete_message(channel, message, None)
            .await
            .map_err(gateway_error)
    }
}

fn gateway_error(e: serenity::Error) -> BotError {
    BotError::Gateway(e.to_string())
}

/// Discord ids are never zero; serenity panics on them.
fn nonzero(id: Snowflake, what: &str) -> Result<u64, BotError> {
    match id.get() {
        0 => Err(BotError::Gateway(format!("invalid {what} id 0"))),
        value => Ok(value),
    }
}

// ---------------------------------------------------------------------------
// Inbound conversion
// ---------------------------------------------------------------------------

fn convert_interaction(interaction: &SerenityInteraction) -> Option<Interaction> {
    match interaction {
        SerenityInteraction::Command(cmd) => Some(Interaction::Command(convert_command(cmd))),
        SerenityInteraction::Autocomplete(cmd) => {
            Some(Interaction::Autocomplete(convert_command(cmd)))
        }
        SerenityInteraction::Component(component) => {
            let values = match &component.data.kind {
                ComponentInteractionDataKind::StringSelect { values } => values.clone(),
                ComponentInteractionDataKind::RoleSelect { values } => {
                    values.iter().map(|id| id.to_string()).collect()
                }
                _ => Vec::new(),
            };
            Some(Interaction::Component(ComponentInteraction {
                reference: InteractionRef {
                    id: Snowflake(component.id.get()),
                    token: component.token.clone(),
                },
                custom_id: component.data.custom_id.as_str().into(),
                values,
                channel_id: Snowflake(component.channel_id.get()),
                message_id: Snowflake(component.message.id.get()),
                user_id: Snowflake(component.user.id.get()),
            }))
        }
        SerenityInteraction::Modal(modal) => {
            let fields = modal
                .data
                .components
                .iter()
                .flat_map(|row| row.components.iter())
                .filter_map(|component| match component {
                    ActionRowComponent::InputText(input) => Some(ModalField {
                        custom_id: input.custom_id.as_str().into(),
                        value: input.value.clone().unwrap_or_default(),
                    }),
                    // Non-text components carry no submitted value.
                    _ => None,
                })
                .collect();
            Some(Interaction::ModalSubmit(ModalInteraction {
                reference: InteractionRef {
                    id: Snowflake(modal.id.get()),
                    token: modal.token.clone(),
                },
                custom_id: modal.data.custom_id.as_str().into(),
                fields,
                channel_id: Snowflake(modal.channel_id.get()),
                user_id: Snowflake(modal.user.id.get()),
            }))
        }
        _ => None,
    }
}

fn convert_command(cmd: &serenity::all::CommandInteraction) -> CommandInteraction {
    CommandInteraction {
        reference: InteractionRef {
            id: Snowflake(cmd.id.get()),
            token: cmd.token.clone(),
        },
        name: cmd.data.name.clone(),
        options: cmd.data.options.iter().filter_map(convert_option).collect(),
        channel_id: Snowflake(cmd.channel_id.get()),
        guild_id: cmd.guild_id.map(|g| Snowflake(g.get())),
        user_id: Snowflake(cmd.user.id.get()),
    }
}

fn convert_option(option: &CommandDataOption) -> Option<InteractionOption> {
    let Some((value, focused)) = option_value(&option.value) else {
        debug!(option = %option.name, "Skipping unsupported option value");
        return None;
    };
    Some(InteractionOption {
        name: option.name.clone(),
        value,
        focused,
    })
}

/// Map a raw option value; the flag marks the focused autocomplete option.
fn option_value(value: &CommandDataOptionValue) -> Option<(OptionValue, bool)> {
    let mapped = match value {
        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Integer(i) => OptionValue::Number(*i as f64),
        CommandDataOptionValue::Number(n) => OptionValue::Number(*n),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
        CommandDataOptionValue::User(id) => OptionValue::Reference(Snowflake(id.get())),
        CommandDataOptionValue::Channel(id) => OptionValue::Reference(Snowflake(id.get())),
        CommandDataOptionValue::Role(id) => OptionValue::Reference(Snowflake(id.get())),
        CommandDataOptionValue::Mentionable(id) => OptionValue::Reference(Snowflake(id.get())),
        CommandDataOptionValue::Autocomplete { value, .. } => {
            return Some((OptionValue::String(value.clone()), true));
        }
        _ => return None,
    };
    Some((mapped, false))
}

// ---------------------------------------------------------------------------
// Outbound builders
// ---------------------------------------------------------------------------

fn command_builder(command: &CommandDef) -> CreateCommand {
    let mut builder = CreateCommand::new(&command.name).kind(match command.kind {
        CommandKind::ChatInput => CommandType::ChatInput,
        CommandKind::User => CommandType::User,
        CommandKind::Message => CommandType::Message,
    });
    // Context-menu commands are rejected when they carry a description or options.
    if command.kind == CommandKind::ChatInput {
        builder = builder.description(&command.description);
        for option in &command.options {
            builder = builder.add_option(option_builder(option));
        }
    }
    builder
}

fn option_builder(option: &CommandOptionDef) -> CreateCommandOption {
    let kind = match option.kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Number => CommandOptionType::Number,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::User => CommandOptionType::User,
        OptionKind::Channel => CommandOptionType::Channel,
        OptionKind::Role => CommandOptionType::Role,
    };
    let mut builder = CreateCommandOption::new(kind, option.key.as_str(), &option.description)
        .required(option.required)
        .set_autocomplete(option.autocomplete);
    if !option.channel_kinds.is_empty() {
        builder = builder.channel_types(option.channel_kinds.iter().map(|k| channel_type(*k)).collect());
    }
    builder
}

fn channel_type(kind: ChannelKind) -> ChannelType {
    match kind {
        ChannelKind::GuildText => ChannelType::Text,
        ChannelKind::GuildVoice => ChannelType::Voice,
        ChannelKind::GuildForum => ChannelType::Forum,
        ChannelKind::NewsThread => ChannelType::NewsThread,
        ChannelKind::PublicThread => ChannelType::PublicThread,
        ChannelKind::PrivateThread => ChannelType::PrivateThread,
    }
}

fn response_builder(response: &Response) -> CreateInteractionResponse {
    match response {
        Response::Message(message) => {
            let mut msg = CreateInteractionResponseMessage::new().content(&message.content);
            if message.ephemeral {
                msg = msg.ephemeral(true);
            }
            if !message.components.is_empty() {
                msg = msg.components(message.components.iter().map(action_row).collect());
            }
            CreateInteractionResponse::Message(msg)
        }
        Response::Autocomplete { choices } => {
            let mut autocomplete = CreateAutocompleteResponse::new();
            for choice in choices {
                autocomplete = autocomplete.add_string_choice(&choice.name, &choice.value);
            }
            CreateInteractionResponse::Autocomplete(autocomplete)
        }
        Response::Modal(modal) => CreateInteractionResponse::Modal(
            CreateModal::new(modal.custom_id.as_str(), &modal.title)
                .components(modal.rows.iter().map(action_row).collect()),
        ),
    }
}

fn action_row(row: &ActionRow) -> CreateActionRow {
    match row {
        ActionRow::Buttons(buttons) => CreateActionRow::Buttons(buttons.iter().map(button).collect()),
        ActionRow::Select(menu) => CreateActionRow::SelectMenu(select_menu(menu)),
        ActionRow::TextInput(input) => CreateActionRow::InputText(text_input(input)),
    }
}

fn button(button: &Button) -> CreateButton {
    let mut b = match (&button.url, &button.custom_id) {
        (Some(url), _) => CreateButton::new_link(url),
        (None, custom_id) => {
            let style = match button.style {
                ButtonStyle::Primary | ButtonStyle::Link => SerenityButtonStyle::Primary,
                ButtonStyle::Secondary => SerenityButtonStyle::Secondary,
                ButtonStyle::Success => SerenityButtonStyle::Success,
                ButtonStyle::Danger => SerenityButtonStyle::Danger,
            };
            CreateButton::new(custom_id.as_ref().map(|id| id.as_str()).unwrap_or_default())
                .style(style)
        }
    };
    b = b.label(&button.label).disabled(button.disabled);
    if let Some(emoji) = &button.emoji {
        b = b.emoji(ReactionType::Unicode(emoji.clone()));
    }
    b
}

fn select_menu(menu: &SelectMenu) -> CreateSelectMenu {
    let kind = match menu.kind {
        SelectKind::String => CreateSelectMenuKind::String {
            options: menu
                .options
                .iter()
                .map(|opt| {
                    let mut o = CreateSelectMenuOption::new(&opt.label, &opt.value);
                    if let Some(desc) = &opt.description {
                        o = o.description(desc);
                    }
                    o.default_selection(opt.default)
                })
                .collect(),
        },
        SelectKind::Role => CreateSelectMenuKind::Role { default_roles: None },
    };
    let mut select = CreateSelectMenu::new(menu.custom_id.as_str(), kind)
        .min_values(menu.min_values)
        .max_values(menu.max_values);
    if let Some(placeholder) = &menu.placeholder {
        select = select.placeholder(placeholder);
    }
    select
}

fn text_input(input: &TextInput) -> CreateInputText {
    let style = match input.style {
        TextInputStyle::Short => InputTextStyle::Short,
        TextInputStyle::Paragraph => InputTextStyle::Paragraph,
    };
    let mut builder = CreateInputText::new(style, &input.label, input.custom_id.as_str())
        .required(input.required);
    if let Some(placeholder) = &input.placeholder {
        builder = builder.placeholder(placeholder);
    }
    if let Some(value) = &input.value {
        builder = builder.value(value);
    }
    if let Some(min) = input.min_length {
        builder = builder.min_length(min);
    }
    if let Some(max) = input.max_length {
        builder = builder.max_length(max);
    }
    builder
}
