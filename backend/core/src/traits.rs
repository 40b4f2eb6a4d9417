use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::command::{CommandDef, RemoteCommand};
use crate::error::BotError;
use crate::interaction::{Interaction, InteractionRef};
use crate::response::Response;
use crate::types::{CommandScope, Snowflake};

/// Identity learned once the gateway connection is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub application_id: Snowflake,
    pub user_id: Snowflake,
    pub username: String,
}

/// A live connection to the chat platform.
///
/// The session owns connect/heartbeat/reconnect. It delivers every inbound
/// interaction to the sender handed to [`GatewaySession::open`] and exposes
/// the few REST calls the command lifecycle and built-in handlers need.
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and start forwarding interactions into `events`.
    async fn open(&self, events: mpsc::UnboundedSender<Interaction>) -> Result<SessionInfo, BotError>;

    async fn close(&self) -> Result<(), BotError>;

    /// Create or overwrite a command with the same name in `scope`.
    async fn create_command(
        &self,
        application_id: Snowflake,
        scope: CommandScope,
        command: &CommandDef,
    ) -> Result<RemoteCommand, BotError>;

    async fn delete_command(
        &self,
        application_id: Snowflake,
        scope: CommandScope,
        command_id: Snowflake,
    ) -> Result<(), BotError>;

    async fn respond(&self, interaction: &InteractionRef, response: Response) -> Result<(), BotError>;

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<(), BotError>;
}
