//! Recording gateway session for unit tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use botforge_core::{
    BotError, CommandDef, CommandScope, GatewaySession, Interaction, InteractionRef,
    RemoteCommand, Response, SessionInfo, Snowflake,
};
use tokio::sync::mpsc;

#[derive(Default)]
pub struct MockSession {
    next_id: AtomicU64,
    fail_create: Option<String>,
    fail_delete: bool,
    fail_open: bool,
    pub events: Mutex<Option<mpsc::UnboundedSender<Interaction>>>,
    pub created: Mutex<Vec<(CommandScope, CommandDef)>>,
    pub deleted: Mutex<Vec<Snowflake>>,
    pub responses: Mutex<Vec<(InteractionRef, Response)>>,
    pub deleted_messages: Mutex<Vec<(Snowflake, Snowflake)>>,
    pub closed: Mutex<bool>,
}

impl MockSession {
    pub fn fail_create(mut self, name: &str) -> Self {
        self.fail_create = Some(name.to_string());
        self
    }

    pub fn fail_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn created_names(&self) -> Vec<String> {
        self.created.lock().unwrap().iter().map(|(_, d)| d.name.clone()).collect()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.lock().unwrap().len()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }

    /// Push an interaction as if it arrived from the gateway.
    pub fn emit(&self, interaction: Interaction) {
        if let Some(tx) = self.events.lock().unwrap().as_ref() {
            let _ = tx.send(interaction);
        }
    }
}

#[async_trait]
impl GatewaySession for MockSession {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, events: mpsc::UnboundedSender<Interaction>) -> Result<SessionInfo, BotError> {
        if self.fail_open {
            return Err(BotError::Gateway("connection refused".into()));
        }
        *self.events.lock().unwrap() = Some(events);
        Ok(SessionInfo {
            application_id: Snowflake(1000),
            user_id: Snowflake(1000),
            username: "mockbot".into(),
        })
    }

    async fn close(&self) -> Result<(), BotError> {
        *self.closed.lock().unwrap() = true;
        self.events.lock().unwrap().take();
        Ok(())
    }

    async fn create_command(
        &self,
        _application_id: Snowflake,
        scope: CommandScope,
        command: &CommandDef,
    ) -> Result<RemoteCommand, BotError> {
        if self.fail_create.as_deref() == Some(command.name.as_str()) {
            return Err(BotError::Gateway("Invalid Form Body".into()));
        }
        self.created.lock().unwrap().push((scope, command.clone()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteCommand { id: Snowflake(id), name: command.name.clone() })
    }

    async fn delete_command(
        &self,
        _application_id: Snowflake,
        _scope: CommandScope,
        command_id: Snowflake,
    ) -> Result<(), BotError> {
        if self.fail_delete {
            return Err(BotError::Gateway("Unknown application command".into()));
        }
        self.deleted.lock().unwrap().push(command_id);
        Ok(())
    }

    async fn respond(&self, interaction: &InteractionRef, response: Response) -> Result<(), BotError> {
        self.responses.lock().unwrap().push((interaction.clone(), response));
        Ok(())
    }

    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<(), BotError> {
        if message_id == Snowflake(0) {
            return Err(BotError::Gateway("Unknown Message".into()));
        }
        self.deleted_messages.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }
}
