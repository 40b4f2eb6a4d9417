/// Handler table and built-in interaction handlers.
///
/// Handlers own their response: the router never sees what they send back,
/// so a handler that fails must report it to the user itself.
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use botforge_core::components::{component_row, error_ephemeral_response, DELETE_BUTTON};
use botforge_core::{
    CommandKey, ComponentId, Interaction, InteractionKind, MessageResponse, Response,
};
use tracing::{error, info};

use crate::registry::HELLO_COMMAND;
use crate::state::HandlerContext;

#[async_trait]
pub trait InteractionHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext, interaction: &Interaction);
}

/// Adapter turning an async closure into a handler.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> InteractionHandler for FnHandler<F>
where
    F: Fn(HandlerContext, Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, ctx: &HandlerContext, interaction: &Interaction) {
        (self.0)(ctx.clone(), interaction.clone()).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn InteractionHandler>
where
    F: Fn(HandlerContext, Interaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Four independent identifier → handler partitions, one per interaction kind.
#[derive(Default, Clone)]
pub struct HandlerTable {
    commands: HashMap<String, Arc<dyn InteractionHandler>>,
    autocomplete: HashMap<String, Arc<dyn InteractionHandler>>,
    modals: HashMap<String, Arc<dyn InteractionHandler>>,
    components: HashMap<String, Arc<dyn InteractionHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, kind: InteractionKind) -> &HashMap<String, Arc<dyn InteractionHandler>> {
        match kind {
            InteractionKind::Command => &self.commands,
            InteractionKind::Autocomplete => &self.autocomplete,
            InteractionKind::Modal => &self.modals,
            InteractionKind::Component => &self.components,
        }
    }

    fn partitions_mut(&mut self) -> [&mut HashMap<String, Arc<dyn InteractionHandler>>; 4] {
        [
            &mut self.commands,
            &mut self.autocomplete,
            &mut self.modals,
            &mut self.components,
        ]
    }

    pub fn on_command(&mut self, key: impl Into<CommandKey>, handler: Arc<dyn InteractionHandler>) -> &mut Self {
        self.commands.insert(key.into().to_string(), handler);
        self
    }

    pub fn on_autocomplete(&mut self, key: impl Into<CommandKey>, handler: Arc<dyn InteractionHandler>) -> &mut Self {
        self.autocomplete.insert(key.into().to_string(), handler);
        self
    }

    pub fn on_modal(&mut self, id: impl Into<ComponentId>, handler: Arc<dyn InteractionHandler>) -> &mut Self {
        self.modals.insert(id.into().to_string(), handler);
        self
    }

    pub fn on_component(&mut self, id: impl Into<ComponentId>, handler: Arc<dyn InteractionHandler>) -> &mut Self {
        self.components.insert(id.into().to_string(), handler);
        self
    }

    pub fn lookup(&self, kind: InteractionKind, id: &str) -> Option<Arc<dyn InteractionHandler>> {
        self.partition(kind).get(id).cloned()
    }

    pub fn contains(&self, kind: InteractionKind, id: &str) -> bool {
        self.partition(kind).contains_key(id)
    }

    /// Whether any partition holds `id`.
    pub(crate) fn contains_any(&self, id: &str) -> bool {
        [
            &self.commands,
            &self.autocomplete,
            &self.modals,
            &self.components,
        ]
        .iter()
        .any(|partition| partition.contains_key(id))
    }

    /// Move `old` to `new` in every partition that holds it.
    pub(crate) fn rekey(&mut self, old: &str, new: &str) -> bool {
        let mut moved = false;
        for partition in self.partitions_mut() {
            if let Some(handler) = partition.remove(old) {
                partition.insert(new.to_string(), handler);
                moved = true;
            }
        }
        moved
    }

    /// Keys per partition, sorted, for logging.
    pub fn summary(&self) -> Vec<(InteractionKind, Vec<String>)> {
        [
            InteractionKind::Command,
            InteractionKind::Autocomplete,
            InteractionKind::Modal,
            InteractionKind::Component,
        ]
        .into_iter()
        .map(|kind| {
            let mut keys: Vec<String> = self.partition(kind).keys().cloned().collect();
            keys.sort();
            (kind, keys)
        })
        .collect()
    }
}

/// Table pre-wired with the built-in handlers.
pub fn builtin_handlers() -> HandlerTable {
    let mut table = HandlerTable::new();
    table
        .on_command(HELLO_COMMAND, Arc::new(HelloHandler))
        .on_component(DELETE_BUTTON, Arc::new(DeleteMessageHandler));
    table
}

// ---------------------------------------------------------------------------
// /hello
// ---------------------------------------------------------------------------

pub struct HelloHandler;

#[async_trait]
impl InteractionHandler for HelloHandler {
    async fn handle(&self, ctx: &HandlerContext, interaction: &Interaction) {
        let Interaction::Command(cmd) = interaction else { return };

        let mut response = MessageResponse::new(format!("Hello <@{}>! 👋", cmd.user_id));
        if let Some(row) = component_row(DELETE_BUTTON) {
            response = response.row(row);
        }
        if let Err(e) = ctx.session.respond(&cmd.reference, response.into()).await {
            error!(error = %e, "Failed to answer /hello");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete button
// ---------------------------------------------------------------------------

/// Deletes the message the pressed button is attached to.
pub struct DeleteMessageHandler;

#[async_trait]
impl InteractionHandler for DeleteMessageHandler {
    async fn handle(&self, ctx: &HandlerContext, interaction: &Interaction) {
        let Interaction::Component(component) = interaction else { return };

        info!(message = %component.message_id, channel = %component.channel_id, "Deleting message");
        if let Err(e) = ctx
            .session
            .delete_message(component.channel_id, component.message_id)
            .await
        {
            let report = Response::Message(error_ephemeral_response(&e));
            if let Err(e) = ctx.session.respond(&component.reference, report).await {
                error!(error = %e, "Failed to report delete failure");
            }
        }
    }
}
