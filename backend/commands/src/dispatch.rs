/// Interaction dispatch — route each inbound interaction to its handler.
use std::sync::Arc;

use botforge_core::{
    BotError, CommandKey, CommandScope, GatewaySession, Interaction, InteractionKind, Snowflake,
};
use tokio::sync::{mpsc, RwLock, RwLockReadGuard};
use logging::{BotEvent, EventLogger};
use tracing::{debug, info, warn};

use crate::handlers::HandlerTable;
use crate::registry::CommandRegistry;
use crate::state::{BotState, HandlerContext};

/// Registry and handlers behind one lock, so a rename is never half-visible.
pub struct Tables {
    pub registry: CommandRegistry,
    pub handlers: HandlerTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled { kind: InteractionKind, identifier: String },
    Unhandled { kind: InteractionKind, identifier: String },
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct InteractionRouter {
    tables: RwLock<Tables>,
}

impl InteractionRouter {
    pub fn new(registry: CommandRegistry, handlers: HandlerTable) -> Self {
        Self {
            tables: RwLock::new(Tables { registry, handlers }),
        }
    }

    pub async fn tables(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Route one interaction. An unmatched interaction is logged, never an error.
    pub async fn dispatch(&self, ctx: &HandlerContext, interaction: Interaction) -> DispatchOutcome {
        let kind = interaction.kind();
        let (identifier, handler) = {
            let tables = self.tables.read().await;
            let identifier = match &interaction {
                Interaction::Command(cmd) | Interaction::Autocomplete(cmd) => {
                    tables.registry.key_for_name(&cmd.name).to_string()
                }
                Interaction::Component(component) => {
                    debug!(custom_id = %component.custom_id, "Component was pressed, attempting to respond");
                    component.custom_id.to_string()
                }
                Interaction::ModalSubmit(modal) => modal.custom_id.to_string(),
            };
            let handler = tables.handlers.lookup(kind, &identifier);
            (identifier, handler)
        };

        EventLogger::log_event(
            ctx.session.name(),
            BotEvent::Interaction {
                kind: kind.to_string(),
                identifier: identifier.clone(),
                user_id: interaction.user_id().to_string(),
                handled: handler.is_some(),
            },
        );

        let Some(handler) = handler else {
            warn!(
                kind = %kind,
                name = %describe(&interaction),
                "Cannot find handler for interaction"
            );
            return DispatchOutcome::Unhandled { kind, identifier };
        };

        handler.handle(ctx, &interaction).await;
        DispatchOutcome::Handled { kind, identifier }
    }

    /// Consume the session's event stream, one task per interaction.
    ///
    /// Dispatch is fire-and-forget and unbounded: a slow handler only stalls its own task.
    pub async fn run(
        self: Arc<Self>,
        ctx: HandlerContext,
        mut events: mpsc::UnboundedReceiver<Interaction>,
    ) {
        while let Some(interaction) = events.recv().await {
            let router = Arc::clone(&self);
            let ctx = ctx.clone();
            tokio::spawn(async move {
                router.dispatch(&ctx, interaction).await;
            });
        }
        debug!("Interaction stream closed");
    }

    pub async fn register_commands(
        &self,
        session: &dyn GatewaySession,
        application_id: Snowflake,
        scope: CommandScope,
    ) -> Result<(), BotError> {
        let mut tables = self.tables.write().await;
        tables.registry.register(session, application_id, scope).await?;
        for (kind, keys) in tables.handlers.summary() {
            debug!(kind = %kind, handlers = ?keys, "Registered handlers");
        }
        Ok(())
    }

    pub async fn teardown(
        &self,
        session: &dyn GatewaySession,
        application_id: Snowflake,
        remove_on_exit: bool,
    ) -> Result<(), BotError> {
        let mut tables = self.tables.write().await;
        tables.registry.teardown(session, application_id, remove_on_exit).await
    }

    /// Recompute a command key from bot state and move its registration and
    /// handlers when it changed. Returns whether `key` was updated.
    /// A new key already used by another command is refused and nothing moves.
    pub async fn rename<F>(&self, state: &BotState, key: &mut CommandKey, select: F) -> bool
    where
        F: FnOnce(&BotState) -> CommandKey,
    {
        let new_key = select(state);
        if new_key == *key {
            return false;
        }

        let mut tables = self.tables.write().await;
        let Tables { registry, handlers } = &mut *tables;
        if registry.claims(&new_key, key) || handlers.contains_any(new_key.as_str()) {
            warn!(from = %key, to = %new_key, "Refusing rename: target key is already in use");
            return false;
        }
        info!(from = %key, to = %new_key, "Rebuilding map");
        registry.rekey(key, &new_key);
        handlers.rekey(key.as_str(), new_key.as_str());
        *key = new_key;
        true
    }
}

/// Best-effort name of an interaction for diagnostics.
fn describe(interaction: &Interaction) -> String {
    match interaction {
        Interaction::Autocomplete(cmd) => match cmd.focused_option() {
            Some(opt) => format!("command: /{} option: {}", cmd.name, opt.name),
            None => format!("command: /{}", cmd.name),
        },
        other => other.identifier().to_string(),
    }
}
