/// Session lifecycle — open, register, serve, tear down, close.
use std::future::Future;
use std::sync::Arc;

use botforge_core::{BotError, CommandKey, GatewaySession, Interaction, SessionInfo};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::dispatch::InteractionRouter;
use crate::handlers::{builtin_handlers, HandlerTable};
use crate::registry::CommandRegistry;
use crate::state::{BotOptions, BotState, HandlerContext};

pub struct Bot {
    session: Arc<dyn GatewaySession>,
    router: Arc<InteractionRouter>,
    state: Arc<BotState>,
}

impl Bot {
    pub fn new(
        session: Arc<dyn GatewaySession>,
        options: BotOptions,
        registry: CommandRegistry,
        handlers: HandlerTable,
    ) -> Self {
        Self {
            session,
            router: Arc::new(InteractionRouter::new(registry, handlers)),
            state: Arc::new(BotState::new(options)),
        }
    }

    /// A bot serving only the built-in commands and components.
    pub fn with_builtins(session: Arc<dyn GatewaySession>, options: BotOptions) -> Self {
        Self::new(session, options, CommandRegistry::with_builtins(), builtin_handlers())
    }

    pub fn router(&self) -> &Arc<InteractionRouter> {
        &self.router
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    /// See [`InteractionRouter::rename`].
    pub async fn rebuild_key<F>(&self, key: &mut CommandKey, select: F) -> bool
    where
        F: FnOnce(&BotState) -> CommandKey,
    {
        self.router.rename(&self.state, key, select).await
    }

    /// Run until Ctrl+C.
    pub async fn run(&self) -> Result<(), BotError> {
        self.run_until(async {
            info!("Press Ctrl+C to exit");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for interrupt signal");
            }
        })
        .await
    }

    /// Run until `shutdown` resolves, then tear down.
    ///
    /// Open or registration failures abort startup. A teardown failure still
    /// closes the connection and is returned afterwards.
    pub async fn run_until<S>(&self, shutdown: S) -> Result<(), BotError>
    where
        S: Future<Output = ()>,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let info = self.start(events_tx).await?;
        let application_id = info.application_id;

        let ctx = HandlerContext::new(Arc::clone(&self.state), Arc::clone(&self.session));
        let dispatch_loop = tokio::spawn(Arc::clone(&self.router).run(ctx, events_rx));

        shutdown.await;
        info!("Polling stopped...");

        let teardown = self
            .router
            .teardown(
                self.session.as_ref(),
                application_id,
                self.state.options.remove_commands_on_exit,
            )
            .await;
        if let Err(e) = &teardown {
            error!(error = %e, "Error tearing down bot");
        }

        let closed = self.session.close().await;
        dispatch_loop.abort();

        teardown?;
        closed
    }

    async fn start(&self, events: mpsc::UnboundedSender<Interaction>) -> Result<SessionInfo, BotError> {
        let info = self.session.open(events).await?;
        info!(
            session = self.session.name(),
            user = %info.username,
            application = %info.application_id,
            "Gateway session open"
        );
        self.state.set_session_info(info.clone());

        if let Err(e) = self
            .router
            .register_commands(self.session.as_ref(), info.application_id, self.state.options.scope)
            .await
        {
            if let Err(close_err) = self.session.close().await {
                warn!(error = %close_err, "Failed to close session after registration error");
            }
            return Err(e);
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSession;
    use botforge_core::{
        CommandDef, CommandInteraction, CommandScope, InteractionRef, Response, Snowflake,
    };
    use std::time::Duration;

    fn hello() -> Interaction {
        Interaction::Command(CommandInteraction {
            reference: InteractionRef { id: Snowflake(1), token: "t".into() },
            name: "hello".into(),
            options: vec![],
            channel_id: Snowflake(2),
            guild_id: Some(Snowflake(9)),
            user_id: Snowflake(3),
        })
    }

    fn options(remove: bool) -> BotOptions {
        BotOptions {
            scope: CommandScope::Guild(Snowflake(9)),
            remove_commands_on_exit: remove,
        }
    }

    #[tokio::test]
    async fn full_lifecycle_serves_and_removes_commands() {
        let session = Arc::new(MockSession::default());
        let bot = Bot::with_builtins(session.clone(), options(true));

        let emitter = session.clone();
        bot.run_until(async move {
            emitter.emit(hello());
            tokio::time::sleep(Duration::from_millis(50)).await;
        })
        .await
        .unwrap();

        assert_eq!(session.created_names(), vec!["hello".to_string()]);
        assert!(session.created.lock().unwrap().iter().all(|(s, _)| *s == CommandScope::Guild(Snowflake(9))));
        assert!(matches!(session.responses().as_slice(), [Response::Message(_)]));
        assert_eq!(session.deleted_count(), 1);
        assert!(session.is_closed());
        assert_eq!(bot.state().session_info().map(|i| i.username), Some("mockbot".into()));
    }

    #[tokio::test]
    async fn keeps_commands_without_remove_flag() {
        let session = Arc::new(MockSession::default());
        let bot = Bot::with_builtins(session.clone(), options(false));
        bot.run_until(async {}).await.unwrap();
        assert_eq!(session.deleted_count(), 0);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn open_failure_aborts_before_registration() {
        let session = Arc::new(MockSession::default().fail_open());
        let bot = Bot::with_builtins(session.clone(), options(true));
        let err = bot.run_until(async {}).await.unwrap_err();
        assert!(matches!(err, BotError::Gateway(_)));
        assert!(session.created_names().is_empty());
    }

    #[tokio::test]
    async fn registration_failure_closes_session() {
        let session = Arc::new(MockSession::default().fail_create("hello"));
        let bot = Bot::with_builtins(session.clone(), options(true));
        let err = bot.run_until(async {}).await.unwrap_err();
        assert!(matches!(err, BotError::Registration { .. }));
        assert!(session.is_closed());
        assert_eq!(session.deleted_count(), 0);
    }

    #[tokio::test]
    async fn teardown_failure_still_closes() {
        let session = Arc::new(MockSession::default().fail_delete());
        let bot = Bot::with_builtins(session.clone(), options(true));
        let err = bot.run_until(async {}).await.unwrap_err();
        assert!(matches!(err, BotError::Teardown { .. }));
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn rebuild_key_before_start_registers_new_name() {
        let session = Arc::new(MockSession::default());
        let mut registry = CommandRegistry::new();
        registry.declare([(CommandKey::from("imagine"), CommandDef::new("imagine", "Imagine"))]);
        let bot = Bot::new(session.clone(), options(false), registry, HandlerTable::new());

        bot.state().set_setting("model", "flux");
        let mut key = CommandKey::from("imagine");
        assert!(
            bot.rebuild_key(&mut key, |s| CommandKey::from(format!("imagine_{}", s.setting("model").unwrap_or_default())))
                .await
        );
        bot.run_until(async {}).await.unwrap();
        assert_eq!(session.created_names(), vec!["imagine_flux".to_string()]);
    }
}
