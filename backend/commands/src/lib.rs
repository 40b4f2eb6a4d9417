pub mod bot;
pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod options;
pub mod registry;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use bot::Bot;
pub use detection::{detect_command, parse_parameters, TextInvocation};
pub use dispatch::{DispatchOutcome, InteractionRouter, Tables};
pub use handlers::{
    builtin_handlers, handler_fn, DeleteMessageHandler, FnHandler, HandlerTable, HelloHandler,
    InteractionHandler,
};
pub use options::{
    between, extract, modal_fields, options_by_name, sanitize_tooltip, shorten, Extraction,
    FromOptionValue, OptionMap, OptionView, ParameterMap,
};
pub use registry::{builtin_commands, command_options, masked_options, sanitize_name, CommandRegistry};
pub use state::{BotOptions, BotState, HandlerContext};
