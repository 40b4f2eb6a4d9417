//! Platform adapters implementing [`botforge_core::GatewaySession`].

pub mod discord;

pub use discord::DiscordSession;
