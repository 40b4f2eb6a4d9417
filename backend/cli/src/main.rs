use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use botforge_channels::DiscordSession;
use botforge_commands::{Bot, BotOptions};
use botforge_config::defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL};
use botforge_config::{BotConfig, ConfigError, ConfigOverrides};
use botforge_core::{CommandScope, Snowflake};

#[derive(Parser, Debug)]
#[command(name = "botforge")]
#[command(about = "botforge: Discord application-command bot")]
#[command(after_help = "Single-dash spellings (-token, -guild, -remove) are accepted as well.")]
#[command(version)]
struct Cli {
    /// Bot access token (overrides BOT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Test guild ID; commands register globally when unset (overrides GUILD_ID)
    #[arg(long)]
    guild: Option<String>,

    /// Remove all registered commands on shutdown (or REMOVE_COMMANDS=true)
    #[arg(long)]
    remove: bool,
}

/// Long flags that older launch scripts pass with a single dash.
const LONG_FLAGS: &[&str] = &["token", "guild", "remove"];

/// Rewrite `-token`, `-token=x` and friends to their `--` form.
///
/// Anything after a bare `--` is left alone.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough || arg == "--" {
                passthrough = true;
                return arg;
            }
            let known = arg
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-'))
                .and_then(|rest| rest.split('=').next())
                .is_some_and(|name| LONG_FLAGS.contains(&name));
            if known { format!("-{arg}") } else { arg }
        })
        .collect()
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            token: self.token.clone(),
            guild: self.guild.clone(),
            remove: self.remove,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    match run(cli).await {
        Ok(()) => {
            info!("Gracefully shutting down.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "botforge exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let env_file = botforge_config::load_dotenv();
    let config = load_config(&cli.overrides());
    init_logging(config.as_ref().ok());

    match env_file {
        Ok(path) => info!(path = %path.display(), ".env file loaded successfully"),
        Err(e) => warn!(error = %e, "Error loading .env file"),
    }

    let config = config.context("invalid configuration")?;
    info!(config = %config.redacted(), "Configuration loaded");

    let options = BotOptions {
        scope: CommandScope::from_guild(config.guild_id.map(Snowflake)),
        remove_commands_on_exit: config.remove_commands_on_exit,
    };
    let session = Arc::new(DiscordSession::new(config.bot_token));
    let bot = Bot::with_builtins(session, options);

    bot.run().await.context("bot stopped with an error")?;
    Ok(())
}

fn load_config(overrides: &ConfigOverrides) -> Result<BotConfig, ConfigError> {
    botforge_config::resolve_from_env(overrides).and_then(botforge_config::check)
}

/// Logging comes up even when the config is unusable, so the failure is visible.
fn init_logging(config: Option<&BotConfig>) {
    let (dir, level) = match config {
        Some(c) => (c.log_dir.clone(), c.log_level.clone()),
        None => (PathBuf::from(DEFAULT_LOG_DIR), DEFAULT_LOG_LEVEL.to_string()),
    };
    logging::init_logger(dir, &level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_flags() {
        let cli = Cli::try_parse_from(["botforge", "--token", "abc", "--guild", "42", "--remove"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.token.as_deref(), Some("abc"));
        assert_eq!(overrides.guild.as_deref(), Some("42"));
        assert!(overrides.remove);
    }

    #[test]
    fn flags_are_optional() {
        let cli = Cli::try_parse_from(["botforge"]).unwrap();
        let overrides = cli.overrides();
        assert!(overrides.token.is_none());
        assert!(overrides.guild.is_none());
        assert!(!overrides.remove);
    }

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().map(|a| a.to_string())))
    }

    #[test]
    fn accepts_single_dash_flags() {
        let overrides = parse(&["botforge", "-token", "abc", "-guild=42", "-remove"]).unwrap().overrides();
        assert_eq!(overrides.token.as_deref(), Some("abc"));
        assert_eq!(overrides.guild.as_deref(), Some("42"));
        assert!(overrides.remove);
    }

    #[test]
    fn normalize_rewrites_only_known_single_dash_flags() {
        let args = ["botforge", "--token", "-token", "-h", "--", "-guild"].map(String::from);
        assert_eq!(
            normalize_args(args),
            vec!["botforge", "--token", "--token", "-h", "--", "-guild"]
        );
    }

    #[test]
    fn single_dash_unknown_flag_still_fails() {
        assert!(parse(&["botforge", "-verbose"]).is_err());
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["botforge", "--verbose"]).is_err());
    }
}
