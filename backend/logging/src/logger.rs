//! Bot log output: an ANSI console for operators and a daily NDJSON file that
//! also carries the [`EVENT_TARGET`](crate::event_logger::EVENT_TARGET) trail.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::event_logger::EVENT_TARGET;

/// Log file prefix; the appender adds the `.YYYY-MM-DD` suffix.
pub const LOG_FILE_PREFIX: &str = "botforge.log";

/// Gateway and TLS internals are noisy at `info`.
const QUIET_TARGETS: &[&str] = &["serenity", "tungstenite", "rustls", "hyper", "reqwest"];

/// Filter directives used when `RUST_LOG` is unset.
///
/// Bot events stay at `info` whatever `level` is, so the event trail survives
/// a quiet console.
pub fn default_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.push(format!("{EVENT_TARGET}=info"));
    directives.join(",")
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// A second call keeps the first subscriber.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let file_layer = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX))
        .with_ansi(false);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_trail_survives_a_quiet_level() {
        let directives = default_directives("warn");
        assert!(directives.starts_with("warn,"));
        assert!(directives.ends_with("bot_events=info"));
        assert!(directives.contains("serenity=warn"));
    }

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(default_directives(" debug ")).is_ok());
    }
}
