use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A platform-assigned 64-bit identifier (users, channels, roles, commands...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(pub u64);

impl Snowflake {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Parse either bare digits or a mention (`<@123>`, `<@!123>`, `<#123>`, `<@&123>`).
    pub fn parse_mention(s: &str) -> Option<Self> {
        let s = s.trim();
        let inner = match s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            Some(inner) => inner
                .trim_start_matches('@')
                .trim_start_matches(['!', '&', '#']),
            None => s,
        };
        inner.parse::<u64>().ok().map(Snowflake)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Snowflake)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Snowflake(value)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Stable identifier of a registrable command (e.g. `hello`, `imagine_settings`).
    CommandKey
);

string_id!(
    /// Identifier of one command parameter (e.g. `prompt`, `steps`).
    OptionKey
);

string_id!(
    /// Custom identifier of a button, select menu, or modal / text input.
    ComponentId
);

/// Where commands are registered: one guild, or every guild the bot is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandScope {
    #[default]
    Global,
    Guild(Snowflake),
}

impl CommandScope {
    pub fn from_guild(guild_id: Option<Snowflake>) -> Self {
        guild_id.map_or(CommandScope::Global, CommandScope::Guild)
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Global => f.write_str("global"),
            CommandScope::Guild(id) => write!(f, "guild:{id}"),
        }
    }
}
