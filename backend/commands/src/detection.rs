/// Text command detection — turn `/name free text key:value ...` into the
/// raw parameter map used as the extraction fallback.
use botforge_core::{CommandDef, CommandKey, OptionKey, OptionKind};

use crate::options::ParameterMap;
use crate::registry::CommandRegistry;

/// A command typed as plain text rather than invoked through the platform UI.
#[derive(Debug, Clone)]
pub struct TextInvocation {
    pub key: CommandKey,
    pub raw_alias: String,
    pub parameters: ParameterMap,
    /// Words that were not `key:value` pairs, in order.
    pub remainder: String,
}

/// Detect a `/command` at the start of `text`. Returns `None` for normal messages
/// and for names the registry does not know.
pub fn detect_command(text: &str, registry: &CommandRegistry) -> Option<TextInvocation> {
    let trimmed = text.trim();
    let alias = trimmed.strip_prefix('/')?;

    let (alias_part, rest) = alias
        .split_once(char::is_whitespace)
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((alias, ""));

    let key = registry.key_for_name(&alias_part.to_lowercase());
    let def = registry.find_declared(key.as_str())?;
    let (parameters, remainder) = parse_parameters(rest, def);

    Some(TextInvocation {
        key,
        raw_alias: alias_part.to_string(),
        parameters,
        remainder,
    })
}

/// Split `text` into `option:value` pairs for options `def` declares, plus the
/// leftover words. Leftover text fills the first string option that is still unset.
pub fn parse_parameters(text: &str, def: &CommandDef) -> (ParameterMap, String) {
    let mut parameters = ParameterMap::new();
    let mut words = Vec::new();

    for token in text.split_whitespace() {
        match token.split_once(':') {
            Some((name, value)) if !value.is_empty() && def.find_option(name).is_some() => {
                parameters.insert(OptionKey::from(name), value.to_string());
            }
            _ => words.push(token),
        }
    }

    let remainder = words.join(" ");
    if !remainder.is_empty() {
        let free_text_option = def
            .options
            .iter()
            .find(|o| o.kind == OptionKind::String && !parameters.contains_key(o.key.as_str()));
        if let Some(option) = free_text_option {
            parameters.insert(option.key.clone(), remainder.clone());
        }
    }

    (parameters, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{extract, Extraction, OptionMap};
    use botforge_core::CommandOptionDef;

    fn imagine() -> CommandDef {
        CommandDef::new("imagine", "Imagine")
            .option(CommandOptionDef::new("prompt", OptionKind::String, "Prompt").required(true))
            .option(CommandOptionDef::new("steps", OptionKind::Integer, "Steps"))
            .option(CommandOptionDef::new("cfg_scale", OptionKind::Number, "CFG"))
    }

    #[test]
    fn parses_declared_pairs_and_free_text() {
        let (params, remainder) = parse_parameters("a nice cat steps:42 cfg_scale:7.5 seed:1", &imagine());
        assert_eq!(params.get("steps").map(String::as_str), Some("42"));
        assert_eq!(params.get("cfg_scale").map(String::as_str), Some("7.5"));
        assert_eq!(remainder, "a nice cat seed:1");
        assert_eq!(params.get("prompt").map(String::as_str), Some("a nice cat seed:1"));
    }

    #[test]
    fn detected_parameters_feed_extraction() {
        let mut registry = CommandRegistry::new();
        registry.declare([(CommandKey::from("imagine"), imagine())]);

        let inv = detect_command("/imagine a nice cat steps:42", &registry).unwrap();
        assert_eq!(inv.key.as_str(), "imagine");

        let mut steps = 0_i64;
        let view = extract::<i64, f64>(Some(&mut steps), "steps", &OptionMap::new(), &inv.parameters);
        assert_eq!(steps, 42);
        assert_eq!(view, Extraction::Converted(42.0));

        let prompt = extract::<String, String>(None, "prompt", &OptionMap::new(), &inv.parameters);
        assert_eq!(prompt.value().as_deref(), Some("a nice cat"));
    }

    #[test]
    fn ignores_plain_messages_and_unknown_commands() {
        let registry = CommandRegistry::with_builtins();
        assert!(detect_command("hello there", &registry).is_none());
        assert!(detect_command("/unknown thing", &registry).is_none());
        assert!(detect_command("  /Hello ", &registry).is_some());
    }
}
