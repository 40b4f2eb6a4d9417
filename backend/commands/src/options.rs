/// Option extraction — typed views over the loosely-typed option payload.
///
/// A command handler asks for a value by option key. The value comes from the
/// interaction's typed options when present, otherwise from a fallback map of
/// raw strings (text-command parameters), otherwise it is missing.
use std::collections::HashMap;

use botforge_core::{
    CommandInteraction, ComponentId, InteractionOption, ModalInteraction, OptionKey, OptionValue,
    Snowflake,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Typed options of one interaction, keyed by option name.
pub type OptionMap = HashMap<OptionKey, InteractionOption>;

/// Raw string parameters used when the event carried no typed options.
pub type ParameterMap = HashMap<OptionKey, String>;

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// A destination type for extraction.
pub trait FromOptionValue: Sized {
    /// Exact-variant conversion; `None` when the raw variant is a different type.
    fn from_option_value(value: &OptionValue) -> Option<Self>;

    /// Scan conversion from a raw string parameter.
    fn scan(raw: &str) -> Option<Self>;
}

/// Secondary views a caller may request. Only the two shapes the platform
/// decodes to are supported: text and `f64`.
pub trait OptionView: FromOptionValue {}

impl OptionView for String {}
impl OptionView for f64 {}

impl FromOptionValue for String {
    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn scan(raw: &str) -> Option<Self> {
        Some(raw.trim().to_string())
    }
}

impl FromOptionValue for f64 {
    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn scan(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromOptionValue for bool {
    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn scan(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl FromOptionValue for Snowflake {
    fn from_option_value(value: &OptionValue) -> Option<Self> {
        match value {
            OptionValue::Reference(id) => Some(*id),
            _ => None,
        }
    }

    fn scan(raw: &str) -> Option<Self> {
        Snowflake::parse_mention(raw)
    }
}

// Integers never match a typed value (numbers arrive as f64); narrow the f64 view instead.
macro_rules! scan_only {
    ($($ty:ty),*) => {
        $(
            impl FromOptionValue for $ty {
                fn from_option_value(_value: &OptionValue) -> Option<Self> {
                    None
                }

                fn scan(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

scan_only!(i32, i64, u32, u64);

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Outcome of [`extract`].
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<V> {
    /// Present and convertible to the requested view.
    Converted(V),
    /// Present but not convertible.
    Unconvertible,
    /// Not supplied at all. Not an error; the caller decides if it was required.
    Missing,
}

impl<V> Extraction<V> {
    pub fn value(self) -> Option<V> {
        match self {
            Extraction::Converted(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Extraction::Converted(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Extraction::Missing)
    }
}

/// Extract option `key` into `field` (when given) and as a `V` view.
///
/// ```ignore
/// let mut steps = 20_i64;
/// if let Some(n) = extract::<i64, f64>(None, "steps", &opts, &params).value() {
///     steps = between(n as i64, 1, 150);
/// }
/// ```
pub fn extract<F, V>(
    field: Option<&mut F>,
    key: &str,
    typed: &OptionMap,
    fallback: &ParameterMap,
) -> Extraction<V>
where
    F: FromOptionValue,
    V: OptionView,
{
    if let Some(option) = typed.get(key) {
        if let (Some(field), Some(value)) = (field, F::from_option_value(&option.value)) {
            *field = value;
        }
        return match V::from_option_value(&option.value) {
            Some(view) => Extraction::Converted(view),
            None => Extraction::Unconvertible,
        };
    }

    if let Some(raw) = fallback.get(key) {
        if let Some(field) = field {
            match F::scan(raw) {
                Some(value) => *field = value,
                None => return Extraction::Unconvertible,
            }
        }
        return match V::scan(raw) {
            Some(view) => Extraction::Converted(view),
            None => Extraction::Unconvertible,
        };
    }

    Extraction::Missing
}

/// Index a command interaction's options by name.
pub fn options_by_name(interaction: &CommandInteraction) -> OptionMap {
    interaction
        .options
        .iter()
        .map(|o| (OptionKey::from(o.name.as_str()), o.clone()))
        .collect()
}

/// Text input values of a modal submission, keyed by input custom id.
pub fn modal_fields(modal: &ModalInteraction) -> HashMap<ComponentId, String> {
    modal
        .fields
        .iter()
        .map(|f| (f.custom_id.clone(), f.value.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Sanitizers
// ---------------------------------------------------------------------------

/// Clamp `value` into `[minimum, maximum]`.
pub fn between<T: PartialOrd>(value: T, minimum: T, maximum: T) -> T {
    let value = if value < minimum { minimum } else { value };
    if value > maximum {
        maximum
    } else {
        value
    }
}

static TOOLTIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[✨❌](.+) 🪄:([\d.]+)$|[✨❌](.+)").unwrap());

/// Strip the status annotation a previous response edit appended to a prompt,
/// e.g. `"✨a nice cat 🪄:7.5"` → `"a nice cat:7.5"`.
pub fn sanitize_tooltip(input: &str) -> String {
    let Some(caps) = TOOLTIP_PATTERN.captures(input) else {
        return input.to_string();
    };
    debug!(tooltip = ?caps.get(0).map(|m| m.as_str()), "Removing tooltip");

    let sanitized = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(text), Some(value), _) => format!("{}:{}", text.as_str(), value.as_str()),
        (_, _, Some(text)) => text.as_str().to_string(),
        _ => input.to_string(),
    };
    debug!(input = %sanitized, "Sanitized input");
    sanitized
}

/// Longest text shown in select-menu descriptions.
pub const MAX_DISPLAY_CHARS: usize = 90;

/// Truncate `s` to [`MAX_DISPLAY_CHARS`] characters.
pub fn shorten(s: &str) -> &str {
    match s.char_indices().nth(MAX_DISPLAY_CHARS) {
        Some((idx, _)) => {
            debug!(shortened = &s[..idx], "Shortened string");
            &s[..idx]
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(pairs: &[(&str, OptionValue)]) -> OptionMap {
        pairs
            .iter()
            .map(|(k, v)| {
                (
                    OptionKey::from(*k),
                    InteractionOption { name: k.to_string(), value: v.clone(), focused: false },
                )
            })
            .collect()
    }

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs.iter().map(|(k, v)| (OptionKey::from(*k), v.to_string())).collect()
    }

    #[test]
    fn typed_string_into_string_field() {
        let opts = typed(&[("prompt", OptionValue::String("cat".into()))]);
        let mut prompt = String::new();
        let view = extract::<String, String>(Some(&mut prompt), "prompt", &opts, &ParameterMap::new());
        assert_eq!(prompt, "cat");
        assert_eq!(view, Extraction::Converted("cat".to_string()));
    }

    #[test]
    fn typed_string_into_non_string_field_keeps_view() {
        let opts = typed(&[("prompt", OptionValue::String("cat".into()))]);
        let mut steps = 7_i64;
        let view = extract::<i64, String>(Some(&mut steps), "prompt", &opts, &ParameterMap::new());
        assert_eq!(steps, 7);
        assert_eq!(view.value().as_deref(), Some("cat"));
    }

    #[test]
    fn typed_number_narrowed_by_caller() {
        let opts = typed(&[("steps", OptionValue::Number(42.0))]);
        let mut steps = 0_i64;
        let view = extract::<i64, f64>(Some(&mut steps), "steps", &opts, &ParameterMap::new());
        // integers never match the f64 payload directly
        assert_eq!(steps, 0);
        let narrowed = view.value().map(|n| n as i64);
        assert_eq!(narrowed, Some(42));
    }

    #[test]
    fn typed_value_with_wrong_view_is_unconvertible() {
        let opts = typed(&[("steps", OptionValue::Number(3.0))]);
        let mut n = 0.0_f64;
        let view = extract::<f64, String>(Some(&mut n), "steps", &opts, &ParameterMap::new());
        assert_eq!(n, 3.0);
        assert_eq!(view, Extraction::Unconvertible);
    }

    #[test]
    fn fallback_scans_into_integer_field() {
        let mut steps = 0_i64;
        let view = extract::<i64, f64>(Some(&mut steps), "steps", &OptionMap::new(), &params(&[("steps", "42")]));
        assert_eq!(steps, 42);
        assert!(view.is_ok());
        assert_eq!(view.value(), Some(42.0));
    }

    #[test]
    fn fallback_parse_failure_leaves_field() {
        let mut steps = 5_i64;
        let view = extract::<i64, String>(Some(&mut steps), "steps", &OptionMap::new(), &params(&[("steps", "abc")]));
        assert_eq!(steps, 5);
        assert!(!view.is_ok());
        assert!(!view.is_missing());
    }

    #[test]
    fn fallback_reference_accepts_mentions() {
        let mut user = Snowflake(0);
        let view = extract::<Snowflake, String>(Some(&mut user), "user", &OptionMap::new(), &params(&[("user", "<@123>")]));
        assert_eq!(user, Snowflake(123));
        assert!(view.is_ok());
    }

    #[test]
    fn missing_key_is_not_a_failure() {
        let view = extract::<String, String>(None, "prompt", &OptionMap::new(), &ParameterMap::new());
        assert!(view.is_missing());
        assert_eq!(view.value(), None);
    }

    #[test]
    fn null_field_still_converts() {
        let view = extract::<String, f64>(None, "cfg", &OptionMap::new(), &params(&[("cfg", "7.5")]));
        assert_eq!(view.value(), Some(7.5));
    }

    #[test]
    fn typed_map_wins_over_fallback() {
        let opts = typed(&[("prompt", OptionValue::String("typed".into()))]);
        let view = extract::<String, String>(None, "prompt", &opts, &params(&[("prompt", "fallback")]));
        assert_eq!(view.value().as_deref(), Some("typed"));
    }

    #[test]
    fn indexes_interaction_payloads() {
        use botforge_core::{InteractionRef, ModalField};

        let reference = InteractionRef { id: Snowflake(1), token: "t".into() };
        let cmd = CommandInteraction {
            reference: reference.clone(),
            name: "imagine".into(),
            options: vec![InteractionOption {
                name: "steps".into(),
                value: OptionValue::Number(300.0),
                focused: false,
            }],
            channel_id: Snowflake(2),
            guild_id: None,
            user_id: Snowflake(3),
        };
        let opts = options_by_name(&cmd);
        let steps = extract::<i64, f64>(None, "steps", &opts, &ParameterMap::new())
            .value()
            .map(|n| between(n as i64, 1, 150));
        assert_eq!(steps, Some(150));

        let modal = ModalInteraction {
            reference,
            custom_id: ComponentId::from("raw"),
            fields: vec![ModalField { custom_id: ComponentId::from("raw"), value: "{}".into() }],
            channel_id: Snowflake(2),
            user_id: Snowflake(3),
        };
        assert_eq!(modal_fields(&modal).get("raw").map(String::as_str), Some("{}"));
    }

    #[test]
    fn between_clamps_inclusive() {
        assert_eq!(between(0, 1, 10), 1);
        assert_eq!(between(11, 1, 10), 10);
        assert_eq!(between(5, 1, 10), 5);
        assert_eq!(between(1, 1, 10), 1);
        assert_eq!(between(10, 1, 10), 10);
        assert_eq!(between(0.5, 1.0, 2.0), 1.0);
        for v in -20..20 {
            let c = between(v, -3, 4);
            assert!((-3..=4).contains(&c));
        }
    }

    #[test]
    fn tooltip_with_value_trailer() {
        assert_eq!(sanitize_tooltip("✨a nice cat 🪄:7.5"), "a nice cat:7.5");
    }

    #[test]
    fn tooltip_without_trailer() {
        assert_eq!(sanitize_tooltip("❌a nice cat"), "a nice cat");
    }

    #[test]
    fn tooltip_strip_is_idempotent() {
        let plain = "a nice cat, 4k";
        assert_eq!(sanitize_tooltip(plain), plain);
        let once = sanitize_tooltip("✨a nice cat 🪄:7.5");
        assert_eq!(sanitize_tooltip(&once), once);
    }

    #[test]
    fn shorten_respects_char_boundaries() {
        let long = "é".repeat(120);
        assert_eq!(shorten(&long).chars().count(), MAX_DISPLAY_CHARS);
        assert_eq!(shorten("short"), "short");
    }
}
