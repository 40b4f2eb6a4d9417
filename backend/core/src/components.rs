//! Catalog of reusable component rows and the ids they route to.

use crate::response::{
    ActionRow, Button, ButtonStyle, MessageResponse, SelectKind, SelectMenu, SelectOption,
    TextInput, TextInputStyle,
};
use crate::types::ComponentId;

pub const DELETE_BUTTON: &str = "delete_error_message";
pub const DISMISS_BUTTON: &str = "dismiss_error_message";
pub const URL_BUTTON: &str = "url_button";
pub const URL_DELETE: &str = "url_delete";
pub const READMORE_DISMISS: &str = "readmore_dismiss";
pub const PAGINATION_BUTTONS: &str = "pagination_button";
pub const OK_CANCEL_BUTTONS: &str = "ok_cancel_buttons";
pub const CANCEL: &str = "cancel";
pub const INTERRUPT: &str = "interrupt";
pub const CANCEL_DISABLED: &str = "cancel_disabled";
pub const INTERRUPT_DISABLED: &str = "interrupt_disabled";
pub const JSON_INPUT: &str = "raw";
pub const ROLE_SELECT: &str = "role_select";

fn delete_button(label: &str) -> Button {
    Button::new(DELETE_BUTTON, label, ButtonStyle::Danger)
}

/// Look up a predefined row by its catalog id.
///
/// Several rows route back to the same handler id (e.g. "Dismiss" deletes the message).
/// Link rows need a target URL and come from [`link_row`] instead.
pub fn component_row(id: &str) -> Option<ActionRow> {
    let row = match id {
        DELETE_BUTTON => ActionRow::Buttons(vec![delete_button("Delete this message").emoji("🗑️")]),
        DISMISS_BUTTON => ActionRow::Buttons(vec![Button::new(
            DELETE_BUTTON,
            "Dismiss",
            ButtonStyle::Secondary,
        )]),
        PAGINATION_BUTTONS => ActionRow::Buttons(vec![
            Button::new(format!("{PAGINATION_BUTTONS}_previous"), "Previous", ButtonStyle::Secondary),
            Button::new(format!("{PAGINATION_BUTTONS}_next"), "Next", ButtonStyle::Secondary),
        ]),
        OK_CANCEL_BUTTONS => ActionRow::Buttons(vec![
            Button::new(format!("{OK_CANCEL_BUTTONS}_ok"), "OK", ButtonStyle::Success),
            Button::new(format!("{OK_CANCEL_BUTTONS}_cancel"), "Cancel", ButtonStyle::Danger),
        ]),
        ROLE_SELECT => ActionRow::Select(SelectMenu {
            custom_id: ComponentId::from(ROLE_SELECT),
            kind: SelectKind::Role,
            placeholder: Some("Pick a role".into()),
            min_values: 1,
            max_values: 1,
            options: vec![],
        }),
        CANCEL | CANCEL_DISABLED => ActionRow::Buttons(vec![Button::new(
            CANCEL,
            "Cancel",
            ButtonStyle::Danger,
        )
        .disabled(id == CANCEL_DISABLED)]),
        INTERRUPT | INTERRUPT_DISABLED => ActionRow::Buttons(vec![Button::new(
            INTERRUPT,
            "Interrupt",
            ButtonStyle::Danger,
        )
        .emoji("⚠️")
        .disabled(id == INTERRUPT_DISABLED)]),
        JSON_INPUT => ActionRow::TextInput(TextInput {
            custom_id: ComponentId::from(JSON_INPUT),
            label: "JSON blob".into(),
            style: TextInputStyle::Paragraph,
            placeholder: Some(r#"{"height":768,"width":512,"prompt":"masterpiece"}"#.into()),
            value: None,
            required: true,
            min_length: Some(1),
            max_length: Some(4000),
        }),
        _ => return None,
    };
    Some(row)
}

/// Link-button rows (`URL_BUTTON`, `URL_DELETE`, `READMORE_DISMISS`) pointing at `url`.
///
/// `None` for other ids, and for an empty URL, which the platform rejects.
pub fn link_row(id: &str, url: &str) -> Option<ActionRow> {
    if url.trim().is_empty() {
        return None;
    }
    let buttons = match id {
        URL_BUTTON => vec![Button::link(url, "Read more")],
        URL_DELETE => vec![
            Button::link(url, "Read more").emoji("📜"),
            delete_button("Delete").emoji("🗑️"),
        ],
        READMORE_DISMISS => vec![
            Button::link(url, "Read more"),
            Button::new(DELETE_BUTTON, "Dismiss", ButtonStyle::Secondary),
        ],
        _ => return None,
    };
    Some(ActionRow::Buttons(buttons))
}

/// A single-choice model picker; `id` looks like `imagine_<kind>_model_name_menu`.
pub fn model_select_menu(id: &ComponentId) -> ActionRow {
    let display = id.as_str().trim_start_matches("imagine_");
    let display = display.trim_end_matches("_model_name_menu");
    ActionRow::Select(SelectMenu {
        custom_id: id.clone(),
        kind: SelectKind::String,
        placeholder: Some(format!("Change {display} Model")),
        min_values: 1,
        max_values: 1,
        options: vec![SelectOption {
            label: display.to_string(),
            value: "Placeholder".into(),
            description: Some("Placeholder".into()),
            default: false,
        }],
    })
}

/// Ephemeral error report with a delete button, for handlers to surface their own failures.
pub fn error_ephemeral_response(error: impl std::fmt::Display) -> MessageResponse {
    let mut response = MessageResponse::new(format!("❌ Error: {error}")).ephemeral(true);
    if let Some(row) = component_row(DELETE_BUTTON) {
        response = response.row(row);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_routes_to_delete() {
        let Some(ActionRow::Buttons(buttons)) = component_row(DISMISS_BUTTON) else {
            panic!("expected a button row");
        };
        assert_eq!(buttons[0].custom_id.as_ref().map(|c| c.as_str()), Some(DELETE_BUTTON));
    }

    #[test]
    fn test_disabled_variants() {
        let Some(ActionRow::Buttons(buttons)) = component_row(INTERRUPT_DISABLED) else {
            panic!("expected a button row");
        };
        assert!(buttons[0].disabled);
        assert_eq!(buttons[0].custom_id.as_ref().map(|c| c.as_str()), Some(INTERRUPT));
        assert!(component_row("nope").is_none());
    }

    #[test]
    fn test_link_rows_require_a_url() {
        for id in [URL_BUTTON, URL_DELETE, READMORE_DISMISS] {
            assert!(component_row(id).is_none(), "{id} built without a url");
            assert!(link_row(id, "").is_none());
        }
        assert!(link_row(DELETE_BUTTON, "https://example.com").is_none());

        let Some(ActionRow::Buttons(buttons)) = link_row(URL_DELETE, "https://example.com/post") else {
            panic!("expected a button row");
        };
        assert_eq!(buttons[0].url.as_deref(), Some("https://example.com/post"));
        assert_eq!(buttons[1].custom_id.as_ref().map(|c| c.as_str()), Some(DELETE_BUTTON));
    }

    #[test]
    fn test_model_select_menu_label() {
        let row = model_select_menu(&ComponentId::from("imagine_sdxl_model_name_menu"));
        let ActionRow::Select(menu) = row else { panic!("expected select") };
        assert_eq!(menu.placeholder.as_deref(), Some("Change sdxl Model"));
        assert_eq!(menu.options[0].label, "sdxl");
    }

    #[test]
    fn test_error_response_is_ephemeral() {
        let response = error_ephemeral_response("boom");
        assert!(response.ephemeral);
        assert!(response.content.contains("boom"));
        assert_eq!(response.components.len(), 1);
    }
}
