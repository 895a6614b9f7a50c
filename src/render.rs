//! Terminal rendering of the chat panel.
//!
//! DESIGN
//! ======
//! Rendering is a pure function of a state snapshot so the binary can redraw
//! whenever the widget reports a transition. Roles are distinguished by line
//! prefix; multi-line replies continue under the prefix.

use crate::widget::{ConversationState, Role};

pub const TOGGLE_GLYPH: &str = "[💬]";
pub const PANEL_TITLE: &str = "Hospital Assistant";
pub const TYPING_INDICATOR: &str = "Typing...";
pub const INPUT_PLACEHOLDER: &str = "Ask something...";

const USER_PREFIX: &str = "you> ";
const BOT_PREFIX: &str = "bot> ";
const CONTINUATION: &str = "     ";

/// Lines for the current panel. A closed panel shows only the toggle.
#[must_use]
pub fn render_panel(state: &ConversationState) -> Vec<String> {
    let mut lines = vec![TOGGLE_GLYPH.to_owned()];
    if !state.is_open() {
        return lines;
    }

    lines.push(format!("── {PANEL_TITLE} ──"));
    for message in state.messages() {
        let prefix = match message.role {
            Role::User => USER_PREFIX,
            Role::Assistant => BOT_PREFIX,
        };
        let mut body = message.text.lines();
        lines.push(format!("{prefix}{}", body.next().unwrap_or_default()).trim_end().to_owned());
        lines.extend(body.map(|line| format!("{CONTINUATION}{line}")));
    }
    if state.is_loading() {
        lines.push(format!("{BOT_PREFIX}{TYPING_INDICATOR}"));
    }

    lines.push(input_line(state));
    lines
}

fn input_line(state: &ConversationState) -> String {
    if state.is_loading() {
        format!("[{INPUT_PLACEHOLDER}] (waiting for reply)")
    } else if state.draft().is_empty() {
        format!("[{INPUT_PLACEHOLDER}]")
    } else {
        format!("[{}]", state.draft())
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
