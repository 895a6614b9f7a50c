//! Conversation state and the reducer that drives it.
//!
//! DESIGN
//! ======
//! All widget behavior is a pure transition: `update` takes the owned state
//! and one `Action`, mutates the state, and returns the `Effect`s the
//! controller must carry out (start or cancel the greeting timer, send a
//! turn to the backend). Nothing here touches the network or the clock, so
//! every rule can be exercised directly in unit tests.
//!
//! The greeting is tracked by ticket. Each scheduling gets a fresh ticket and
//! `GreetingElapsed` only lands when its ticket is still the pending one, so
//! a timer that woke after a close can never append.

use tracing::{debug, info};

use super::format::format_reply;
use super::message::{Message, SessionId};
use crate::config::DEFAULT_GREETING_TEXT;

/// Assistant text substituted for any failed turn.
pub const TRANSPORT_ERROR_TEXT: &str = "Error connecting to backend";

// =============================================================================
// ACTIONS & EFFECTS
// =============================================================================

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
    Toggle,
    /// Replace the draft with what is currently typed.
    SetDraft(String),
    /// Submit the given text as a user turn.
    Submit(String),
    /// Submit whatever is in the draft (Enter key).
    SubmitDraft,
    /// The greeting timer for `ticket` fired.
    GreetingElapsed(u64),
    TransportSucceeded { response: String, session_id: SessionId },
    TransportFailed,
}

/// Work the controller performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleGreeting { ticket: u64 },
    CancelGreeting,
    Send { message: String, session_id: Option<SessionId> },
}

/// Lifecycle of the one-time greeting seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingSlot {
    /// Not scheduled; will be on the next open with an empty list.
    Idle,
    /// Timer running for this ticket.
    Pending(u64),
    /// Greeting shown, or made moot by the first user message.
    Settled,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<Message>,
    draft: String,
    session_id: Option<SessionId>,
    is_open: bool,
    is_loading: bool,
    greeting: GreetingSlot,
    greeting_text: String,
    next_ticket: u64,
}

impl ConversationState {
    #[must_use]
    pub fn new(greeting_text: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            draft: String::new(),
            session_id: None,
            is_open: false,
            is_loading: false,
            greeting: GreetingSlot::Idle,
            greeting_text: greeting_text.into(),
            next_ticket: 0,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn greeting(&self) -> GreetingSlot {
        self.greeting
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING_TEXT)
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Apply one action to the state and return the effects it requires.
pub fn update(state: &mut ConversationState, action: Action) -> Vec<Effect> {
    match action {
        Action::Open => open(state),
        Action::Close => close(state),
        Action::Toggle => {
            if state.is_open {
                close(state)
            } else {
                open(state)
            }
        }
        Action::SetDraft(text) => {
            state.draft = text;
            Vec::new()
        }
        Action::Submit(text) => submit(state, text),
        Action::SubmitDraft => {
            let text = state.draft.clone();
            submit(state, text)
        }
        Action::GreetingElapsed(ticket) => {
            greeting_elapsed(state, ticket);
            Vec::new()
        }
        Action::TransportSucceeded { response, session_id } => {
            if !state.is_loading {
                debug!("reply arrived with no turn in flight; ignored");
                return Vec::new();
            }
            debug!(%session_id, "turn succeeded");
            state.session_id = Some(session_id);
            state.messages.push(Message::assistant(format_reply(&response)));
            state.is_loading = false;
            Vec::new()
        }
        Action::TransportFailed => {
            if !state.is_loading {
                debug!("failure arrived with no turn in flight; ignored");
                return Vec::new();
            }
            state.messages.push(Message::assistant(TRANSPORT_ERROR_TEXT));
            state.is_loading = false;
            Vec::new()
        }
    }
}

fn open(state: &mut ConversationState) -> Vec<Effect> {
    if state.is_open {
        return Vec::new();
    }
    state.is_open = true;
    info!(messages = state.messages.len(), "chat panel opened");

    if state.messages.is_empty() && state.greeting == GreetingSlot::Idle {
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.greeting = GreetingSlot::Pending(ticket);
        debug!(ticket, "greeting scheduled");
        return vec![Effect::ScheduleGreeting { ticket }];
    }
    Vec::new()
}

fn close(state: &mut ConversationState) -> Vec<Effect> {
    if !state.is_open {
        return Vec::new();
    }
    state.is_open = false;
    info!("chat panel closed");

    if let GreetingSlot::Pending(ticket) = state.greeting {
        state.greeting = GreetingSlot::Idle;
        debug!(ticket, "greeting cancelled");
        return vec![Effect::CancelGreeting];
    }
    Vec::new()
}

fn submit(state: &mut ConversationState, text: String) -> Vec<Effect> {
    if text.trim().is_empty() || state.is_loading {
        return Vec::new();
    }

    let mut effects = Vec::with_capacity(2);
    if let GreetingSlot::Pending(_) = state.greeting {
        effects.push(Effect::CancelGreeting);
    }
    state.greeting = GreetingSlot::Settled;

    state.messages.push(Message::user(text.clone()));
    state.draft.clear();
    state.is_loading = true;
    debug!(len = text.len(), has_session = state.session_id.is_some(), "turn submitted");

    effects.push(Effect::Send { message: text, session_id: state.session_id.clone() });
    effects
}

fn greeting_elapsed(state: &mut ConversationState, ticket: u64) {
    if state.greeting != GreetingSlot::Pending(ticket) {
        debug!(ticket, "stale greeting timer ignored");
        return;
    }
    state.greeting = GreetingSlot::Settled;
    if state.is_open && state.messages.is_empty() {
        state.messages.push(Message::assistant(state.greeting_text.clone()));
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
