//! Chat widget — conversation state, reducer, and the controller that runs
//! the reducer's effects.
//!
//! DESIGN
//! ======
//! `ChatWidget` owns a `ConversationState` behind an async mutex and funnels
//! every user interaction through `state::update`. The lock is held only for
//! the transition itself, never across the backend round-trip, so the panel
//! can be redrawn (and further submits rejected) while a turn is in flight.
//! Observers subscribe to a version counter that bumps after every
//! transition.

pub mod format;
pub mod greeting;
pub mod message;
pub mod state;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tracing::warn;

use crate::config::WidgetConfig;
use crate::transport::{HttpTransport, Transport, TransportError};

pub use format::format_reply;
pub use greeting::GreetingTimer;
pub use message::{Message, Role, SessionId};
pub use state::{Action, ConversationState, Effect, GreetingSlot, TRANSPORT_ERROR_TEXT, update};

pub struct ChatWidget<T> {
    state: Arc<Mutex<ConversationState>>,
    transport: T,
    greeting: GreetingTimer,
    greeting_delay: Duration,
    version: Arc<watch::Sender<u64>>,
}

impl ChatWidget<HttpTransport> {
    /// Widget talking HTTP to `config.backend_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn connect(config: &WidgetConfig) -> Result<Self, TransportError> {
        Ok(Self::new(config, HttpTransport::new(config.backend_url.clone())?))
    }
}

impl<T: Transport> ChatWidget<T> {
    #[must_use]
    pub fn new(config: &WidgetConfig, transport: T) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(ConversationState::new(config.greeting_text.clone()))),
            transport,
            greeting: GreetingTimer::default(),
            greeting_delay: config.greeting_delay,
            version: Arc::new(version),
        }
    }

    pub async fn open(&self) {
        self.dispatch(Action::Open).await;
    }

    pub async fn close(&self) {
        self.dispatch(Action::Close).await;
    }

    pub async fn toggle(&self) {
        self.dispatch(Action::Toggle).await;
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.dispatch(Action::SetDraft(text.into())).await;
    }

    /// Submit a user turn and wait for its reply (or failure substitute).
    /// Returns immediately when the text is blank or a turn is in flight.
    pub async fn submit(&self, text: impl Into<String>) {
        self.dispatch(Action::Submit(text.into())).await;
    }

    pub async fn submit_draft(&self) {
        self.dispatch(Action::SubmitDraft).await;
    }

    /// Copy of the current state for rendering or inspection.
    pub async fn snapshot(&self) -> ConversationState {
        self.state.lock().await.clone()
    }

    /// Receiver that observes a bump after every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Run one action through the reducer and carry out its effects.
    pub async fn dispatch(&self, action: Action) {
        let mut pending: VecDeque<Effect> = {
            let mut state = self.state.lock().await;
            update(&mut state, action).into()
        };
        self.bump();

        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::ScheduleGreeting { ticket } => {
                    self.greeting.schedule(
                        self.greeting_delay,
                        ticket,
                        Arc::clone(&self.state),
                        Arc::clone(&self.version),
                    );
                }
                Effect::CancelGreeting => self.greeting.cancel(),
                Effect::Send { message, session_id } => {
                    let outcome = match self.transport.send(&message, session_id.as_ref()).await {
                        Ok(reply) => Action::TransportSucceeded { response: reply.response, session_id: reply.session_id },
                        Err(e) => {
                            warn!(error = %e, "turn failed");
                            Action::TransportFailed
                        }
                    };
                    let follow = {
                        let mut state = self.state.lock().await;
                        update(&mut state, outcome)
                    };
                    self.bump();
                    pending.extend(follow);
                }
            }
        }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
