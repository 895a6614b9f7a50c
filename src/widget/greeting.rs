//! Cancelable timer that delivers the greeting seed.
//!
//! The timer only posts `Action::GreetingElapsed(ticket)` back through the
//! reducer; whether anything is appended is decided there. Aborting the task
//! on close or drop keeps a dead widget from being touched at all.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;

use super::state::{Action, ConversationState, update};

#[derive(Default)]
pub struct GreetingTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl GreetingTimer {
    /// Start the timer for `ticket`, replacing any timer already running.
    pub fn schedule(
        &self,
        delay: Duration,
        ticket: u64,
        state: Arc<AsyncMutex<ConversationState>>,
        version: Arc<watch::Sender<u64>>,
    ) {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = state.lock().await;
                update(&mut state, Action::GreetingElapsed(ticket));
            }
            version.send_modify(|v| *v = v.wrapping_add(1));
        });
        if let Some(previous) = self.slot().replace(task) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(task) = self.slot().take() {
            task.abort();
        }
    }

    #[must_use]
    pub(crate) fn is_scheduled(&self) -> bool {
        self.slot().as_ref().is_some_and(|task| !task.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GreetingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
