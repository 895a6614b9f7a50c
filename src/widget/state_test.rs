use super::*;
use crate::widget::message::Role;

fn open_state() -> ConversationState {
    let mut state = ConversationState::default();
    update(&mut state, Action::Open);
    state
}

fn succeed(state: &mut ConversationState, response: &str, session: &str) -> Vec<Effect> {
    update(state, Action::TransportSucceeded { response: response.into(), session_id: SessionId::from(session) })
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_closed_and_empty() {
    let state = ConversationState::default();
    assert!(state.messages().is_empty());
    assert!(!state.is_open());
    assert!(!state.is_loading());
    assert!(state.session_id().is_none());
    assert_eq!(state.draft(), "");
    assert_eq!(state.greeting(), GreetingSlot::Idle);
}

// =============================================================
// Visibility & greeting
// =============================================================

#[test]
fn first_open_schedules_greeting() {
    let mut state = ConversationState::default();
    let effects = update(&mut state, Action::Open);
    assert!(state.is_open());
    assert_eq!(effects, vec![Effect::ScheduleGreeting { ticket: 0 }]);
    assert_eq!(state.greeting(), GreetingSlot::Pending(0));
}

#[test]
fn open_when_open_is_noop() {
    let mut state = open_state();
    assert!(update(&mut state, Action::Open).is_empty());
    assert_eq!(state.greeting(), GreetingSlot::Pending(0));
}

#[test]
fn greeting_lands_once_for_pending_ticket() {
    let mut state = ConversationState::new("Welcome to the ward");
    update(&mut state, Action::Open);
    update(&mut state, Action::GreetingElapsed(0));
    update(&mut state, Action::GreetingElapsed(0));
    assert_eq!(state.messages(), &[Message::assistant("Welcome to the ward")]);
    assert_eq!(state.greeting(), GreetingSlot::Settled);
}

#[test]
fn close_before_delay_cancels_greeting() {
    let mut state = open_state();
    let effects = update(&mut state, Action::Close);
    assert_eq!(effects, vec![Effect::CancelGreeting]);
    assert_eq!(state.greeting(), GreetingSlot::Idle);

    update(&mut state, Action::GreetingElapsed(0));
    assert!(state.messages().is_empty());
}

#[test]
fn reopen_after_cancel_uses_fresh_ticket() {
    let mut state = open_state();
    update(&mut state, Action::Close);
    let effects = update(&mut state, Action::Open);
    assert_eq!(effects, vec![Effect::ScheduleGreeting { ticket: 1 }]);

    update(&mut state, Action::GreetingElapsed(0));
    assert!(state.messages().is_empty());
    update(&mut state, Action::GreetingElapsed(1));
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn reopen_after_greeting_does_not_schedule_again() {
    let mut state = open_state();
    update(&mut state, Action::GreetingElapsed(0));
    update(&mut state, Action::Close);
    assert!(update(&mut state, Action::Open).is_empty());
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn toggle_flips_visibility() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Toggle);
    assert!(state.is_open());
    update(&mut state, Action::Toggle);
    assert!(!state.is_open());
}

#[test]
fn close_when_closed_is_noop() {
    let mut state = ConversationState::default();
    assert!(update(&mut state, Action::Close).is_empty());
}

// =============================================================
// Submit
// =============================================================

#[test]
fn submit_appends_user_message_and_sends() {
    let mut state = ConversationState::default();
    update(&mut state, Action::SetDraft("What are visiting hours?".into()));
    let effects = update(&mut state, Action::Submit("What are visiting hours?".into()));

    assert_eq!(state.messages(), &[Message::user("What are visiting hours?")]);
    assert_eq!(state.draft(), "");
    assert!(state.is_loading());
    assert_eq!(effects, vec![Effect::Send { message: "What are visiting hours?".into(), session_id: None }]);
}

#[test]
fn submit_keeps_text_as_typed() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("  parking?  ".into()));
    assert_eq!(state.messages()[0].text, "  parking?  ");
}

#[test]
fn blank_submit_is_noop() {
    let mut state = ConversationState::default();
    update(&mut state, Action::SetDraft("   ".into()));
    assert!(update(&mut state, Action::Submit(String::new())).is_empty());
    assert!(update(&mut state, Action::Submit("   ".into())).is_empty());
    assert!(update(&mut state, Action::SubmitDraft).is_empty());
    assert!(state.messages().is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.draft(), "   ");
}

#[test]
fn submit_while_loading_is_dropped() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("first".into()));
    assert!(update(&mut state, Action::Submit("second".into())).is_empty());
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn submit_draft_uses_current_draft() {
    let mut state = ConversationState::default();
    update(&mut state, Action::SetDraft("Where is A&E?".into()));
    let effects = update(&mut state, Action::SubmitDraft);
    assert_eq!(effects, vec![Effect::Send { message: "Where is A&E?".into(), session_id: None }]);
    assert_eq!(state.draft(), "");
}

#[test]
fn submit_before_greeting_cancels_it() {
    let mut state = open_state();
    let effects = update(&mut state, Action::Submit("hello".into()));
    assert_eq!(effects[0], Effect::CancelGreeting);
    assert!(matches!(effects[1], Effect::Send { .. }));

    update(&mut state, Action::GreetingElapsed(0));
    assert_eq!(state.messages().len(), 1);
    assert_eq!(state.messages()[0].role, Role::User);
}

// =============================================================
// Transport outcomes
// =============================================================

#[test]
fn success_stores_session_and_formats_reply() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("hi".into()));
    succeed(&mut state, "**Hello** there\\n*friend*", "sess-1");

    assert_eq!(state.session_id(), Some(&SessionId::from("sess-1")));
    assert_eq!(state.messages()[1], Message::assistant("Hello there\nfriend"));
    assert!(!state.is_loading());
}

#[test]
fn session_id_is_forwarded_on_next_turn() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("hi".into()));
    succeed(&mut state, "hello", "sess-42");

    let effects = update(&mut state, Action::Submit("again".into()));
    assert_eq!(effects, vec![Effect::Send { message: "again".into(), session_id: Some(SessionId::from("sess-42")) }]);
}

#[test]
fn session_id_tracks_latest_backend_value() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("one".into()));
    succeed(&mut state, "a", "sess-1");
    update(&mut state, Action::Submit("two".into()));
    succeed(&mut state, "b", "sess-2");
    assert_eq!(state.session_id().map(SessionId::as_str), Some("sess-2"));
}

#[test]
fn failure_appends_fixed_error_message() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("hi".into()));
    update(&mut state, Action::TransportFailed);

    let last = state.messages().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text, "Error connecting to backend");
    assert!(!state.is_loading());
    assert!(state.session_id().is_none());
}

#[test]
fn failure_keeps_previous_session() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("hi".into()));
    succeed(&mut state, "hello", "sess-1");
    update(&mut state, Action::Submit("again".into()));
    update(&mut state, Action::TransportFailed);
    assert_eq!(state.session_id(), Some(&SessionId::from("sess-1")));
}

#[test]
fn widget_accepts_new_turn_after_failure() {
    let mut state = ConversationState::default();
    update(&mut state, Action::Submit("hi".into()));
    update(&mut state, Action::TransportFailed);
    assert_eq!(update(&mut state, Action::Submit("retry".into())).len(), 1);
}

#[test]
fn outcome_without_turn_in_flight_is_ignored() {
    let mut state = ConversationState::default();
    succeed(&mut state, "stray", "sess-x");
    update(&mut state, Action::TransportFailed);
    assert!(state.messages().is_empty());
    assert!(state.session_id().is_none());
}
