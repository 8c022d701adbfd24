//! Property-based tests for the App state machine and input handling.
//!
//! Tests verify that invariants hold under arbitrary event and key sequences.

use proptest::prelude::*;
use xdchat_app::{
    App, AppAction, AppEvent, InputState, KeyInput, MAX_LOG_LINES,
    commands::{self, Command},
};
use xdchat_client::{ConnectionState, SessionConfig, SessionEvent};

fn state_strategy() -> impl Strategy<Value = ConnectionState> {
    prop_oneof![
        Just(ConnectionState::Disconnected),
        Just(ConnectionState::Connecting),
        Just(ConnectionState::Connected),
        Just(ConnectionState::Disconnecting),
    ]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        1 => Just(AppEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
        2 => state_strategy().prop_map(|s| AppEvent::Session(SessionEvent::State(s))),
        4 => "[ -~]{0,40}".prop_map(|l| AppEvent::Session(SessionEvent::Inbound(l))),
        1 => "[ -~]{0,20}".prop_map(|m| AppEvent::Error { message: m }),
    ]
}

/// Generate random key presses, weighted towards text.
fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        6 => any::<char>().prop_map(KeyInput::Char),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
    ]
}

fn app() -> App {
    App::new(SessionConfig::default().with_nickname("alice").unwrap())
}

proptest! {
    #[test]
    fn prop_log_is_bounded(lines in prop::collection::vec("[a-z]{1,8}", 0..3000)) {
        let mut app = app();
        for line in lines {
            app.handle(AppEvent::Session(SessionEvent::Inbound(line)));
            prop_assert!(app.log().len() <= MAX_LOG_LINES);
        }
    }

    #[test]
    fn prop_state_mirrors_last_state_event(events in prop::collection::vec(event_strategy(), 0..50)) {
        let mut app = app();
        let mut expected = ConnectionState::Disconnected;
        for event in events {
            if let AppEvent::Session(SessionEvent::State(s)) = &event {
                expected = *s;
            }
            app.handle(event);
            prop_assert_eq!(app.connection_state(), expected);
        }
    }

    #[test]
    fn prop_config_changes_only_requested_while_disconnected(
        state in state_strategy(),
        nickname in "[a-z]{1,10}",
        channel in "#[a-z]{1,10}",
    ) {
        let mut app = app();
        app.handle(AppEvent::Session(SessionEvent::State(state)));
        let before = app.config().clone();

        let mut actions = app.change_nickname(&nickname);
        actions.extend(app.change_channel(&channel));

        let requested = actions
            .iter()
            .any(|a| matches!(a, AppAction::SetNickname { .. } | AppAction::SetChannel { .. }));
        if state != ConnectionState::Disconnected {
            prop_assert!(!requested);
        }
        prop_assert_eq!(app.config(), &before);
    }

    #[test]
    fn prop_send_only_when_connected(state in state_strategy(), text in "[ -~]{0,30}") {
        let mut app = app();
        app.handle(AppEvent::Session(SessionEvent::State(state)));

        let sends = app.send_message(&text).into_iter().filter(|a| matches!(a, AppAction::Send { .. })).count();

        let expected = usize::from(state == ConnectionState::Connected && !text.trim().is_empty());
        prop_assert_eq!(sends, expected);
    }

    #[test]
    fn prop_cursor_stays_on_char_boundary(keys in prop::collection::vec(key_strategy(), 0..100)) {
        let mut input = InputState::new();
        let mut app = app();
        for key in keys {
            input.handle_key(key, &mut app);
            prop_assert!(input.cursor() <= input.buffer().len());
            prop_assert!(input.buffer().is_char_boundary(input.cursor()));
        }
    }

    #[test]
    fn prop_text_without_slash_is_message(text in "[^/][ -~]{0,30}") {
        prop_assert_eq!(commands::parse(&text), Command::Message { text: text.clone() });
    }

    #[test]
    fn prop_escaped_slash_is_literal(text in "[ -~]{0,30}") {
        let input = format!("//{text}");
        prop_assert_eq!(commands::parse(&input), Command::Message { text: format!("/{text}") });
    }
}
