//! Property tests for key handling: arbitrary key sequences never escape
//! the login gate and never panic.

use std::sync::mpsc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use sdu_core::Screen;
use sdu_tui::app::AppState;
use sdu_tui::input::handle_key;

fn key_strategy() -> impl Strategy<Value = KeyEvent> {
    let code = prop_oneof![
        any::<char>().prop_map(KeyCode::Char),
        Just(KeyCode::Enter),
        Just(KeyCode::Esc),
        Just(KeyCode::Tab),
        Just(KeyCode::BackTab),
        Just(KeyCode::Backspace),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::F(1)),
    ];
    let modifiers = prop_oneof![Just(KeyModifiers::NONE), Just(KeyModifiers::CONTROL)];
    (code, modifiers).prop_map(|(code, modifiers)| KeyEvent::new(code, modifiers))
}

proptest! {
    #[test]
    fn unauthenticated_app_stays_on_login(keys in prop::collection::vec(key_strategy(), 0..64)) {
        let (tx, _rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let mut app = AppState::new(tx, resp_rx, "http://test".into());

        for key in keys {
            handle_key(&mut app, key);
            prop_assert_eq!(app.screen(), Screen::Login);
            prop_assert!(!app.session.is_authenticated());
        }
    }

    #[test]
    fn authenticated_app_never_returns_to_login_without_logout(
        keys in prop::collection::vec(key_strategy(), 0..64)
    ) {
        let (tx, _rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let mut app = AppState::new(tx, resp_rx, "http://test".into());
        app.session.login();

        for key in keys {
            let is_logout = key.modifiers.contains(KeyModifiers::CONTROL)
                && key.code == KeyCode::Char('l');
            handle_key(&mut app, key);
            if is_logout {
                break;
            }
            prop_assert_ne!(app.screen(), Screen::Login);
        }
    }
}
