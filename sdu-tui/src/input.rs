//! Keyboard input dispatch: overlays → global keys → screen-specific handlers.
//!
//! Most screens are text entry, so global shortcuts use Ctrl or function
//! keys and leave printable characters to the focused field.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use sdu_core::flows::UploadField;
use sdu_core::Screen;

use crate::app::{AppState, Overlay};

/// Handle a key event, mutating state in place.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.running = false;
            return;
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('e') if ctrl => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::F(1) => {
            app.overlay = Overlay::Help;
            return;
        }
        _ => {}
    }

    if app.session.is_authenticated() {
        match key.code {
            KeyCode::Char('l') if ctrl => {
                app.logout();
                return;
            }
            KeyCode::Tab => {
                let next = app.screen().next();
                app.navigate(next);
                return;
            }
            KeyCode::BackTab => {
                let prev = app.screen().prev();
                app.navigate(prev);
                return;
            }
            _ => {}
        }
    }

    // 3. Screen-specific keys.
    match app.screen() {
        Screen::Login => handle_login_key(app, key),
        Screen::Dashboard => handle_dashboard_key(app, key),
        Screen::Search => handle_search_key(app, key),
        Screen::Upload => handle_upload_key(app, key),
        Screen::Reference => handle_reference_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_login_key(app: &mut AppState, key: KeyEvent) {
    // The form stays live while the startup check is in flight.
    match key.code {
        KeyCode::Esc => app.running = false,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.focus = app.login.focus.toggle();
        }
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace => {
            if !app.login.is_busy() {
                app.login.focused_mut().pop();
            }
        }
        KeyCode::Char(c) => {
            if !app.login.is_busy() {
                app.login.focused_mut().push(c);
            }
        }
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.navigate(Screen::Search),
        KeyCode::Char('u') => app.navigate(Screen::Upload),
        KeyCode::Char('c') => app.navigate(Screen::Reference),
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        KeyCode::Char('q') => app.running = false,
        _ => {}
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Dashboard),
        KeyCode::Enter => app.submit_search(),
        KeyCode::Down => app.search.select_next(),
        KeyCode::Up => app.search.select_prev(),
        KeyCode::Char('d') if ctrl => app.request_download(),
        KeyCode::Backspace => {
            app.search.query.pop();
        }
        KeyCode::Char(c) if !ctrl => app.search.query.push(c),
        _ => {}
    }
}

fn handle_upload_key(app: &mut AppState, key: KeyEvent) {
    if app.upload.is_busy() {
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let focus = app.upload.focus;
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Dashboard),
        KeyCode::Down => app.upload.focus = focus.next(),
        KeyCode::Up => app.upload.focus = focus.prev(),
        KeyCode::Char('s') if ctrl => app.submit_upload(),
        KeyCode::Enter if focus == UploadField::File => {
            app.upload.attach_from_path();
            if let Some(file) = &app.upload.form().attached_file {
                let msg = format!("Attached {} ({} bytes)", file.file_name, file.bytes.len());
                app.set_status(msg);
            }
        }
        KeyCode::Enter => app.submit_upload(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if focus == UploadField::DocumentKind => {
            app.upload.cycle_document_kind();
        }
        KeyCode::Backspace => app.upload.pop_char(),
        KeyCode::Char(c) if !ctrl => app.upload.push_char(c),
        _ => {}
    }
}

fn handle_reference_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Dashboard),
        KeyCode::Enter => app.reference.lookup(),
        KeyCode::Backspace => {
            app.reference.input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.reference.input.extend(c.to_uppercase());
        }
        _ => {}
    }
}
