use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use mathboard_core::ViewMode;
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_tasks().await;
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    if key.code == KeyCode::Tab || key.code == KeyCode::BackTab {
        app.switch_screen();
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }

        KeyCode::Char('1') => app.screen = ViewMode::Tutor,
        KeyCode::Char('2') => app.screen = ViewMode::Chat,

        KeyCode::Char('l') if app.screen == ViewMode::Tutor => {
            app.show_latex = !app.show_latex;
        }

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('J') => app.scroll_whiteboard_down(1),
        KeyCode::Char('K') => app.scroll_whiteboard_up(1),
        KeyCode::Char('g') => app.scroll_top(),
        KeyCode::Char('G') => match app.screen {
            ViewMode::Chat => app.scroll_chat_to_bottom(),
            ViewMode::Tutor => {}
        },

        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half = app.half_page();
            app.scroll_down(half);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half = app.half_page();
            app.scroll_up(half);
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::PageDown => app.scroll_down(app.half_page()),
        KeyCode::PageUp => app.scroll_up(app.half_page()),
        // The input box is disabled while a request is in flight
        _ if app.is_loading() => {}
        KeyCode::Enter => app.send_current(),
        KeyCode::Backspace => app.session_mut().backspace(),
        KeyCode::Delete => app.session_mut().delete(),
        KeyCode::Left => app.session_mut().cursor_left(),
        KeyCode::Right => app.session_mut().cursor_right(),
        KeyCode::Home => app.session_mut().cursor_home(),
        KeyCode::End => app.session_mut().cursor_end(),
        KeyCode::Char(c) => app.session_mut().insert_char(c),
        _ => {}
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.input_mode != InputMode::Editing || app.is_loading() {
        return;
    }
    let session = app.session_mut();
    for c in text.chars() {
        // Single-line input box
        session.insert_char(if c == '\n' || c == '\r' { ' ' } else { c });
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
