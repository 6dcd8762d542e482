use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use icaptivate_core::{Perspective, Route, Tab};
use tracing::{info, warn};

use crate::app::{App, HomeFocus, InputMode, TextInput};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.route() {
        Route::Onboarding => handle_onboarding(app, key),
        Route::Auth => handle_auth(app, key),
        Route::Main(tab) => match app.input_mode {
            InputMode::Editing => handle_message_editing(app, key),
            InputMode::Normal => handle_main_normal(app, tab, key),
        },
    }
}

fn handle_paste(app: &mut App, text: &str) {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    match app.route() {
        Route::Auth => {
            // Fields are single-line
            let line = text.lines().next().unwrap_or_default();
            app.auth.active_input().insert_str(line);
        }
        Route::Main(Tab::Home) => {
            app.home.message.insert_str(&text);
            app.home.focus = HomeFocus::Message;
            app.input_mode = InputMode::Editing;
        }
        _ => {}
    }
}

fn handle_onboarding(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.complete_onboarding(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_auth(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.log_in(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.auth.switch_field(),
        _ => edit_line(app.auth.active_input(), key),
    }
}

fn handle_main_normal(app: &mut App, tab: Tab, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('1') => {
            app.select_tab(Tab::Home);
            return;
        }
        KeyCode::Char('2') => {
            app.select_tab(Tab::History);
            return;
        }
        KeyCode::Char('3') => {
            app.select_tab(Tab::Settings);
            return;
        }
        _ => {}
    }

    match tab {
        Tab::Home => handle_home_normal(app, key),
        Tab::History | Tab::Settings => match key.code {
            KeyCode::Tab => app.select_tab(tab.next()),
            KeyCode::BackTab => app.select_tab(tab.prev()),
            _ => {}
        },
    }
}

fn handle_home_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        // Focus
        KeyCode::Tab => app.home.focus = app.home.focus.next(),
        KeyCode::BackTab => app.home.focus = app.home.focus.prev(),

        // Message
        KeyCode::Char('i') => {
            app.home.focus = HomeFocus::Message;
            app.input_mode = InputMode::Editing;
        }

        // Perspective
        KeyCode::Char('p') => app.home.toggle_perspective(),
        KeyCode::Char('m') => app.home.set_perspective(Perspective::Male),
        KeyCode::Char('f') => app.home.set_perspective(Perspective::Female),

        // Tone
        KeyCode::Char('+') | KeyCode::Char('=') => app.home.raise_tone(),
        KeyCode::Char('-') => app.home.lower_tone(),

        // Suggestions
        KeyCode::Char('j') | KeyCode::Down => app.home.suggestion_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.home.suggestion_nav_up(),
        KeyCode::Char('c') => copy_selected_suggestion(app),

        // Generate
        KeyCode::Char('g') => {
            app.submit();
        }

        KeyCode::Left | KeyCode::Char('h') => match app.home.focus {
            HomeFocus::Perspective => app.home.set_perspective(Perspective::Male),
            HomeFocus::Tone => app.home.lower_tone(),
            _ => {}
        },
        KeyCode::Right | KeyCode::Char('l') => match app.home.focus {
            HomeFocus::Perspective => app.home.set_perspective(Perspective::Female),
            HomeFocus::Tone => app.home.raise_tone(),
            _ => {}
        },

        KeyCode::Enter => match app.home.focus {
            HomeFocus::Message => app.input_mode = InputMode::Editing,
            HomeFocus::Perspective => app.home.toggle_perspective(),
            HomeFocus::Tone => {
                app.submit();
            }
            HomeFocus::Suggestions => copy_selected_suggestion(app),
        },

        _ => {}
    }
}

fn handle_message_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        // Alt+Enter keeps typing on a new line
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.home.message.insert_char('\n');
        }
        KeyCode::Enter => {
            if app.submit() {
                app.input_mode = InputMode::Normal;
            }
        }
        _ => edit_line(&mut app.home.message, key),
    }
}

fn edit_line(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert_char(c),
        _ => {}
    }
}

fn copy_selected_suggestion(app: &mut App) {
    let Some(suggestion) = app.home.selected_suggestion() else {
        return;
    };

    let notice = match copy_to_clipboard(&suggestion.content) {
        Ok(()) => {
            info!(kind = %suggestion.kind, "copied suggestion");
            format!("Copied \"{}\" reply", suggestion.kind)
        }
        Err(e) => {
            warn!(error = %e, "clipboard unavailable");
            "Couldn't access the clipboard".to_string()
        }
    };
    app.home.notice = Some(notice);
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use icaptivate_core::Config;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn signed_in_app() -> App {
        let config = Config {
            has_completed_onboarding: true,
            api_url: Some("http://127.0.0.1:9".to_string()),
            ..Config::new()
        };
        let mut app = App::new(&config, None, Theme::default());
        app.log_in();
        app
    }

    #[test]
    fn enter_walks_through_onboarding_and_auth() {
        let mut app = App::new(&Config::new(), None, Theme::default());
        assert_eq!(app.route(), Route::Onboarding);

        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.route(), Route::Auth);

        for c in "me@example.com".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Tab));
        for c in "secret".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.auth.email.value, "me@example.com");
        assert_eq!(app.auth.password.value, "secret");

        handle_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.route(), Route::Main(Tab::Home));
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = signed_in_app();
        handle_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.route(), Route::Main(Tab::History));
        handle_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.route(), Route::Main(Tab::Settings));
        handle_event(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.route(), Route::Main(Tab::Home));
    }

    #[test]
    fn perspective_and_tone_keys() {
        let mut app = signed_in_app();
        handle_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.home.perspective, Perspective::Female);
        handle_event(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.home.perspective, Perspective::Male);

        app.home.focus = HomeFocus::Tone;
        for _ in 0..4 {
            handle_event(&mut app, key(KeyCode::Right));
        }
        assert_eq!(app.home.tone.value(), 5);
        handle_event(&mut app, key(KeyCode::Char('-')));
        assert_eq!(app.home.tone.value(), 4);
    }

    #[test]
    fn enter_on_blank_message_stays_in_editing() {
        let mut app = signed_in_app();
        handle_event(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Editing);

        handle_event(&mut app, key(KeyCode::Char(' ')));
        handle_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.generate_task.is_none());
        assert!(!app.home.pending);
    }

    #[test]
    fn paste_fills_message() {
        let mut app = signed_in_app();
        handle_event(&mut app, AppEvent::Paste("hey!\r\nyou up?".to_string()));
        assert_eq!(app.home.message.value, "hey!\nyou up?");
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn alt_enter_inserts_newline() {
        let mut app = signed_in_app();
        app.input_mode = InputMode::Editing;
        handle_event(&mut app, key(KeyCode::Char('a')));
        handle_event(&mut app, AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));
        handle_event(&mut app, key(KeyCode::Char('b')));
        assert_eq!(app.home.message.value, "a\nb");
        assert!(app.generate_task.is_none());
    }

    #[tokio::test]
    async fn enter_with_message_submits_once() {
        let mut app = signed_in_app();
        app.input_mode = InputMode::Editing;
        for c in "hi".chars() {
            handle_event(&mut app, key(KeyCode::Char(c)));
        }
        handle_event(&mut app, key(KeyCode::Enter));
        assert!(app.home.pending);
        assert_eq!(app.input_mode, InputMode::Normal);

        // Second trigger while pending is ignored
        handle_event(&mut app, key(KeyCode::Char('g')));
        assert!(app.home.pending);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = App::new(&Config::new(), None, Theme::default());
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.should_quit);
    }
}
