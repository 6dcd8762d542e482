use std::path::PathBuf;

use icaptivate_core::{
    ApiClient, ApiError, Config, Navigator, Perspective, Route, Session, Suggestion, Tab,
    ToneLevel,
};
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeFocus {
    #[default]
    Message,
    Perspective,
    Tone,
    Suggestions,
}

impl HomeFocus {
    pub fn next(&self) -> Self {
        match self {
            HomeFocus::Message => HomeFocus::Perspective,
            HomeFocus::Perspective => HomeFocus::Tone,
            HomeFocus::Tone => HomeFocus::Suggestions,
            HomeFocus::Suggestions => HomeFocus::Message,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            HomeFocus::Message => HomeFocus::Suggestions,
            HomeFocus::Perspective => HomeFocus::Message,
            HomeFocus::Tone => HomeFocus::Perspective,
            HomeFocus::Suggestions => HomeFocus::Tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Email,
    Password,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single text field with a character-based cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert_str(byte_pos, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// (line, column) of the cursor. The column is in terminal cells, so wide
    /// characters count twice.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.value[..char_to_byte_index(&self.value, self.cursor)];
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().map(|l| l.width()).unwrap_or(0);
        (line, col)
    }
}

/// Snapshot of the inputs a suggestion request is sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateJob {
    pub message: String,
    pub perspective: Perspective,
    pub tone: ToneLevel,
}

pub struct HomeState {
    pub perspective: Perspective,
    pub message: TextInput,
    pub tone: ToneLevel,
    pub suggestions: Vec<Suggestion>,
    pub pending: bool,
    pub focus: HomeFocus,
    pub suggestion_state: ListState,
    pub notice: Option<String>,
}

impl HomeState {
    pub fn new(perspective: Perspective, tone: ToneLevel) -> Self {
        Self {
            perspective,
            message: TextInput::default(),
            tone,
            suggestions: Vec::new(),
            pending: false,
            focus: HomeFocus::default(),
            suggestion_state: ListState::default(),
            notice: None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.message.value.trim().is_empty() && !self.pending
    }

    /// Start a request if the message is filled in and none is in flight.
    pub fn begin_submit(&mut self) -> Option<GenerateJob> {
        if !self.can_submit() {
            return None;
        }
        self.pending = true;
        self.notice = None;
        Some(GenerateJob {
            message: self.message.value.clone(),
            perspective: self.perspective,
            tone: self.tone,
        })
    }

    /// Apply the outcome of the in-flight request. A failure keeps the
    /// suggestions that were already on screen.
    pub fn finish_submit(&mut self, result: Result<Vec<Suggestion>, ApiError>) {
        self.pending = false;
        match result {
            Ok(suggestions) => {
                info!(count = suggestions.len(), "showing suggestions");
                self.suggestion_state
                    .select(if suggestions.is_empty() { None } else { Some(0) });
                self.suggestions = suggestions;
            }
            Err(e) => {
                error!(error = %e, retryable = e.is_retryable(), "Failed to generate responses");
                self.notice = Some(e.summary());
            }
        }
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.perspective = perspective;
    }

    pub fn toggle_perspective(&mut self) {
        self.perspective = self.perspective.toggled();
    }

    pub fn raise_tone(&mut self) {
        self.tone = self.tone.raised();
    }

    pub fn lower_tone(&mut self) {
        self.tone = self.tone.lowered();
    }

    pub fn suggestion_nav_down(&mut self) {
        let len = self.suggestions.len();
        if len > 0 {
            let i = self.suggestion_state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
            self.suggestion_state.select(Some(i));
        }
    }

    pub fn suggestion_nav_up(&mut self) {
        if !self.suggestions.is_empty() {
            let i = self.suggestion_state.selected().unwrap_or(0);
            self.suggestion_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestion_state
            .selected()
            .and_then(|i| self.suggestions.get(i))
    }
}

#[derive(Debug, Default)]
pub struct AuthState {
    pub email: TextInput,
    pub password: TextInput,
    pub field: AuthField,
}

impl AuthState {
    pub fn active_input(&mut self) -> &mut TextInput {
        match self.field {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
    }
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: Session,
    pub navigator: Navigator,
    pub home: HomeState,
    pub auth: AuthState,
    pub theme: Theme,
    pub api: ApiClient,
    pub generate_task: Option<JoinHandle<Result<Vec<Suggestion>, ApiError>>>,

    // 0-2 for ellipsis animation
    pub animation_frame: u8,

    // Where the onboarding flag is saved; None keeps it in memory only
    config_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: &Config, config_path: Option<PathBuf>, theme: Theme) -> Self {
        let session = config.session();
        let api = ApiClient::with_url(&config.api_url());

        let home = HomeState::new(
            config.default_perspective.unwrap_or_default(),
            config.default_tone.unwrap_or_default(),
        );

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            session,
            navigator: Navigator::new(&session),
            home,
            auth: AuthState::default(),
            theme,
            api,
            generate_task: None,
            animation_frame: 0,
            config_path,
        }
    }

    pub fn route(&self) -> Route {
        self.navigator.route()
    }

    /// Onboarding "Get Started".
    pub fn complete_onboarding(&mut self) {
        if let Err(e) = self.navigator.complete_onboarding() {
            warn!(error = %e, "ignored onboarding");
            return;
        }
        self.session.has_completed_onboarding = true;
        self.input_mode = InputMode::Normal;

        if let Some(path) = &self.config_path {
            if let Err(e) = Config::mark_onboarding_complete(path) {
                warn!(error = %e, "could not save onboarding state");
            }
        }
    }

    /// Auth "Login". Credentials are not checked or kept.
    pub fn log_in(&mut self) {
        if let Err(e) = self.navigator.log_in() {
            warn!(error = %e, "ignored login");
            return;
        }
        self.session.is_authenticated = true;
        self.input_mode = InputMode::Normal;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if let Err(e) = self.navigator.select_tab(tab) {
            warn!(error = %e, "ignored tab switch");
        }
    }

    /// Spawn the suggestion request. Returns false when the message is blank
    /// or a request is already pending; nothing is sent then.
    pub fn submit(&mut self) -> bool {
        let Some(job) = self.home.begin_submit() else {
            return false;
        };

        let api = self.api.clone();
        self.generate_task = Some(tokio::spawn(async move {
            api.generate_responses(&job.message, job.perspective, job.tone)
                .await
        }));
        true
    }

    /// Collect the request result once its task has finished.
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generate_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.generate_task.take() {
            match task.await {
                Ok(result) => self.home.finish_submit(result),
                Err(e) => {
                    error!(error = %e, "suggestion task did not complete");
                    self.home.pending = false;
                }
            }
        }
    }

    pub fn tick_animation(&mut self) {
        if self.home.pending {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(kind: &str, content: &str) -> Suggestion {
        Suggestion {
            kind: kind.to_string(),
            content: content.to_string(),
        }
    }

    fn test_app() -> App {
        let config = Config {
            api_url: Some("http://127.0.0.1:9".to_string()),
            ..Config::new()
        };
        App::new(&config, None, Theme::default())
    }

    #[test]
    fn blank_message_does_not_start_request() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        assert!(home.begin_submit().is_none());

        home.message.insert_str("  \n\t ");
        assert!(home.begin_submit().is_none());
        assert!(!home.pending);
    }

    #[test]
    fn pending_request_blocks_second_submit() {
        let mut home = HomeState::new(Perspective::Female, ToneLevel::new(5).unwrap());
        home.message.insert_str("wyd tonight?");

        let job = home.begin_submit().expect("first submit goes through");
        assert_eq!(job.message, "wyd tonight?");
        assert_eq!(job.perspective, Perspective::Female);
        assert_eq!(job.tone.value(), 5);
        assert!(home.pending);

        assert!(home.begin_submit().is_none());
    }

    #[test]
    fn success_replaces_suggestions() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        home.suggestions = vec![suggestion("Old", "old reply")];
        home.message.insert_str("hello");
        home.begin_submit();

        home.finish_submit(Ok(vec![suggestion("Friendly", "Hi!")]));

        assert!(!home.pending);
        assert_eq!(home.suggestions, vec![suggestion("Friendly", "Hi!")]);
        assert_eq!(home.selected_suggestion(), Some(&suggestion("Friendly", "Hi!")));
    }

    #[test]
    fn failure_keeps_previous_suggestions() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        let previous = vec![suggestion("Witty", "Only if you bring snacks")];
        home.suggestions = previous.clone();
        home.message.insert_str("hello");
        home.begin_submit();

        home.finish_submit(Err(ApiError::Server {
            status: 500,
            body: String::new(),
        }));

        assert!(!home.pending);
        assert_eq!(home.suggestions, previous);
        assert!(home.notice.is_some());
    }

    #[test]
    fn tone_stays_in_range() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        for _ in 0..10 {
            home.raise_tone();
        }
        assert_eq!(home.tone.value(), ToneLevel::MAX);
        for _ in 0..10 {
            home.lower_tone();
        }
        assert_eq!(home.tone.value(), ToneLevel::MIN);
    }

    #[test]
    fn perspective_selection_is_exclusive() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        home.set_perspective(Perspective::Female);
        assert_eq!(home.perspective, Perspective::Female);
        home.toggle_perspective();
        assert_eq!(home.perspective, Perspective::Male);
    }

    #[test]
    fn text_input_handles_multibyte() {
        let mut input = TextInput::default();
        input.insert_str("héllo");
        input.move_left();
        input.backspace();
        assert_eq!(input.value, "hélo");
        input.move_home();
        input.delete();
        assert_eq!(input.value, "élo");
        input.move_end();
        input.insert_char('!');
        assert_eq!(input.value, "élo!");
    }

    #[test]
    fn cursor_line_col_tracks_newlines() {
        let mut input = TextInput::default();
        input.insert_str("hey\nyou");
        assert_eq!(input.cursor_line_col(), (1, 3));
        input.move_home();
        assert_eq!(input.cursor_line_col(), (0, 0));
    }

    #[test]
    fn cursor_column_counts_wide_characters() {
        let mut input = TextInput::default();
        input.insert_str("你好");
        assert_eq!(input.cursor_line_col(), (0, 4));

        input.insert_str("\nhé");
        assert_eq!(input.cursor_line_col(), (1, 2));

        input.move_left();
        assert_eq!(input.cursor_line_col(), (1, 1));
    }

    #[test]
    fn suggestion_nav_clamps() {
        let mut home = HomeState::new(Perspective::Male, ToneLevel::default());
        home.finish_submit(Ok(vec![suggestion("A", "a"), suggestion("B", "b")]));
        home.suggestion_nav_down();
        home.suggestion_nav_down();
        assert_eq!(home.suggestion_state.selected(), Some(1));
        home.suggestion_nav_up();
        home.suggestion_nav_up();
        assert_eq!(home.suggestion_state.selected(), Some(0));
    }

    #[test]
    fn fresh_app_starts_at_onboarding() {
        let app = test_app();
        assert_eq!(app.route(), Route::Onboarding);
    }

    #[test]
    fn onboarding_then_login_reaches_home() {
        let mut app = test_app();
        app.complete_onboarding();
        assert_eq!(app.route(), Route::Auth);
        app.log_in();
        assert_eq!(app.route(), Route::Main(Tab::Home));
        app.select_tab(Tab::Settings);
        assert_eq!(app.route(), Route::Main(Tab::Settings));
    }

    #[test]
    fn login_before_onboarding_does_not_skip_auth() {
        let mut app = test_app();
        app.log_in();
        assert_eq!(app.route(), Route::Onboarding);
        assert!(!app.session.is_authenticated);

        app.complete_onboarding();
        assert_eq!(app.route(), Route::Auth);
        assert!(app.session.has_completed_onboarding);
        assert!(!app.session.is_authenticated);
    }

    #[test]
    fn onboarding_again_from_main_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            has_completed_onboarding: true,
            ..Config::new()
        };
        let mut app = App::new(&config, Some(path.clone()), Theme::default());
        app.log_in();
        app.select_tab(Tab::History);

        app.complete_onboarding();

        assert_eq!(app.route(), Route::Main(Tab::History));
        assert!(!path.exists());
    }

    #[test]
    fn onboarding_keeps_an_unreadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{"theme": "mono", "default_tone": 0}"#;
        std::fs::write(&path, original).unwrap();
        let mut app = App::new(&Config::new(), Some(path.clone()), Theme::default());

        app.complete_onboarding();

        assert_eq!(app.route(), Route::Auth);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn onboarding_is_saved_to_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = App::new(&Config::new(), Some(path.clone()), Theme::default());

        app.complete_onboarding();

        assert!(Config::load_from(&path).unwrap().has_completed_onboarding);
    }

    #[test]
    fn config_defaults_seed_home() {
        let config = Config {
            default_perspective: Some(Perspective::Female),
            default_tone: Some(ToneLevel::new(1).unwrap()),
            ..Config::new()
        };
        let app = App::new(&config, None, Theme::default());
        assert_eq!(app.home.perspective, Perspective::Female);
        assert_eq!(app.home.tone.value(), 1);
    }

    #[tokio::test]
    async fn submit_spawns_once_while_pending() {
        let mut app = test_app();
        assert!(!app.submit());
        assert!(app.generate_task.is_none());

        app.home.message.insert_str("hello");
        assert!(app.submit());
        assert!(!app.submit());

        // Nothing listens on the discard port, so the task fails quickly
        if let Some(task) = app.generate_task.as_ref() {
            while !task.is_finished() {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        }
        app.poll_generation().await;

        assert!(!app.home.pending);
        assert!(app.generate_task.is_none());
        assert!(app.home.suggestions.is_empty());
        assert!(app.home.notice.is_some());
    }
}
