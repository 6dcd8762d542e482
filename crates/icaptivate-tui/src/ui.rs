use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use icaptivate_core::{Perspective, Route, Tab, ToneLevel};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, AuthField, HomeFocus, InputMode, TextInput};
use crate::theme::Theme;

/// Wrap text to fit within a given width, returning multiple lines.
/// Breaks at word boundaries; a word wider than the line is split across lines.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();

            if current_width > 0 && current_width + 1 + word_width <= width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += 1 + word_width;
                continue;
            }

            if current_width > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }

            if word_width <= width {
                current_line.push_str(word);
                current_width = word_width;
                continue;
            }

            // Long URLs and the like
            for c in word.chars() {
                let char_width = c.width().unwrap_or(0);
                if current_width > 0 && current_width + char_width > width {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                current_line.push(c);
                current_width += char_width;
            }
        }

        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// First visible cell so that `pos` stays inside a viewport `len` cells long.
fn scroll_offset(pos: usize, len: u16) -> usize {
    pos.saturating_sub(usize::from(len).saturating_sub(1))
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Centre a `width` x `height` box inside `area`, shrinking it to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.route() {
        Route::Onboarding => render_onboarding(&app.theme, frame, body_area),
        Route::Auth => render_auth(app, frame, body_area),
        Route::Main(Tab::Home) => render_home(app, frame, body_area),
        Route::Main(Tab::History) => {
            render_placeholder(&app.theme, frame, body_area, "History Screen - Coming Soon")
        }
        Route::Main(Tab::Settings) => {
            render_placeholder(&app.theme, frame, body_area, "Settings Screen - Coming Soon")
        }
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(" ICaptivate ", theme.title())];

    if let Route::Main(current) = app.route() {
        for tab in Tab::all() {
            let label = format!(" {} {} ", tab.index() + 1, tab.title());
            let style = if tab == current {
                theme.button(true)
            } else {
                Style::default().fg(theme.text_secondary)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(label, style));
        }
    }

    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), theme.muted()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let key_style = Style::default().bg(theme.border).fg(theme.text);
    let label_style = Style::default().fg(theme.text_secondary);

    let keys: &[(&str, &str)] = match (app.route(), app.input_mode) {
        (Route::Onboarding, _) => &[("Enter", "get started"), ("q", "quit")],
        (Route::Auth, _) => &[("Tab", "field"), ("Enter", "login"), ("Esc", "quit")],
        (Route::Main(Tab::Home), InputMode::Editing) => &[
            ("Enter", "get suggestions"),
            ("Alt+Enter", "new line"),
            ("Esc", "done"),
        ],
        (Route::Main(Tab::Home), InputMode::Normal) => &[
            ("i", "edit"),
            ("p", "perspective"),
            ("-/+", "tone"),
            ("g", "generate"),
            ("j/k", "select"),
            ("c", "copy"),
            ("1-3", "tabs"),
            ("q", "quit"),
        ],
        (Route::Main(_), _) => &[("Tab", "next tab"), ("1-3", "tabs"), ("q", "quit")],
    };

    let mut spans = Vec::new();
    if app.input_mode == InputMode::Editing {
        spans.push(Span::styled(" EDIT ", theme.button(true)));
        spans.push(Span::raw(" "));
    }
    for (key, label) in keys {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    if let Some(notice) = &app.home.notice {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(notice.clone(), Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_onboarding(theme: &Theme, frame: &mut Frame, area: Rect) {
    let box_area = centered_rect(area, 50, 7);

    let text = Text::from(vec![
        Line::from(Span::styled("Welcome to ICaptivate", theme.title())),
        Line::default(),
        Line::from(Span::styled(
            "Your AI communication assistant",
            Style::default().fg(theme.text_secondary),
        )),
        Line::default(),
        Line::default(),
        Line::from(Span::styled("   Get Started   ", theme.button(true))),
    ]);

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), box_area);
}

fn render_auth(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let form_area = centered_rect(area, 50, 11);

    let [title_area, email_area, password_area, button_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(form_area);

    frame.render_widget(
        Paragraph::new(Span::styled("ICaptivate", theme.title())).alignment(Alignment::Center),
        title_area,
    );

    let email_focused = app.auth.field == AuthField::Email;
    let inner_width = email_area.width.saturating_sub(2);

    let email_col = app.auth.email.cursor_line_col().1;
    let email_scroll = scroll_offset(email_col, inner_width);
    render_field(theme, frame, email_area, "Email", &app.auth.email.value, email_focused, email_scroll);

    // One cell per masked character
    let masked = "•".repeat(app.auth.password.value.chars().count());
    let password_col = app.auth.password.cursor;
    let password_scroll = scroll_offset(password_col, inner_width);
    render_field(theme, frame, password_area, "Password", &masked, !email_focused, password_scroll);

    let [_, button_row] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)])
        .areas(button_area);
    frame.render_widget(
        Paragraph::new(Span::styled("     Login     ", theme.button(true)))
            .alignment(Alignment::Center),
        button_row,
    );

    let (col, scroll, active_area) = if email_focused {
        (email_col, email_scroll, email_area)
    } else {
        (password_col, password_scroll, password_area)
    };
    let dx = (col - scroll).min(usize::from(inner_width.saturating_sub(1)));
    frame.set_cursor_position((
        active_area.x.saturating_add(1).saturating_add(saturating_u16(dx)),
        active_area.y.saturating_add(1),
    ));
}

fn render_field(
    theme: &Theme,
    frame: &mut Frame,
    area: Rect,
    placeholder: &str,
    value: &str,
    focused: bool,
    scroll: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused));

    let paragraph = if value.is_empty() {
        Paragraph::new(Span::styled(placeholder.to_string(), theme.muted()))
    } else {
        Paragraph::new(Span::styled(value.to_string(), Style::default().fg(theme.text)))
            .scroll((0, saturating_u16(scroll)))
    };

    frame.render_widget(paragraph.block(block), area);
}

fn render_placeholder(theme: &Theme, frame: &mut Frame, area: Rect, text: &str) {
    let row = centered_rect(area, area.width, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), theme.title())).alignment(Alignment::Center),
        row,
    );
}

fn render_home(app: &mut App, frame: &mut Frame, area: Rect) {
    let [perspective_area, message_area, tone_area, button_area, results_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

    render_perspective_toggle(app, frame, perspective_area);
    render_message_input(app, frame, message_area);
    render_tone(app, frame, tone_area);
    render_generate_button(app, frame, button_area);
    render_results(app, frame, results_area);
}

fn render_perspective_toggle(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let focused = app.home.focus == HomeFocus::Perspective;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let halves = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    for (perspective, half) in Perspective::all().into_iter().zip(halves.iter()) {
        let style = if perspective == app.home.perspective {
            theme.button(true)
        } else {
            Style::default().fg(theme.text_secondary)
        };
        frame.render_widget(
            Paragraph::new(perspective.display_name())
                .style(style)
                .alignment(Alignment::Center),
            *half,
        );
    }
}

fn render_message_input(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::Editing;
    let focused = app.home.focus == HomeFocus::Message || editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
        .title(" Message ");
    let inner = block.inner(area);

    let message: &TextInput = &app.home.message;
    let (line, col) = message.cursor_line_col();

    // Keep the cursor inside the box
    let scroll_y = scroll_offset(line, inner.height);
    let scroll_x = scroll_offset(col, inner.width);

    let paragraph = if message.value.is_empty() {
        Paragraph::new(Span::styled("Enter the message you received...", theme.muted()))
    } else {
        Paragraph::new(message.value.as_str())
            .style(Style::default().fg(theme.text))
            .scroll((saturating_u16(scroll_y), saturating_u16(scroll_x)))
    };
    frame.render_widget(paragraph.block(block), area);

    if editing {
        let dx = (col - scroll_x).min(usize::from(inner.width.saturating_sub(1)));
        let dy = (line - scroll_y).min(usize::from(inner.height.saturating_sub(1)));
        frame.set_cursor_position((
            inner.x.saturating_add(saturating_u16(dx)),
            inner.y.saturating_add(saturating_u16(dy)),
        ));
    }
}

fn render_tone(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let focused = app.home.focus == HomeFocus::Tone;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
        .title(" Response Tone ");

    let current = app.home.tone.value();
    let filled = Style::default().fg(theme.primary);
    let empty = Style::default().fg(theme.border);

    let mut spans = vec![Span::styled("Serious ", theme.muted())];
    for level in ToneLevel::MIN..=ToneLevel::MAX {
        if level > ToneLevel::MIN {
            spans.push(Span::styled("────", if level <= current { filled } else { empty }));
        }
        if level == current {
            spans.push(Span::styled("●", filled.add_modifier(Modifier::BOLD)));
        } else {
            spans.push(Span::styled("·", if level < current { filled } else { empty }));
        }
    }
    spans.push(Span::styled(" Playful", theme.muted()));
    spans.push(Span::styled(
        format!("  {}/{}", app.home.tone.value(), ToneLevel::MAX),
        Style::default().fg(theme.text_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_generate_button(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let label = if app.home.pending {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        format!("  Generating{:<3}  ", dots)
    } else {
        "  Get Response Suggestions  ".to_string()
    };

    frame.render_widget(
        Paragraph::new(Span::styled(label, theme.button(app.home.can_submit())))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let theme = app.theme;

    if app.home.pending {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        let text = Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                format!("Crafting the perfect responses{}", dots),
                Style::default().fg(theme.text_secondary).italic(),
            )),
        ]);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
        return;
    }

    if app.home.suggestions.is_empty() {
        let text = Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                "Enter a message above to get AI-powered response suggestions",
                theme.muted(),
            )),
        ]);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let focused = app.home.focus == HomeFocus::Suggestions;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(focused))
        .title(Span::styled(" Response Suggestions ", theme.title()));

    let content_width = block.inner(area).width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .home
        .suggestions
        .iter()
        .map(|suggestion| {
            let mut lines = vec![Line::from(Span::styled(
                suggestion.kind.clone(),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ))];
            for line in wrap_text_to_width(&suggestion.content, content_width) {
                lines.push(Line::from(Span::styled(line, Style::default().fg(theme.text))));
            }
            lines.push(Line::from(Span::styled("[c] Copy", Style::default().fg(theme.primary))));
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▌ ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, area, &mut app.home.suggestion_state);
}
