//! Colour tokens for the screens, handed to the renderer as a value.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub primary_light: Color,
    pub on_primary: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_tertiary: Color,
    pub border: Color,
    pub error: Color,
}

impl Theme {
    /// The ICaptivate purple palette.
    pub fn brand() -> Self {
        Self {
            primary: Color::Rgb(0x70, 0x47, 0xEB),
            primary_light: Color::Rgb(0xA7, 0x8B, 0xFA),
            on_primary: Color::White,
            text: Color::Rgb(0x1F, 0x29, 0x37),
            text_secondary: Color::Rgb(0x4B, 0x55, 0x63),
            text_tertiary: Color::Rgb(0x9C, 0xA3, 0xAF),
            border: Color::Rgb(0xE5, 0xE7, 0xEB),
            error: Color::Rgb(0xDC, 0x26, 0x26),
        }
    }

    /// Plain ANSI colours for terminals without truecolor.
    pub fn mono() -> Self {
        Self {
            primary: Color::White,
            primary_light: Color::Gray,
            on_primary: Color::Black,
            text: Color::Reset,
            text_secondary: Color::Gray,
            text_tertiary: Color::DarkGray,
            border: Color::DarkGray,
            error: Color::Red,
        }
    }

    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("mono") => Self::mono(),
            _ => Self::brand(),
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_tertiary)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.primary)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Filled button; `enabled = false` renders the washed-out variant.
    pub fn button(&self, enabled: bool) -> Style {
        let bg = if enabled { self.primary } else { self.primary_light };
        Style::default()
            .bg(bg)
            .fg(self.on_primary)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::brand()
    }
}
