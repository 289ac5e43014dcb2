//! Colour tokens for the SDU TUI, with dark and light palettes.
//!
//! # Color Palette
//! - **Accent**: primary highlights, focus, active tab
//! - **Positive**: success banners, found entries
//! - **Negative**: errors, logout
//! - **Warning**: busy indicators, alerts
//! - **Neutral**: secondary info
//! - **Muted**: hints, disabled text

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 200, 255),
            positive: Color::Rgb(0, 220, 128),
            negative: Color::Rgb(255, 80, 100),
            warning: Color::Rgb(255, 160, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(120, 140, 170),
            text_primary: Color::White,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            accent: Color::Rgb(0, 90, 200),
            positive: Color::Rgb(0, 130, 60),
            negative: Color::Rgb(200, 30, 50),
            warning: Color::Rgb(190, 100, 0),
            neutral: Color::Rgb(100, 60, 160),
            muted: Color::Rgb(100, 100, 110),
            text_primary: Color::Black,
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent().add_modifier(Modifier::BOLD)
    }

    pub fn positive(&self) -> Style {
        Style::default().fg(self.positive)
    }

    pub fn negative(&self) -> Style {
        Style::default().fg(self.negative)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn neutral(&self) -> Style {
        Style::default().fg(self.neutral)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn panel_border(&self, active: bool) -> Style {
        if active {
            self.accent()
        } else {
            self.muted()
        }
    }

    /// Focused input rows are reversed so they stay visible in both palettes.
    pub fn focused(&self, focused: bool) -> Style {
        if focused {
            self.accent().add_modifier(Modifier::REVERSED)
        } else {
            self.text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dark() {
        assert_eq!(Theme::default(), Theme::dark());
        assert_eq!(Theme::for_mode(true), Theme::dark());
        assert_eq!(Theme::for_mode(false), Theme::light());
    }

    #[test]
    fn palettes_differ_in_background() {
        assert_ne!(Theme::dark().background, Theme::light().background);
        assert_ne!(Theme::dark().text_primary, Theme::light().text_primary);
    }

    #[test]
    fn focus_style() {
        let theme = Theme::dark();
        assert!(theme.focused(true).add_modifier.contains(Modifier::REVERSED));
        assert_eq!(theme.focused(false), theme.text());
        assert_eq!(theme.panel_border(true), theme.accent());
        assert_eq!(theme.panel_border(false), theme.muted());
    }
}
