use ratatui::style::{Color, Modifier, Style};

use crate::wizard::{BadgeStyle, SectionStatus};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Yellow,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::Red,
            success: Color::Green,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn mode_style(&self, mode: &str) -> Style {
        let color = match mode {
            "NORMAL" => self.secondary,
            "INSERT" => self.success,
            "COMMAND" => self.primary,
            _ => self.foreground,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn badge_style(&self, badge: BadgeStyle) -> Style {
        match badge {
            BadgeStyle::Done => self.success_style(),
            BadgeStyle::Active => self.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            BadgeStyle::Pending => self.muted_style(),
        }
    }

    pub fn section_style(&self, status: SectionStatus) -> Style {
        match status {
            SectionStatus::Complete => self.success_style(),
            SectionStatus::Active => self.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            SectionStatus::Incomplete => self.style(),
        }
    }

    /// Buttons stay visible when disabled, just dimmed
    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            self.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            self.muted_style().add_modifier(Modifier::REVERSED)
        }
    }
}
