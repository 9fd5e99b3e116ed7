use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Fixed screen regions of the wizard
pub struct Layout {
    pub full: Rect,
    pub header: Rect,
    pub progress: Rect,
    pub content: Rect,
    pub message: Rect,
    pub status: Rect,
}

impl Layout {
    pub fn new(area: Rect) -> Self {
        // Message space is always reserved so the form never jumps
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(3), // Progress badges
                Constraint::Min(8),    // Step content
                Constraint::Length(3), // Message panel
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            full: area,
            header: chunks[0],
            progress: chunks[1],
            content: chunks[2],
            message: chunks[3],
            status: chunks[4],
        }
    }

    /// Sidebar for section tabs and the form next to it
    pub fn split_sections(area: Rect) -> (Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
            .split(area);
        (chunks[0], chunks[1])
    }

    pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let horizontal = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(width),
                Constraint::Fill(1),
            ])
            .split(area);

        let vertical = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height),
                Constraint::Fill(1),
            ])
            .split(horizontal[1]);

        vertical[1]
    }
}
