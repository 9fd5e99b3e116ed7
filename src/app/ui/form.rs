use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::WizardApp;
use crate::ui::Layout;
use crate::vim::{InputBuffer, VimMode};
use crate::wizard::{BadgeStyle, Connector, SectionStatus};

const LABEL_WIDTH: u16 = 20;

/// Numbered badges joined by connectors: `(1) Basic Info ━━ (2) Photos ── (3) ...`
pub(super) fn draw_progress(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let model = app.controller.progress();

    let mut spans = Vec::new();
    for (idx, badge) in model.badges.iter().enumerate() {
        if idx > 0 {
            let (text, style) = match model.connectors[idx - 1] {
                Connector::Filled => (" ━━ ", app.theme.success_style()),
                Connector::Empty => (" ── ", app.theme.muted_style()),
            };
            spans.push(Span::styled(text, style));
        }

        let marker = match badge.style {
            BadgeStyle::Done => "✓".to_string(),
            _ => badge.number.to_string(),
        };
        spans.push(Span::styled(
            format!("({marker}) {}", badge.label),
            app.theme.badge_style(badge.style),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(app.theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1));
}

pub(super) fn draw_step(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let step = app.controller.current_step();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(format!(" {} ", step.label))
        .title_style(app.theme.primary_style().add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if app.controller.sections().is_some() {
        let (sidebar, form) = Layout::split_sections(inner);
        draw_sections(frame, sidebar, app);
        draw_fields(frame, form, app);
    } else {
        draw_fields(frame, inner, app);
    }
}

fn draw_sections(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let Some(nav) = app.controller.sections() else {
        return;
    };
    let values = app.current_values();

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(app.theme.border_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (idx, section) in nav.sections().iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }
        let status = app
            .controller
            .section_status(&section.key, &values)
            .unwrap_or(SectionStatus::Incomplete);
        let marker = match status {
            SectionStatus::Complete => "[x]",
            SectionStatus::Active => "[>]",
            SectionStatus::Incomplete => "[ ]",
        };

        let line_area = Rect::new(inner.x, inner.y + idx as u16, inner.width, 1);
        frame.render_widget(
            Paragraph::new(format!(" {marker} {}", section.label)).style(app.theme.section_style(status)),
            line_area,
        );
    }
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &WizardApp) {
    if area.height < 4 || area.width < 30 {
        return;
    }

    let form = app.current_form();
    let focused = app.focused_field();
    let mut y = area.y + 1;

    if app.is_loading() {
        frame.render_widget(
            Paragraph::new(format!("{} Loading...", app.spinner_char())).style(app.theme.muted_style()),
            Rect::new(area.x + 2, y, area.width - 4, 1),
        );
        y += 2;
    }

    // Keep two rows for the buttons
    let fields_bottom = area.y + area.height.saturating_sub(3);
    for idx in app.visible_fields() {
        if y >= fields_bottom {
            break;
        }
        let (Some(spec), Some(buffer)) = (form.fields().get(idx), form.buffer(idx)) else {
            continue;
        };
        let is_focused = focused == Some(idx);
        let is_insert = is_focused && app.vim_mode == VimMode::Insert;

        let required = if spec.required { " *" } else { "" };
        let label_style = if is_focused {
            app.theme.primary_style()
        } else {
            app.theme.style()
        };
        frame.render_widget(
            Paragraph::new(format!("{}{required}", spec.label)).style(label_style),
            Rect::new(area.x + 2, y, LABEL_WIDTH, 1),
        );

        let field_x = area.x + 2 + LABEL_WIDTH;
        let field_width = area.width.saturating_sub(LABEL_WIDTH + 4);
        let field_area = Rect::new(field_x, y, field_width, 1);
        draw_buffer(frame, field_area, app, buffer, is_focused, is_insert);

        // Errors only once the user has touched the step
        if app.controller.current_state().is_dirty {
            if let Some(error) = form.error_for(&spec.key) {
                if y + 1 < fields_bottom {
                    frame.render_widget(
                        Paragraph::new(error).style(app.theme.error_style()),
                        Rect::new(field_x, y + 1, field_width, 1),
                    );
                }
            }
        }
        y += 2;
    }

    draw_buttons(frame, Rect::new(area.x + 2, area.y + area.height - 2, area.width - 4, 1), app);
}

fn draw_buffer(frame: &mut Frame, area: Rect, app: &WizardApp, buffer: &InputBuffer, is_focused: bool, is_insert: bool) {
    let display = buffer.display('*');
    let cursor = buffer.cursor();

    let line = if is_insert {
        let before: String = display.chars().take(cursor).collect();
        let after: String = display.chars().skip(cursor).collect();
        Line::from(vec![
            Span::styled(before, app.theme.style()),
            Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(after, app.theme.style()),
        ])
    } else if is_focused {
        let mut spans: Vec<Span> = display
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let style = if i == cursor {
                    app.theme.style().add_modifier(Modifier::REVERSED)
                } else {
                    app.theme.style()
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();
        if cursor >= buffer.len() {
            spans.push(Span::styled(" ", app.theme.style().add_modifier(Modifier::REVERSED)));
        }
        Line::from(spans)
    } else if display.is_empty() {
        Line::from(Span::styled("(empty)", app.theme.muted_style()))
    } else {
        Line::from(Span::styled(display, app.theme.muted_style()))
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Previous and Next are always drawn; a disabled button is dimmed, not hidden
fn draw_buttons(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let controller = &app.controller;
    let mut spans = vec![
        Span::styled(" < Previous ", app.theme.button_style(controller.is_previous_enabled())),
        Span::raw("  "),
    ];

    if controller.is_last_step() {
        let ready = controller.completed_count() == controller.step_count() && !controller.is_submitted();
        spans.push(Span::styled(" :submit ", app.theme.button_style(ready)));
    } else {
        spans.push(Span::styled(" Next > ", app.theme.button_style(controller.is_next_enabled())));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(" [s] Save Draft ", app.theme.button_style(!controller.is_submitted())));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
