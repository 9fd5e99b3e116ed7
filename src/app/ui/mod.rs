mod form;

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{Overlay, WizardApp};
use crate::draft::DraftStatus;
use crate::ui::Layout;
use crate::vim::VimMode;

/// Draw the whole wizard screen
pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    let layout = Layout::new(area);
    draw_header(frame, layout.header, app);
    form::draw_progress(frame, layout.progress, app);
    form::draw_step(frame, layout.content, app);
    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);

    match app.overlay {
        Overlay::None => {}
        Overlay::Help => draw_help(frame, app),
        Overlay::ConfirmQuit => draw_confirm(frame, app, "Quit", "Leave without submitting?"),
        Overlay::ConfirmSubmit => draw_confirm(frame, app, "Submit", "Submit all steps now?"),
        Overlay::Submitted => draw_submitted(frame, app),
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mut title = format!(" {} | {} ", app.title, app.flow.title);
    if app.dryrun {
        title.push_str("[dry run] ");
    }
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    // Save status is a passive indicator, never a popup
    let (text, style) = match &app.draft_status {
        DraftStatus::Idle => (String::new(), app.theme.muted_style()),
        DraftStatus::Saving => ("Saving draft... ".to_string(), app.theme.muted_style()),
        DraftStatus::Saved(id) => (format!("[Draft saved: {id}] "), app.theme.secondary_style()),
        DraftStatus::Failed(_) => ("[Draft not saved] ".to_string(), app.theme.error_style()),
    };
    frame.render_widget(Paragraph::new(text).style(style).alignment(Alignment::Right), area);
}

fn draw_message(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let (title, border_style, text) = match (&app.message, &app.draft_status) {
        (Some(msg), _) if msg.is_error => (" Error ", app.theme.error_style(), msg.text.clone()),
        (Some(msg), _) => (" Info ", app.theme.secondary_style(), msg.text.clone()),
        (None, DraftStatus::Failed(reason)) => (" Draft ", app.theme.error_style(), reason.clone()),
        (None, _) if app.is_loading() => (
            " Info ",
            app.theme.secondary_style(),
            format!("{} Loading step data...", app.spinner_char()),
        ),
        (None, _) => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Line::from(Span::styled(text, app.theme.style())))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    frame.render_widget(Clear, area);

    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(mode_name));

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let completed = app.controller.completed_count();
    let total = app.controller.step_count();
    let right_text = if app.status_bar.right_hint.is_empty() {
        format!("{completed}/{total} ")
    } else {
        format!("{completed}/{total}  {} ", app.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_confirm(frame: &mut Frame, app: &WizardApp, title: &str, message: &str) {
    let width = 44.min(frame.area().width.saturating_sub(4));
    let area = Layout::centered_box(frame.area(), width, 7);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {title} "));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.height < 4 {
        return;
    }

    frame.render_widget(
        Paragraph::new(message)
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

fn draw_submitted(frame: &mut Frame, app: &WizardApp) {
    let width = 44.min(frame.area().width.saturating_sub(4));
    let area = Layout::centered_box(frame.area(), width, 6);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.success_style())
        .title(" Submitted ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled(
            format!("{} submitted", app.flow.title),
            app.theme.success_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press Enter to exit", app.theme.muted_style())),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_help(frame: &mut Frame, app: &WizardApp) {
    let width = 60.min(frame.area().width.saturating_sub(4));
    let height = 24.min(frame.area().height.saturating_sub(2));
    let area = Layout::centered_box(frame.area(), width, height);

    let help_text = [
        "",
        "Navigation:",
        "",
        "  j/k            Next / previous field",
        "  n/p            Next / previous step",
        "  h/l            Previous / next section",
        "  1-9            Jump to step",
        "  s              Save draft",
        "",
        "Vim Modes:",
        "",
        "  i / Enter      Edit field",
        "  Esc            Return to normal",
        "  :              Command mode",
        "",
        "Commands:",
        "  :next :prev :goto <step> :section <key>",
        "  :save :review :submit :help :q",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}
