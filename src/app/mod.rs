mod overlay;
mod status_bar;
pub mod ui;

pub use overlay::Overlay;
pub use status_bar::StatusBarState;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::draft::{Draft, DraftOutcome, DraftStatus};
use crate::flow::FlowDefinition;
use crate::form::StepForm;
use crate::prefetch::PrefetchOutcome;
use crate::ui::Theme;
use crate::vim::{parse_command, Command, InputBuffer, ModeAction, VimMode};
use crate::wizard::{
    FormValues, PrefetchTracker, RequestTicket, SectionDirection, StepId, StepSignal, WizardController,
    WizardError,
};

/// Work the event loop has to do on the app's behalf
#[derive(Debug)]
pub enum WizardAction {
    SaveDraft(Draft),
    Prefetch(RequestTicket),
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Terminal front-end state for one flow
pub struct WizardApp {
    pub title: String,
    pub theme: Theme,
    pub flow: FlowDefinition,
    pub controller: WizardController,
    pub forms: Vec<StepForm>,
    pub session: String,
    pub dryrun: bool,

    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,
    /// Index into [`WizardApp::visible_fields`]
    pub field_cursor: usize,

    pub overlay: Overlay,
    pub message: Option<Message>,
    pub draft_status: DraftStatus,
    pub status_bar: StatusBarState,
    pub should_exit: bool,

    prefetch: PrefetchTracker,
    prefetched: Vec<bool>,
    draft_revision: u64,
    spinner_frame: usize,
}

impl WizardApp {
    pub fn new(title: &str, flow: FlowDefinition, dryrun: bool) -> Result<Self, WizardError> {
        let controller = WizardController::new(flow.wizard_steps())?;
        let forms = flow.forms();
        let prefetched = vec![false; forms.len()];

        let mut app = Self {
            title: title.to_string(),
            theme: Theme::default(),
            controller,
            forms,
            session: chrono::Local::now().format("%Y%m%d-%H%M%S").to_string(),
            dryrun,
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            field_cursor: 0,
            overlay: Overlay::None,
            message: None,
            draft_status: DraftStatus::Idle,
            status_bar: StatusBarState::default(),
            should_exit: false,
            prefetch: PrefetchTracker::new(),
            prefetched,
            draft_revision: 0,
            spinner_frame: 0,
            flow,
        };
        app.update_status_bar();
        Ok(app)
    }

    /// Publish every step's initial state and kick off the first prefetch
    pub fn start(&mut self) -> Option<WizardAction> {
        for idx in 0..self.forms.len() {
            self.publish(idx);
        }
        info!(flow = self.flow.id.as_str(), session = self.session.as_str(), "Wizard started");
        self.enter_step()
    }

    pub fn current_form(&self) -> &StepForm {
        &self.forms[self.controller.current_index()]
    }

    pub fn current_values(&self) -> FormValues {
        self.current_form().values()
    }

    pub fn is_loading(&self) -> bool {
        self.prefetch.is_loading(&self.controller.current_step().id)
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Form field indices shown for the current step; tabbed steps only
    /// show the active section's fields
    pub fn visible_fields(&self) -> Vec<usize> {
        let form = self.current_form();
        match self.controller.sections() {
            Some(nav) => nav
                .current()
                .fields
                .iter()
                .filter_map(|key| form.index_of(key))
                .collect(),
            None => (0..form.len()).collect(),
        }
    }

    pub fn focused_field(&self) -> Option<usize> {
        self.visible_fields().get(self.field_cursor).copied()
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message { text, is_error: true });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message { text, is_error: false });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if self.message.is_some() && self.vim_mode != VimMode::Insert {
            self.message = None;
        }

        let result = if self.overlay.is_open() {
            self.handle_overlay_key(key);
            None
        } else {
            match self.vim_mode {
                VimMode::Normal => self.handle_normal_mode(key),
                VimMode::Insert => {
                    self.handle_insert_mode(key);
                    None
                }
                VimMode::Command => self.handle_command_mode(key),
            }
        };

        self.update_status_bar();
        result
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match (self.overlay, key.code) {
            (Overlay::Help, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter) => {
                self.overlay.close();
            }
            (Overlay::ConfirmQuit, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) => {
                self.should_exit = true;
                self.overlay.close();
            }
            (Overlay::ConfirmSubmit, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) => {
                self.overlay.close();
                self.submit();
            }
            (Overlay::ConfirmQuit | Overlay::ConfirmSubmit, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) => {
                self.overlay.close();
            }
            (Overlay::Submitted, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) => {
                self.should_exit = true;
            }
            _ => {}
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.move_field(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.move_field(-1),
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
                if self.focused_field().is_some() && !self.controller.is_submitted() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
                }
            }
            KeyCode::Char('n') => return self.go_next(),
            KeyCode::Char('p') => return self.go_previous(),
            KeyCode::Char('h') | KeyCode::Left => self.adjacent_section(SectionDirection::Prev),
            KeyCode::Char('l') | KeyCode::Right => self.adjacent_section(SectionDirection::Next),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let idx = c as usize - '1' as usize;
                if let Some(step) = self.controller.steps().get(idx) {
                    let id = step.id.to_string();
                    return self.go_to(&id);
                }
            }
            KeyCode::Char('s') => return self.save_draft(),
            KeyCode::Char('?') | KeyCode::F(1) => self.overlay.open(Overlay::Help),
            KeyCode::Char('q') | KeyCode::Esc => self.overlay.open(Overlay::ConfirmQuit),
            _ => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                if self.field_cursor + 1 < self.visible_fields().len() {
                    self.field_cursor += 1;
                } else {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                }
            }
            KeyCode::Tab => self.move_field(1),
            KeyCode::BackTab => self.move_field(-1),
            KeyCode::Backspace => self.edit(|buf| {
                buf.delete_back();
            }),
            KeyCode::Delete => self.edit(|buf| {
                buf.delete_forward();
            }),
            KeyCode::Left => self.edit(InputBuffer::move_left),
            KeyCode::Right => self.edit(InputBuffer::move_right),
            KeyCode::Home => self.edit(InputBuffer::move_start),
            KeyCode::End => self.edit(InputBuffer::move_end),
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
                'u' => self.edit(InputBuffer::clear),
                'a' => self.edit(InputBuffer::move_start),
                'e' => self.edit(InputBuffer::move_end),
                _ => {}
            },
            KeyCode::Char(c) => self.edit(|buf| buf.insert(c)),
            _ => {}
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => self.command_buffer.insert(c),
            _ => {}
        }
        None
    }

    fn execute_command(&mut self, input: &str) -> Option<WizardAction> {
        let command = match parse_command(input) {
            Ok(command) => command,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };

        match command {
            Command::Next => return self.go_next(),
            Command::Prev => return self.go_previous(),
            Command::Goto(id) => return self.go_to(&id),
            Command::Section(key) => {
                if let Err(e) = self.controller.select_section(&key) {
                    self.set_error(e.to_string());
                } else {
                    self.field_cursor = 0;
                }
            }
            Command::Save => return self.save_draft(),
            Command::Review => {
                if self.controller.is_last_step() || self.controller.is_review_mode() {
                    self.controller.enter_review();
                    self.set_info("Review mode: every step is reachable".to_string());
                } else {
                    self.set_error("Reach the last step before reviewing".to_string());
                }
            }
            Command::Submit => self.overlay.open(Overlay::ConfirmSubmit),
            Command::Help => self.overlay.open(Overlay::Help),
            Command::Quit => self.overlay.open(Overlay::ConfirmQuit),
        }
        None
    }

    fn move_field(&mut self, delta: isize) {
        let count = self.visible_fields().len();
        if count == 0 {
            return;
        }
        self.field_cursor = self
            .field_cursor
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    /// Apply an edit to the focused buffer, then re-validate the step
    fn edit(&mut self, f: impl FnOnce(&mut InputBuffer)) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let idx = self.controller.current_index();
        if let Some(buf) = self.forms[idx].buffer_mut(field) {
            f(buf);
        }
        self.publish(idx);
    }

    /// Push the step's validation result to the controller
    fn publish(&mut self, idx: usize) {
        let report = self.forms[idx].validate();
        if let Err(e) = StepSignal::publish(&mut self.controller, &report, idx) {
            warn!("Failed to publish step state: {e}");
        }
    }

    fn go_next(&mut self) -> Option<WizardAction> {
        let result = self.controller.go_next();
        self.after_navigation(result)
    }

    fn go_previous(&mut self) -> Option<WizardAction> {
        let result = self.controller.go_previous();
        self.after_navigation(result)
    }

    fn go_to(&mut self, id: &str) -> Option<WizardAction> {
        let before = self.controller.current_index();
        let result = self.controller.go_to(id);
        if result.is_ok() && before == self.controller.current_index() {
            return None;
        }
        self.after_navigation(result)
    }

    fn after_navigation(&mut self, result: Result<(), WizardError>) -> Option<WizardAction> {
        match result {
            Ok(()) => self.enter_step(),
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// Reset per-step UI state and start a prefetch if the step wants one
    fn enter_step(&mut self) -> Option<WizardAction> {
        self.field_cursor = 0;
        self.vim_mode = VimMode::Normal;
        self.prefetch.cancel();

        let idx = self.controller.current_index();
        let wants_prefetch = self.flow.steps.get(idx).is_some_and(|s| s.prefetch);
        if !wants_prefetch || self.prefetched[idx] || self.forms[idx].is_dirty() {
            return None;
        }

        let ticket = self.prefetch.issue(&self.controller.current_step().id);
        debug!(step = ticket.step.as_str(), generation = ticket.generation, "Prefetch issued");
        Some(WizardAction::Prefetch(ticket))
    }

    fn adjacent_section(&mut self, direction: SectionDirection) {
        let before = self.controller.current_section_key().map(str::to_string);
        self.controller.go_to_adjacent_section(direction);
        if self.controller.current_section_key().map(str::to_string) != before {
            self.field_cursor = 0;
        }
    }

    fn submit(&mut self) {
        match self.controller.submit() {
            Ok(()) => {
                self.vim_mode = VimMode::Normal;
                self.overlay.open(Overlay::Submitted);
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Snapshot the session for the draft store. Masked fields stay out of drafts.
    pub fn capture_draft(&self) -> Draft {
        let steps: BTreeMap<StepId, FormValues> = self
            .controller
            .steps()
            .iter()
            .zip(&self.forms)
            .map(|(step, form)| {
                let mut values = form.values();
                for field in form.fields().iter().filter(|f| f.masked) {
                    values.remove(&field.key);
                }
                (step.id.clone(), values)
            })
            .collect();
        Draft::capture(&self.flow.id, &self.session, self.draft_revision, &self.controller, steps)
    }

    fn save_draft(&mut self) -> Option<WizardAction> {
        self.draft_status = DraftStatus::Saving;
        self.draft_revision += 1;
        Some(WizardAction::SaveDraft(self.capture_draft()))
    }

    pub fn handle_draft_outcome(&mut self, outcome: DraftOutcome) {
        self.draft_status = match outcome.result {
            Ok(id) => DraftStatus::Saved(id),
            Err(e) => DraftStatus::Failed(e.to_string()),
        };
    }

    /// Drop the outstanding prefetch, e.g. when no source is configured
    pub fn cancel_prefetch(&mut self) {
        self.prefetch.cancel();
        self.update_status_bar();
    }

    /// Apply prefill values if the request is still current and the user
    /// has not started editing the step
    pub fn handle_prefetch_outcome(&mut self, outcome: PrefetchOutcome) {
        let current = self.controller.current_step().id.clone();
        if !self.prefetch.accept(&outcome.ticket, &current) {
            debug!(
                step = outcome.ticket.step.as_str(),
                generation = outcome.ticket.generation,
                "Discarding stale prefetch result"
            );
            return;
        }

        let idx = self.controller.current_index();
        match outcome.result {
            Ok(values) => {
                if self.forms[idx].is_dirty() {
                    debug!(step = current.as_str(), "Step already edited, prefill skipped");
                    return;
                }
                self.forms[idx].prefill(&values);
                self.prefetched[idx] = true;
                self.publish(idx);
                self.set_info(format!("Loaded data for {}", self.controller.current_step().label));
            }
            Err(e) => {
                warn!(step = current.as_str(), "Prefetch failed: {e}");
                self.set_error(format!("Could not load data: {e}"));
            }
        }
        self.update_status_bar();
    }

    fn update_status_bar(&mut self) {
        self.status_bar = if self.controller.is_submitted() {
            StatusBarState::submitted()
        } else if self.overlay.is_open() {
            StatusBarState::overlay()
        } else {
            match self.vim_mode {
                VimMode::Insert => StatusBarState::form_insert(),
                VimMode::Command => StatusBarState::command_mode(),
                VimMode::Normal if self.is_loading() => StatusBarState::loading(),
                VimMode::Normal if self.controller.is_last_step() => StatusBarState::last_step(),
                VimMode::Normal => StatusBarState::form_normal(self.controller.sections().is_some()),
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{booking, vehicle_onboarding};
    use crate::wizard::{FieldValue, SectionStatus};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut WizardApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Fill the focused field and move to the next one, from normal mode
    fn fill(app: &mut WizardApp, text: &str) {
        app.handle_key(key(KeyCode::Char('i')));
        type_text(app, text);
        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('j')));
    }

    fn vehicle_app() -> WizardApp {
        let mut app = WizardApp::new("RideOps", vehicle_onboarding(), true).unwrap();
        assert!(app.start().is_none());
        app
    }

    #[test]
    fn next_is_refused_until_step_is_filled() {
        let mut app = vehicle_app();
        assert!(app.handle_key(key(KeyCode::Char('n'))).is_none());
        assert_eq!(app.controller.current_index(), 0);
        assert!(app.message.as_ref().is_some_and(|m| m.is_error));

        for text in ["Toyota", "Corolla", "2021", "KA-01-1234"] {
            fill(&mut app, text);
        }
        assert!(app.controller.is_next_enabled());
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.controller.current_index(), 1);
        assert_eq!(app.field_cursor, 0);
    }

    #[test]
    fn typing_publishes_on_every_change() {
        let mut app = vehicle_app();
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.controller.state(0).is_dirty);
        app.handle_key(key(KeyCode::Backspace));
        assert!(!app.controller.state(0).is_dirty);
    }

    #[test]
    fn sections_limit_visible_fields() {
        let mut app = vehicle_app();
        app.controller.enter_review();
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.controller.current_step().id.as_str(), "availability-pricing");
        assert_eq!(app.controller.current_section_key(), Some("advance-notice"));
        assert_eq!(app.visible_fields().len(), 1);

        fill(&mut app, "1 day");
        let values = app.current_values();
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.controller.current_section_key(), Some("trip-duration"));
        assert_eq!(app.visible_fields().len(), 2);
        assert_eq!(
            app.controller.section_status("advance-notice", &values).unwrap(),
            SectionStatus::Complete
        );
    }

    #[test]
    fn quit_goes_through_confirmation() {
        let mut app = vehicle_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(app.overlay, Overlay::ConfirmQuit);
        app.handle_key(key(KeyCode::Char('n')));
        assert!(!app.should_exit);
        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(key(KeyCode::Char('y')));
        assert!(app.should_exit);
    }

    #[test]
    fn goto_command_reports_unreachable_step() {
        let mut app = vehicle_app();
        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "goto summary");
        app.handle_key(key(KeyCode::Enter));
        let msg = app.message.as_ref().unwrap();
        assert!(msg.is_error);
        assert!(msg.text.contains("not reachable"));
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn save_draft_leaves_wizard_state_alone() {
        let mut app = vehicle_app();
        let action = app.handle_key(key(KeyCode::Char('s')));
        assert!(matches!(action, Some(WizardAction::SaveDraft(_))));
        assert_eq!(app.draft_status, DraftStatus::Saving);
        assert_eq!(app.controller.current_index(), 0);
        assert!(!app.overlay.is_open());

        // Each save is newer than the one before it
        let Some(WizardAction::SaveDraft(first)) = action else { unreachable!() };
        let Some(WizardAction::SaveDraft(second)) = app.handle_key(key(KeyCode::Char('s'))) else {
            panic!("second save should produce a draft");
        };
        assert!(second.revision > first.revision);
    }

    #[test]
    fn masked_fields_are_not_drafted() {
        let mut app = WizardApp::new("RideOps", booking(), true).unwrap();
        let idx = app.controller.index_of("payment").unwrap();
        let card = app.forms[idx].index_of("card_number").unwrap();
        app.forms[idx].buffer_mut(card).unwrap().set("4111111111111111");

        let draft = app.capture_draft();
        let payment = &draft.steps[&StepId::new("payment")];
        assert!(!payment.contains_key("card_number"));
        assert!(payment.contains_key("card_holder"));
    }

    #[test]
    fn prefetch_is_applied_only_to_the_step_that_asked() {
        let mut app = WizardApp::new("RideOps", booking(), true).unwrap();
        let Some(WizardAction::Prefetch(ticket)) = app.start() else {
            panic!("ride details should prefetch");
        };
        assert!(app.is_loading());

        let values = FormValues::from([("customer_id".to_string(), FieldValue::Text("C-9".to_string()))]);
        app.handle_prefetch_outcome(PrefetchOutcome {
            ticket,
            result: Ok(values.clone()),
        });
        assert_eq!(app.forms[0].buffer(0).unwrap().content(), "C-9");
        assert!(!app.forms[0].is_dirty());

        // A result arriving after the user left is dropped
        let mut app = WizardApp::new("RideOps", booking(), true).unwrap();
        let Some(WizardAction::Prefetch(ticket)) = app.start() else {
            panic!("ride details should prefetch");
        };
        app.controller.enter_review();
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_prefetch_outcome(PrefetchOutcome {
            ticket,
            result: Ok(values),
        });
        assert_eq!(app.forms[0].buffer(0).unwrap().content(), "");
        assert_eq!(app.forms[1].buffer(0).unwrap().content(), "");
    }

    #[test]
    fn submit_requires_confirmation_and_completeness() {
        let mut app = vehicle_app();
        app.handle_key(key(KeyCode::Char(':')));
        type_text(&mut app, "submit");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.overlay, Overlay::ConfirmSubmit);

        app.handle_key(key(KeyCode::Char('y')));
        assert!(!app.controller.is_submitted());
        assert!(app.message.as_ref().unwrap().text.contains("incomplete"));
    }
}
