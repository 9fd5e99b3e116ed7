use tracing::{debug, info};

use super::error::{Result, WizardError};
use super::section::{SectionDirection, SectionNavigator, SectionStatus};
use super::signal::{FormValues, StepState};
use super::step::{Step, StepId};

/// Lifecycle of a wizard instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardPhase {
    #[default]
    InProgress,
    Submitted,
}

/// Sequences steps, gates navigation on step completeness and aggregates
/// per-step state for the progress indicator.
///
/// Steps own their field values and only push a [`StepState`] upward through
/// [`WizardController::report_step_state`]; the controller never reads form
/// values except to evaluate section status on request.
#[derive(Debug, Clone)]
pub struct WizardController {
    steps: Vec<Step>,
    states: Vec<StepState>,
    visited: Vec<bool>,
    current: usize,
    max_reached: usize,
    sections: Option<SectionNavigator>,
    review: bool,
    phase: WizardPhase,
}

impl WizardController {
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        let Some(first) = steps.first() else {
            return Err(WizardError::Empty);
        };
        let sections = SectionNavigator::new(&first.sections);
        let mut visited = vec![false; steps.len()];
        visited[0] = true;

        debug!("Wizard initialized with {} steps", steps.len());

        Ok(Self {
            states: vec![StepState::default(); steps.len()],
            visited,
            current: 0,
            max_reached: 0,
            sections,
            review: steps.len() == 1,
            phase: WizardPhase::InProgress,
            steps,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Never zero: `new` rejects an empty step list
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step_at(&self, idx: usize) -> Result<&Step> {
        self.steps
            .get(idx)
            .ok_or_else(|| WizardError::UnknownStep(format!("#{idx}")))
    }

    pub fn index_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id.as_str() == step_id)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn state(&self, idx: usize) -> StepState {
        self.states.get(idx).copied().unwrap_or_default()
    }

    pub fn current_state(&self) -> StepState {
        self.states[self.current]
    }

    /// Aggregated completeness, one entry per step
    pub fn completion(&self) -> Vec<bool> {
        self.states.iter().map(|s| s.is_complete).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_complete).count()
    }

    pub fn is_visited(&self, idx: usize) -> bool {
        self.visited.get(idx).copied().unwrap_or(false)
    }

    pub fn visited_ids(&self) -> Vec<&StepId> {
        self.steps
            .iter()
            .zip(&self.visited)
            .filter(|(_, v)| **v)
            .map(|(s, _)| &s.id)
            .collect()
    }

    pub fn max_reached(&self) -> usize {
        self.max_reached
    }

    pub fn is_review_mode(&self) -> bool {
        self.review
    }

    /// Opens every step to `go_to`. Once on, review mode stays on.
    pub fn enter_review(&mut self) {
        if !self.review {
            info!("Wizard entered review mode");
        }
        self.review = true;
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == WizardPhase::Submitted
    }

    /// Record the latest state of a step. Last write wins; never moves the
    /// current step.
    pub fn report_step_state(&mut self, step_id: &str, state: StepState) -> Result<()> {
        let idx = self
            .index_of(step_id)
            .ok_or_else(|| WizardError::UnknownStep(step_id.to_string()))?;

        if self.states[idx] != state {
            debug!(
                step = step_id,
                valid = state.is_valid,
                dirty = state.is_dirty,
                complete = state.is_complete,
                "Step state changed"
            );
            self.states[idx] = state;
        }
        Ok(())
    }

    pub fn is_next_enabled(&self) -> bool {
        !self.is_submitted() && self.states[self.current].is_complete
    }

    pub fn is_previous_enabled(&self) -> bool {
        !self.is_submitted() && self.current > 0
    }

    pub fn go_next(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if !self.states[self.current].is_complete {
            return Err(WizardError::StepIncomplete(self.current_step().id.clone()));
        }
        if self.is_last_step() {
            return Ok(());
        }
        self.move_to(self.current + 1);
        Ok(())
    }

    pub fn go_previous(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        if self.current == 0 {
            return Err(WizardError::AtFirstStep);
        }
        self.move_to(self.current - 1);
        Ok(())
    }

    /// Jump to a step already reached, or one past the frontier when the
    /// frontier step is complete. In review mode every step is open.
    pub fn go_to(&mut self, step_id: &str) -> Result<()> {
        self.ensure_in_progress()?;
        let target = self
            .index_of(step_id)
            .ok_or_else(|| WizardError::UnknownStep(step_id.to_string()))?;

        if !self.review && target > self.max_reached {
            if target > self.max_reached + 1 {
                return Err(WizardError::StepNotYetReachable(self.steps[target].id.clone()));
            }
            if !self.states[self.max_reached].is_complete {
                return Err(WizardError::StepIncomplete(
                    self.steps[self.max_reached].id.clone(),
                ));
            }
        }

        if target != self.current {
            self.move_to(target);
        }
        Ok(())
    }

    /// Succeeds only when every step is complete
    pub fn submit(&mut self) -> Result<()> {
        self.ensure_in_progress()?;
        let incomplete: Vec<StepId> = self
            .steps
            .iter()
            .zip(&self.states)
            .filter(|(_, s)| !s.is_complete)
            .map(|(step, _)| step.id.clone())
            .collect();

        if !incomplete.is_empty() {
            return Err(WizardError::IncompleteWizard(incomplete));
        }

        self.phase = WizardPhase::Submitted;
        info!("Wizard submitted");
        Ok(())
    }

    pub fn sections(&self) -> Option<&SectionNavigator> {
        self.sections.as_ref()
    }

    pub fn current_section_key(&self) -> Option<&str> {
        self.sections.as_ref().map(|nav| nav.current_key())
    }

    pub fn select_section(&mut self, key: &str) -> Result<()> {
        match self.sections.as_mut() {
            Some(nav) => nav.select_section(key),
            None => Err(WizardError::UnknownSection(key.to_string())),
        }
    }

    /// No-op on steps without sections and at either end
    pub fn go_to_adjacent_section(&mut self, direction: SectionDirection) {
        if let Some(nav) = self.sections.as_mut() {
            nav.go_to_adjacent(direction);
        }
    }

    pub fn section_status(&self, key: &str, values: &FormValues) -> Result<SectionStatus> {
        match self.sections.as_ref() {
            Some(nav) => nav.section_status(key, values),
            None => Err(WizardError::UnknownSection(key.to_string())),
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_submitted() {
            Err(WizardError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn move_to(&mut self, idx: usize) {
        let from = self.current;
        self.current = idx;
        self.visited[idx] = true;
        self.max_reached = self.max_reached.max(idx);
        self.sections = SectionNavigator::new(&self.steps[idx].sections);
        if idx + 1 == self.steps.len() {
            self.enter_review();
        }
        info!(
            from = self.steps[from].id.as_str(),
            to = self.steps[idx].id.as_str(),
            "Wizard step changed"
        );
    }
}
