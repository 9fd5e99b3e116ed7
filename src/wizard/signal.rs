use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::controller::WizardController;
use super::error::Result;
use super::step::{CompletionPolicy, Step};

/// A form field value. Only two shapes exist: free text and lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Text is filled when its trimmed length is non-zero, a list when non-empty
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

pub type FormValues = BTreeMap<String, FieldValue>;

/// What a step's form hands upward after validating.
///
/// Any validation engine can sit behind this shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub is_dirty: bool,
    pub values: FormValues,
}

/// Per-step validity as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepState {
    pub is_valid: bool,
    pub is_dirty: bool,
    pub is_complete: bool,
}

/// Translates a step-local validation report into a [`StepState`] and
/// pushes it to the controller.
pub struct StepSignal;

impl StepSignal {
    pub fn derive(step: &Step, report: &ValidationReport) -> StepState {
        let is_complete = match step.completion {
            CompletionPolicy::AfterDirty => report.is_valid && report.is_dirty,
            CompletionPolicy::ByDefault => report.is_valid,
            CompletionPolicy::AllSections => {
                report.is_valid
                    && !step.sections.is_empty()
                    && step.sections.iter().all(|s| s.is_satisfied(&report.values))
            }
        };

        StepState {
            is_valid: report.is_valid,
            is_dirty: report.is_dirty,
            is_complete,
        }
    }

    /// Derive and report in one go. Call on mount and after every value change.
    pub fn publish(controller: &mut WizardController, report: &ValidationReport, step_index: usize) -> Result<StepState> {
        let step = controller.step_at(step_index)?.clone();
        let state = Self::derive(&step, report);
        controller.report_step_state(step.id.as_str(), state)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::step::Section;

    fn report(is_valid: bool, is_dirty: bool) -> ValidationReport {
        ValidationReport {
            is_valid,
            is_dirty,
            values: FormValues::new(),
        }
    }

    #[test]
    fn after_dirty_ignores_untouched_valid_state() {
        let step = Step::new("basic", "Basic");
        assert!(!StepSignal::derive(&step, &report(true, false)).is_complete);
        assert!(!StepSignal::derive(&step, &report(false, true)).is_complete);
        assert!(StepSignal::derive(&step, &report(true, true)).is_complete);
    }

    #[test]
    fn by_default_completes_untouched_optional_step() {
        let step = Step::new("notes", "Notes").with_completion(CompletionPolicy::ByDefault);
        let state = StepSignal::derive(&step, &report(true, false));
        assert!(state.is_complete);
        assert!(!state.is_dirty);
    }

    #[test]
    fn all_sections_needs_every_section_filled() {
        let step = Step::new("pricing", "Pricing")
            .with_completion(CompletionPolicy::AllSections)
            .with_sections(vec![
                Section::new("notice", "Advance Notice", &["advance_notice"]),
                Section::new("photos", "Photos", &["photos"]),
            ]);

        let mut values = FormValues::new();
        values.insert("advance_notice".into(), FieldValue::Text("1 day".into()));
        let mut r = ValidationReport {
            is_valid: true,
            is_dirty: true,
            values,
        };
        assert!(!StepSignal::derive(&step, &r).is_complete);

        r.values
            .insert("photos".into(), FieldValue::List(vec!["front.jpg".into()]));
        assert!(StepSignal::derive(&step, &r).is_complete);

        r.is_valid = false;
        assert!(!StepSignal::derive(&step, &r).is_complete);
    }

    #[test]
    fn field_value_filled_rules() {
        assert!(!FieldValue::Text(String::new()).is_filled());
        assert!(!FieldValue::Text(" \t".into()).is_filled());
        assert!(FieldValue::Text(" x ".into()).is_filled());
        assert!(!FieldValue::List(Vec::new()).is_filled());
        assert!(FieldValue::List(vec![String::new()]).is_filled());
    }
}
