use thiserror::Error;

use super::step::StepId;

/// Navigation and submission failures. All of them are recoverable and meant
/// to be shown as a disabled control or an inline message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Complete step '{0}' before continuing")]
    StepIncomplete(StepId),

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Step '{0}' is not reachable yet")]
    StepNotYetReachable(StepId),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Cannot submit, incomplete steps: {}", .0.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "))]
    IncompleteWizard(Vec<StepId>),

    #[error("Wizard has already been submitted")]
    AlreadySubmitted,

    #[error("Wizard has no steps")]
    Empty,
}

pub type Result<T> = std::result::Result<T, WizardError>;
