//! Reusable multi-step form wizard engine.
//!
//! Steps publish a [`StepState`] derived from their own validation through
//! [`StepSignal`]; the [`WizardController`] sequences steps, gates forward
//! navigation on completeness and feeds the progress indicator. Tabbed steps
//! get a [`SectionNavigator`] whose section status is computed from form
//! values.

mod controller;
mod error;
mod prefetch;
mod progress;
mod section;
mod signal;
mod step;

pub use controller::{WizardController, WizardPhase};
pub use error::{Result, WizardError};
pub use prefetch::{PrefetchTracker, RequestTicket};
pub use progress::{badge_style, progress_badges, BadgeStyle, Connector, ProgressBadge, ProgressModel};
pub use section::{SectionDirection, SectionNavigator, SectionStatus};
pub use signal::{FieldValue, FormValues, StepSignal, StepState, ValidationReport};
pub use step::{CompletionPolicy, Section, Step, StepId};
