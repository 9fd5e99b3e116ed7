use super::controller::WizardController;
use super::step::Step;

/// Badge appearance. Reflects position relative to the current step, not
/// current validity: a step the user has passed stays "done" even if it was
/// later broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Done,
    Active,
    Pending,
}

/// Line between two consecutive badges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Filled,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBadge {
    pub number: usize,
    pub label: String,
    pub style: BadgeStyle,
    /// Raw completeness, for secondary hints only
    pub complete: bool,
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressModel {
    pub badges: Vec<ProgressBadge>,
    /// `badges.len() - 1` entries
    pub connectors: Vec<Connector>,
}

pub fn badge_style(index: usize, current: usize) -> BadgeStyle {
    use std::cmp::Ordering;
    match index.cmp(&current) {
        Ordering::Less => BadgeStyle::Done,
        Ordering::Equal => BadgeStyle::Active,
        Ordering::Greater => BadgeStyle::Pending,
    }
}

/// Pure mapping from steps and position to badges and connectors
pub fn progress_badges(steps: &[Step], current: usize, completion: &[bool], visited: &[bool]) -> ProgressModel {
    let badges = steps
        .iter()
        .enumerate()
        .map(|(idx, step)| ProgressBadge {
            number: idx + 1,
            label: step.label.clone(),
            style: badge_style(idx, current),
            complete: completion.get(idx).copied().unwrap_or(false),
            visited: visited.get(idx).copied().unwrap_or(false),
        })
        .collect();

    let connectors = (1..steps.len())
        .map(|idx| {
            if idx <= current {
                Connector::Filled
            } else {
                Connector::Empty
            }
        })
        .collect();

    ProgressModel { badges, connectors }
}

impl WizardController {
    pub fn progress(&self) -> ProgressModel {
        let visited: Vec<bool> = (0..self.step_count()).map(|i| self.is_visited(i)).collect();
        progress_badges(self.steps(), self.current_index(), &self.completion(), &visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::signal::StepState;

    fn steps() -> Vec<Step> {
        vec![
            Step::new("ride", "Ride Details"),
            Step::new("vehicle", "Vehicle"),
            Step::new("summary", "Summary"),
            Step::new("payment", "Payment"),
        ]
    }

    #[test]
    fn styles_follow_position_only() {
        let model = progress_badges(&steps(), 2, &[false, true, false, true], &[true; 4]);
        let styles: Vec<_> = model.badges.iter().map(|b| b.style).collect();
        assert_eq!(
            styles,
            vec![
                BadgeStyle::Done,
                BadgeStyle::Done,
                BadgeStyle::Active,
                BadgeStyle::Pending
            ]
        );
        assert!(!model.badges[0].complete);
        assert!(model.badges[3].complete);
        assert_eq!(
            model.connectors,
            vec![Connector::Filled, Connector::Filled, Connector::Empty]
        );
    }

    #[test]
    fn passed_step_stays_done_after_breaking() {
        let mut wiz = WizardController::new(steps()).unwrap();
        let done = StepState {
            is_valid: true,
            is_dirty: true,
            is_complete: true,
        };
        wiz.report_step_state("ride", done).unwrap();
        wiz.go_next().unwrap();
        wiz.report_step_state("ride", StepState::default()).unwrap();

        let model = wiz.progress();
        assert_eq!(model.badges[0].style, BadgeStyle::Done);
        assert!(!model.badges[0].complete);
        assert_eq!(model.badges[1].style, BadgeStyle::Active);
    }

    #[test]
    fn single_step_has_no_connectors() {
        let model = progress_badges(&steps()[..1], 0, &[false], &[true]);
        assert!(model.connectors.is_empty());
        assert_eq!(model.badges[0].number, 1);
    }
}
