use rideops_wizard::flow::vehicle_onboarding;
use rideops_wizard::form::StepForm;
use rideops_wizard::wizard::{
    BadgeStyle, FieldValue, FormValues, Section, SectionStatus, Step, StepSignal, StepState, ValidationReport,
    WizardController, WizardError, WizardPhase,
};

const INCOMPLETE: StepState = StepState {
    is_valid: false,
    is_dirty: false,
    is_complete: false,
};

const DONE: StepState = StepState {
    is_valid: true,
    is_dirty: true,
    is_complete: true,
};

fn five_steps() -> WizardController {
    let steps = (0..5)
        .map(|i| Step::new(&format!("step-{i}"), &format!("Step {i}")))
        .collect();
    WizardController::new(steps).unwrap()
}

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

#[test]
fn next_is_refused_on_untouched_step() {
    let mut wiz = five_steps();
    assert_eq!(wiz.current_state(), INCOMPLETE);

    let err = wiz.go_next().unwrap_err();
    assert!(matches!(err, WizardError::StepIncomplete(ref id) if id.as_str() == "step-0"));
    assert_eq!(wiz.current_index(), 0);
    assert!(!wiz.is_next_enabled());
}

#[test]
fn completed_step_unlocks_next() {
    let mut wiz = five_steps();
    let step = wiz.current_step().clone();
    let state = StepSignal::derive(
        &step,
        &ValidationReport {
            is_valid: true,
            is_dirty: true,
            values: FormValues::new(),
        },
    );
    wiz.report_step_state("step-0", state).unwrap();

    assert!(wiz.is_next_enabled());
    wiz.go_next().unwrap();
    assert_eq!(wiz.current_index(), 1);
    let visited: Vec<&str> = wiz.visited_ids().iter().map(|id| id.as_str()).collect();
    assert_eq!(visited, ["step-0", "step-1"]);
}

#[test]
fn going_back_keeps_passed_badge_done() {
    let mut wiz = five_steps();
    wiz.report_step_state("step-0", DONE).unwrap();
    wiz.go_next().unwrap();
    wiz.go_previous().unwrap();
    assert_eq!(wiz.current_index(), 0);

    // Badge style follows position only
    let progress = wiz.progress();
    assert_eq!(progress.badges[0].style, BadgeStyle::Active);

    wiz.report_step_state("step-0", INCOMPLETE).unwrap();
    wiz.go_to("step-1").unwrap();
    let progress = wiz.progress();
    assert_eq!(progress.badges[0].style, BadgeStyle::Done);
    assert!(!progress.badges[0].complete);
    assert_eq!(progress.badges[1].style, BadgeStyle::Active);
    assert_eq!(progress.badges[2].style, BadgeStyle::Pending);
}

#[test]
fn previous_is_refused_at_first_step() {
    let mut wiz = five_steps();
    assert_eq!(wiz.go_previous(), Err(WizardError::AtFirstStep));
    assert_eq!(wiz.current_index(), 0);
    assert!(!wiz.is_previous_enabled());
}

#[test]
fn section_status_follows_owned_field() {
    let step = Step::new("pricing", "Pricing").with_sections(vec![
        Section::new("advanceNotice", "Advance Notice", &["advanceNotice"]),
        Section::new("pricing", "Pricing", &["dailyRate"]),
    ]);
    let mut wiz = WizardController::new(vec![step]).unwrap();
    wiz.select_section("pricing").unwrap();

    let mut values = FormValues::from([("advanceNotice".to_string(), text("1 day"))]);
    assert_eq!(wiz.section_status("advanceNotice", &values), Ok(SectionStatus::Complete));

    values.insert("advanceNotice".to_string(), text(""));
    assert_eq!(wiz.section_status("advanceNotice", &values), Ok(SectionStatus::Incomplete));

    values.insert("advanceNotice".to_string(), text("   "));
    assert_eq!(wiz.section_status("advanceNotice", &values), Ok(SectionStatus::Incomplete));
}

#[test]
fn goto_past_frontier_is_not_reachable() {
    let mut wiz = five_steps();
    wiz.report_step_state("step-0", DONE).unwrap();
    wiz.go_next().unwrap();

    let err = wiz.go_to("step-4").unwrap_err();
    assert!(matches!(err, WizardError::StepNotYetReachable(ref id) if id.as_str() == "step-4"));
    assert_eq!(wiz.current_index(), 1);
    assert_eq!(wiz.go_to("nowhere"), Err(WizardError::UnknownStep("nowhere".to_string())));
}

#[test]
fn submit_with_incomplete_step_stays_in_progress() {
    let mut wiz = five_steps();
    for (i, state) in [DONE, DONE, INCOMPLETE, DONE, DONE].into_iter().enumerate() {
        wiz.report_step_state(&format!("step-{i}"), state).unwrap();
    }

    match wiz.submit() {
        Err(WizardError::IncompleteWizard(ids)) => {
            assert_eq!(ids.len(), 1);
            assert_eq!(ids[0].as_str(), "step-2");
        }
        other => panic!("expected IncompleteWizard, got {other:?}"),
    }
    assert_eq!(wiz.phase(), WizardPhase::InProgress);

    wiz.report_step_state("step-2", DONE).unwrap();
    wiz.submit().unwrap();
    assert_eq!(wiz.phase(), WizardPhase::Submitted);
    assert_eq!(wiz.go_previous(), Err(WizardError::AlreadySubmitted));
}

#[test]
fn current_index_stays_in_bounds() {
    let mut wiz = five_steps();
    for i in 0..5 {
        wiz.report_step_state(&format!("step-{i}"), DONE).unwrap();
    }
    for _ in 0..10 {
        wiz.go_next().unwrap();
        assert!(wiz.current_index() < wiz.step_count());
    }
    assert!(wiz.is_last_step());
    for _ in 0..10 {
        let _ = wiz.go_previous();
        assert!(wiz.current_index() < wiz.step_count());
    }
    assert_eq!(wiz.current_index(), 0);
}

#[test]
fn repeated_report_is_idempotent() {
    let mut wiz = five_steps();
    wiz.report_step_state("step-0", DONE).unwrap();
    let before = format!("{wiz:?}");
    wiz.report_step_state("step-0", DONE).unwrap();
    assert_eq!(format!("{wiz:?}"), before);
}

#[test]
fn visited_never_shrinks() {
    let mut wiz = five_steps();
    for i in 0..3 {
        wiz.report_step_state(&format!("step-{i}"), DONE).unwrap();
    }
    wiz.go_next().unwrap();
    wiz.go_next().unwrap();

    let mut seen = wiz.visited_ids().len();
    for target in ["step-0", "step-2", "step-1", "step-0"] {
        wiz.go_to(target).unwrap();
        let now = wiz.visited_ids().len();
        assert!(now >= seen);
        seen = now;
    }
    assert_eq!(seen, 3);
}

#[test]
fn section_completeness_ignores_update_order() {
    let flow = vehicle_onboarding();
    let idx = flow
        .steps
        .iter()
        .position(|s| s.step.id.as_str() == "availability-pricing")
        .unwrap();
    let step = flow.steps[idx].step.clone();

    let edits = [
        ("advance_notice", "2 days"),
        ("min_trip_days", "1"),
        ("max_trip_days", "30"),
        ("services", "delivery"),
        ("daily_rate", "45"),
        ("weekly_discount", "10"),
        ("outskirt_locations", "Airport"),
    ];

    let fill = |order: &[usize]| {
        let mut form = StepForm::new(flow.steps[idx].fields.clone());
        let mut states = Vec::new();
        for &i in order {
            let (key, value) = edits[i];
            let field = form.index_of(key).unwrap();
            form.buffer_mut(field).unwrap().set(value);
            states.push(StepSignal::derive(&step, &form.validate()));
        }
        let values = form.values();
        let sections: Vec<bool> = step.sections.iter().map(|s| s.is_satisfied(&values)).collect();
        (states.last().copied(), sections)
    };

    let forward = fill(&[0, 1, 2, 3, 4, 5, 6]);
    let shuffled = fill(&[6, 3, 0, 5, 2, 4, 1]);
    assert_eq!(forward, shuffled);
    assert!(forward.0.unwrap().is_complete);
    assert!(forward.1.iter().all(|done| *done));

    // Unrelated sections do not affect each other
    let partial = fill(&[4, 0]);
    assert!(!partial.0.unwrap().is_complete);
    assert_eq!(partial.1, vec![true, false, false, true, false, false]);
}
