//! Flow definitions: a screen is an ordered list of steps plus the fields
//! each step's form declares. Two flows ship built in; more can be given in
//! the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::form::{FieldSpec, StepForm};
use crate::wizard::{CompletionPolicy, Section, Step};

pub const VEHICLE_ONBOARDING: &str = "vehicle-onboarding";
pub const BOOKING: &str = "booking";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowError {
    #[error("Flow '{0}' has no steps")]
    NoSteps(String),

    #[error("Flow '{flow}' declares step '{step}' twice")]
    DuplicateStep { flow: String, step: String },

    #[error("Step '{step}' is completed by its sections but declares none")]
    SectionsRequired { step: String },

    #[error("Step '{step}' declares section '{section}' twice")]
    DuplicateSection { step: String, section: String },

    #[error("Section '{section}' of step '{step}' owns no fields")]
    EmptySection { step: String, section: String },

    #[error("Section '{section}' of step '{step}' refers to unknown field '{field}'")]
    UnknownSectionField {
        step: String,
        section: String,
        field: String,
    },

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),
}

/// A step together with its form fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowStep {
    #[serde(flatten)]
    pub step: Step,
    /// Ask the prefetch source for prefill values when entered
    #[serde(default)]
    pub prefetch: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FlowStep {
    fn new(step: Step, fields: Vec<FieldSpec>) -> Self {
        Self {
            step,
            prefetch: false,
            fields,
        }
    }

    fn prefetched(mut self) -> Self {
        self.prefetch = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: String,
    pub title: String,
    pub steps: Vec<FlowStep>,
}

impl FlowDefinition {
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.steps.is_empty() {
            return Err(FlowError::NoSteps(self.id.clone()));
        }

        let mut step_ids = HashSet::new();
        for flow_step in &self.steps {
            let step = &flow_step.step;
            if !step_ids.insert(step.id.as_str()) {
                return Err(FlowError::DuplicateStep {
                    flow: self.id.clone(),
                    step: step.id.to_string(),
                });
            }

            if step.completion == CompletionPolicy::AllSections && step.sections.is_empty() {
                return Err(FlowError::SectionsRequired {
                    step: step.id.to_string(),
                });
            }

            let field_keys: HashSet<&str> = flow_step.fields.iter().map(|f| f.key.as_str()).collect();
            let mut section_keys = HashSet::new();
            for section in &step.sections {
                if !section_keys.insert(section.key.as_str()) {
                    return Err(FlowError::DuplicateSection {
                        step: step.id.to_string(),
                        section: section.key.clone(),
                    });
                }
                if section.fields.is_empty() {
                    return Err(FlowError::EmptySection {
                        step: step.id.to_string(),
                        section: section.key.clone(),
                    });
                }
                if let Some(field) = section.fields.iter().find(|f| !field_keys.contains(f.as_str())) {
                    return Err(FlowError::UnknownSectionField {
                        step: step.id.to_string(),
                        section: section.key.clone(),
                        field: field.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn wizard_steps(&self) -> Vec<Step> {
        self.steps.iter().map(|s| s.step.clone()).collect()
    }

    pub fn forms(&self) -> Vec<StepForm> {
        self.steps.iter().map(|s| StepForm::new(s.fields.clone())).collect()
    }

    /// Look a flow up among `custom` first, then the built-ins
    pub fn find(id: &str, custom: &[FlowDefinition]) -> Result<FlowDefinition, FlowError> {
        custom
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .or_else(|| builtin_flows().into_iter().find(|f| f.id == id))
            .ok_or_else(|| FlowError::UnknownFlow(id.to_string()))
    }
}

pub fn builtin_flows() -> Vec<FlowDefinition> {
    vec![vehicle_onboarding(), booking()]
}

pub fn vehicle_onboarding() -> FlowDefinition {
    let pricing_sections = vec![
        Section::new("advance-notice", "Advance Notice", &["advance_notice"]),
        Section::new("trip-duration", "Trip Duration", &["min_trip_days", "max_trip_days"]),
        Section::new("additional-services", "Additional Services", &["services"]),
        Section::new("pricing", "Pricing", &["daily_rate"]),
        Section::new("discounts", "Discounts", &["weekly_discount"]),
        Section::new("outskirt-locations", "Outskirt Locations", &["outskirt_locations"]),
    ];

    FlowDefinition {
        id: VEHICLE_ONBOARDING.to_string(),
        title: "Vehicle Onboarding".to_string(),
        steps: vec![
            FlowStep::new(
                Step::new("basic-info", "Basic Info"),
                vec![
                    FieldSpec::text("make", "Make").required(),
                    FieldSpec::text("model", "Model").required(),
                    FieldSpec::text("year", "Year").required().numeric().min_length(4).max_length(4),
                    FieldSpec::text("plate", "Plate").required().min_length(4).max_length(12),
                ],
            ),
            FlowStep::new(
                Step::new("additional-info", "Additional Info"),
                vec![
                    FieldSpec::text("seats", "Seats").required().numeric(),
                    FieldSpec::text("transmission", "Transmission").required(),
                    FieldSpec::list("features", "Features"),
                ],
            ),
            FlowStep::new(
                Step::new("photos", "Photos"),
                vec![FieldSpec::list("photos", "Photos").required().min_items(1)],
            ),
            FlowStep::new(
                Step::new("availability-pricing", "Availability & Pricing")
                    .with_completion(CompletionPolicy::AllSections)
                    .with_sections(pricing_sections),
                vec![
                    FieldSpec::text("advance_notice", "Advance notice"),
                    FieldSpec::text("min_trip_days", "Min trip days").numeric(),
                    FieldSpec::text("max_trip_days", "Max trip days").numeric(),
                    FieldSpec::list("services", "Services"),
                    FieldSpec::text("daily_rate", "Daily rate").numeric(),
                    FieldSpec::text("weekly_discount", "Weekly discount %").numeric(),
                    FieldSpec::list("outskirt_locations", "Outskirt locations"),
                ],
            ),
            FlowStep::new(
                Step::new("summary", "Summary").with_completion(CompletionPolicy::ByDefault),
                vec![FieldSpec::text("notes", "Notes").max_length(500)],
            ),
        ],
    }
}

pub fn booking() -> FlowDefinition {
    FlowDefinition {
        id: BOOKING.to_string(),
        title: "New Booking".to_string(),
        steps: vec![
            FlowStep::new(
                Step::new("ride-details", "Ride Details"),
                vec![
                    FieldSpec::text("customer_id", "Customer ID").required(),
                    FieldSpec::text("customer_name", "Customer name").required(),
                    FieldSpec::text("pickup", "Pickup").required(),
                    FieldSpec::text("dropoff", "Drop-off").required(),
                    FieldSpec::text("start_date", "Start date").required().min_length(10),
                    FieldSpec::text("end_date", "End date").required().min_length(10),
                ],
            )
            .prefetched(),
            FlowStep::new(
                Step::new("vehicle-selection", "Vehicle"),
                vec![
                    FieldSpec::text("vehicle_id", "Vehicle ID").required(),
                    FieldSpec::list("extras", "Extras"),
                ],
            ),
            FlowStep::new(
                Step::new("summary", "Summary").with_completion(CompletionPolicy::ByDefault),
                vec![FieldSpec::text("coupon", "Coupon code").max_length(20)],
            ),
            FlowStep::new(
                Step::new("payment", "Payment"),
                vec![
                    FieldSpec::text("card_holder", "Card holder").required(),
                    FieldSpec::text("card_number", "Card number")
                        .required()
                        .grouped()
                        .min_length(12)
                        .max_length(23)
                        .masked(),
                ],
            ),
        ],
    }
}
