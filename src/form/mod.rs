//! Field-level validation engine used by the front-end steps.
//!
//! Each step owns a [`StepForm`]; after every edit it produces a
//! [`ValidationReport`] for the wizard and keeps the per-field error text to
//! itself.

use serde::{Deserialize, Serialize};

use crate::vim::InputBuffer;
use crate::wizard::{FieldValue, FormValues, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    /// Edited as a comma-separated line
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: usize,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min_items: usize,
    #[serde(default)]
    pub numeric: bool,
    /// Numeric value may be written in space-separated groups, e.g. `4111 1111`
    #[serde(default)]
    pub grouped: bool,
    #[serde(default)]
    pub masked: bool,
}

impl FieldSpec {
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            required: false,
            min_length: 0,
            max_length: None,
            min_items: 0,
            numeric: false,
            grouped: false,
            masked: false,
        }
    }

    pub fn list(key: &str, label: &str) -> Self {
        Self {
            kind: FieldKind::List,
            ..Self::text(key, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = n;
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = n;
        self
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Numeric, with space-separated digit groups allowed
    pub fn grouped(mut self) -> Self {
        self.numeric = true;
        self.grouped = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Parse raw buffer text into this field's value shape
    pub fn parse(&self, raw: &str) -> FieldValue {
        match self.kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::List => FieldValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    pub fn check(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Text(raw) => self.check_text(raw.trim()),
            FieldValue::List(items) => self.check_list(items),
        }
    }

    fn check_text(&self, text: &str) -> Option<String> {
        if text.is_empty() {
            return self.required.then(|| format!("{} is required", self.label));
        }
        let len = text.chars().count();
        if len < self.min_length {
            return Some(format!("{} must be at least {} characters", self.label, self.min_length));
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Some(format!("{} must be {} characters or less", self.label, max));
            }
        }
        if self.numeric && !self.is_number(text) {
            return Some(format!("{} must be a number", self.label));
        }
        None
    }

    // Plain decimal only: `f64` alone would also take "inf", "1e5" and "+1"
    fn is_number(&self, text: &str) -> bool {
        let digits: String = if self.grouped {
            text.split(' ').filter(|group| !group.is_empty()).collect()
        } else {
            text.to_string()
        };
        digits.chars().all(|c| c.is_ascii_digit() || c == '.') && digits.parse::<f64>().is_ok()
    }

    fn check_list(&self, items: &[String]) -> Option<String> {
        if items.is_empty() {
            return self.required.then(|| format!("{} needs at least one entry", self.label));
        }
        (items.len() < self.min_items)
            .then(|| format!("{} needs at least {} entries", self.label, self.min_items))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub key: String,
    pub message: String,
}

/// Editable values of one step plus the snapshot they started from
#[derive(Debug, Clone)]
pub struct StepForm {
    fields: Vec<FieldSpec>,
    buffers: Vec<InputBuffer>,
    initial: FormValues,
}

impl StepForm {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let buffers = fields
            .iter()
            .map(|f| if f.masked { InputBuffer::masked() } else { InputBuffer::new() })
            .collect();
        let mut form = Self {
            fields,
            buffers,
            initial: FormValues::new(),
        };
        form.initial = form.values();
        form
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    pub fn buffer(&self, idx: usize) -> Option<&InputBuffer> {
        self.buffers.get(idx)
    }

    pub fn buffer_mut(&mut self, idx: usize) -> Option<&mut InputBuffer> {
        self.buffers.get_mut(idx)
    }

    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .zip(&self.buffers)
            .map(|(field, buf)| (field.key.clone(), field.parse(buf.content())))
            .collect()
    }

    /// Load values fetched from elsewhere. They become the new baseline, so
    /// a freshly prefilled form is not dirty.
    pub fn prefill(&mut self, values: &FormValues) {
        for (field, buf) in self.fields.iter().zip(self.buffers.iter_mut()) {
            if let Some(value) = values.get(&field.key) {
                buf.set(&value.display());
            }
        }
        self.initial = self.values();
    }

    pub fn is_dirty(&self) -> bool {
        self.values() != self.initial
    }

    pub fn errors(&self) -> Vec<FieldError> {
        let values = self.values();
        self.fields
            .iter()
            .filter_map(|field| {
                let value = values.get(&field.key)?;
                field.check(value).map(|message| FieldError {
                    key: field.key.clone(),
                    message,
                })
            })
            .collect()
    }

    pub fn error_for(&self, key: &str) -> Option<String> {
        self.errors().into_iter().find(|e| e.key == key).map(|e| e.message)
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationReport {
            is_valid: self.errors().is_empty(),
            is_dirty: self.is_dirty(),
            values: self.values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle_form() -> StepForm {
        StepForm::new(vec![
            FieldSpec::text("make", "Make").required(),
            FieldSpec::text("plate", "Plate").required().min_length(4).max_length(10),
            FieldSpec::list("photos", "Photos").required().min_items(2),
            FieldSpec::text("notes", "Notes"),
        ])
    }

    fn type_into(form: &mut StepForm, key: &str, text: &str) {
        let idx = form.index_of(key).unwrap();
        let buf = form.buffer_mut(idx).unwrap();
        for c in text.chars() {
            buf.insert(c);
        }
    }

    #[test]
    fn fresh_form_is_clean_and_invalid() {
        let report = vehicle_form().validate();
        assert!(!report.is_valid);
        assert!(!report.is_dirty);
        assert_eq!(report.values.get("photos"), Some(&FieldValue::List(Vec::new())));
    }

    #[test]
    fn valid_once_every_rule_holds() {
        let mut form = vehicle_form();
        type_into(&mut form, "make", "Toyota");
        type_into(&mut form, "plate", "KA-01");
        type_into(&mut form, "photos", "front.jpg");
        assert_eq!(
            form.error_for("photos").as_deref(),
            Some("Photos needs at least 2 entries")
        );

        type_into(&mut form, "photos", ", , rear.jpg");
        let report = form.validate();
        assert!(report.is_valid, "{:?}", form.errors());
        assert!(report.is_dirty);
        assert_eq!(
            report.values.get("photos"),
            Some(&FieldValue::List(vec!["front.jpg".into(), "rear.jpg".into()]))
        );
    }

    #[test]
    fn reverting_an_edit_clears_dirty() {
        let mut form = vehicle_form();
        type_into(&mut form, "notes", "x");
        assert!(form.is_dirty());
        let idx = form.index_of("notes").unwrap();
        form.buffer_mut(idx).unwrap().delete_back();
        assert!(!form.is_dirty());
    }

    #[test]
    fn prefill_sets_new_baseline() {
        let mut form = vehicle_form();
        let mut values = FormValues::new();
        values.insert("make".into(), FieldValue::Text("Honda".into()));
        values.insert("photos".into(), FieldValue::List(vec!["a.jpg".into(), "b.jpg".into()]));
        form.prefill(&values);

        assert!(!form.is_dirty());
        assert_eq!(form.buffer(0).unwrap().content(), "Honda");
        assert_eq!(form.buffer(2).unwrap().content(), "a.jpg, b.jpg");
    }

    #[test]
    fn numeric_and_length_rules() {
        let spec = FieldSpec::text("rate", "Daily rate").numeric();
        assert!(spec.check(&FieldValue::Text("45.50".into())).is_none());
        assert!(spec.check(&FieldValue::Text("abc".into())).is_some());
        assert!(spec.check(&FieldValue::Text("".into())).is_none());

        let plate = FieldSpec::text("plate", "Plate").max_length(3);
        assert_eq!(
            plate.check(&FieldValue::Text("ABCD".into())).as_deref(),
            Some("Plate must be 3 characters or less")
        );
    }

    #[test]
    fn numeric_rejects_malformed_numbers() {
        let year = FieldSpec::text("year", "Year").required().numeric().min_length(4).max_length(4);
        assert!(year.check(&FieldValue::Text("2019".into())).is_none());
        for bad in ["20 1", "1.2.3", "4 5", "...."] {
            assert_eq!(
                year.check(&FieldValue::Text(bad.into())).as_deref(),
                Some("Year must be a number"),
                "{bad:?}"
            );
        }

        let rate = FieldSpec::text("rate", "Daily rate").numeric();
        assert!(rate.check(&FieldValue::Text("1.2.3".into())).is_some());
        assert!(rate.check(&FieldValue::Text("4 5".into())).is_some());
        assert!(rate.check(&FieldValue::Text("inf".into())).is_some());
    }

    #[test]
    fn grouped_numbers_allow_spaces_between_groups() {
        let card = FieldSpec::text("card_number", "Card number").grouped().min_length(12);
        assert!(card.check(&FieldValue::Text("4111 1111 1111 1111".into())).is_none());
        assert!(card.check(&FieldValue::Text("4111111111111111".into())).is_none());
        assert!(card.check(&FieldValue::Text("4111 1111 abcd 1111".into())).is_some());
    }

    #[test]
    fn masked_fields_get_masked_buffers() {
        let form = StepForm::new(vec![FieldSpec::text("card", "Card").masked()]);
        assert!(form.buffer(0).unwrap().is_masked());
    }
}
