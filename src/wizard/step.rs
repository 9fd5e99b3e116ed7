use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::signal::FormValues;

/// Stable identifier of a step, unique within one wizard
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How a step turns its validation result into "complete".
///
/// Chosen explicitly per step; a step with no required fields is vacuously
/// valid, so whether it counts as complete before the user touches it has to
/// be a named decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Complete once valid and changed from the initial values
    #[default]
    AfterDirty,
    /// Complete whenever valid, even if untouched
    ByDefault,
    /// Complete when valid and every section's fields are filled
    AllSections,
}

/// A sub-tab of a step that owns a fixed set of field keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub key: String,
    pub label: String,
    /// Field keys this section owns
    pub fields: Vec<String>,
}

impl Section {
    pub fn new(key: &str, label: &str, fields: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Structural completeness: every owned field is filled.
    ///
    /// A section that owns no fields is never complete.
    pub fn is_satisfied(&self, values: &FormValues) -> bool {
        !self.fields.is_empty()
            && self
                .fields
                .iter()
                .all(|key| values.get(key).is_some_and(|v| v.is_filled()))
    }
}

/// One page of a multi-page flow. Immutable once the wizard is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub label: String,
    #[serde(default)]
    pub completion: CompletionPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Step {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: StepId::new(id),
            label: label.to_string(),
            completion: CompletionPolicy::AfterDirty,
            sections: Vec::new(),
        }
    }

    pub fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn is_tabbed(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn first_section_key(&self) -> Option<&str> {
        self.sections.first().map(|s| s.key.as_str())
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}
