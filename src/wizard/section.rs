use super::error::{Result, WizardError};
use super::signal::FormValues;
use super::step::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Complete,
    Active,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionDirection {
    Prev,
    Next,
}

/// Tracks the active sub-tab inside one step.
///
/// Sections are always freely reachable; completeness only affects how they
/// are displayed.
#[derive(Debug, Clone)]
pub struct SectionNavigator {
    sections: Vec<Section>,
    current: usize,
}

impl SectionNavigator {
    /// Returns `None` for steps without sections
    pub fn new(sections: &[Section]) -> Option<Self> {
        if sections.is_empty() {
            return None;
        }
        Some(Self {
            sections: sections.to_vec(),
            current: 0,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn current(&self) -> &Section {
        &self.sections[self.current]
    }

    pub fn current_key(&self) -> &str {
        &self.current().key
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn select_section(&mut self, key: &str) -> Result<()> {
        let idx = self
            .sections
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| WizardError::UnknownSection(key.to_string()))?;
        self.current = idx;
        Ok(())
    }

    /// Moves one section over. Stops at either end instead of wrapping.
    pub fn go_to_adjacent(&mut self, direction: SectionDirection) {
        match direction {
            SectionDirection::Prev => {
                if self.current > 0 {
                    self.current -= 1;
                }
            }
            SectionDirection::Next => {
                if self.current + 1 < self.sections.len() {
                    self.current += 1;
                }
            }
        }
    }

    /// "Active" wins over "complete" for the current section
    pub fn section_status(&self, key: &str, values: &FormValues) -> Result<SectionStatus> {
        let (idx, section) = self
            .sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.key == key)
            .ok_or_else(|| WizardError::UnknownSection(key.to_string()))?;

        Ok(if idx == self.current {
            SectionStatus::Active
        } else if section.is_satisfied(values) {
            SectionStatus::Complete
        } else {
            SectionStatus::Incomplete
        })
    }

    /// Structural completeness of a section, ignoring which one is active
    pub fn is_section_complete(&self, key: &str, values: &FormValues) -> bool {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .is_some_and(|s| s.is_satisfied(values))
    }
}
