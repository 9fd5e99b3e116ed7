/// Key hints shown in the status bar, refreshed after every key
#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    pub left_hint: String,
    pub right_hint: String,
}

impl StatusBarState {
    fn new(left: &str, right: &str) -> Self {
        Self {
            left_hint: left.to_string(),
            right_hint: right.to_string(),
        }
    }

    pub fn form_normal(tabbed: bool) -> Self {
        if tabbed {
            Self::new("j/k: fields  h/l: sections  i: edit", "n/p: step  s: save  ?: help")
        } else {
            Self::new("j/k: fields  i: edit", "n/p: step  s: save  ?: help")
        }
    }

    pub fn form_insert() -> Self {
        Self::new("Type to enter text", "Esc: normal  Tab: next field")
    }

    pub fn command_mode() -> Self {
        Self::new("", "Enter: run  Esc: cancel")
    }

    pub fn last_step() -> Self {
        Self::new("Review your entries", ":submit  p: back  s: save")
    }

    pub fn loading() -> Self {
        Self::new("Loading step data...", "n/p: step  s: save")
    }

    pub fn overlay() -> Self {
        Self::new("", "y/n or Esc")
    }

    pub fn submitted() -> Self {
        Self::new("Submitted", "Enter: exit")
    }
}
