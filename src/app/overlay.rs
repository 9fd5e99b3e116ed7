/// The one popup currently on screen. Opening another replaces it, so two
/// overlays can never be visible together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Help,
    ConfirmQuit,
    ConfirmSubmit,
    Submitted,
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        *self != Overlay::None
    }

    pub fn open(&mut self, overlay: Overlay) {
        *self = overlay;
    }

    pub fn close(&mut self) {
        *self = Overlay::None;
    }
}
