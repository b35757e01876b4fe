/// Lifecycle stage of one floating editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Opening,
    Open,
    Committing,
    Dismissing,
}

impl OverlayState {
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Only a fully opened overlay reacts to pointer input.
    pub const fn accepts_interaction(self) -> bool {
        matches!(self, Self::Open)
    }
}
