use super::model::OverlayState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Open,
    Ready,
    Commit,
    Dismiss,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<OverlayState>,
    pub event: OverlayEvent,
    pub to: OverlayState,
}

impl StateTransition {
    pub const fn new(from: Option<OverlayState>, event: OverlayEvent, to: OverlayState) -> Self {
        Self { from, event, to }
    }
}
