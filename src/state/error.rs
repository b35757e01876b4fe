use super::event::OverlayEvent;
use super::model::OverlayState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid overlay transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: OverlayState,
        event: OverlayEvent,
    },
}
