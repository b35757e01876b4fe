use super::error::{StateError, StateResult};
use super::{event::StateTransition, OverlayEvent, OverlayState};

/// Lifecycle stage of one overlay plus every transition it went through.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: OverlayState,
    history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    fn next_state(&self, event: OverlayEvent) -> Option<OverlayState> {
        use OverlayEvent as E;
        use OverlayState as S;
        let next = match (self.state, event) {
            (S::Closed, E::Open) => S::Opening,
            (S::Opening, E::Ready) => S::Open,
            (S::Open, E::Commit) => S::Committing,
            (S::Opening | S::Open, E::Dismiss) => S::Dismissing,
            (S::Opening | S::Open | S::Committing | S::Dismissing, E::Release) => S::Closed,
            _ => return None,
        };
        Some(next)
    }

    /// Applies `event`. A rejected event leaves state and history untouched.
    pub fn transition(&mut self, event: OverlayEvent) -> StateResult<OverlayState> {
        let from = self.state;
        let Some(to) = self.next_state(event) else {
            return Err(StateError::InvalidStateTransition { from, event });
        };
        self.history.push(StateTransition::new(Some(from), event, to));
        self.state = to;
        Ok(to)
    }
}
