use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::placement::Placement;
use crate::session::{GroupId, OverlayId, OverlayOwner, ResourceSet, SessionContext};
use crate::state::{OverlayEvent, OverlayState, StateMachine, StateTransition};
use crate::value::FieldValue;

pub type SharedLifecycle = Rc<RefCell<OverlayLifecycle>>;

/// State, resources and transaction of one overlay instance.
///
/// Every path back to `Closed` goes through [`OverlayLifecycle::release`], which runs
/// the resource disposers and closes the event group.
#[derive(Debug, Default)]
pub struct OverlayLifecycle {
    id: Option<OverlayId>,
    machine: StateMachine,
    resources: ResourceSet,
    group: Option<GroupId>,
    snapshot: Option<FieldValue>,
    placement: Option<Placement>,
}

impl OverlayLifecycle {
    pub fn shared() -> SharedLifecycle {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn id(&self) -> Option<OverlayId> {
        self.id
    }

    pub fn state(&self) -> OverlayState {
        self.machine.state()
    }

    pub fn history(&self) -> &[StateTransition] {
        self.machine.history()
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceSet {
        &mut self.resources
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Value the field held when the overlay opened; `None` for non-transactional overlays.
    pub fn snapshot(&self) -> Option<&FieldValue> {
        self.snapshot.as_ref()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn ready(&mut self, placement: Placement) {
        self.placement = Some(placement);
        self.apply(OverlayEvent::Ready);
    }

    pub fn begin_commit(&mut self) -> bool {
        self.apply(OverlayEvent::Commit)
    }

    pub fn begin_dismiss(&mut self) -> bool {
        self.apply(OverlayEvent::Dismiss)
    }

    /// Tears the overlay down. Returns `false` when it was already closed.
    pub fn release(&mut self, session: &mut SessionContext) -> bool {
        if self.state().is_closed() {
            return false;
        }

        let released = self.resources.release_all();
        if let Some(group) = self.group.take() {
            session.events_mut().close_group(group);
        }
        self.snapshot = None;
        self.apply(OverlayEvent::Release);
        if let Some(id) = self.id {
            session.release_overlay(id);
        }
        tracing::debug!(overlay = ?self.id, released, "overlay released");
        true
    }

    fn apply(&mut self, event: OverlayEvent) -> bool {
        match self.machine.transition(event) {
            Ok(state) => {
                tracing::debug!(overlay = ?self.id, ?event, ?state, "overlay transition");
                true
            }
            Err(err) => {
                tracing::warn!(overlay = ?self.id, %err, "overlay transition ignored");
                false
            }
        }
    }
}

/// Moves the overlay to `Opening` and claims the session's overlay slot, closing any
/// other open overlay first. With a snapshot, an event group is opened so every edit
/// until close lands in one undo step.
pub fn begin(
    lifecycle: &SharedLifecycle,
    session: &mut SessionContext,
    snapshot: Option<FieldValue>,
) -> OverlayId {
    lifecycle.borrow_mut().release(session);

    let id = session.allocate_overlay_id();
    let weak: Weak<RefCell<OverlayLifecycle>> = Rc::downgrade(lifecycle);
    let owner: Weak<dyn OverlayOwner> = weak;
    session.claim_overlay(id, owner);

    let mut lifecycle = lifecycle.borrow_mut();
    lifecycle.id = Some(id);
    lifecycle.placement = None;
    lifecycle.apply(OverlayEvent::Open);
    if snapshot.is_some() {
        lifecycle.group = Some(session.events_mut().open_group());
    }
    lifecycle.snapshot = snapshot;
    id
}

impl OverlayOwner for RefCell<OverlayLifecycle> {
    fn supersede(&self, session: &mut SessionContext) {
        match self.try_borrow_mut() {
            Ok(mut lifecycle) => {
                lifecycle.release(session);
            }
            Err(_) => tracing::warn!("overlay busy while being superseded; release skipped"),
        }
    }
}
