//! Host-owned editing session: the event group coordinator and the single
//! open-overlay slot, injected into every `open`/`dispose` call.

mod event_group;
mod resources;

use std::fmt;
use std::rc::{Rc, Weak};

use crate::host::EditorHost;
use crate::value::{ChangeNotifier, FieldValue};

pub use event_group::{EventGroupCoordinator, GroupId};
pub use resources::{ResourceId, ResourceKind, ResourceSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// Something that can be forced closed when another overlay takes the slot.
pub trait OverlayOwner {
    fn supersede(&self, session: &mut SessionContext);
}

struct ActiveOverlay {
    id: OverlayId,
    owner: Weak<dyn OverlayOwner>,
}

pub struct SessionContext {
    host: Rc<dyn EditorHost>,
    events: EventGroupCoordinator,
    active: Option<ActiveOverlay>,
    next_overlay_id: u64,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("events", &self.events)
            .field("active", &self.active_overlay())
            .finish()
    }
}

impl SessionContext {
    pub fn new(host: Rc<dyn EditorHost>) -> Self {
        Self {
            host,
            events: EventGroupCoordinator::new(),
            active: None,
            next_overlay_id: 1,
        }
    }

    pub fn host(&self) -> &Rc<dyn EditorHost> {
        &self.host
    }

    pub fn events(&self) -> &EventGroupCoordinator {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventGroupCoordinator {
        &mut self.events
    }

    pub fn allocate_overlay_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next_overlay_id);
        self.next_overlay_id = self.next_overlay_id.saturating_add(1);
        id
    }

    pub fn active_overlay(&self) -> Option<OverlayId> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Makes `id` the open overlay, closing whichever overlay held the slot before.
    pub fn claim_overlay(&mut self, id: OverlayId, owner: Weak<dyn OverlayOwner>) {
        if let Some(previous) = self.active.take() {
            if previous.id != id {
                if let Some(previous_owner) = previous.owner.upgrade() {
                    tracing::debug!(previous = %previous.id, next = %id, "closing superseded overlay");
                    previous_owner.supersede(self);
                }
            }
        }
        self.active = Some(ActiveOverlay { id, owner });
    }

    /// Empties the slot if `id` still owns it.
    pub fn release_overlay(&mut self, id: OverlayId) -> bool {
        if self.active_overlay() != Some(id) {
            return false;
        }
        self.active = None;
        true
    }

    /// Host-driven teardown, for example when the workspace scrolls or loses focus.
    pub fn dispose_active(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        match active.owner.upgrade() {
            Some(owner) => {
                owner.supersede(self);
                true
            }
            None => false,
        }
    }
}

impl ChangeNotifier for SessionContext {
    fn current_group(&self) -> Option<GroupId> {
        self.events.current()
    }

    fn notify_value_changed(&self, old: &FieldValue, new: &FieldValue, group: GroupId) {
        self.host.notify_value_changed(old, new, group);
    }
}
