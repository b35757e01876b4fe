use std::fmt;

/// Transaction id that lets the host coalesce several value changes into one undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

#[derive(Debug)]
pub struct EventGroupCoordinator {
    current: Option<GroupId>,
    next_id: u64,
}

impl Default for EventGroupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventGroupCoordinator {
    pub const fn new() -> Self {
        Self {
            current: None,
            next_id: 1,
        }
    }

    pub const fn current(&self) -> Option<GroupId> {
        self.current
    }

    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Starts a fresh group. A group that is still open gets replaced, which only happens
    /// when an overlay was torn down without closing its own transaction.
    pub fn open_group(&mut self) -> GroupId {
        let group = GroupId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        if let Some(previous) = self.current.replace(group) {
            tracing::warn!(%previous, %group, "event group replaced while still open");
        } else {
            tracing::debug!(%group, "event group opened");
        }
        group
    }

    /// Closes `group` if it is the current one. Closing a stale id is a no-op.
    pub fn close_group(&mut self, group: GroupId) -> bool {
        if self.current != Some(group) {
            tracing::debug!(%group, current = ?self.current, "ignored close for inactive event group");
            return false;
        }
        self.current = None;
        tracing::debug!(%group, "event group closed");
        true
    }
}
