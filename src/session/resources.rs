use std::fmt;
use std::rc::Rc;

use crate::host::{EditorHost, ListenerHandle, ListenerKind, NodeHandle, NodeRole, NodeUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Listener,
    Node,
    Tooltip,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

struct ResourceEntry {
    id: ResourceId,
    kind: ResourceKind,
    label: &'static str,
    disposer: Box<dyn FnOnce()>,
}

/// Everything one overlay registered with the host, each paired with its release.
///
/// Entries are released newest first, so listeners go before the nodes they were
/// attached to. Releasing an empty set is a no-op, and dropping the set releases
/// whatever is still held.
#[derive(Default)]
pub struct ResourceSet {
    entries: Vec<ResourceEntry>,
    next_id: u64,
}

impl fmt::Debug for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSet")
            .field(
                "entries",
                &self
                    .entries
                    .iter()
                    .map(|entry| (entry.id, entry.kind, entry.label))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    pub fn acquire(
        &mut self,
        kind: ResourceKind,
        label: &'static str,
        disposer: impl FnOnce() + 'static,
    ) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(ResourceEntry {
            id,
            kind,
            label,
            disposer: Box::new(disposer),
        });
        tracing::trace!(?id, ?kind, label, "resource acquired");
        id
    }

    /// Mounts a host node and registers its removal.
    pub fn mount_node(&mut self, host: &Rc<dyn EditorHost>, role: NodeRole) -> NodeHandle {
        let node = host.mount_node(role);
        let owner = Rc::clone(host);
        let kind = match role {
            NodeRole::Tooltip { .. } => ResourceKind::Tooltip,
            _ => ResourceKind::Node,
        };
        self.acquire(kind, role.label(), move || owner.remove_node(node));
        node
    }

    /// Mounts a node and applies its initial updates before it is tracked.
    pub fn mount_node_with(
        &mut self,
        host: &Rc<dyn EditorHost>,
        role: NodeRole,
        updates: impl IntoIterator<Item = NodeUpdate>,
    ) -> NodeHandle {
        let node = self.mount_node(host, role);
        for update in updates {
            host.update_node(node, update);
        }
        node
    }

    /// Attaches a listener and registers its removal.
    pub fn listen(
        &mut self,
        host: &Rc<dyn EditorHost>,
        node: NodeHandle,
        kind: ListenerKind,
    ) -> ListenerHandle {
        let listener = host.add_listener(node, kind);
        let owner = Rc::clone(host);
        self.acquire(ResourceKind::Listener, kind.label(), move || {
            owner.remove_listener(listener)
        });
        listener
    }

    pub fn release(&mut self, id: ResourceId) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        let entry = self.entries.remove(position);
        tracing::trace!(id = ?entry.id, kind = ?entry.kind, label = entry.label, "resource released");
        (entry.disposer)();
        true
    }

    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        while let Some(entry) = self.entries.pop() {
            tracing::trace!(id = ?entry.id, kind = ?entry.kind, label = entry.label, "resource released");
            (entry.disposer)();
            released += 1;
        }
        if released > 0 {
            tracing::debug!(released, "released overlay resources");
        }
        released
    }
}

impl Drop for ResourceSet {
    fn drop(&mut self) {
        let leaked = self.release_all();
        if leaked > 0 {
            tracing::debug!(leaked, "resource set dropped while holding entries");
        }
    }
}
