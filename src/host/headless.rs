use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::geometry::{Color, OverlaySize, Point, ViewportFrame};
use crate::session::GroupId;
use crate::ui::OVERLAY_TOKENS;
use crate::value::FieldValue;

use super::{
    EditorHost, HostCallback, ListenerHandle, ListenerKind, NodeHandle, NodeRole, NodeUpdate,
    TextMetrics, WorkspaceInfo,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub old: FieldValue,
    pub new: FieldValue,
    pub group: GroupId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessNode {
    pub role: NodeRole,
    pub position: Point,
    pub size: OverlaySize,
    pub fill: Option<Color>,
    pub text: Option<String>,
    pub visible: bool,
    pub scroll_top: i32,
}

impl HeadlessNode {
    const fn new(role: NodeRole) -> Self {
        Self {
            role,
            position: Point::new(0, 0),
            size: OverlaySize::new(0, 0),
            fill: None,
            text: None,
            visible: true,
            scroll_top: 0,
        }
    }
}

/// In-memory host with fixed glyph metrics. Keeps every mounted node and listener so
/// callers can inspect what an overlay built and confirm teardown left nothing behind.
pub struct HeadlessHost {
    workspace: Cell<WorkspaceInfo>,
    viewport: Cell<ViewportFrame>,
    next_handle: Cell<u64>,
    nodes: RefCell<BTreeMap<NodeHandle, HeadlessNode>>,
    listeners: RefCell<BTreeMap<ListenerHandle, (NodeHandle, ListenerKind)>>,
    callbacks: RefCell<HashMap<String, HostCallback>>,
    changes: RefCell<Vec<ChangeRecord>>,
    stale_releases: Cell<usize>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(ViewportFrame::new(1024, 768))
    }
}

impl HeadlessHost {
    pub fn new(viewport: ViewportFrame) -> Self {
        Self {
            workspace: Cell::new(WorkspaceInfo::default()),
            viewport: Cell::new(viewport),
            next_handle: Cell::new(1),
            nodes: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(BTreeMap::new()),
            callbacks: RefCell::new(HashMap::new()),
            changes: RefCell::new(Vec::new()),
            stale_releases: Cell::new(0),
        }
    }

    pub fn set_viewport(&self, viewport: ViewportFrame) {
        self.viewport.set(viewport);
    }

    pub fn set_workspace(&self, workspace: WorkspaceInfo) {
        self.workspace.set(workspace);
    }

    pub fn register_callback(&self, key: impl Into<String>, callback: HostCallback) {
        self.callbacks.borrow_mut().insert(key.into(), callback);
    }

    pub fn live_node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn live_listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Removals of handles that were never mounted or already removed.
    pub fn stale_releases(&self) -> usize {
        self.stale_releases.get()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<HeadlessNode> {
        self.nodes.borrow().get(&handle).cloned()
    }

    pub fn nodes_matching(&self, predicate: impl Fn(&NodeRole) -> bool) -> Vec<HeadlessNode> {
        self.nodes
            .borrow()
            .values()
            .filter(|node| predicate(&node.role))
            .cloned()
            .collect()
    }

    pub fn first_node(&self, role: NodeRole) -> Option<HeadlessNode> {
        self.nodes
            .borrow()
            .values()
            .find(|node| node.role == role)
            .cloned()
    }

    pub fn changes(&self) -> Vec<ChangeRecord> {
        self.changes.borrow().clone()
    }

    /// Number of undo steps the recorded changes collapse into.
    pub fn undo_steps(&self) -> usize {
        self.changes
            .borrow()
            .iter()
            .map(|change| change.group)
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn allocate_handle(&self) -> u64 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle.saturating_add(1));
        handle
    }

    fn record_stale_release(&self, what: &'static str, handle: u64) {
        self.stale_releases.set(self.stale_releases.get() + 1);
        tracing::warn!(what, handle, "release of unknown handle");
    }
}

impl EditorHost for HeadlessHost {
    fn anchor_workspace(&self) -> WorkspaceInfo {
        self.workspace.get()
    }

    fn viewport(&self) -> ViewportFrame {
        self.viewport.get()
    }

    fn callback(&self, key: &str) -> Option<HostCallback> {
        self.callbacks.borrow().get(key).cloned()
    }

    fn notify_value_changed(&self, old: &FieldValue, new: &FieldValue, group: GroupId) {
        self.changes.borrow_mut().push(ChangeRecord {
            old: old.clone(),
            new: new.clone(),
            group,
        });
    }

    fn measure_text(&self, content: &str) -> TextMetrics {
        let glyphs = i32::try_from(content.chars().count()).unwrap_or(i32::MAX);
        TextMetrics {
            width: glyphs.saturating_mul(OVERLAY_TOKENS.glyph_width),
            height: OVERLAY_TOKENS.glyph_height,
        }
    }

    fn mount_node(&self, role: NodeRole) -> NodeHandle {
        let handle = NodeHandle(self.allocate_handle());
        self.nodes
            .borrow_mut()
            .insert(handle, HeadlessNode::new(role));
        handle
    }

    fn update_node(&self, node: NodeHandle, update: NodeUpdate) {
        let mut nodes = self.nodes.borrow_mut();
        let Some(entry) = nodes.get_mut(&node) else {
            tracing::warn!(?node, ?update, "update for unknown node");
            return;
        };
        match update {
            NodeUpdate::Position(position) => entry.position = position,
            NodeUpdate::Size(size) => entry.size = size,
            NodeUpdate::Fill(color) => entry.fill = Some(color),
            NodeUpdate::Text(text) => entry.text = Some(text),
            NodeUpdate::Visible(visible) => entry.visible = visible,
            NodeUpdate::ScrollTop(scroll_top) => entry.scroll_top = scroll_top,
        }
    }

    fn remove_node(&self, node: NodeHandle) {
        if self.nodes.borrow_mut().remove(&node).is_none() {
            self.record_stale_release("node", node.0);
        }
    }

    fn add_listener(&self, node: NodeHandle, kind: ListenerKind) -> ListenerHandle {
        let handle = ListenerHandle(self.allocate_handle());
        self.listeners.borrow_mut().insert(handle, (node, kind));
        handle
    }

    fn remove_listener(&self, listener: ListenerHandle) {
        if self.listeners.borrow_mut().remove(&listener).is_none() {
            self.record_stale_release("listener", listener.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_text_counts_characters_not_bytes() {
        let host = HeadlessHost::default();
        let metrics = host.measure_text("가나다");
        assert_eq!(metrics.width, 3 * OVERLAY_TOKENS.glyph_width);
        assert_eq!(metrics.height, OVERLAY_TOKENS.glyph_height);
    }

    #[test]
    fn removing_unknown_handles_is_counted() {
        let host = HeadlessHost::default();
        let node = host.mount_node(NodeRole::Container);
        host.remove_node(node);
        host.remove_node(node);
        host.remove_listener(ListenerHandle(99));
        assert_eq!(host.live_node_count(), 0);
        assert_eq!(host.stale_releases(), 2);
    }

    #[test]
    fn undo_steps_collapse_changes_by_group() {
        let host = HeadlessHost::default();
        host.notify_value_changed(
            &FieldValue::Number(1.0),
            &FieldValue::Number(2.0),
            GroupId::new(1),
        );
        host.notify_value_changed(
            &FieldValue::Number(2.0),
            &FieldValue::Number(3.0),
            GroupId::new(1),
        );
        host.notify_value_changed(
            &FieldValue::Number(3.0),
            &FieldValue::Number(4.0),
            GroupId::new(2),
        );
        assert_eq!(host.changes().len(), 3);
        assert_eq!(host.undo_steps(), 2);
    }

    #[test]
    fn updates_apply_to_mounted_nodes() {
        let host = HeadlessHost::default();
        let node = host.mount_node(NodeRole::Cell { index: 2 });
        host.update_node(node, NodeUpdate::Visible(false));
        host.update_node(node, NodeUpdate::Fill(Color::new(1, 2, 3)));
        let mounted = host.node(node).expect("node should be mounted");
        assert!(!mounted.visible);
        assert_eq!(mounted.fill, Some(Color::new(1, 2, 3)));
    }
}
