use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::Point;
use crate::host::{EditorHost, NodeHandle, NodeUpdate};

pub type SharedTooltips = Rc<RefCell<TooltipSet>>;

/// Per-item tooltips of one grid overlay. They show immediately and follow the pointer
/// at a fixed offset; at most one is visible.
#[derive(Debug)]
pub struct TooltipSet {
    offset: Point,
    nodes: Vec<(usize, NodeHandle)>,
    visible: Option<usize>,
}

impl TooltipSet {
    pub fn shared(offset: Point) -> SharedTooltips {
        Rc::new(RefCell::new(Self {
            offset,
            nodes: Vec::new(),
            visible: None,
        }))
    }

    pub fn register(&mut self, index: usize, node: NodeHandle) {
        self.nodes.push((index, node));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn visible(&self) -> Option<usize> {
        self.visible
    }

    fn node_for(&self, index: usize) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(item, _)| *item == index)
            .map(|(_, node)| *node)
    }

    pub fn follow(&mut self, host: &dyn EditorHost, index: usize, pointer: Point) -> bool {
        let Some(node) = self.node_for(index) else {
            return false;
        };
        if self.visible != Some(index) {
            self.hide(host);
            host.update_node(node, NodeUpdate::Visible(true));
            self.visible = Some(index);
        }
        host.update_node(
            node,
            NodeUpdate::Position(pointer.offset(self.offset.x, self.offset.y)),
        );
        true
    }

    pub fn hide(&mut self, host: &dyn EditorHost) {
        if let Some(node) = self.visible.take().and_then(|index| self.node_for(index)) {
            host.update_node(node, NodeUpdate::Visible(false));
        }
    }

    /// Forgets every tooltip. Node removal itself belongs to the overlay's resources.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.visible = None;
    }
}
