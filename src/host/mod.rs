//! Contracts consumed from the host canvas. The overlay subsystem never renders
//! on its own; it asks the host to mount nodes, attach listeners and apply updates.

mod headless;

use std::rc::Rc;

use crate::geometry::{Color, OverlaySize, Point, ViewportFrame};
use crate::session::GroupId;
use crate::value::FieldValue;

pub use headless::{ChangeRecord, HeadlessHost, HeadlessNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkspaceInfo {
    pub right_to_left: bool,
    pub compact_device: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Container,
    Cell { index: usize },
    Key { index: usize },
    PageNav(PageDirection),
    PageLabel,
    Tooltip { index: usize },
    Button,
}

impl NodeRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Cell { .. } => "cell",
            Self::Key { .. } => "key",
            Self::PageNav(PageDirection::Previous) => "page-previous",
            Self::PageNav(PageDirection::Next) => "page-next",
            Self::PageLabel => "page-label",
            Self::Tooltip { .. } => "tooltip",
            Self::Button => "button",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Click,
    PointerMove,
    PointerLeave,
}

impl ListenerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::PointerMove => "pointer-move",
            Self::PointerLeave => "pointer-leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeUpdate {
    Position(Point),
    Size(OverlaySize),
    Fill(Color),
    Text(String),
    Visible(bool),
    ScrollTop(i32),
}

/// Button callback. Receives the button's label text.
pub type HostCallback = Rc<dyn Fn(&str)>;

pub trait EditorHost {
    fn anchor_workspace(&self) -> WorkspaceInfo;
    fn viewport(&self) -> ViewportFrame;
    fn callback(&self, key: &str) -> Option<HostCallback>;
    fn notify_value_changed(&self, old: &FieldValue, new: &FieldValue, group: GroupId);
    fn measure_text(&self, content: &str) -> TextMetrics;

    fn mount_node(&self, role: NodeRole) -> NodeHandle;
    fn update_node(&self, node: NodeHandle, update: NodeUpdate);
    fn remove_node(&self, node: NodeHandle);
    fn add_listener(&self, node: NodeHandle, kind: ListenerKind) -> ListenerHandle;
    fn remove_listener(&self, listener: ListenerHandle);
}
