//! Floating editors opened from inline fields.
//!
//! Each variant composes an [`OverlayLifecycle`] with the grid, note and placement
//! pieces. The shared commit, dismiss and dispose paths live on [`FieldEditor`].

mod grid_picker;
mod label_button;
mod lifecycle;
mod note_picker;
mod tooltip;

use std::rc::Rc;

use crate::geometry::{AnchorRect, Color, OverlaySize, Point};
use crate::grid::{PageState, SelectionHighlight};
use crate::host::{EditorHost, ListenerKind, NodeHandle, NodeRole, NodeUpdate, PageDirection};
use crate::placement::Placement;
use crate::session::{GroupId, OverlayId, ResourceSet, SessionContext};
use crate::state::OverlayState;
use crate::value::{ChangeNotifier, FieldValue, SharedValue, ValueOutcome};

pub use grid_picker::GridPicker;
pub use label_button::{ButtonKind, ButtonSpec, IconSpec, ToolboxButton};
pub use lifecycle::{begin, OverlayLifecycle, SharedLifecycle};
pub use note_picker::NotePicker;
pub use tooltip::{SharedTooltips, TooltipSet};

/// What `open` reports back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle {
    pub id: OverlayId,
    pub placement: Placement,
    pub size: OverlaySize,
    pub group: Option<GroupId>,
}

pub trait FieldEditor {
    fn lifecycle(&self) -> &SharedLifecycle;

    /// The field this editor writes to. Buttons edit nothing.
    fn field(&self) -> Option<&SharedValue>;

    fn open(&mut self, session: &mut SessionContext, anchor: AnchorRect) -> OverlayHandle;

    fn display_text(&self) -> String;

    fn state(&self) -> OverlayState {
        self.lifecycle().borrow().state()
    }

    fn current_value(&self) -> Option<FieldValue> {
        self.field().map(|field| field.borrow().value().clone())
    }

    /// Writes `value` inside the overlay's group and closes the overlay. Returns `None`
    /// when no overlay was open to commit.
    fn commit(&mut self, session: &mut SessionContext, value: FieldValue) -> Option<ValueOutcome> {
        let lifecycle = Rc::clone(self.lifecycle());
        if !lifecycle.borrow_mut().begin_commit() {
            return None;
        }
        let group = session.current_group();
        let outcome = self
            .field()
            .map(|field| field.borrow_mut().set_value(value, group));
        if let Some(outcome) = &outcome {
            outcome.notify(&*session);
        }
        lifecycle.borrow_mut().release(session);
        outcome
    }

    /// Discards edits made while open by restoring the value captured at open.
    fn dismiss(&mut self, session: &mut SessionContext) {
        let lifecycle = Rc::clone(self.lifecycle());
        let snapshot = {
            let mut lifecycle = lifecycle.borrow_mut();
            if !lifecycle.begin_dismiss() {
                return;
            }
            lifecycle.snapshot().cloned()
        };
        if let (Some(previous), Some(field)) = (snapshot, self.field()) {
            let outcome = field
                .borrow_mut()
                .restore(previous, session.current_group());
            outcome.notify(&*session);
            tracing::debug!(restored = outcome.changed(), "overlay dismissed");
        }
        lifecycle.borrow_mut().release(session);
    }

    /// Releases everything the overlay registered. Safe to call any number of times.
    fn dispose(&mut self, session: &mut SessionContext) {
        self.lifecycle().borrow_mut().release(session);
    }
}

/// Mount handles for a row-paged overlay's navigation strip.
#[derive(Debug, Clone, Copy)]
struct PageControls {
    label: NodeHandle,
}

impl PageControls {
    fn mount(
        resources: &mut ResourceSet,
        host: &Rc<dyn EditorHost>,
        pages: &PageState,
        top: i32,
        width: i32,
        height: i32,
    ) -> Self {
        let button_width = height;
        let previous = resources.mount_node_with(
            host,
            NodeRole::PageNav(PageDirection::Previous),
            [
                NodeUpdate::Position(Point::new(0, top)),
                NodeUpdate::Size(OverlaySize::new(button_width, height)),
                NodeUpdate::Text("<".to_string()),
            ],
        );
        resources.listen(host, previous, ListenerKind::Click);
        let label = resources.mount_node_with(
            host,
            NodeRole::PageLabel,
            [
                NodeUpdate::Position(Point::new(button_width, top)),
                NodeUpdate::Size(OverlaySize::new(width - 2 * button_width, height)),
                NodeUpdate::Text(pages.label()),
            ],
        );
        let next = resources.mount_node_with(
            host,
            NodeRole::PageNav(PageDirection::Next),
            [
                NodeUpdate::Position(Point::new(width - button_width, top)),
                NodeUpdate::Size(OverlaySize::new(button_width, height)),
                NodeUpdate::Text(">".to_string()),
            ],
        );
        resources.listen(host, next, ListenerKind::Click);
        Self { label }
    }
}

/// Per-open view state shared by the grid and note pickers.
struct ItemView {
    host: Rc<dyn EditorHost>,
    items: Vec<NodeHandle>,
    rows: Vec<usize>,
    fills: Vec<Color>,
    selection: SelectionHighlight,
    pages: Option<PageState>,
    page_controls: Option<PageControls>,
}

impl ItemView {
    fn highlight(&mut self, index: usize) -> bool {
        let Some(change) = self.selection.select(index, &mut self.fills) else {
            return false;
        };
        if let Some((previous, fill)) = change.restored {
            if let Some(node) = self.items.get(previous) {
                self.host.update_node(*node, NodeUpdate::Fill(fill));
            }
        }
        let (applied, fill) = change.applied;
        if let Some(node) = self.items.get(applied) {
            self.host.update_node(*node, NodeUpdate::Fill(fill));
        }
        true
    }

    fn clear_highlight(&mut self) -> bool {
        let Some((index, fill)) = self.selection.clear(&mut self.fills) else {
            return false;
        };
        if let Some(node) = self.items.get(index) {
            self.host.update_node(*node, NodeUpdate::Fill(fill));
        }
        true
    }

    /// Moves one row block and refreshes the label, even when already at the edge.
    fn turn_page(&mut self, direction: PageDirection) -> bool {
        let Some(pages) = self.pages.as_mut() else {
            return false;
        };
        let change = match direction {
            PageDirection::Next => pages.next_page(),
            PageDirection::Previous => pages.previous_page(),
        };
        let label = pages.label();
        if let Some(controls) = self.page_controls {
            self.host
                .update_node(controls.label, NodeUpdate::Text(label));
        }
        let Some(change) = change else {
            return false;
        };
        for (node, row) in self.items.iter().zip(&self.rows) {
            if change.shown.contains(row) {
                self.host.update_node(*node, NodeUpdate::Visible(true));
            } else if change.hidden.contains(row) {
                self.host.update_node(*node, NodeUpdate::Visible(false));
            }
        }
        true
    }
}
