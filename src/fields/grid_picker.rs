use std::rc::Rc;

use crate::config::ResolvedPickerConfig;
use crate::geometry::{AnchorRect, OverlaySize, Point};
use crate::grid::{
    layout_uniform, scroll_frame, GridModel, OptionContent, PageState, ScrollFrame,
    SelectionHighlight,
};
use crate::host::{EditorHost, ListenerKind, NodeRole, NodeUpdate, PageDirection};
use crate::placement::{place, PlacementRequest};
use crate::session::{ResourceKind, SessionContext};
use crate::ui::{OverlayStyleTokens, OVERLAY_TOKENS};
use crate::value::{SharedValue, ValueOutcome};

use super::lifecycle::{begin, OverlayLifecycle, SharedLifecycle};
use super::tooltip::{SharedTooltips, TooltipSet};
use super::{FieldEditor, ItemView, OverlayHandle, PageControls};

/// Dropdown-style grid of text or image choices.
pub struct GridPicker {
    model: GridModel,
    config: ResolvedPickerConfig,
    tokens: OverlayStyleTokens,
    field: SharedValue,
    lifecycle: SharedLifecycle,
    view: Option<ItemView>,
    tooltips: Option<SharedTooltips>,
    scroll: Option<ScrollFrame>,
}

impl GridPicker {
    pub fn new(model: GridModel, config: ResolvedPickerConfig, field: SharedValue) -> Self {
        Self {
            model,
            config,
            tokens: OVERLAY_TOKENS,
            field,
            lifecycle: OverlayLifecycle::shared(),
            view: None,
            tooltips: None,
            scroll: None,
        }
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    fn live_view(&self) -> Option<&ItemView> {
        if !self.state().accepts_interaction() {
            return None;
        }
        self.view.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.live_view().and_then(|view| view.selection.selected())
    }

    pub fn page_state(&self) -> Option<PageState> {
        self.live_view().and_then(|view| view.pages)
    }

    pub fn scroll_frame(&self) -> Option<ScrollFrame> {
        self.live_view().and(self.scroll)
    }

    fn interactive_view(&mut self) -> Option<&mut ItemView> {
        if !self.state().accepts_interaction() {
            return None;
        }
        self.view.as_mut()
    }

    /// Commits the option at `index`.
    pub fn activate(&mut self, session: &mut SessionContext, index: usize) -> Option<ValueOutcome> {
        if !self.state().accepts_interaction() {
            return None;
        }
        let value = self.model.option(index)?.value.clone();
        self.commit(session, value)
    }

    pub fn highlight(&mut self, index: usize) -> bool {
        self.interactive_view()
            .is_some_and(|view| view.highlight(index))
    }

    pub fn pointer_moved(&mut self, index: usize, pointer: Point) -> bool {
        let Some(host) = self.interactive_view().map(|view| Rc::clone(&view.host)) else {
            return false;
        };
        self.tooltips
            .as_ref()
            .is_some_and(|tooltips| tooltips.borrow_mut().follow(host.as_ref(), index, pointer))
    }

    pub fn pointer_left(&mut self) {
        let Some(host) = self.interactive_view().map(|view| Rc::clone(&view.host)) else {
            return;
        };
        if let Some(tooltips) = &self.tooltips {
            tooltips.borrow_mut().hide(host.as_ref());
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.interactive_view()
            .is_some_and(|view| view.turn_page(PageDirection::Next))
    }

    pub fn previous_page(&mut self) -> bool {
        self.interactive_view()
            .is_some_and(|view| view.turn_page(PageDirection::Previous))
    }

    fn cell_size(&self, host: &dyn EditorHost) -> OverlaySize {
        let (width, height) = self
            .model
            .options()
            .iter()
            .map(|option| match &option.content {
                OptionContent::Text(label) => {
                    let metrics = host.measure_text(label);
                    (metrics.width, metrics.height)
                }
                OptionContent::Image { width, height, .. } => (*width, *height),
            })
            .fold((0, 0), |(w, h), (item_w, item_h)| (w.max(item_w), h.max(item_h)));
        let padding = 2 * self.tokens.grid_cell_padding;
        OverlaySize::new(
            (width + padding).max(self.tokens.grid_min_cell_width),
            height + padding,
        )
    }
}

impl FieldEditor for GridPicker {
    fn lifecycle(&self) -> &SharedLifecycle {
        &self.lifecycle
    }

    fn field(&self) -> Option<&SharedValue> {
        Some(&self.field)
    }

    fn open(&mut self, session: &mut SessionContext, anchor: AnchorRect) -> OverlayHandle {
        let current = self.field.borrow().value().clone();
        let id = begin(&self.lifecycle, session, Some(current.clone()));
        let host = Rc::clone(session.host());
        let workspace = host.anchor_workspace();
        let viewport = host.viewport();

        let cell = self.cell_size(host.as_ref());
        let layout = layout_uniform(&self.model, cell);
        let selected = self.model.position_of_value(&current);
        self.scroll = scroll_frame(
            OverlaySize::new(layout.content_width, layout.content_height),
            layout.row_height,
            self.model.max_visible_rows(),
            selected.map(|index| self.model.row_of(index)),
            self.tokens.scrollbar_allowance,
        );
        // A scrolling grid never paginates.
        let pages = (self.scroll.is_none() && layout.exceeds_width(self.config.width))
            .then(|| PageState::new(layout.rows, layout.rows));

        let (body_width, body_height) = match self.scroll {
            Some(frame) => (frame.width, frame.height),
            None => (layout.content_width, layout.content_height),
        };
        let nav_height = if pages.is_some() {
            self.tokens.page_nav_height
        } else {
            0
        };
        let size = OverlaySize::new(body_width, body_height + nav_height);
        let placement = place(
            PlacementRequest::new(anchor, size, viewport)
                .right_to_left(workspace.right_to_left)
                .compact_device(workspace.compact_device),
        );

        let tooltips = self
            .config
            .tooltips
            .then(|| TooltipSet::shared(self.config.tooltip_offset));
        let mut lifecycle = self.lifecycle.borrow_mut();
        let resources = lifecycle.resources_mut();

        let container = resources.mount_node_with(
            &host,
            NodeRole::Container,
            [
                NodeUpdate::Position(Point::new(placement.x, placement.y)),
                NodeUpdate::Size(size),
                NodeUpdate::Fill(self.config.background_color),
            ],
        );

        let mut items = Vec::with_capacity(layout.items.len());
        let mut rows = Vec::with_capacity(layout.items.len());
        for (item, option) in layout.items.iter().zip(self.model.options()) {
            let visible = pages
                .as_ref()
                .map_or(true, |pages| pages.is_row_visible(item.row));
            let node = resources.mount_node_with(
                &host,
                NodeRole::Cell { index: item.index },
                [
                    NodeUpdate::Position(Point::new(item.x, item.y)),
                    NodeUpdate::Size(OverlaySize::new(item.width, item.height)),
                    NodeUpdate::Fill(self.config.item_color),
                    NodeUpdate::Text(option.caption().to_string()),
                    NodeUpdate::Visible(visible),
                ],
            );
            resources.listen(&host, node, ListenerKind::Click);
            if tooltips.is_some() {
                resources.listen(&host, node, ListenerKind::PointerMove);
                resources.listen(&host, node, ListenerKind::PointerLeave);
            }
            items.push(node);
            rows.push(item.row);
        }

        if let Some(tooltips) = &tooltips {
            for (index, option) in self.model.options().iter().enumerate() {
                let node = resources.mount_node_with(
                    &host,
                    NodeRole::Tooltip { index },
                    [
                        NodeUpdate::Text(option.caption().to_string()),
                        NodeUpdate::Visible(false),
                    ],
                );
                tooltips.borrow_mut().register(index, node);
            }
            let registered = Rc::clone(tooltips);
            resources.acquire(ResourceKind::Tooltip, "tooltip-set", move || {
                registered.borrow_mut().clear();
            });
        }

        let page_controls = pages.as_ref().map(|pages| {
            PageControls::mount(
                resources,
                &host,
                pages,
                body_height,
                body_width,
                nav_height,
            )
        });

        if let Some(frame) = self.scroll {
            host.update_node(container, NodeUpdate::ScrollTop(frame.scroll_top));
        }

        let mut view = ItemView {
            host: Rc::clone(&host),
            fills: vec![self.config.item_color; items.len()],
            items,
            rows,
            selection: SelectionHighlight::new(self.config.highlight_color),
            pages,
            page_controls,
        };
        if let Some(index) = selected {
            view.highlight(index);
        }

        lifecycle.ready(placement);
        let group = lifecycle.group();
        drop(lifecycle);

        tracing::debug!(
            overlay = %id,
            options = self.model.len(),
            rows = layout.rows,
            paged = view.pages.is_some(),
            scrolled = self.scroll.is_some(),
            "grid picker opened"
        );
        self.view = Some(view);
        self.tooltips = tooltips;

        OverlayHandle {
            id,
            placement,
            size,
            group,
        }
    }

    fn display_text(&self) -> String {
        let field = self.field.borrow();
        let current = field.value();
        self.model
            .position_of_value(current)
            .and_then(|index| self.model.option(index))
            .map_or_else(|| current.to_string(), |option| option.caption().to_string())
    }
}
