use std::cell::OnceCell;
use std::rc::Rc;
use std::time::Duration;

use crate::audio::{tone_service_or_silent, IdleStopGuard, TimerHost, ToneService};
use crate::config::ResolvedPickerConfig;
use crate::geometry::{AnchorRect, Color, OverlaySize, Point};
use crate::grid::{
    layout_piano, piano_strip_width, PageState, SelectionHighlight, KEYS_PER_OCTAVE,
};
use crate::host::{ListenerKind, NodeHandle, NodeRole, NodeUpdate, PageDirection};
use crate::notes::{self, NoteEntry};
use crate::placement::{place, PlacementRequest};
use crate::session::{ResourceKind, SessionContext};
use crate::ui::{OverlayStyleTokens, OVERLAY_TOKENS};
use crate::value::{ChangeNotifier, FieldValue, SharedValue, ValueOutcome};

use super::lifecycle::{begin, OverlayLifecycle, SharedLifecycle};
use super::{FieldEditor, ItemView, OverlayHandle, PageControls};

const SECONDARY_KEY_FILL: Color = Color::new(0, 0, 0);

/// Piano keyboard editing a frequency in Hz, previewing each key through the tone service.
pub struct NotePicker {
    config: ResolvedPickerConfig,
    tokens: OverlayStyleTokens,
    field: SharedValue,
    lifecycle: SharedLifecycle,
    entries: OnceCell<Vec<NoteEntry>>,
    tone: Rc<dyn ToneService>,
    timers: Rc<dyn TimerHost>,
    guard: IdleStopGuard,
    view: Option<ItemView>,
}

impl NotePicker {
    pub fn new(
        config: ResolvedPickerConfig,
        field: SharedValue,
        tone: Option<Rc<dyn ToneService>>,
        timers: Rc<dyn TimerHost>,
    ) -> Self {
        Self {
            config,
            tokens: OVERLAY_TOKENS,
            field,
            lifecycle: OverlayLifecycle::shared(),
            entries: OnceCell::new(),
            tone: tone_service_or_silent(tone),
            timers,
            guard: IdleStopGuard::new(),
            view: None,
        }
    }

    /// Note table for the configured keyboard, built on first use.
    pub fn entries(&self) -> &[NoteEntry] {
        self.entries
            .get_or_init(|| notes::note_table(self.config.key_count))
    }

    fn live_view(&self) -> Option<&ItemView> {
        if !self.state().accepts_interaction() {
            return None;
        }
        self.view.as_ref()
    }

    /// Highlighted key while the keyboard is open.
    pub fn selected(&self) -> Option<usize> {
        self.live_view().and_then(|view| view.selection.selected())
    }

    pub fn page_state(&self) -> Option<PageState> {
        self.live_view().and_then(|view| view.pages)
    }

    pub fn set_muted(&self, muted: bool) {
        self.tone.set_muted(muted);
    }

    fn matching_key(&self, frequency: f64) -> Option<usize> {
        notes::matching_entry(self.entries(), frequency, self.tokens.note_match_epsilon_hz)
    }

    /// Plays key `index` and writes its frequency inside the open group. The tone stops
    /// after the idle delay unless another key is pressed first.
    pub fn activate_key(&mut self, session: &mut SessionContext, index: usize) -> Option<ValueOutcome> {
        if !self.state().accepts_interaction() {
            return None;
        }
        let frequency = self.entries().get(index)?.frequency_hz;

        self.tone.stop_tone();
        self.tone.play_tone(frequency, self.tokens.tone_gain);
        let group = session.current_group();
        let outcome = self
            .field
            .borrow_mut()
            .set_value(FieldValue::Number(frequency), group);
        outcome.notify(&*session);
        self.follow_value(&outcome);
        self.guard.schedule_stop(
            self.timers.as_ref(),
            Duration::from_millis(u64::from(self.tokens.note_idle_stop_ms)),
            Rc::clone(&self.tone),
        );
        Some(outcome)
    }

    /// Accepts whatever value the keyboard currently holds.
    pub fn accept(&mut self, session: &mut SessionContext) -> Option<ValueOutcome> {
        let current = self.field.borrow().value().clone();
        self.commit(session, current)
    }

    /// Typed frequency entry. Non-numeric text is declined without touching the value.
    pub fn set_text_value(&mut self, session: &mut SessionContext, text: &str) -> ValueOutcome {
        let group = session.current_group();
        let outcome = self.field.borrow_mut().set_text(text, group);
        outcome.notify(&*session);
        if self.state().accepts_interaction() {
            self.follow_value(&outcome);
        }
        outcome
    }

    /// Moves the highlight to the key holding the stored frequency. A validator may
    /// have replaced the requested one; a value off the keyboard clears the highlight.
    fn follow_value(&mut self, outcome: &ValueOutcome) {
        let Some(stored) = outcome.current() else {
            return;
        };
        let key = stored
            .as_number()
            .and_then(|frequency| self.matching_key(frequency));
        let Some(view) = self.view.as_mut() else {
            return;
        };
        match key {
            Some(index) => {
                view.highlight(index);
            }
            None => {
                view.clear_highlight();
            }
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.turn_page(PageDirection::Next)
    }

    pub fn previous_page(&mut self) -> bool {
        self.turn_page(PageDirection::Previous)
    }

    fn turn_page(&mut self, direction: PageDirection) -> bool {
        if !self.state().accepts_interaction() {
            return false;
        }
        self.view
            .as_mut()
            .is_some_and(|view| view.turn_page(direction))
    }
}

impl FieldEditor for NotePicker {
    fn lifecycle(&self) -> &SharedLifecycle {
        &self.lifecycle
    }

    fn field(&self) -> Option<&SharedValue> {
        Some(&self.field)
    }

    /// Opens the keyboard. A paged keyboard starts on the octave holding the current
    /// frequency rather than on the first octave, so the selected key is always visible.
    fn open(&mut self, session: &mut SessionContext, anchor: AnchorRect) -> OverlayHandle {
        let current = self.field.borrow().value().clone();
        let id = begin(&self.lifecycle, session, Some(current.clone()));
        let host = Rc::clone(session.host());
        let workspace = host.anchor_workspace();
        let viewport = host.viewport();

        let key_count = self.entries().len();
        let frequency = current.as_number();
        let selected = frequency.and_then(|frequency| self.matching_key(frequency));
        let start_key = selected
            .or_else(|| frequency.and_then(|frequency| notes::nearest_entry(self.entries(), frequency)))
            .unwrap_or(0);

        let paged = piano_strip_width(key_count, &self.tokens) > self.config.width;
        let layout = layout_piano(key_count, paged, &self.tokens);
        let pages = paged.then(|| {
            PageState::new(layout.rows, 1).starting_at_row(start_key / KEYS_PER_OCTAVE)
        });

        let body_width = if paged {
            layout.row_width
        } else {
            layout.content_width
        };
        let nav_height = if paged { self.tokens.page_nav_height } else { 0 };
        let size = OverlaySize::new(body_width, layout.content_height + nav_height);
        let placement = place(
            PlacementRequest::new(anchor, size, viewport)
                .right_to_left(workspace.right_to_left)
                .compact_device(workspace.compact_device),
        );

        let mut lifecycle = self.lifecycle.borrow_mut();
        let resources = lifecycle.resources_mut();
        resources.mount_node_with(
            &host,
            NodeRole::Container,
            [
                NodeUpdate::Position(Point::new(placement.x, placement.y)),
                NodeUpdate::Size(size),
                NodeUpdate::Fill(self.config.background_color),
            ],
        );

        // White keys first so the black keys mount on top of them.
        let mut slots: Vec<Option<NodeHandle>> = vec![None; layout.items.len()];
        let mut fills = vec![self.config.item_color; layout.items.len()];
        let ordered = layout
            .items
            .iter()
            .filter(|item| !item.secondary)
            .chain(layout.items.iter().filter(|item| item.secondary));
        for item in ordered {
            let fill = if item.secondary {
                SECONDARY_KEY_FILL
            } else {
                self.config.item_color
            };
            let visible = pages
                .as_ref()
                .map_or(true, |pages| pages.is_row_visible(item.row));
            let node = resources.mount_node_with(
                &host,
                NodeRole::Key { index: item.index },
                [
                    NodeUpdate::Position(Point::new(item.x, item.y)),
                    NodeUpdate::Size(OverlaySize::new(item.width, item.height)),
                    NodeUpdate::Fill(fill),
                    NodeUpdate::Visible(visible),
                ],
            );
            resources.listen(&host, node, ListenerKind::Click);
            slots[item.index] = Some(node);
            fills[item.index] = fill;
        }
        let items = slots.into_iter().flatten().collect::<Vec<_>>();
        let rows = layout.items.iter().map(|item| item.row).collect();

        let tone = Rc::clone(&self.tone);
        let guard = self.guard.clone();
        resources.acquire(ResourceKind::Audio, "tone", move || {
            guard.invalidate();
            tone.stop_tone();
        });

        let page_controls = pages.as_ref().map(|pages| {
            PageControls::mount(
                resources,
                &host,
                pages,
                layout.content_height,
                body_width,
                nav_height,
            )
        });

        let mut view = ItemView {
            host: Rc::clone(&host),
            items,
            rows,
            fills,
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
            keys = key_count,
            paged,
            selected = ?selected,
            "note picker opened"
        );
        self.view = Some(view);

        OverlayHandle {
            id,
            placement,
            size,
            group,
        }
    }

    fn display_text(&self) -> String {
        match self.field.borrow().value() {
            FieldValue::Number(frequency) => notes::display_text(
                self.entries(),
                *frequency,
                self.tokens.note_match_epsilon_hz,
            ),
            FieldValue::Text(text) => text.clone(),
        }
    }
}
