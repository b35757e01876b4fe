//! End-to-end overlay sessions against the headless host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use field_overlay::audio::{DeferredTimers, ToneService};
use field_overlay::config::{ButtonConfig, PickerConfig, DEFAULT_HIGHLIGHT_COLOR};
use field_overlay::fields::{ButtonSpec, FieldEditor, GridPicker, NotePicker, ToolboxButton};
use field_overlay::geometry::{AnchorRect, Point, ViewportFrame};
use field_overlay::grid::{GridModel, GridOption};
use field_overlay::host::{
    EditorHost, HeadlessHost, HostCallback, ListenerHandle, ListenerKind, NodeHandle, NodeRole,
    NodeUpdate, TextMetrics, WorkspaceInfo,
};
use field_overlay::session::{GroupId, SessionContext};
use field_overlay::state::OverlayState;
use field_overlay::value::{EditableValue, FieldValue, SharedValue};

#[derive(Default)]
struct ToneLog {
    events: RefCell<Vec<String>>,
}

impl ToneLog {
    fn stops(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| *event == "stop")
            .count()
    }
}

impl ToneService for ToneLog {
    fn play_tone(&self, frequency_hz: f64, _gain: f32) {
        self.events
            .borrow_mut()
            .push(format!("play {frequency_hz:.2}"));
    }

    fn stop_tone(&self) {
        self.events.borrow_mut().push("stop".to_string());
    }

    fn set_muted(&self, _muted: bool) {}
}

/// Re-reads the edited field on every change, the way a block renderer refreshes its label.
struct RerenderingHost {
    inner: HeadlessHost,
    field: RefCell<Option<SharedValue>>,
    rendered: RefCell<Vec<FieldValue>>,
}

impl RerenderingHost {
    fn watching(field: &SharedValue) -> Rc<Self> {
        Rc::new(Self {
            inner: HeadlessHost::default(),
            field: RefCell::new(Some(Rc::clone(field))),
            rendered: RefCell::new(Vec::new()),
        })
    }
}

impl EditorHost for RerenderingHost {
    fn anchor_workspace(&self) -> WorkspaceInfo {
        self.inner.anchor_workspace()
    }

    fn viewport(&self) -> ViewportFrame {
        self.inner.viewport()
    }

    fn callback(&self, key: &str) -> Option<HostCallback> {
        self.inner.callback(key)
    }

    fn notify_value_changed(&self, old: &FieldValue, new: &FieldValue, group: GroupId) {
        if let Some(field) = self.field.borrow().as_ref() {
            let shown = field.borrow().value().clone();
            self.rendered.borrow_mut().push(shown);
        }
        self.inner.notify_value_changed(old, new, group);
    }

    fn measure_text(&self, content: &str) -> TextMetrics {
        self.inner.measure_text(content)
    }

    fn mount_node(&self, role: NodeRole) -> NodeHandle {
        self.inner.mount_node(role)
    }

    fn update_node(&self, node: NodeHandle, update: NodeUpdate) {
        self.inner.update_node(node, update);
    }

    fn remove_node(&self, node: NodeHandle) {
        self.inner.remove_node(node);
    }

    fn add_listener(&self, node: NodeHandle, kind: ListenerKind) -> ListenerHandle {
        self.inner.add_listener(node, kind)
    }

    fn remove_listener(&self, listener: ListenerHandle) {
        self.inner.remove_listener(listener);
    }
}

fn session() -> (Rc<HeadlessHost>, SessionContext) {
    let host = Rc::new(HeadlessHost::new(ViewportFrame::new(1024, 768)));
    let session = SessionContext::new(host.clone());
    (host, session)
}

fn numbered_grid(count: usize, config: PickerConfig, selected: f64) -> (GridPicker, SharedValue) {
    let resolved = config.resolve();
    let options = (0..count)
        .map(|index| GridOption::text(format!("{index:02}"), FieldValue::Number(index as f64)))
        .collect();
    let field = EditableValue::new(FieldValue::Number(selected)).shared();
    let picker = GridPicker::new(
        GridModel::new(options, resolved.columns, resolved.max_rows),
        resolved,
        field.clone(),
    );
    (picker, field)
}

fn note_picker(
    key_count: usize,
    frequency: f64,
) -> (NotePicker, SharedValue, Rc<ToneLog>, Rc<DeferredTimers>) {
    let tone = Rc::new(ToneLog::default());
    let timers = Rc::new(DeferredTimers::new());
    let field = EditableValue::new(FieldValue::Number(frequency)).shared();
    let config = PickerConfig {
        key_count,
        ..PickerConfig::default()
    }
    .resolve();
    let service: Rc<dyn ToneService> = tone.clone();
    let picker = NotePicker::new(config, field.clone(), Some(service), timers.clone());
    (picker, field, tone, timers)
}

fn anchor() -> AnchorRect {
    AnchorRect::new(200, 120, 80, 24)
}

fn assert_clean(host: &HeadlessHost) {
    assert_eq!(host.live_node_count(), 0, "nodes left mounted");
    assert_eq!(host.live_listener_count(), 0, "listeners left attached");
    assert_eq!(host.stale_releases(), 0, "handles released twice");
}

#[test]
fn dispose_is_idempotent_for_every_variant() {
    let (host, mut session) = session();

    let (mut grid, _) = numbered_grid(9, PickerConfig::default(), 3.0);
    grid.open(&mut session, anchor());
    grid.dispose(&mut session);
    grid.dispose(&mut session);
    assert_clean(&host);

    let (mut notes, _, _, _) = note_picker(36, 261.63);
    notes.open(&mut session, anchor());
    notes.dispose(&mut session);
    notes.dispose(&mut session);
    assert_clean(&host);

    let mut button = ToolboxButton::new(ButtonSpec::label("Motion"), ButtonConfig::default());
    button.open(&mut session, anchor());
    button.dispose(&mut session);
    button.dispose(&mut session);
    assert_clean(&host);

    assert!(!session.events().is_open());
    assert_eq!(session.active_overlay(), None);
}

#[test]
fn opening_a_second_overlay_closes_the_first() {
    let (host, mut session) = session();
    let (mut grid, _) = numbered_grid(6, PickerConfig::default(), 0.0);
    let (mut notes, _, _, _) = note_picker(12, 261.63);

    let first = grid.open(&mut session, anchor());
    let second = notes.open(&mut session, anchor());

    assert_eq!(grid.state(), OverlayState::Closed);
    assert_eq!(notes.state(), OverlayState::Open);
    assert_eq!(session.active_overlay(), Some(second.id));
    assert_ne!(first.group, second.group);
    assert!(host
        .nodes_matching(|role| matches!(role, NodeRole::Cell { .. }))
        .is_empty());
    assert_eq!(
        host.nodes_matching(|role| matches!(role, NodeRole::Key { .. }))
            .len(),
        12
    );

    notes.dispose(&mut session);
    assert_clean(&host);
}

#[test]
fn host_can_dispose_whatever_is_open() {
    let (host, mut session) = session();
    let (mut grid, _) = numbered_grid(4, PickerConfig::default(), 0.0);
    grid.open(&mut session, anchor());

    assert!(session.dispose_active());
    assert!(!session.dispose_active());
    assert_eq!(grid.state(), OverlayState::Closed);
    assert_clean(&host);
}

#[test]
fn seventeen_options_in_four_columns() {
    let (host, mut session) = session();

    let (mut grid, _) = numbered_grid(17, PickerConfig::default(), 16.0);
    grid.open(&mut session, anchor());
    assert_eq!(grid.model().row_count(), 5);
    assert!(grid.page_state().is_none(), "fits the default width budget");
    assert!(grid.scroll_frame().is_none(), "no row limit configured");
    grid.dispose(&mut session);

    let narrow = PickerConfig {
        width: 100,
        ..PickerConfig::default()
    };
    let (mut grid, _) = numbered_grid(17, narrow, 16.0);
    grid.open(&mut session, anchor());
    assert!(grid.page_state().is_some(), "width overflow paginates");
    grid.dispose(&mut session);

    let limited = PickerConfig {
        max_rows: 3,
        ..PickerConfig::default()
    };
    let (mut grid, _) = numbered_grid(17, limited, 16.0);
    let handle = grid.open(&mut session, anchor());
    let frame = grid.scroll_frame().expect("five rows exceed three");
    assert_eq!(frame.height, 3 * 32);
    assert_eq!(handle.size.height, 3 * 32);
    assert_eq!(handle.size.width, 4 * 32 + 16);
    assert_eq!(frame.scroll_top, frame.max_scroll);
    let container = host
        .first_node(NodeRole::Container)
        .expect("container mounted");
    assert_eq!(container.scroll_top, frame.scroll_top);
    grid.dispose(&mut session);
    assert_clean(&host);
}

#[test]
fn only_one_cell_is_ever_highlighted() {
    let (host, mut session) = session();
    let (mut grid, _) = numbered_grid(8, PickerConfig::default(), 1.0);
    grid.open(&mut session, anchor());

    for index in [3, 5, 5, 0, 7] {
        grid.highlight(index);
        let highlighted = host
            .nodes_matching(|role| matches!(role, NodeRole::Cell { .. }))
            .into_iter()
            .filter(|node| node.fill == Some(DEFAULT_HIGHLIGHT_COLOR))
            .count();
        assert_eq!(highlighted, 1);
    }
    assert_eq!(grid.selected(), Some(7));
}

#[test]
fn stale_idle_timer_never_stops_newer_audio() {
    let (_host, mut session) = session();
    let (mut notes, _, tone, timers) = note_picker(12, 261.63);
    notes.open(&mut session, anchor());

    notes.activate_key(&mut session, 0);
    timers.advance(Duration::from_millis(300));
    notes.activate_key(&mut session, 4);
    let stops_after_second_press = tone.stops();

    timers.advance(Duration::from_millis(200));
    assert_eq!(tone.stops(), stops_after_second_press, "first timer is stale");

    timers.advance(Duration::from_millis(300));
    assert_eq!(tone.stops(), stops_after_second_press + 1);
    assert_eq!(
        tone.events.borrow().last().map(String::as_str),
        Some("stop")
    );
}

#[test]
fn dismiss_restores_the_value_in_one_undo_step() {
    let (host, mut session) = session();
    let (mut notes, field, _, _) = note_picker(12, 261.63);
    let handle = notes.open(&mut session, anchor());

    notes.activate_key(&mut session, 4);
    notes.activate_key(&mut session, 7);
    notes.dismiss(&mut session);

    assert_eq!(field.borrow().value(), &FieldValue::Number(261.63));
    let changes = host.changes();
    assert_eq!(changes.len(), 3);
    assert!(changes.iter().all(|change| Some(change.group) == handle.group));
    assert_eq!(host.undo_steps(), 1);
    assert!(!session.events().is_open());
    assert_clean(&host);
}

#[test]
fn dismiss_without_edits_emits_nothing() {
    let (host, mut session) = session();
    let (mut grid, _) = numbered_grid(5, PickerConfig::default(), 2.0);
    grid.open(&mut session, anchor());
    grid.dismiss(&mut session);

    assert!(host.changes().is_empty());
    assert_clean(&host);
}

#[test]
fn default_note_table_starts_at_low_c() {
    let (notes, _, _, _) = note_picker(36, 261.63);
    let entries = notes.entries();
    assert_eq!(entries.len(), 36);
    assert_eq!(entries[0].name, "Low C");
    assert!((entries[0].frequency_hz - 261.63).abs() < 0.01);
    assert_eq!(notes.display_text(), "Low C");
}

#[test]
fn paging_keeps_exactly_one_octave_visible() {
    let (host, mut session) = session();
    let (mut notes, _, _, _) = note_picker(36, 261.63);
    notes.open(&mut session, anchor());

    let visible_keys = || {
        host.nodes_matching(|role| matches!(role, NodeRole::Key { .. }))
            .into_iter()
            .filter(|node| node.visible)
            .count()
    };
    assert_eq!(visible_keys(), 12);

    for forward in [true, true, true, false, false, false, false] {
        if forward {
            notes.next_page();
        } else {
            notes.previous_page();
        }
        let pages = notes.page_state().expect("36 keys paginate");
        assert!(pages.current_page() < pages.total_pages());
        assert_eq!(visible_keys(), 12);
    }
}

#[test]
fn right_to_left_grid_aligns_right_edges() {
    let (host, mut session) = session();
    host.set_workspace(WorkspaceInfo {
        right_to_left: true,
        compact_device: false,
    });
    let (mut grid, _) = numbered_grid(4, PickerConfig::default(), 0.0);

    let handle = grid.open(&mut session, anchor());

    assert_eq!(handle.placement.x + handle.size.width, anchor().right());
    let container = host
        .first_node(NodeRole::Container)
        .expect("container mounted");
    assert_eq!(
        container.position,
        Point::new(handle.placement.x, handle.placement.y)
    );
}

#[test]
fn host_can_read_the_field_while_being_notified() {
    let (mut grid, field) = numbered_grid(6, PickerConfig::default(), 0.0);
    let host = RerenderingHost::watching(&field);
    let mut session = SessionContext::new(host.clone());

    grid.open(&mut session, anchor());
    grid.activate(&mut session, 3);

    let (mut notes, note_field, _, _) = note_picker(12, 261.63);
    *host.field.borrow_mut() = Some(Rc::clone(&note_field));
    notes.open(&mut session, anchor());
    notes.activate_key(&mut session, 4);
    notes.set_text_value(&mut session, "440");
    notes.dismiss(&mut session);

    assert_eq!(
        host.rendered.borrow().as_slice(),
        &[
            FieldValue::Number(3.0),
            FieldValue::Number(notes.entries()[4].frequency_hz),
            FieldValue::Number(440.0),
            FieldValue::Number(261.63),
        ]
    );
    assert_eq!(host.inner.changes().len(), 4);
    assert_eq!(host.inner.live_node_count(), 0);
}
