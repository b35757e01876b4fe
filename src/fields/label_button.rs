use std::rc::Rc;

use crate::config::ButtonConfig;
use crate::geometry::{AnchorRect, OverlaySize, Point};
use crate::host::{EditorHost, HostCallback, ListenerKind, NodeRole, NodeUpdate};
use crate::placement::Placement;
use crate::session::SessionContext;
use crate::ui::OVERLAY_TOKENS;
use crate::value::SharedValue;

use super::lifecycle::{begin, OverlayLifecycle, SharedLifecycle};
use super::{FieldEditor, OverlayHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Button,
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub glyph: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub text: String,
    pub kind: ButtonKind,
    pub callback_key: Option<String>,
    pub icon: Option<IconSpec>,
    /// Minimum width reserved for a decorative underline below the text.
    pub underline_width: i32,
}

impl ButtonSpec {
    pub fn button(text: impl Into<String>, callback_key: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ButtonKind::Button,
            callback_key: Some(callback_key.into()),
            icon: None,
            underline_width: 0,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ButtonKind::Label,
            callback_key: None,
            icon: None,
            underline_width: 0,
        }
    }

    pub fn with_icon(mut self, icon: IconSpec) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_underline(mut self, width: i32) -> Self {
        self.underline_width = width;
        self
    }
}

/// Toolbox button or label. Not editable; a button fires its host callback.
pub struct ToolboxButton {
    spec: ButtonSpec,
    config: ButtonConfig,
    lifecycle: SharedLifecycle,
    callback: Option<HostCallback>,
}

impl ToolboxButton {
    pub fn new(spec: ButtonSpec, config: ButtonConfig) -> Self {
        Self {
            spec,
            config,
            lifecycle: OverlayLifecycle::shared(),
            callback: None,
        }
    }

    pub fn spec(&self) -> &ButtonSpec {
        &self.spec
    }

    pub fn measure(&self, host: &dyn EditorHost) -> OverlaySize {
        let text = host.measure_text(&self.spec.text);
        let mut width = 2 * self.config.margin + text.width.max(self.spec.underline_width);
        let mut height = text.height;
        if let Some(icon) = &self.spec.icon {
            width += icon.width + OVERLAY_TOKENS.icon_gap;
            height = height.max(icon.height);
        }
        OverlaySize::new(width, height + 2 * self.config.vertical_margin)
    }

    fn resolve_callback(&self, host: &dyn EditorHost) -> Option<HostCallback> {
        match (self.spec.kind, self.spec.callback_key.as_deref()) {
            (ButtonKind::Label, Some(key)) => {
                tracing::warn!(text = %self.spec.text, key, "labels do not take callbacks; ignoring");
                None
            }
            (ButtonKind::Label, None) => None,
            (ButtonKind::Button, None) => {
                tracing::warn!(text = %self.spec.text, "button has no callback key");
                None
            }
            (ButtonKind::Button, Some(key)) => {
                let callback = host.callback(key);
                if callback.is_none() {
                    tracing::warn!(text = %self.spec.text, key, "button callback is not registered");
                }
                callback
            }
        }
    }

    /// Fires the host callback. Returns `false` for labels and for buttons without one.
    pub fn activate(&self) -> bool {
        if !self.state().accepts_interaction() {
            return false;
        }
        match &self.callback {
            Some(callback) => {
                callback(&self.spec.text);
                true
            }
            None => false,
        }
    }
}

impl FieldEditor for ToolboxButton {
    fn lifecycle(&self) -> &SharedLifecycle {
        &self.lifecycle
    }

    fn field(&self) -> Option<&SharedValue> {
        None
    }

    fn open(&mut self, session: &mut SessionContext, anchor: AnchorRect) -> OverlayHandle {
        let id = begin(&self.lifecycle, session, None);
        let host = Rc::clone(session.host());
        let size = self.measure(host.as_ref());
        self.callback = self.resolve_callback(host.as_ref());
        let placement = Placement {
            x: anchor.x,
            y: anchor.y,
            flipped: false,
            clamped_x: false,
        };

        let mut lifecycle = self.lifecycle.borrow_mut();
        let resources = lifecycle.resources_mut();
        let node = resources.mount_node_with(
            &host,
            NodeRole::Button,
            [
                NodeUpdate::Position(Point::new(placement.x, placement.y)),
                NodeUpdate::Size(size),
                NodeUpdate::Text(self.spec.text.clone()),
            ],
        );
        if self.callback.is_some() {
            resources.listen(&host, node, ListenerKind::Click);
        }
        lifecycle.ready(placement);
        drop(lifecycle);

        OverlayHandle {
            id,
            placement,
            size,
            group: None,
        }
    }

    fn display_text(&self) -> String {
        self.spec.text.clone()
    }
}
