use crate::geometry::{AnchorRect, OverlaySize, ViewportFrame};

/// Final top-left corner for an overlay and which default rules were overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub flipped: bool,
    pub clamped_x: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    pub anchor: AnchorRect,
    pub overlay: OverlaySize,
    pub viewport: ViewportFrame,
    pub right_to_left: bool,
    pub prefer_below: bool,
    pub compact_device: bool,
}

impl PlacementRequest {
    pub const fn new(anchor: AnchorRect, overlay: OverlaySize, viewport: ViewportFrame) -> Self {
        Self {
            anchor,
            overlay,
            viewport,
            right_to_left: false,
            prefer_below: true,
            compact_device: false,
        }
    }

    pub const fn right_to_left(mut self, right_to_left: bool) -> Self {
        self.right_to_left = right_to_left;
        self
    }

    pub const fn prefer_below(mut self, prefer_below: bool) -> Self {
        self.prefer_below = prefer_below;
        self
    }

    pub const fn compact_device(mut self, compact_device: bool) -> Self {
        self.compact_device = compact_device;
        self
    }
}

pub fn compute_placement(
    anchor: AnchorRect,
    overlay: OverlaySize,
    viewport: ViewportFrame,
    right_to_left: bool,
    prefer_below: bool,
) -> Placement {
    place(
        PlacementRequest::new(anchor, overlay, viewport)
            .right_to_left(right_to_left)
            .prefer_below(prefer_below),
    )
}

pub fn place(request: PlacementRequest) -> Placement {
    if request.compact_device {
        return docked_placement(request.overlay, request.viewport);
    }

    let (y, flipped) = vertical_position(
        request.anchor,
        request.overlay,
        request.viewport,
        request.prefer_below,
    );
    let (x, clamped_x) = if request.right_to_left {
        horizontal_position_rtl(request.anchor, request.overlay, request.viewport)
    } else {
        horizontal_position_ltr(request.anchor, request.overlay, request.viewport)
    };

    Placement {
        x,
        y,
        flipped,
        clamped_x,
    }
}

// Compact devices pin the overlay to the bottom of the visible area.
fn docked_placement(overlay: OverlaySize, viewport: ViewportFrame) -> Placement {
    Placement {
        x: viewport.scroll_x,
        y: viewport.bottom_edge().saturating_sub(overlay.height),
        flipped: false,
        clamped_x: false,
    }
}

fn vertical_position(
    anchor: AnchorRect,
    overlay: OverlaySize,
    viewport: ViewportFrame,
    prefer_below: bool,
) -> (i32, bool) {
    let below = anchor.bottom();
    let above = anchor.y.saturating_sub(overlay.height);
    if prefer_below {
        if below.saturating_add(overlay.height) >= viewport.bottom_edge() {
            return (above, true);
        }
        (below, false)
    } else if above < viewport.scroll_y {
        (below, true)
    } else {
        (above, false)
    }
}

fn horizontal_position_ltr(
    anchor: AnchorRect,
    overlay: OverlaySize,
    viewport: ViewportFrame,
) -> (i32, bool) {
    let x = anchor.x;
    let overflow = x
        .saturating_add(overlay.width)
        .saturating_sub(viewport.right_edge());
    if overflow > 0 {
        return (x.saturating_sub(overflow), true);
    }
    (x, false)
}

// Mirrored branch: the right edges line up and only a left-side deficit is corrected.
// Unlike the LTR branch this never checks the right viewport edge.
fn horizontal_position_rtl(
    anchor: AnchorRect,
    overlay: OverlaySize,
    viewport: ViewportFrame,
) -> (i32, bool) {
    let x = anchor.right().saturating_sub(overlay.width);
    let deficit = viewport.scroll_x.saturating_sub(x);
    if deficit > 0 {
        return (x.saturating_add(deficit), true);
    }
    (x, false)
}
