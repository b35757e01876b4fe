//! Property checks for overlay placement.
//!
//! 1. Vertical flip ignores every horizontal input, and the horizontal clamp ignores
//!    every vertical input.
//! 2. Same request, same placement.
//! 3. Below-first placement flips exactly when the overlay would reach the bottom edge.
//! 4. An LTR clamp lands the right edge on the viewport edge; an RTL clamp lands the left
//!    edge on the scroll origin.
//! 5. Compact devices always dock to the bottom-left of the visible area.

use field_overlay::geometry::{AnchorRect, OverlaySize, ViewportFrame};
use field_overlay::placement::{compute_placement, place, PlacementRequest};
use proptest::prelude::*;

fn arb_anchor() -> impl Strategy<Value = AnchorRect> {
    (-500i32..3000, -500i32..3000, 0i32..400, 0i32..200)
        .prop_map(|(x, y, width, height)| AnchorRect::new(x, y, width, height))
}

fn arb_overlay() -> impl Strategy<Value = OverlaySize> {
    (1i32..1200, 1i32..1200).prop_map(|(width, height)| OverlaySize::new(width, height))
}

fn arb_viewport() -> impl Strategy<Value = ViewportFrame> {
    (100i32..2000, 100i32..2000, 0i32..1500, 0i32..1500).prop_map(
        |(width, height, scroll_x, scroll_y)| {
            ViewportFrame::new(width, height).scrolled(scroll_x, scroll_y)
        },
    )
}

proptest! {
    #[test]
    fn vertical_result_ignores_horizontal_inputs(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
        shift_x in -400i32..400,
        other_width in 1i32..1200,
        rtl in any::<bool>(),
        prefer_below in any::<bool>(),
    ) {
        let base = compute_placement(anchor, overlay, viewport, false, prefer_below);
        let moved = compute_placement(
            AnchorRect::new(anchor.x + shift_x, anchor.y, anchor.width, anchor.height),
            OverlaySize::new(other_width, overlay.height),
            ViewportFrame { width: viewport.width + 37, ..viewport },
            rtl,
            prefer_below,
        );
        prop_assert_eq!(base.y, moved.y);
        prop_assert_eq!(base.flipped, moved.flipped);
    }

    #[test]
    fn horizontal_result_ignores_vertical_inputs(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
        shift_y in -400i32..400,
        other_height in 1i32..1200,
        rtl in any::<bool>(),
        prefer_below in any::<bool>(),
    ) {
        let base = compute_placement(anchor, overlay, viewport, rtl, true);
        let moved = compute_placement(
            AnchorRect::new(anchor.x, anchor.y + shift_y, anchor.width, anchor.height),
            OverlaySize::new(overlay.width, other_height),
            ViewportFrame { height: viewport.height + 53, ..viewport },
            rtl,
            prefer_below,
        );
        prop_assert_eq!(base.x, moved.x);
        prop_assert_eq!(base.clamped_x, moved.clamped_x);
    }

    #[test]
    fn placement_is_deterministic(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
        rtl in any::<bool>(),
        prefer_below in any::<bool>(),
    ) {
        prop_assert_eq!(
            compute_placement(anchor, overlay, viewport, rtl, prefer_below),
            compute_placement(anchor, overlay, viewport, rtl, prefer_below)
        );
    }

    #[test]
    fn below_first_flips_exactly_at_bottom_edge(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
    ) {
        let placement = compute_placement(anchor, overlay, viewport, false, true);
        let reaches_bottom = anchor.y + anchor.height + overlay.height
            >= viewport.height + viewport.scroll_y;
        prop_assert_eq!(placement.flipped, reaches_bottom);
        if placement.flipped {
            prop_assert_eq!(placement.y, anchor.y - overlay.height);
        } else {
            prop_assert_eq!(placement.y, anchor.y + anchor.height);
        }
    }

    #[test]
    fn clamps_land_on_the_relevant_edge(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
    ) {
        let ltr = compute_placement(anchor, overlay, viewport, false, true);
        if ltr.clamped_x {
            prop_assert_eq!(ltr.x + overlay.width, viewport.width + viewport.scroll_x);
        } else {
            prop_assert_eq!(ltr.x, anchor.x);
        }

        let rtl = compute_placement(anchor, overlay, viewport, true, true);
        if rtl.clamped_x {
            prop_assert_eq!(rtl.x, viewport.scroll_x);
        } else {
            prop_assert_eq!(rtl.x + overlay.width, anchor.x + anchor.width);
        }
    }

    #[test]
    fn compact_devices_dock_to_the_bottom(
        anchor in arb_anchor(),
        overlay in arb_overlay(),
        viewport in arb_viewport(),
        rtl in any::<bool>(),
    ) {
        let placement = place(
            PlacementRequest::new(anchor, overlay, viewport)
                .right_to_left(rtl)
                .compact_device(true),
        );
        prop_assert_eq!(placement.x, viewport.scroll_x);
        prop_assert_eq!(placement.y, viewport.scroll_y + viewport.height - overlay.height);
        prop_assert!(!placement.flipped && !placement.clamped_x);
    }
}
