use crate::geometry::OverlaySize;

/// Fixed-height viewport for grids taller than their configured row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollFrame {
    pub width: i32,
    pub height: i32,
    pub scroll_top: i32,
    pub max_scroll: i32,
}

/// Returns `None` when every row fits and no scroll container is needed.
pub fn scroll_frame(
    content: OverlaySize,
    row_height: i32,
    max_visible_rows: usize,
    selected_row: Option<usize>,
    scrollbar_allowance: i32,
) -> Option<ScrollFrame> {
    if max_visible_rows == 0 || row_height <= 0 {
        return None;
    }
    let visible_height =
        i32::try_from(max_visible_rows).map_or(i32::MAX, |rows| rows.saturating_mul(row_height));
    if content.height <= visible_height {
        return None;
    }

    let max_scroll = content.height - visible_height;
    let scroll_top = selected_row
        .and_then(|row| i32::try_from(row).ok())
        .map_or(0, |row| {
            let row_bottom = row.saturating_add(1).saturating_mul(row_height);
            row_bottom.saturating_sub(visible_height).clamp(0, max_scroll)
        });

    Some(ScrollFrame {
        width: content.width.saturating_add(scrollbar_allowance),
        height: visible_height,
        scroll_top,
        max_scroll,
    })
}
