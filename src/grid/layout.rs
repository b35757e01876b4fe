use crate::geometry::OverlaySize;
use crate::ui::OverlayStyleTokens;

use super::GridModel;

pub const KEYS_PER_OCTAVE: usize = 12;
pub const WHITE_KEYS_PER_OCTAVE: usize = 7;

/// Black keys within each 12-key block: C#, D#, F#, G#, A#.
pub const fn is_secondary_key(index: usize) -> bool {
    matches!(index % KEYS_PER_OCTAVE, 1 | 3 | 6 | 8 | 10)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLayout {
    pub index: usize,
    pub row: usize,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub secondary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub items: Vec<ItemLayout>,
    pub rows: usize,
    pub row_width: i32,
    pub row_height: i32,
    /// Width of the whole grid before any pagination.
    pub content_width: i32,
    pub content_height: i32,
}

impl GridLayout {
    pub const fn exceeds_width(&self, budget: i32) -> bool {
        self.content_width > budget
    }

    pub fn items_in_row(&self, row: usize) -> impl Iterator<Item = &ItemLayout> + '_ {
        self.items.iter().filter(move |item| item.row == row)
    }
}

fn to_px(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

pub fn layout_uniform(model: &GridModel, cell: OverlaySize) -> GridLayout {
    let items = model
        .options()
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let row = model.row_of(index);
            ItemLayout {
                index,
                row,
                x: to_px(model.column_of(index)).saturating_mul(cell.width),
                y: to_px(row).saturating_mul(cell.height),
                width: cell.width,
                height: cell.height,
                secondary: false,
            }
        })
        .collect::<Vec<_>>();
    let rows = model.row_count();
    let row_width = to_px(model.columns()).saturating_mul(cell.width);

    GridLayout {
        items,
        rows,
        row_width,
        row_height: cell.height,
        content_width: row_width,
        content_height: to_px(rows).saturating_mul(cell.height),
    }
}

pub fn piano_strip_width(key_count: usize, tokens: &OverlayStyleTokens) -> i32 {
    let white_keys = (0..key_count).filter(|index| !is_secondary_key(*index)).count();
    to_px(white_keys).saturating_mul(tokens.white_key_width)
}

/// One octave per row. Unpaged rows sit side by side as a single keyboard strip;
/// paged rows all start at the origin because only one is shown at a time.
pub fn layout_piano(key_count: usize, paged: bool, tokens: &OverlayStyleTokens) -> GridLayout {
    let rows = key_count.div_ceil(KEYS_PER_OCTAVE);
    let row_width = to_px(WHITE_KEYS_PER_OCTAVE).saturating_mul(tokens.white_key_width);
    let mut items = Vec::with_capacity(key_count);

    for row in 0..rows {
        let row_origin = if paged {
            0
        } else {
            to_px(row).saturating_mul(row_width)
        };
        let mut white_x = row_origin;
        let first = row * KEYS_PER_OCTAVE;
        let last = (first + KEYS_PER_OCTAVE).min(key_count);
        for index in first..last {
            if is_secondary_key(index) {
                items.push(ItemLayout {
                    index,
                    row,
                    x: white_x - tokens.black_key_width / 2,
                    y: 0,
                    width: tokens.black_key_width,
                    height: tokens.black_key_height,
                    secondary: true,
                });
            } else {
                items.push(ItemLayout {
                    index,
                    row,
                    x: white_x,
                    y: 0,
                    width: tokens.white_key_width,
                    height: tokens.white_key_height,
                    secondary: false,
                });
                white_x = white_x.saturating_add(tokens.white_key_width);
            }
        }
    }

    GridLayout {
        items,
        rows,
        row_width,
        row_height: tokens.white_key_height,
        content_width: piano_strip_width(key_count, tokens),
        content_height: tokens.white_key_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridOption;
    use crate::ui::OVERLAY_TOKENS;
    use crate::value::FieldValue;

    #[test]
    fn secondary_pattern_repeats_every_octave() {
        let secondary = (0..24)
            .filter(|index| is_secondary_key(*index))
            .collect::<Vec<_>>();
        assert_eq!(secondary, vec![1, 3, 6, 8, 10, 13, 15, 18, 20, 22]);
    }

    #[test]
    fn uniform_layout_places_cells_row_major() {
        let options = (0..17)
            .map(|index| GridOption::text(format!("{index}"), FieldValue::Number(index as f64)))
            .collect();
        let model = GridModel::new(options, 4, 0);
        let layout = layout_uniform(&model, OverlaySize::new(50, 30));

        assert_eq!(layout.rows, 5);
        assert_eq!(layout.content_width, 200);
        assert_eq!(layout.content_height, 150);
        let last = layout.items[16];
        assert_eq!((last.x, last.y, last.row), (0, 120, 4));
        assert_eq!(layout.items_in_row(4).count(), 1);
        assert!(layout.items.iter().all(|item| item.width == 50));
    }

    #[test]
    fn piano_keys_alternate_widths() {
        let layout = layout_piano(12, false, &OVERLAY_TOKENS);
        let widths = layout
            .items
            .iter()
            .map(|item| item.width)
            .collect::<Vec<_>>();
        assert_eq!(
            widths,
            vec![22, 11, 22, 11, 22, 22, 11, 22, 11, 22, 11, 22]
        );
        assert_eq!(layout.content_width, 154);
    }

    #[test]
    fn black_keys_straddle_the_white_key_boundary() {
        let layout = layout_piano(12, false, &OVERLAY_TOKENS);
        let c_sharp = layout.items[1];
        assert_eq!(c_sharp.x, 22 - 5);
        assert!(c_sharp.secondary);
        let d = layout.items[2];
        assert_eq!(d.x, 22);
    }

    #[test]
    fn unpaged_octaves_extend_the_strip_and_paged_octaves_overlap() {
        let strip = layout_piano(36, false, &OVERLAY_TOKENS);
        assert_eq!(strip.rows, 3);
        assert_eq!(strip.items[12].x, 154);
        assert_eq!(strip.content_width, 462);

        let paged = layout_piano(36, true, &OVERLAY_TOKENS);
        assert_eq!(paged.items[12].x, 0);
        assert_eq!(paged.content_width, 462);
        assert!(paged.exceeds_width(400));
    }
}
