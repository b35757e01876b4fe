//! Row/column arrangement of selectable items, with page-at-a-time virtualization
//! and an internal scroll fallback for tall grids.

mod layout;
mod pages;
mod scroll;
mod selection;

use crate::value::FieldValue;

pub use layout::{
    is_secondary_key, layout_piano, layout_uniform, piano_strip_width, GridLayout, ItemLayout,
    KEYS_PER_OCTAVE, WHITE_KEYS_PER_OCTAVE,
};
pub use pages::{PageChange, PageState};
pub use scroll::{scroll_frame, ScrollFrame};
pub use selection::{HighlightChange, SelectionHighlight};

pub const DEFAULT_COLUMNS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionContent {
    Text(String),
    Image {
        src: String,
        width: i32,
        height: i32,
        alt: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOption {
    pub content: OptionContent,
    pub value: FieldValue,
}

impl GridOption {
    pub fn text(label: impl Into<String>, value: FieldValue) -> Self {
        Self {
            content: OptionContent::Text(label.into()),
            value,
        }
    }

    pub fn image(
        src: impl Into<String>,
        width: i32,
        height: i32,
        alt: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        Self {
            content: OptionContent::Image {
                src: src.into(),
                width,
                height,
                alt: alt.into(),
            },
            value,
        }
    }

    /// Text shown on the cell and in its tooltip.
    pub fn caption(&self) -> &str {
        match &self.content {
            OptionContent::Text(label) => label,
            OptionContent::Image { alt, .. } => alt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    options: Vec<GridOption>,
    columns: usize,
    max_visible_rows: usize,
}

impl GridModel {
    pub fn new(options: Vec<GridOption>, columns: usize, max_visible_rows: usize) -> Self {
        let columns = if columns == 0 {
            tracing::warn!(default = DEFAULT_COLUMNS, "grid configured with zero columns");
            DEFAULT_COLUMNS
        } else {
            columns
        };
        Self {
            options,
            columns,
            max_visible_rows,
        }
    }

    pub fn options(&self) -> &[GridOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&GridOption> {
        self.options.get(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub const fn max_visible_rows(&self) -> usize {
        self.max_visible_rows
    }

    pub fn row_count(&self) -> usize {
        self.options.len().div_ceil(self.columns)
    }

    pub const fn row_of(&self, index: usize) -> usize {
        index / self.columns
    }

    pub const fn column_of(&self, index: usize) -> usize {
        index % self.columns
    }

    pub fn position_of_value(&self, value: &FieldValue) -> Option<usize> {
        self.options.iter().position(|option| &option.value == value)
    }
}
