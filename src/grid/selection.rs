use crate::geometry::Color;

/// Applied highlight plus the fill that was restored on the previous item, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    pub restored: Option<(usize, Color)>,
    pub applied: (usize, Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionHighlight {
    highlight: Color,
    selected: Option<(usize, Color)>,
}

impl SelectionHighlight {
    pub const fn new(highlight: Color) -> Self {
        Self {
            highlight,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected.map(|(index, _)| index)
    }

    /// Moves the highlight to `index`. The previous item gets its own fill back first,
    /// so two items are never highlighted at once.
    pub fn select(&mut self, index: usize, fills: &mut [Color]) -> Option<HighlightChange> {
        if index >= fills.len() {
            return None;
        }
        if self.selected() == Some(index) {
            return None;
        }

        let restored = self.selected.take().and_then(|(previous, original)| {
            let slot = fills.get_mut(previous)?;
            *slot = original;
            Some((previous, original))
        });

        self.selected = Some((index, fills[index]));
        fills[index] = self.highlight;

        Some(HighlightChange {
            restored,
            applied: (index, self.highlight),
        })
    }

    /// Removes the highlight, giving the selected item its own fill back.
    pub fn clear(&mut self, fills: &mut [Color]) -> Option<(usize, Color)> {
        let (index, original) = self.selected.take()?;
        let slot = fills.get_mut(index)?;
        *slot = original;
        Some((index, original))
    }
}
