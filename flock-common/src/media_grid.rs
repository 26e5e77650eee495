//! Layout selection for the media attachments of a post.
//!
//! The arrangement only depends on how many items are attached:
//! one item takes the full width, two sit side by side, three are shown as
//! one large item with two stacked next to it, four make a 2×2 grid, and
//! five or more make two rows (2 on top, 3 below) with a "+K" overlay on the
//! last cell for the hidden remainder.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Layout {
    Single,
    Pair,
    LeadWithStack,
    Grid2x2,
    TwoRows { overflow: usize },
}

impl Layout {
    /// Picks the layout for `count` attachments. `None` when there is
    /// nothing to display.
    pub fn select(count: usize) -> Option<Layout> {
        match count {
            0 => None,
            1 => Some(Layout::Single),
            2 => Some(Layout::Pair),
            3 => Some(Layout::LeadWithStack),
            4 => Some(Layout::Grid2x2),
            n => Some(Layout::TwoRows { overflow: n - 5 }),
        }
    }

    /// Number of cells actually rendered.
    pub fn cells(&self) -> usize {
        match *self {
            Layout::Single => 1,
            Layout::Pair => 2,
            Layout::LeadWithStack => 3,
            Layout::Grid2x2 => 4,
            Layout::TwoRows { .. } => 5,
        }
    }

    /// The "+K" label for the last cell, when some items are hidden.
    pub fn overlay_label(&self) -> Option<String> {
        match *self {
            Layout::TwoRows { overflow } if overflow > 0 => Some(format!("+{}", overflow)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_by_count() {
        assert_eq!(Layout::select(0), None);
        assert_eq!(Layout::select(1), Some(Layout::Single));
        assert_eq!(Layout::select(2), Some(Layout::Pair));
        assert_eq!(Layout::select(3), Some(Layout::LeadWithStack));
        assert_eq!(Layout::select(4), Some(Layout::Grid2x2));
        assert_eq!(Layout::select(5), Some(Layout::TwoRows { overflow: 0 }));
        assert_eq!(Layout::select(7), Some(Layout::TwoRows { overflow: 2 }));
    }

    #[test]
    fn overlay_only_past_five() {
        assert_eq!(Layout::select(5).unwrap().overlay_label(), None);
        assert_eq!(
            Layout::select(7).unwrap().overlay_label(),
            Some("+2".to_string())
        );
        assert_eq!(Layout::select(4).unwrap().overlay_label(), None);
    }

    #[test]
    fn cell_counts() {
        assert_eq!(Layout::select(1).unwrap().cells(), 1);
        assert_eq!(Layout::select(9).unwrap().cells(), 5);
    }
}
