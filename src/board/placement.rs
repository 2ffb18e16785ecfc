//! Placement algorithm: fit checks and the row-major free-position scan.

use super::grid::Grid;
use super::widget::WidgetSize;

/// Whether a widget of the given size fits with its anchor at `(row, col)`.
///
/// True iff the capped region lies fully inside the grid and every cell in it
/// is empty.
pub fn can_fit(grid: &Grid, row: usize, col: usize, size: WidgetSize) -> bool {
    let width = size.capped_width();
    let height = size.height;

    // Anchors come from stored documents and may be arbitrarily large.
    let Some(end_row) = row.checked_add(height) else {
        return false;
    };
    let Some(end_col) = col.checked_add(width) else {
        return false;
    };
    if end_row > grid.rows() || end_col > grid.columns() {
        return false;
    }

    for r in row..row + height {
        for c in col..col + width {
            if grid.get(r, c).is_some() {
                return false;
            }
        }
    }
    true
}

/// First anchor at which a widget of the given size fits, scanning rows
/// top-to-bottom and columns left-to-right. First free fit wins, not best fit.
///
/// `None` means the widget does not fit anywhere in the current grid.
pub fn find_next_available_position(grid: &Grid, size: WidgetSize) -> Option<(usize, usize)> {
    let last_col = grid.columns().checked_sub(size.capped_width())?;

    for row in 0..grid.rows() {
        for col in 0..=last_col {
            if can_fit(grid, row, col, size) {
                return Some((row, col));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::widget::WidgetId;

    #[test]
    fn can_fit_respects_bounds() {
        let grid = Grid::new(3, 2);
        assert!(can_fit(&grid, 0, 0, WidgetSize::new(2, 3)));
        assert!(!can_fit(&grid, 1, 0, WidgetSize::new(2, 3)));
        assert!(!can_fit(&grid, 0, 1, WidgetSize::new(2, 1)));
    }

    #[test]
    fn can_fit_rejects_overflowing_anchors() {
        let grid = Grid::new(3, 2);
        assert!(!can_fit(&grid, usize::MAX, 0, WidgetSize::new(1, 1)));
        assert!(!can_fit(&grid, 0, usize::MAX, WidgetSize::new(1, 1)));
    }

    #[test]
    fn can_fit_caps_width_at_two() {
        let grid = Grid::new(1, 2);
        // Requested width 4 still fits: the placed width is 2.
        assert!(can_fit(&grid, 0, 0, WidgetSize::new(4, 1)));
    }

    #[test]
    fn can_fit_rejects_occupied_cells() {
        let mut grid = Grid::new(2, 2);
        grid.stamp(&WidgetId::new("a"), 0, 1, WidgetSize::new(1, 1));
        assert!(!can_fit(&grid, 0, 0, WidgetSize::new(2, 1)));
        assert!(can_fit(&grid, 1, 0, WidgetSize::new(2, 1)));
    }

    #[test]
    fn scan_returns_the_row_major_smallest_anchor() {
        let mut grid = Grid::new(3, 4);
        grid.stamp(&WidgetId::new("a"), 0, 0, WidgetSize::new(2, 1));

        // (0, 2) comes before (1, 0) in row-major order.
        assert_eq!(
            find_next_available_position(&grid, WidgetSize::new(2, 1)),
            Some((0, 2))
        );
    }

    #[test]
    fn scan_returns_none_when_nothing_fits() {
        let mut grid = Grid::new(2, 2);
        grid.stamp(&WidgetId::new("a"), 0, 0, WidgetSize::new(2, 1));
        grid.stamp(&WidgetId::new("b"), 1, 0, WidgetSize::new(2, 1));

        assert_eq!(find_next_available_position(&grid, WidgetSize::new(1, 1)), None);
    }

    #[test]
    fn scan_handles_widgets_wider_than_the_grid() {
        let grid = Grid::new(2, 1);
        assert_eq!(find_next_available_position(&grid, WidgetSize::new(2, 1)), None);
    }
}
