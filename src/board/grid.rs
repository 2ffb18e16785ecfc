//! Occupancy grid for a single viewport.
//!
//! Each cell holds at most one widget reference. A placed widget covers a
//! rectangular region of cells; the [`Board`](super::Board) is responsible for
//! only ever stamping regions that passed [`can_fit`](super::placement::can_fit).

use super::widget::{WidgetId, WidgetSize};

/// A rectangular cell grid, row-major, each cell empty or holding one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Option<WidgetId>>,
}

impl Grid {
    /// An empty grid. Dimension validation happens in the board operations,
    /// which know the configured defaults.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.columns);
        row * self.columns + col
    }

    /// The widget occupying a cell, if any. Out-of-bounds reads are `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<&WidgetId> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.cells[self.idx(row, col)].as_ref()
    }

    /// All occupied cells as `(row, col, id)`, in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, &WidgetId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.as_ref()
                .map(|id| (i / self.columns, i % self.columns, id))
        })
    }

    /// Cells currently holding the given widget, in row-major order.
    pub fn widget_cells<'a>(
        &'a self,
        id: &'a WidgetId,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.occupied_cells()
            .filter_map(move |(row, col, cell_id)| (cell_id == id).then_some((row, col)))
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.cells.iter().flatten().any(|cell_id| cell_id == id)
    }

    /// Writes the widget into every cell of its region.
    ///
    /// The region must lie fully within bounds; the board checks fit before
    /// stamping.
    pub(crate) fn stamp(&mut self, id: &WidgetId, row: usize, col: usize, size: WidgetSize) {
        for r in row..row + size.height {
            for c in col..col + size.capped_width() {
                let idx = self.idx(r, c);
                self.cells[idx] = Some(id.clone());
            }
        }
    }

    /// Clears every cell holding the widget; returns how many were cleared.
    pub(crate) fn clear_widget(&mut self, id: &WidgetId) -> usize {
        let mut cleared = 0;
        for cell in &mut self.cells {
            if cell.as_ref() == Some(id) {
                *cell = None;
                cleared += 1;
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.occupied_cells().count(), 0);
        assert_eq!(grid.get(0, 0), None);
    }

    #[test]
    fn stamp_covers_the_capped_region() {
        let mut grid = Grid::new(4, 4);
        let id = WidgetId::new("a");
        grid.stamp(&id, 1, 0, WidgetSize::new(3, 2));

        let cells: Vec<_> = grid.widget_cells(&id).collect();
        assert_eq!(cells, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
    }

    #[test]
    fn clear_widget_removes_every_cell() {
        let mut grid = Grid::new(4, 4);
        let id = WidgetId::new("a");
        grid.stamp(&id, 0, 0, WidgetSize::new(2, 2));

        assert_eq!(grid.clear_widget(&id), 4);
        assert!(!grid.contains(&id));
        assert_eq!(grid.clear_widget(&id), 0);
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let grid = Grid::new(2, 2);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 5), None);
    }
}
