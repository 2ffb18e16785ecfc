//! Whole-grid rebuilds: board resize and desktop-to-mobile fitting.
//!
//! Both operations build a fresh grid locally, re-place widgets into it, and
//! only then swap it into the board, so a half-rebuilt grid is never
//! observable.

use tracing::{debug, warn};

use super::grid::Grid;
use super::placement::{can_fit, find_next_available_position};
use super::widget::{Viewport, Widget, WidgetId, WidgetSize};
use super::Board;

impl Board {
    /// Rebuilds one viewport's grid at new dimensions.
    ///
    /// Every widget previously placed on that grid is re-placed in
    /// (anchor row, anchor col) order: at its old anchor when it still fits,
    /// otherwise at the first free position. Widgets that fit nowhere in the
    /// new dimensions are dropped from this grid only and their ids returned.
    pub fn resize_board(
        &mut self,
        new_rows: usize,
        new_columns: usize,
        viewport: Viewport,
    ) -> Vec<WidgetId> {
        let default_columns = match viewport {
            Viewport::Desktop => self.options.default_desktop_columns,
            Viewport::Mobile => self.options.default_mobile_columns,
        };
        let (rows, columns, modified) =
            self.options
                .clamp_dimensions(new_rows, new_columns, default_columns);
        if modified {
            warn!(
                "board dimensions adjusted: {new_rows}x{new_columns} -> {rows}x{columns}"
            );
        }

        let mut placed: Vec<usize> = (0..self.widgets.len())
            .filter(|&idx| self.grid(viewport).contains(&self.widgets[idx].id))
            .collect();
        placed.sort_by_key(|&idx| self.widgets[idx].layout(viewport).anchor());

        let mut grid = Grid::new(rows, columns);
        let mut dropped = Vec::new();
        for idx in placed {
            let id = self.widgets[idx].id.clone();
            let layout = *self.widgets[idx].layout(viewport);
            let size = layout.size;

            if can_fit(&grid, layout.anchor_row, layout.anchor_col, size) {
                grid.stamp(&id, layout.anchor_row, layout.anchor_col, size);
            } else if let Some((row, col)) = find_next_available_position(&grid, size) {
                self.widgets[idx].layout_mut(viewport).set_anchor(row, col);
                grid.stamp(&id, row, col, size);
            } else {
                warn!(
                    "resize board: no position for widget {id} in {rows}x{columns}, dropping it"
                );
                dropped.push(id);
            }
        }

        *self.grid_mut(viewport) = grid;
        debug!("resized {viewport} board to {rows}x{columns}, dropped {}", dropped.len());
        self.notify_changed();
        dropped
    }

    /// Fits the current desktop placement onto a fresh mobile grid.
    ///
    /// Desktop is the source of truth and is never touched. For every widget
    /// anchored on desktop, its mobile fate is decided in order:
    ///
    /// 1. keep the existing mobile layout when it is in bounds and its cells
    ///    are free;
    /// 2. when it overflows the new bounds, shrink only as much as the space
    ///    at the existing anchor requires and keep the anchor;
    /// 3. search all positions at progressively smaller sizes, heights then
    ///    widths descending, down to 1x1;
    /// 4. give up: the mobile layout is left unchanged and the widget occupies
    ///    no mobile cells.
    ///
    /// Returns the ids of step-4 widgets, which are invisible on mobile.
    pub fn fit_to_mobile(&mut self, mobile_rows: usize, mobile_columns: usize) -> Vec<WidgetId> {
        let (rows, columns, modified) = self.options.clamp_dimensions(
            mobile_rows,
            mobile_columns,
            self.options.default_mobile_columns,
        );
        if modified {
            warn!(
                "mobile dimensions adjusted: {mobile_rows}x{mobile_columns} -> {rows}x{columns}"
            );
        }
        debug!("fitting {} widgets to mobile {rows}x{columns}", self.widgets.len());

        let on_desktop: Vec<usize> = (0..self.widgets.len())
            .filter(|&idx| {
                let widget = &self.widgets[idx];
                let (row, col) = widget.layout(Viewport::Desktop).anchor();
                self.desktop.get(row, col) == Some(&widget.id)
            })
            .collect();

        let mut mobile = Grid::new(rows, columns);
        let mut unplaced = Vec::new();
        for idx in on_desktop {
            let widget = &mut self.widgets[idx];
            let layout = *widget.layout(Viewport::Mobile);
            let size = layout.size;

            let overflows = layout
                .anchor_row
                .checked_add(size.height)
                .map_or(true, |end| end > rows)
                || layout
                    .anchor_col
                    .checked_add(size.capped_width())
                    .map_or(true, |end| end > columns);

            if !overflows {
                if can_fit(&mobile, layout.anchor_row, layout.anchor_col, size) {
                    mobile.stamp(&widget.id, layout.anchor_row, layout.anchor_col, size);
                    continue;
                }
                if let Some((row, col)) = find_next_available_position(&mobile, size) {
                    widget.layout_mut(Viewport::Mobile).set_anchor(row, col);
                    mobile.stamp(&widget.id, row, col, size);
                    continue;
                }
            } else {
                // Largest size still fitting at the existing anchor.
                let width_at_anchor = size
                    .capped_width()
                    .min(columns.saturating_sub(layout.anchor_col));
                let height_at_anchor = size.height.min(rows.saturating_sub(layout.anchor_row));

                if width_at_anchor >= 1 && height_at_anchor >= 1 {
                    let shrunk = WidgetSize::new(width_at_anchor, height_at_anchor);
                    if can_fit(&mobile, layout.anchor_row, layout.anchor_col, shrunk) {
                        let mobile_layout = widget.layout_mut(Viewport::Mobile);
                        mobile_layout.size = shrunk;
                        mobile.stamp(&widget.id, layout.anchor_row, layout.anchor_col, shrunk);
                        debug!(
                            "shrank widget {} to {shrunk:?} at its mobile anchor",
                            widget.id
                        );
                        continue;
                    }
                }
            }

            let max_width = size.capped_width().min(columns);
            let max_height = size.height.min(rows);
            if Self::place_progressively_smaller(&mut mobile, widget, max_width, max_height) {
                continue;
            }

            warn!(
                "widget {} fits nowhere on mobile, leaving its layout unchanged and unplaced",
                widget.id
            );
            unplaced.push(widget.id.clone());
        }

        self.mobile = mobile;
        self.notify_changed();
        unplaced
    }

    /// Tries every size from `max_width`x`max_height` down to 1x1, heights
    /// descending then widths descending, adopting the first size that fits
    /// anywhere. Returns whether the widget was placed.
    fn place_progressively_smaller(
        mobile: &mut Grid,
        widget: &mut Widget,
        max_width: usize,
        max_height: usize,
    ) -> bool {
        for height in (1..=max_height).rev() {
            for width in (1..=max_width).rev() {
                let size = WidgetSize::new(width, height);
                if let Some((row, col)) = find_next_available_position(mobile, size) {
                    let layout = widget.layout_mut(Viewport::Mobile);
                    layout.set_anchor(row, col);
                    layout.size = size;
                    mobile.stamp(&widget.id, row, col, size);
                    debug!(
                        "placed widget {} on mobile at ({row}, {col}) as {width}x{height}",
                        widget.id
                    );
                    return true;
                }
            }
        }
        false
    }
}
