//! Board mutations: place, reposition, resize, remove, duplicate, props.
//!
//! All of these run synchronously to completion; the only external effect is
//! the change notification used by the auto-save collaborator.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::placement::{can_fit, find_next_available_position};
use super::widget::{Viewport, Widget, WidgetId, WidgetSize};
use super::{Board, PlaceOutcome, ResizeOutcome};
use crate::persist::{BoardDocument, UserProfile};

impl Board {
    /// Places a new widget, editing the given viewport.
    ///
    /// The widget is stamped on the edited viewport at its existing anchor for
    /// that viewport (or the first free position when the anchor region is
    /// taken). The other viewport then gets a fresh anchor from the row-major
    /// scan with its own layout's size. See [`PlaceOutcome`] for the partial
    /// success cases.
    pub fn place_widget(&mut self, widget: Widget, viewport: Viewport) -> PlaceOutcome {
        let mut widget = widget;
        if widget.clamp_sizes() {
            debug!("clamped oversized layouts of widget {}", widget.id);
        }

        if self.widget_index(&widget.id).is_some() {
            warn!("widget {} is already on the board, not placing", widget.id);
            return PlaceOutcome::Unplaced;
        }

        let (primary, secondary) = self.grids_mut(viewport);

        let layout = widget.layout(viewport);
        let size = layout.size;
        let (row, col) = layout.anchor();
        let anchor = if can_fit(primary, row, col, size) {
            (row, col)
        } else {
            match find_next_available_position(primary, size) {
                Some(anchor) => anchor,
                None => {
                    warn!(
                        "no position for widget {} on {viewport}, not placing",
                        widget.id
                    );
                    return PlaceOutcome::Unplaced;
                }
            }
        };
        widget.layout_mut(viewport).set_anchor(anchor.0, anchor.1);
        primary.stamp(&widget.id, anchor.0, anchor.1, size);

        // A fresh anchor for the other viewport, searched on that viewport's
        // own grid with that layout's size. When nothing is free there the
        // previous anchor stays as-is: a known staleness window the caller
        // learns about through the outcome.
        let other = viewport.other();
        let other_size = widget.layout(other).size;
        let outcome = match find_next_available_position(secondary, other_size) {
            Some((row, col)) => {
                widget.layout_mut(other).set_anchor(row, col);
                secondary.stamp(&widget.id, row, col, other_size);
                PlaceOutcome::BothPlaced
            }
            None => {
                warn!(
                    "no position for widget {} on {other}, leaving its {other} layout stale",
                    widget.id
                );
                PlaceOutcome::PrimaryOnly
            }
        };

        debug!(
            "placed widget {} on {viewport} at ({}, {})",
            widget.id, anchor.0, anchor.1
        );
        self.push_widget(widget);
        self.notify_changed();
        outcome
    }

    /// Moves a widget to a new anchor on one viewport.
    ///
    /// Clears every cell the widget currently holds on the targeted grid, then
    /// re-stamps the region at the new anchor. The other viewport is
    /// untouched. Returns `false` (and restores the previous placement) when
    /// the new region does not fit.
    pub fn move_widget(
        &mut self,
        id: &WidgetId,
        new_row: usize,
        new_col: usize,
        viewport: Viewport,
    ) -> bool {
        let Some(idx) = self.widget_index(id) else {
            warn!("move: widget {id} not found");
            return false;
        };

        let old_layout = *self.widgets[idx].layout(viewport);
        let size = old_layout.size;
        let grid = self.grid_mut(viewport);

        let was_placed = grid.clear_widget(id) > 0;
        if !can_fit(grid, new_row, new_col, size) {
            if was_placed {
                grid.stamp(id, old_layout.anchor_row, old_layout.anchor_col, size);
            }
            warn!("move: widget {id} does not fit at ({new_row}, {new_col}) on {viewport}");
            return false;
        }

        grid.stamp(id, new_row, new_col, size);
        self.widgets[idx]
            .layout_mut(viewport)
            .set_anchor(new_row, new_col);

        debug!("moved widget {id} to ({new_row}, {new_col}) on {viewport}");
        self.notify_changed();
        true
    }

    /// Resizes a widget on one viewport. Width is clamped to two columns.
    ///
    /// The widget is cleared from the targeted grid, re-placed at its anchor
    /// if the new size fits there, otherwise at the first free position.
    /// Failing both, it is dropped from this viewport's grid only: its layout
    /// record is retained but it renders nowhere on this viewport.
    pub fn resize_widget(
        &mut self,
        id: &WidgetId,
        new_size: WidgetSize,
        viewport: Viewport,
    ) -> ResizeOutcome {
        let Some(idx) = self.widget_index(id) else {
            warn!("resize: widget {id} not found");
            return ResizeOutcome::NotFound;
        };

        let new_size = new_size.clamped();
        self.widgets[idx].layout_mut(viewport).size = new_size;
        let (anchor_row, anchor_col) = self.widgets[idx].layout(viewport).anchor();

        let grid = self.grid_mut(viewport);
        grid.clear_widget(id);

        let outcome = if can_fit(grid, anchor_row, anchor_col, new_size) {
            grid.stamp(id, anchor_row, anchor_col, new_size);
            ResizeOutcome::AtAnchor
        } else if let Some((row, col)) = find_next_available_position(grid, new_size) {
            grid.stamp(id, row, col, new_size);
            self.widgets[idx].layout_mut(viewport).set_anchor(row, col);
            ResizeOutcome::Relocated
        } else {
            warn!("resize: no position for widget {id} on {viewport}, dropping it from this grid");
            ResizeOutcome::DroppedFromGrid
        };

        debug!("resized widget {id} on {viewport} to {new_size:?}: {outcome:?}");
        self.notify_changed();
        outcome
    }

    /// Removes a widget from both grids and from the widget list.
    pub fn remove_widget(&mut self, id: &WidgetId) -> Option<Widget> {
        let idx = self.widget_index(id)?;
        self.desktop.clear_widget(id);
        self.mobile.clear_widget(id);
        let widget = self.widgets.remove(idx);

        debug!("removed widget {id}");
        self.notify_changed();
        Some(widget)
    }

    /// Clones a widget under a fresh id and places the clone, editing the
    /// given viewport.
    ///
    /// The clone goes to the source anchor when free, otherwise to the first
    /// free position. When no position exists the duplicate is discarded and
    /// this is a no-op returning `None`.
    pub fn duplicate_widget(&mut self, id: &WidgetId, viewport: Viewport) -> Option<WidgetId> {
        let source = self.widget(id)?;
        let clone = source.duplicate();
        let clone_id = clone.id.clone();

        match self.place_widget(clone, viewport) {
            PlaceOutcome::Unplaced => {
                warn!("duplicate of {id} fits nowhere on {viewport}, discarding it");
                None
            }
            _ => {
                debug!("duplicated widget {id} as {clone_id}");
                Some(clone_id)
            }
        }
    }

    /// Shallow-merges new values into a widget's type-specific props.
    ///
    /// Grids are untouched; the props are opaque to the engine.
    pub fn update_widget_props(&mut self, id: &WidgetId, new_props: Map<String, Value>) -> bool {
        let Some(idx) = self.widget_index(id) else {
            warn!("props update: widget {id} not found");
            return false;
        };

        self.widgets[idx].props.extend(new_props);
        self.notify_changed();
        true
    }

    // =========================================================================
    // Persistence Document Exchange
    // =========================================================================

    /// Rebuilds the board from a persisted document.
    ///
    /// Grids are initialized at the document's desktop dimensions and the
    /// configured default mobile column count (mobile dimensions are not
    /// persisted), then every widget is placed desktop-first.
    pub fn load_document(&mut self, document: BoardDocument) {
        let mobile_columns = self.options.default_mobile_columns;
        self.initialize(document.rows, document.columns, mobile_columns);

        for widget in document.widgets {
            let id = widget.id.clone();
            match self.place_widget(widget, Viewport::Desktop) {
                PlaceOutcome::BothPlaced => {}
                outcome => warn!("loading widget {id}: {outcome:?}"),
            }
        }
    }

    /// The document shape handed to the persistence collaborator.
    ///
    /// Only desktop dimensions are persisted; mobile is recomputed on load.
    pub fn to_document(&self, user_profile: Option<UserProfile>) -> BoardDocument {
        BoardDocument {
            widgets: self.widgets.clone(),
            rows: self.desktop.rows(),
            columns: self.desktop.columns(),
            user_profile,
        }
    }
}
