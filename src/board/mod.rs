//! Dual-layout board state.
//!
//! The board keeps one widget list and two occupancy grids, one per viewport.
//! Every widget carries an independent layout (anchor plus size) for each
//! viewport; the two layouts reference the same logical widget but are never
//! assumed equal. The [`Board`] is the single owner of the invariant that both
//! grids and both layouts stay mutually consistent: nothing else mutates a
//! grid directly.
//!
//! Mutations follow a few fixed policies:
//!
//! * Widgets span at most [`MAX_WIDGET_WIDTH`](widget::MAX_WIDGET_WIDTH)
//!   columns, regardless of the requested size.
//! * Free positions are found by a row-major scan; the first fit wins, not the
//!   best fit.
//! * "Does not fit anywhere" is an outcome, not an error. Widgets that cannot
//!   be placed simply do not appear on the affected viewport, and the caller
//!   learns about it through the operation's return value.
//!
//! The board performs no I/O. Each mutation notifies the
//! [`ChangeNotifier`](crate::autosave::ChangeNotifier) passed in at
//! construction, which is how the external auto-save collaborator learns that
//! the state is dirty.

use std::cell::RefCell;
use std::rc::Rc;

use bento_config::Config;
use tracing::{debug, warn};

use self::grid::Grid;
use self::widget::{Viewport, Widget, WidgetId};
use crate::autosave::ChangeNotifier;

pub mod grid;
pub mod placement;
pub mod widget;

mod fit;
mod operations;


/// Configurable properties of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Grid dimensions used when none are given or the given ones are invalid.
    pub default_rows: usize,
    pub default_desktop_columns: usize,
    pub default_mobile_columns: usize,

    /// Allowed dimension ranges; out-of-range requests are clamped.
    pub min_rows: usize,
    pub min_columns: usize,
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        let board = &config.board;
        let mut options = Self {
            default_rows: usize::from(board.rows),
            default_desktop_columns: usize::from(board.desktop_columns),
            default_mobile_columns: usize::from(board.mobile_columns),
            min_rows: usize::from(board.min_rows),
            min_columns: usize::from(board.min_columns),
            max_rows: usize::from(board.max_rows),
            max_columns: usize::from(board.max_columns),
        };

        // An inverted range is a config mistake, not a reason to fail later;
        // fall back to the built-in range.
        let fallback = bento_config::Board::default();
        if options.min_rows > options.max_rows {
            warn!(
                "invalid row range {}..={}, using the default range",
                options.min_rows, options.max_rows
            );
            options.min_rows = usize::from(fallback.min_rows);
            options.max_rows = usize::from(fallback.max_rows);
        }
        if options.min_columns > options.max_columns {
            warn!(
                "invalid column range {}..={}, using the default range",
                options.min_columns, options.max_columns
            );
            options.min_columns = usize::from(fallback.min_columns);
            options.max_columns = usize::from(fallback.max_columns);
        }
        options
    }

    /// Clamps requested dimensions into the configured range, substituting the
    /// defaults for degenerate zero values.
    pub(crate) fn clamp_dimensions(
        &self,
        rows: usize,
        columns: usize,
        default_columns: usize,
    ) -> (usize, usize, bool) {
        let mut rows = rows;
        let mut columns = columns;
        if rows == 0 {
            warn!("invalid rows value 0, substituting default {}", self.default_rows);
            rows = self.default_rows;
        }
        if columns == 0 {
            warn!("invalid columns value 0, substituting default {default_columns}");
            columns = default_columns;
        }

        let clamped_rows = rows.clamp(self.min_rows, self.max_rows);
        let clamped_columns = columns.clamp(self.min_columns, self.max_columns);
        let modified = clamped_rows != rows || clamped_columns != columns;
        (clamped_rows, clamped_columns, modified)
    }
}

/// Result of placing a widget.
///
/// Placement is a two-resource operation without rollback: the edited viewport
/// is stamped first, then a position is searched on the other viewport. The
/// tagged outcome lets callers decide whether to retry, alert, or accept the
/// degradation instead of silently persisting inconsistent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The widget occupies cells on both viewport grids.
    BothPlaced,
    /// The widget was placed on the edited viewport only; the other grid had
    /// no free region, so that layout's anchor is stale until a later
    /// operation assigns one.
    PrimaryOnly,
    /// The edited viewport's grid had no free region either; nothing was
    /// stamped and the widget was not added to the board.
    Unplaced,
}

/// Result of resizing a widget on one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The new size fits at the widget's existing anchor.
    AtAnchor,
    /// The widget was moved to the first free position that fits the new size.
    Relocated,
    /// No position fits the new size; the widget keeps its layout record but
    /// occupies no cells on this viewport.
    DroppedFromGrid,
    /// No widget with that id.
    NotFound,
}

/// The complete dual-viewport board state for one profile.
#[derive(Debug)]
pub struct Board {
    /// All widgets, in insertion order. A widget may be absent from a grid
    /// (dropped from one viewport) while still being listed here.
    widgets: Vec<Widget>,
    desktop: Grid,
    mobile: Grid,
    options: Rc<Options>,
    notifier: Rc<RefCell<dyn ChangeNotifier>>,
}

impl Board {
    /// An empty board at the configured default dimensions.
    pub fn new(options: Rc<Options>, notifier: Rc<RefCell<dyn ChangeNotifier>>) -> Self {
        let desktop = Grid::new(options.default_rows, options.default_desktop_columns);
        let mobile = Grid::new(options.default_rows, options.default_mobile_columns);
        Self {
            widgets: Vec::new(),
            desktop,
            mobile,
            options,
            notifier,
        }
    }

    /// Resets to empty grids at the given dimensions.
    ///
    /// Degenerate or out-of-range dimensions are recovered locally: the
    /// configured defaults and limits are substituted with a warning, never an
    /// error to the caller.
    pub fn initialize(&mut self, rows: usize, desktop_columns: usize, mobile_columns: usize) {
        let (rows, desktop_columns, _) = self.options.clamp_dimensions(
            rows,
            desktop_columns,
            self.options.default_desktop_columns,
        );
        let (_, mobile_columns, _) = self.options.clamp_dimensions(
            rows,
            mobile_columns,
            self.options.default_mobile_columns,
        );

        debug!("initializing board: {rows} rows, {desktop_columns}/{mobile_columns} columns");
        self.widgets.clear();
        self.desktop = Grid::new(rows, desktop_columns);
        self.mobile = Grid::new(rows, mobile_columns);
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    // =========================================================================
    // Grid and Widget Accessors
    // =========================================================================

    pub fn grid(&self, viewport: Viewport) -> &Grid {
        match viewport {
            Viewport::Desktop => &self.desktop,
            Viewport::Mobile => &self.mobile,
        }
    }

    pub(crate) fn grid_mut(&mut self, viewport: Viewport) -> &mut Grid {
        match viewport {
            Viewport::Desktop => &mut self.desktop,
            Viewport::Mobile => &mut self.mobile,
        }
    }

    /// The grid being edited and the other viewport's grid.
    pub(crate) fn grids_mut(&mut self, primary: Viewport) -> (&mut Grid, &mut Grid) {
        match primary {
            Viewport::Desktop => (&mut self.desktop, &mut self.mobile),
            Viewport::Mobile => (&mut self.mobile, &mut self.desktop),
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|widget| &widget.id == id)
    }

    pub(crate) fn widget_index(&self, id: &WidgetId) -> Option<usize> {
        self.widgets.iter().position(|widget| &widget.id == id)
    }

    pub(crate) fn push_widget(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    /// Widgets anchored on the given viewport's grid, in widget-list order.
    ///
    /// A widget dropped from this viewport (layout retained, no cells) is not
    /// included.
    pub fn active_widgets(&self, viewport: Viewport) -> Vec<&Widget> {
        let grid = self.grid(viewport);
        self.widgets
            .iter()
            .filter(|widget| {
                let (row, col) = widget.layout(viewport).anchor();
                grid.get(row, col) == Some(&widget.id)
            })
            .collect()
    }

    /// Whether any cell in the given row is occupied.
    pub fn has_widgets_in_row(&self, row: usize, viewport: Viewport) -> bool {
        let grid = self.grid(viewport);
        (0..grid.columns()).any(|col| grid.get(row, col).is_some())
    }

    /// One past the bottom-most row any widget's layout extends to, from the
    /// layout records (placed or not). Zero for an empty board.
    pub fn last_covered_row(&self, viewport: Viewport) -> usize {
        self.widgets
            .iter()
            .map(|widget| {
                let layout = widget.layout(viewport);
                layout.anchor_row.saturating_add(layout.size.height)
            })
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn notify_changed(&self) {
        self.notifier.borrow_mut().mark_changed();
    }

    // =========================================================================
    // Test Helpers
    // =========================================================================

    #[cfg(test)]
    pub fn verify_invariants(&self) {
        use std::collections::BTreeSet;

        use self::widget::MAX_WIDGET_WIDTH;

        let mut seen = BTreeSet::new();
        for widget in &self.widgets {
            assert!(
                seen.insert(&widget.id),
                "widget ids must be unique: {}",
                widget.id
            );
            assert!(widget.layouts.desktop.size.width <= MAX_WIDGET_WIDTH);
            assert!(widget.layouts.mobile.size.width <= MAX_WIDGET_WIDTH);
            assert!(widget.layouts.desktop.size.height >= 1);
            assert!(widget.layouts.mobile.size.height >= 1);
        }

        for viewport in [Viewport::Desktop, Viewport::Mobile] {
            let grid = self.grid(viewport);
            assert!(grid.rows() >= 1);
            assert!(grid.columns() >= 1);

            for (row, col, id) in grid.occupied_cells() {
                assert!(
                    self.widget(id).is_some(),
                    "cell ({row}, {col}) on {viewport} references unknown widget {id}"
                );
            }

            for widget in &self.widgets {
                let cells: BTreeSet<_> = grid.widget_cells(&widget.id).collect();
                if cells.is_empty() {
                    continue;
                }

                let layout = widget.layout(viewport);
                let mut expected = BTreeSet::new();
                for r in layout.anchor_row..layout.anchor_row + layout.size.height {
                    for c in layout.anchor_col..layout.anchor_col + layout.size.capped_width() {
                        assert!(r < grid.rows() && c < grid.columns());
                        expected.insert((r, c));
                    }
                }
                assert_eq!(
                    cells, expected,
                    "{viewport} cells of {} must exactly match its anchored region",
                    widget.id
                );
            }
        }
    }
}
