//! Widget data model.
//!
//! A widget is the unit of placement. Its two layouts are independent
//! positions and sizes that reference the same logical widget; the engine
//! never assumes they are equal.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Enforced maximum widget width in grid columns.
///
/// A fixed policy of the board: widgets span at most two columns regardless of
/// the requested size.
pub const MAX_WIDGET_WIDTH: usize = 2;

/// One of the two placement configurations a widget simultaneously holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Desktop,
    Mobile,
}

impl Viewport {
    /// The viewport not being edited.
    pub fn other(self) -> Self {
        match self {
            Self::Desktop => Self::Mobile,
            Self::Mobile => Self::Desktop,
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
        }
    }
}

/// Unique widget identifier, stable across both viewport layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Widget dimensions in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: usize,
    pub height: usize,
}

impl WidgetSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Width as actually placed on a grid.
    pub fn capped_width(self) -> usize {
        self.width.min(MAX_WIDGET_WIDTH)
    }

    /// Size normalized to what the engine stores: at least one cell each way,
    /// width capped at [`MAX_WIDGET_WIDTH`].
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(1, MAX_WIDGET_WIDTH),
            height: self.height.max(1),
        }
    }
}

/// A widget's placement on one viewport: top-left anchor cell plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLayout {
    pub anchor_row: usize,
    pub anchor_col: usize,
    pub size: WidgetSize,
}

impl WidgetLayout {
    pub fn new(anchor_row: usize, anchor_col: usize, size: WidgetSize) -> Self {
        Self {
            anchor_row,
            anchor_col,
            size,
        }
    }

    pub fn anchor(&self) -> (usize, usize) {
        (self.anchor_row, self.anchor_col)
    }

    pub fn set_anchor(&mut self, row: usize, col: usize) {
        self.anchor_row = row;
        self.anchor_col = col;
    }
}

/// The pair of independent per-viewport layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layouts {
    pub desktop: WidgetLayout,
    pub mobile: WidgetLayout,
}

impl Layouts {
    pub fn get(&self, viewport: Viewport) -> &WidgetLayout {
        match viewport {
            Viewport::Desktop => &self.desktop,
            Viewport::Mobile => &self.mobile,
        }
    }

    pub fn get_mut(&mut self, viewport: Viewport) -> &mut WidgetLayout {
        match viewport {
            Viewport::Desktop => &mut self.desktop,
            Viewport::Mobile => &mut self.mobile,
        }
    }
}

/// The unit of placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    /// Tag identifying widget behavior and rendering; opaque to the engine.
    #[serde(rename = "type")]
    pub kind: String,
    pub layouts: Layouts,
    /// Per-widget-type data; the engine only ever merges into it.
    #[serde(rename = "specificProps", default)]
    pub props: Map<String, Value>,
}

impl Widget {
    pub fn new(id: WidgetId, kind: impl Into<String>, layouts: Layouts) -> Self {
        Self {
            id,
            kind: kind.into(),
            layouts,
            props: Map::new(),
        }
    }

    pub fn layout(&self, viewport: Viewport) -> &WidgetLayout {
        self.layouts.get(viewport)
    }

    pub fn layout_mut(&mut self, viewport: Viewport) -> &mut WidgetLayout {
        self.layouts.get_mut(viewport)
    }

    /// Clone with a freshly generated id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: WidgetId::generate(),
            ..self.clone()
        }
    }

    /// Caps both stored anchors; returns whether anything changed.
    ///
    /// Out-of-grid anchors are harmless (placement falls back to the scan),
    /// but stored documents can carry arbitrarily large values, which must not
    /// reach the anchor arithmetic.
    pub(crate) fn clamp_anchors(&mut self, max_row: usize, max_col: usize) -> bool {
        let mut changed = false;
        for layout in [&mut self.layouts.desktop, &mut self.layouts.mobile] {
            if layout.anchor_row > max_row {
                layout.anchor_row = max_row;
                changed = true;
            }
            if layout.anchor_col > max_col {
                layout.anchor_col = max_col;
                changed = true;
            }
        }
        changed
    }

    /// Normalizes both stored sizes; returns whether anything changed.
    pub(crate) fn clamp_sizes(&mut self) -> bool {
        let desktop = self.layouts.desktop.size;
        let mobile = self.layouts.mobile.size;
        self.layouts.desktop.size = desktop.clamped();
        self.layouts.mobile.size = mobile.clamped();
        self.layouts.desktop.size != desktop || self.layouts.mobile.size != mobile
    }
}
