//! Document shapes exchanged with the persistence collaborator.
//!
//! The engine owns only the in-memory shape: `{ widgets, rows, columns,
//! userProfile? }` with desktop dimensions (mobile dimensions are recomputed
//! on load). Documents arriving from storage are sanitized rather than
//! rejected: invalid dimensions fall back to configured defaults, and legacy
//! widgets with flat `anchorRow`/`anchorCol`/`size` fields are upgraded to
//! dual layouts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::board::widget::{Layouts, Widget, WidgetId, WidgetLayout, WidgetSize};
use crate::board::Options;

/// Profile data carried alongside the board on save. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub picture: String,
    pub description: String,
}

/// The persisted board: widget list plus desktop grid dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    pub widgets: Vec<Widget>,
    pub rows: usize,
    pub columns: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    widgets: Vec<RawWidget>,
    rows: Option<f64>,
    columns: Option<f64>,
    user_profile: Option<UserProfile>,
}

/// Widget as stored, including pre-dual-layout documents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWidget {
    id: WidgetId,
    #[serde(rename = "type")]
    kind: String,
    layouts: Option<Layouts>,
    anchor_row: Option<usize>,
    anchor_col: Option<usize>,
    size: Option<WidgetSize>,
    #[serde(default)]
    specific_props: Map<String, Value>,
}

impl RawWidget {
    fn upgrade(self, options: &Options) -> Widget {
        let layouts = self.layouts.unwrap_or_else(|| {
            // Legacy document: one flat position, mirrored into both layouts.
            let layout = WidgetLayout::new(
                self.anchor_row.unwrap_or(0),
                self.anchor_col.unwrap_or(0),
                self.size.unwrap_or(WidgetSize::new(1, 1)),
            );
            warn!("widget {} has no layouts, upgrading from flat fields", self.id);
            Layouts {
                desktop: layout,
                mobile: layout,
            }
        });

        let mut widget = Widget {
            id: self.id,
            kind: self.kind,
            layouts,
            props: self.specific_props,
        };
        widget.clamp_sizes();
        if widget.clamp_anchors(options.max_rows, options.max_columns) {
            warn!("widget {} has out-of-range anchors, clamping them", widget.id);
        }
        widget
    }
}

impl BoardDocument {
    /// The document for a brand-new board.
    pub fn default_with(options: &Options) -> Self {
        Self {
            widgets: Vec::new(),
            rows: options.default_rows,
            columns: options.default_desktop_columns,
            user_profile: None,
        }
    }

    /// Parses and sanitizes a stored document.
    ///
    /// Only structurally broken JSON is an error; bad values inside a
    /// well-formed document are recovered with defaults.
    pub fn from_json(text: &str, options: &Options) -> Result<Self, serde_json::Error> {
        let raw: RawDocument = serde_json::from_str(text)?;

        let rows = sanitize_dimension(raw.rows, options.default_rows, "rows");
        let columns = sanitize_dimension(
            raw.columns,
            options.default_desktop_columns,
            "columns",
        );
        let (rows, columns, modified) =
            options.clamp_dimensions(rows, columns, options.default_desktop_columns);
        if modified {
            warn!("stored board dimensions adjusted to {rows}x{columns}");
        }

        Ok(Self {
            widgets: raw
                .widgets
                .into_iter()
                .map(|raw| raw.upgrade(options))
                .collect(),
            rows,
            columns,
            user_profile: raw.user_profile,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn sanitize_dimension(value: Option<f64>, default: usize, what: &str) -> usize {
    match value {
        None => default,
        Some(v) if !v.is_finite() || v < 0.0 || v.fract() != 0.0 => {
            warn!("invalid {what} value {v}, substituting default {default}");
            default
        }
        Some(v) => v as usize,
    }
}
