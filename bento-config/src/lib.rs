//! Configuration for the bento board engine.
//!
//! The configuration lives in a KDL file and covers the board defaults (grid
//! dimensions and their allowed ranges) and the auto-save debounce. Everything
//! has a default, so an empty file, or no file at all, is a valid
//! configuration.
//!
//! ```kdl
//! board {
//!     rows 10
//!     desktop-columns 4
//!     mobile-columns 2
//! }
//!
//! autosave {
//!     delay-ms 2000
//! }
//! ```

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use miette::{Context, IntoDiagnostic};
use tracing::debug;

#[derive(knuffel::Decode, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[knuffel(child, default)]
    pub board: Board,
    #[knuffel(child, default)]
    pub autosave: Autosave,
}

/// Board grid defaults and limits.
#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Board {
    #[knuffel(child, unwrap(argument), default = Self::default().rows)]
    pub rows: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().desktop_columns)]
    pub desktop_columns: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().mobile_columns)]
    pub mobile_columns: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().min_rows)]
    pub min_rows: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().min_columns)]
    pub min_columns: u16,
    // Upper bounds keep pathological documents from allocating huge grids.
    #[knuffel(child, unwrap(argument), default = Self::default().max_rows)]
    pub max_rows: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().max_columns)]
    pub max_columns: u16,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: 10,
            desktop_columns: 4,
            mobile_columns: 2,
            min_rows: 3,
            min_columns: 2,
            max_rows: 50,
            max_columns: 10,
        }
    }
}

/// Debounced auto-save behavior.
#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Autosave {
    #[knuffel(child)]
    pub off: bool,
    /// Quiet period after the last change before a save is dispatched.
    #[knuffel(child, unwrap(argument), default = Self::default().delay_ms)]
    pub delay_ms: u64,
}

impl Default for Autosave {
    fn default() -> Self {
        Self {
            off: false,
            delay_ms: 2000,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let config = knuffel::parse(filename, text)?;
        Ok(config)
    }
}
