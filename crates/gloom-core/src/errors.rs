//! Error types shared across the engine.

use thiserror::Error;

/// Failure of a bounds-checked [`crate::Grid`] access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Failure of a cave generation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The supplied [`crate::CaveConfig`] cannot produce a map.
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    /// The finished map contains no walkable cell at all.
    #[error("generated map has no walkable regions")]
    NoFloorRegions,

    /// Cancellation was requested while the run was in flight.
    #[error("generation cancelled")]
    Cancelled,

    /// The background worker died without producing a map.
    #[error("generation worker failed: {0}")]
    Worker(String),
}

/// Failure while loading an item catalog from disk.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read item catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("item catalog {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
