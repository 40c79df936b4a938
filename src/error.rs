use thiserror::Error;

/// Errors raised by grid lookups and agent placement
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinates fall outside `[0, width) x [0, height)`
    #[error("cell ({x}, {y}) is out of bounds")]
    OutOfBounds { x: i32, y: i32 },
    /// The agent was placed on a wall cell
    #[error("start cell ({x}, {y}) is a wall")]
    StartOnWall { x: i32, y: i32 },
}

/// Errors raised while building a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown marker {marker} at row {row}, column {col}")]
    UnknownMarker { row: usize, col: usize, marker: u8 },

    #[error("unknown symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },

    #[error("more than one start marker: {first:?} and {second:?}")]
    MultipleStarts { first: (i32, i32), second: (i32, i32) },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can go wrong while setting up a run
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid placement: {0}")]
    Grid(#[from] GridError),
}
