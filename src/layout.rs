use crate::error::LayoutError;
use std::fs;
use std::path::Path;

/// Built-in 7x7 maze, entered at (1, 0) facing South, exit at (5, 6)
pub const DEFAULT_LAYOUT: [[u8; 7]; 7] = [
    [0, 1, 0, 0, 0, 0, 0],
    [0, 1, 1, 1, 0, 1, 0],
    [0, 0, 0, 1, 0, 1, 0],
    [0, 1, 1, 1, 1, 1, 0],
    [0, 1, 0, 0, 0, 1, 0],
    [0, 1, 0, 1, 1, 1, 0],
    [0, 0, 0, 0, 0, 1, 0],
];

/// Validated wall/path input for a grid
///
/// Every row has the same length and every marker is 0 (wall) or 1 (path).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Vec<u8>>,
    start: Option<(i32, i32)>,
}

impl Layout {
    /// Build a layout from raw marker rows
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, LayoutError> {
        let expected = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(LayoutError::Empty),
        };

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            if let Some(col) = cells.iter().position(|&m| m > 1) {
                return Err(LayoutError::UnknownMarker { row, col, marker: cells[col] });
            }
        }

        Ok(Layout { rows, start: None })
    }

    /// Parse the text format
    ///
    /// One row per line: `0` wall, `1` path, `S` path holding the start.
    /// Blank lines and lines starting with `;` are skipped, and spaces,
    /// tabs and commas inside a row are ignored.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        let mut start = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let y = rows.len();
            let mut row = Vec::new();
            let symbols = line.chars().filter(|c| !matches!(c, ' ' | '\t' | ','));

            for (col, symbol) in symbols.enumerate() {
                let marker = match symbol {
                    '0' => 0,
                    '1' => 1,
                    'S' | 's' => {
                        let here = (col as i32, y as i32);
                        if let Some(first) = start {
                            return Err(LayoutError::MultipleStarts { first, second: here });
                        }
                        start = Some(here);
                        1
                    }
                    _ => return Err(LayoutError::UnknownSymbol { row: y, col, symbol }),
                };
                row.push(marker);
            }
            rows.push(row);
        }

        let mut layout = Self::from_rows(rows)?;
        layout.start = start;
        Ok(layout)
    }

    /// Read and parse a layout file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// The built-in maze
    pub fn builtin() -> Self {
        Layout {
            rows: DEFAULT_LAYOUT.iter().map(|row| row.to_vec()).collect(),
            start: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.rows[0].len() as i32
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// Raw marker at (x, y), None outside the layout
    pub fn marker(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows.get(y as usize)?.get(x as usize).copied()
    }

    /// Start position given by an `S` symbol, if any
    pub fn start(&self) -> Option<(i32, i32)> {
        self.start
    }
}
