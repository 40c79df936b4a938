use serde::{Deserialize, Serialize};

/// State of a single maze cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Unvisited, traversable
    Path,
    /// Impassable
    Wall,
    /// The agent has stood here before
    Visited,
    /// Confirmed dead end, left behind on a retreat
    Dead,
    /// The agent is here right now
    Occupied,
}

impl Cell {
    /// Character used by `Grid::render`
    pub fn glyph(self) -> char {
        match self {
            Cell::Path => ' ',
            Cell::Wall => '#',
            Cell::Visited => '~',
            Cell::Dead => 'x',
            Cell::Occupied => '@',
        }
    }

    /// Convert a raw layout marker (0 = wall, 1 = path)
    pub fn from_marker(marker: u8) -> Option<Cell> {
        match marker {
            0 => Some(Cell::Wall),
            1 => Some(Cell::Path),
            _ => None,
        }
    }

    /// True for cells the agent has already left a trail on
    pub fn is_trail(self) -> bool {
        matches!(self, Cell::Visited | Cell::Dead)
    }
}
