use crate::agent::Agent;
use crate::cell::Cell;
use crate::error::GridError;
use crate::layout::Layout;
use std::fmt;

/// Maze cell storage
///
/// Cells are stored row-major, (0, 0) is the top-left corner. Once an agent
/// is placed exactly one cell is `Occupied`, and the mark it had before the
/// agent arrived is kept aside until the agent leaves.
#[derive(Clone, Debug)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
    /// Revision number - incremented whenever grid cells change
    pub revision: u64,
    occupant: Option<(i32, i32)>,
    underfoot: Cell,
}

impl Grid {
    /// Convert a layout into Path/Wall cells
    pub fn from_layout(layout: &Layout) -> Self {
        let cols = layout.width();
        let rows = layout.height();
        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for y in 0..rows {
            for x in 0..cols {
                let marker = layout.marker(x, y).unwrap_or(0);
                cells.push(Cell::from_marker(marker).unwrap_or(Cell::Wall));
            }
        }

        Grid {
            rows,
            cols,
            cells,
            revision: 0,
            occupant: None,
            underfoot: Cell::Path,
        }
    }

    pub fn width(&self) -> i32 {
        self.cols
    }

    pub fn height(&self) -> i32 {
        self.rows
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    /// Cell state at (x, y)
    pub fn cell_at(&self, x: i32, y: i32) -> Result<Cell, GridError> {
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds { x, y });
        }
        Ok(self.cells[self.get_id(x, y) as usize])
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells currently in the given state
    pub fn count(&self, state: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Position of the placed agent
    pub fn occupant(&self) -> Option<(i32, i32)> {
        self.occupant
    }

    /// Mark the occupied cell had before the agent stepped onto it
    pub fn underfoot(&self) -> Cell {
        self.underfoot
    }

    /// Get current grid revision number
    pub fn get_revision(&self) -> u64 {
        self.revision
    }

    fn set(&mut self, x: i32, y: i32, value: Cell) {
        let id = self.get_id(x, y) as usize;
        if self.cells[id] != value {
            self.cells[id] = value;
            self.revision += 1;
        }
    }

    /// Bind an agent to the grid and mark its cell `Occupied`
    pub fn place_agent(&mut self, agent: &Agent) -> Result<(), GridError> {
        let (x, y) = agent.position();
        let cell = self.cell_at(x, y)?;
        if cell == Cell::Wall {
            return Err(GridError::StartOnWall { x, y });
        }

        if let Some((ox, oy)) = self.occupant.take() {
            let restored = self.underfoot;
            self.set(ox, oy, restored);
        }

        // Re-read: the restored cell may be the new start
        self.underfoot = match self.cell_at(x, y)? {
            Cell::Occupied => Cell::Path,
            other => other,
        };
        self.set(x, y, Cell::Occupied);
        self.occupant = Some((x, y));
        Ok(())
    }

    /// Update markings after the agent may have moved
    ///
    /// The departed cell becomes `Dead` when the agent retreated out of it
    /// (the entered cell already carried a trail) or when it was `Dead`
    /// already, otherwise `Visited`. The agent's snapshot is flushed.
    pub fn on_agent_moved(&mut self, agent: &mut Agent) {
        if !agent.is_position_changed() {
            return;
        }

        let (last_x, last_y) = agent.last_position();
        let (x, y) = agent.position();

        let entered = match self.cell_at(x, y) {
            Ok(cell) => cell,
            Err(_) => return,
        };

        if self.contains(last_x, last_y) {
            let departed = if entered.is_trail() || self.underfoot == Cell::Dead {
                Cell::Dead
            } else {
                Cell::Visited
            };
            self.set(last_x, last_y, departed);
        }

        self.underfoot = entered;
        self.set(x, y, Cell::Occupied);
        self.occupant = Some((x, y));
        agent.flush();
    }

    /// One text row per grid row, joined by newlines
    pub fn render(&self) -> String {
        let mut result = String::with_capacity(((self.cols + 1) * self.rows) as usize);
        for y in 0..self.rows {
            if y > 0 {
                result.push('\n');
            }
            for x in 0..self.cols {
                result.push(self.cells[self.get_id(x, y) as usize].glyph());
            }
        }
        result
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
