#![allow(dead_code)]

use mazewalk::{Agent, Cell, Direction, Grid, Layout};

/// Build a grid straight from marker rows
pub fn grid_from(rows: &[&[u8]]) -> Grid {
    let rows: Vec<Vec<u8>> = rows.iter().map(|r| r.to_vec()).collect();
    Grid::from_layout(&Layout::from_rows(rows).unwrap())
}

/// Grid plus a placed agent
pub fn setup(rows: &[&[u8]], x: i32, y: i32, direction: Direction) -> (Grid, Agent) {
    let mut grid = grid_from(rows);
    let agent = Agent::facing(x, y, direction);
    grid.place_agent(&agent).unwrap();
    (grid, agent)
}

/// Layout for a 3x3 bit mask, bit `y * 3 + x` set means path
pub fn layout_3x3(mask: u16) -> Layout {
    let rows = (0..3)
        .map(|y| (0..3).map(|x| ((mask >> (y * 3 + x)) & 1) as u8).collect())
        .collect();
    Layout::from_rows(rows).unwrap()
}

fn rank(cell: Cell) -> Option<u8> {
    match cell {
        Cell::Path => Some(0),
        Cell::Visited => Some(1),
        Cell::Dead => Some(2),
        Cell::Wall | Cell::Occupied => None,
    }
}

/// Tracks grid history and checks the traversal invariants after each tick
///
/// - the agent stays in bounds
/// - exactly one cell is `Occupied`, at the agent's position
/// - walls never change and marks only move Path -> Visited -> Dead
pub struct InvariantChecker {
    walls: Vec<bool>,
    ranks: Vec<u8>,
}

impl InvariantChecker {
    pub fn new(grid: &Grid) -> Self {
        InvariantChecker {
            walls: grid.cells().iter().map(|&c| c == Cell::Wall).collect(),
            ranks: grid.cells().iter().map(|&c| rank(c).unwrap_or(0)).collect(),
        }
    }

    pub fn check(&mut self, grid: &Grid, agent: &Agent) -> Result<(), String> {
        let (x, y) = agent.position();
        if !grid.contains(x, y) {
            return Err(format!("agent left the grid at ({}, {})", x, y));
        }
        if grid.count(Cell::Occupied) != 1 {
            return Err(format!("{} occupied cells", grid.count(Cell::Occupied)));
        }
        if grid.cell_at(x, y) != Ok(Cell::Occupied) {
            return Err(format!("agent cell ({}, {}) is not occupied", x, y));
        }

        for (id, &cell) in grid.cells().iter().enumerate() {
            if self.walls[id] != (cell == Cell::Wall) {
                return Err(format!("wall changed at cell {}: {:?}", id, cell));
            }
            if let Some(current) = rank(cell) {
                if current < self.ranks[id] {
                    return Err(format!(
                        "cell {} went back to {:?} (rank {} -> {})",
                        id, cell, self.ranks[id], current
                    ));
                }
                self.ranks[id] = current;
            }
        }
        Ok(())
    }
}
