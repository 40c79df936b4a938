use crate::cell::Cell;
use crate::direction::Direction;
use crate::grid::Grid;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Upper bound on internal mode transitions inside one `step` call
pub const MAX_TRANSITIONS_PER_STEP: usize = 2;

/// Result of a single `move_forward` attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveResult {
    Success,
    OutOfBounds,
    Wall,
    /// Target already carries a trail and visited cells were not allowed
    Blocked,
}

/// Traversal mode of the agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Right-hand wall following over fresh cells
    Following,
    /// Retracing the trail after a dead end
    Backtracking,
    /// Found an opening in the maze boundary
    Exited,
    /// No cell left to move into
    Exhausted,
}

impl Mode {
    pub fn is_terminal(self) -> bool {
        matches!(self, Mode::Exited | Mode::Exhausted)
    }
}

/// What happened during one `step` call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Moved onto a fresh cell
    Advanced,
    /// Moved while backtracking, usually back along the trail
    Retraced,
    /// Reached the maze exit this step
    Exited,
    /// Got stuck this step
    Exhausted,
    /// Already in a terminal mode, nothing happened
    Halted,
}

/// The maze walker
///
/// The agent never holds on to the grid: every operation that reads or
/// marks cells takes it as an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    x: i32,
    y: i32,
    last_x: i32,
    last_y: i32,
    direction: Direction,
    mode: Mode,
}

impl Agent {
    /// Create an agent at (x, y) facing North
    pub fn new(x: i32, y: i32) -> Self {
        Self::facing(x, y, Direction::North)
    }

    /// Create an agent at (x, y) with the given facing
    pub fn facing(x: i32, y: i32, direction: Direction) -> Self {
        Agent {
            x,
            y,
            last_x: x,
            last_y: y,
            direction,
            mode: Mode::Following,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Position at the last flush
    pub fn last_position(&self) -> (i32, i32) {
        (self.last_x, self.last_y)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.mode.is_terminal()
    }

    /// Check if the position has changed since last flush
    pub fn is_position_changed(&self) -> bool {
        self.x != self.last_x || self.y != self.last_y
    }

    /// Update last positions
    pub fn flush(&mut self) {
        self.last_x = self.x;
        self.last_y = self.y;
    }

    pub fn turn_clockwise(&mut self) {
        self.direction = self.direction.clockwise();
    }

    pub fn turn_counter_clockwise(&mut self) {
        self.direction = self.direction.counter_clockwise();
    }

    fn ahead(&self) -> (i32, i32) {
        let (dx, dy) = self.direction.offset();
        (self.x + dx, self.y + dy)
    }

    /// Move one cell in the facing direction
    ///
    /// Bounds are checked before cell contents. Walls always block, trail
    /// cells block unless `allow_visited` is set. Nothing changes unless the
    /// result is `Success`, in which case the grid updates its markings.
    pub fn move_forward(&mut self, grid: &mut Grid, allow_visited: bool) -> MoveResult {
        let (tx, ty) = self.ahead();
        let target = match grid.cell_at(tx, ty) {
            Ok(cell) => cell,
            Err(_) => return MoveResult::OutOfBounds,
        };

        match target {
            Cell::Wall => return MoveResult::Wall,
            Cell::Visited | Cell::Dead if !allow_visited => return MoveResult::Blocked,
            Cell::Occupied => return MoveResult::Blocked,
            Cell::Path | Cell::Visited | Cell::Dead => {}
        }

        self.x = tx;
        self.y = ty;
        grid.on_agent_moved(self);
        MoveResult::Success
    }

    /// Advance the state machine by one tick
    pub fn step(&mut self, grid: &mut Grid) -> StepOutcome {
        for _ in 0..MAX_TRANSITIONS_PER_STEP {
            match self.mode {
                Mode::Following => {
                    if let Some(outcome) = self.follow(grid) {
                        return outcome;
                    }
                    debug!("dead end at ({}, {}), backtracking", self.x, self.y);
                    self.turn_clockwise();
                    self.turn_clockwise();
                    self.mode = Mode::Backtracking;
                }
                Mode::Backtracking => return self.retrace(grid),
                Mode::Exited | Mode::Exhausted => return StepOutcome::Halted,
            }
        }
        // Following always hands over to Backtracking, which always returns
        StepOutcome::Halted
    }

    /// Right-hand rule. None means every direction was refused.
    fn follow(&mut self, grid: &mut Grid) -> Option<StepOutcome> {
        self.turn_clockwise();
        match self.move_forward(grid, false) {
            MoveResult::Success => return Some(StepOutcome::Advanced),
            MoveResult::OutOfBounds => return Some(self.finish(Mode::Exited)),
            MoveResult::Wall | MoveResult::Blocked => self.turn_counter_clockwise(),
        }

        for attempt in 0..4 {
            if attempt > 0 {
                self.turn_clockwise();
            }
            let result = self.move_forward(grid, false);
            trace!("try {:?} from ({}, {}): {:?}", self.direction, self.x, self.y, result);
            match result {
                MoveResult::Success => return Some(StepOutcome::Advanced),
                MoveResult::OutOfBounds => return Some(self.finish(Mode::Exited)),
                MoveResult::Wall | MoveResult::Blocked => {}
            }
        }
        None
    }

    /// Look for a fresh cell ahead, clockwise or behind, otherwise step back
    /// along the trail without re-entering dead cells.
    fn retrace(&mut self, grid: &mut Grid) -> StepOutcome {
        for attempt in 0..3 {
            if attempt > 0 {
                self.turn_clockwise();
            }
            if self.move_forward(grid, false) == MoveResult::Success {
                debug!("fresh cell at ({}, {}), following again", self.x, self.y);
                self.mode = Mode::Following;
                return StepOutcome::Advanced;
            }
        }

        self.turn_clockwise();
        for attempt in 0..4 {
            if attempt > 0 {
                self.turn_clockwise();
            }
            let (tx, ty) = self.ahead();
            if grid.cell_at(tx, ty) == Ok(Cell::Dead) {
                continue;
            }
            let result = self.move_forward(grid, true);
            trace!("retreat {:?} from ({}, {}): {:?}", self.direction, self.x, self.y, result);
            if result == MoveResult::Success {
                return StepOutcome::Retraced;
            }
        }

        self.finish(Mode::Exhausted)
    }

    fn finish(&mut self, mode: Mode) -> StepOutcome {
        debug!("agent {:?} at ({}, {})", mode, self.x, self.y);
        self.mode = mode;
        match mode {
            Mode::Exited => StepOutcome::Exited,
            Mode::Exhausted => StepOutcome::Exhausted,
            Mode::Following | Mode::Backtracking => StepOutcome::Halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn grid_from(rows: Vec<Vec<u8>>) -> Grid {
        Grid::from_layout(&Layout::from_rows(rows).unwrap())
    }

    /// Plus-shaped room: centre (1, 1) with a path on every side
    fn plus() -> Grid {
        grid_from(vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 1, 0]])
    }

    #[test]
    fn test_turns() {
        let mut agent = Agent::new(0, 0);
        assert_eq!(agent.direction(), Direction::North);
        agent.turn_clockwise();
        assert_eq!(agent.direction(), Direction::East);
        agent.turn_counter_clockwise();
        agent.turn_counter_clockwise();
        assert_eq!(agent.direction(), Direction::West);
        assert_eq!(agent.position(), (0, 0));
    }

    #[test]
    fn test_move_into_wall() {
        let mut grid = grid_from(vec![vec![1, 0]]);
        let mut agent = Agent::facing(0, 0, Direction::East);
        grid.place_agent(&agent).unwrap();

        for allow_visited in [false, true] {
            assert_eq!(agent.move_forward(&mut grid, allow_visited), MoveResult::Wall);
            assert_eq!(agent.position(), (0, 0));
            assert_eq!(agent.direction(), Direction::East);
        }
    }

    #[test]
    fn test_move_out_of_bounds() {
        let mut grid = grid_from(vec![vec![1, 1]]);
        let mut agent = Agent::facing(0, 0, Direction::West);
        grid.place_agent(&agent).unwrap();
        assert_eq!(agent.move_forward(&mut grid, true), MoveResult::OutOfBounds);

        agent.turn_clockwise(); // North
        assert_eq!(agent.move_forward(&mut grid, false), MoveResult::OutOfBounds);
        assert_eq!(agent.position(), (0, 0));
        assert_eq!(agent.direction(), Direction::North);
    }

    #[test]
    fn test_move_onto_visited() {
        let mut grid = grid_from(vec![vec![1, 1, 1]]);
        let mut agent = Agent::facing(0, 0, Direction::East);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.move_forward(&mut grid, false), MoveResult::Success);
        assert_eq!(agent.position(), (1, 0));

        agent.turn_clockwise();
        agent.turn_clockwise();
        assert_eq!(agent.move_forward(&mut grid, false), MoveResult::Blocked);
        assert_eq!(agent.position(), (1, 0));
        assert_eq!(agent.move_forward(&mut grid, true), MoveResult::Success);
        assert_eq!(agent.position(), (0, 0));
        assert_eq!(grid.cell_at(1, 0), Ok(Cell::Dead));

        // Dead cells are enterable only with allow_visited
        agent.turn_clockwise();
        agent.turn_clockwise();
        assert_eq!(agent.move_forward(&mut grid, false), MoveResult::Blocked);
        assert_eq!(agent.move_forward(&mut grid, true), MoveResult::Success);
        assert_eq!(agent.position(), (1, 0));
    }

    #[test]
    fn test_following_prefers_right() {
        let mut grid = plus();
        let mut agent = Agent::facing(1, 1, Direction::North);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.step(&mut grid), StepOutcome::Advanced);
        assert_eq!(agent.position(), (2, 1));
        assert_eq!(agent.direction(), Direction::East);
    }

    #[test]
    fn test_following_goes_straight_when_right_is_walled() {
        let mut grid = grid_from(vec![vec![0, 1, 0], vec![0, 1, 0], vec![0, 1, 0]]);
        let mut agent = Agent::facing(1, 2, Direction::North);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.step(&mut grid), StepOutcome::Advanced);
        assert_eq!(agent.position(), (1, 1));
        assert_eq!(agent.direction(), Direction::North);
        assert_eq!(agent.mode(), Mode::Following);
    }

    #[test]
    fn test_exit_through_right_hand_opening() {
        // East of the agent is the boundary
        let mut grid = grid_from(vec![vec![0, 0], vec![0, 1], vec![0, 0]]);
        let mut agent = Agent::facing(1, 1, Direction::North);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.step(&mut grid), StepOutcome::Exited);
        assert_eq!(agent.mode(), Mode::Exited);
        assert_eq!(agent.position(), (1, 1));
        assert_eq!(agent.step(&mut grid), StepOutcome::Halted);
    }

    #[test]
    fn test_enclosed_agent_is_exhausted() {
        let mut grid = grid_from(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let mut agent = Agent::new(1, 1);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.step(&mut grid), StepOutcome::Exhausted);
        assert_eq!(agent.mode(), Mode::Exhausted);
        assert_eq!(agent.position(), (1, 1));
        assert_eq!(grid.cell_at(1, 1), Ok(Cell::Occupied));

        let revision = grid.get_revision();
        assert_eq!(agent.step(&mut grid), StepOutcome::Halted);
        assert_eq!(grid.get_revision(), revision);
    }

    #[test]
    fn test_dead_end_retreats_and_resumes() {
        // (1, 1) is a dead end west of the start, the exit is to the east
        let mut grid = grid_from(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
        ]);
        let mut agent = Agent::facing(2, 1, Direction::West);
        grid.place_agent(&agent).unwrap();

        assert_eq!(agent.step(&mut grid), StepOutcome::Advanced);
        assert_eq!(agent.position(), (1, 1));

        assert_eq!(agent.step(&mut grid), StepOutcome::Retraced);
        assert_eq!(agent.position(), (2, 1));
        assert_eq!(agent.mode(), Mode::Backtracking);
        assert_eq!(grid.cell_at(1, 1), Ok(Cell::Dead));

        assert_eq!(agent.step(&mut grid), StepOutcome::Advanced);
        assert_eq!(agent.position(), (3, 1));
        assert_eq!(agent.mode(), Mode::Following);
        assert_eq!(grid.cell_at(2, 1), Ok(Cell::Visited));

        assert_eq!(agent.step(&mut grid), StepOutcome::Advanced);
        assert_eq!(agent.step(&mut grid), StepOutcome::Exited);
        assert_eq!(agent.position(), (4, 1));
        assert_eq!(grid.render(), "#####\n#x~~@\n#####");
    }

    #[test]
    fn test_closed_region_ends_exhausted() {
        // Three cells walled in on every side: both ends die, then the middle
        let mut grid = grid_from(vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 0],
        ]);
        let mut agent = Agent::facing(2, 1, Direction::East);
        grid.place_agent(&agent).unwrap();

        let mut outcomes = Vec::new();
        for _ in 0..10 {
            outcomes.push(agent.step(&mut grid));
            if agent.is_finished() {
                break;
            }
        }

        assert_eq!(agent.mode(), Mode::Exhausted);
        assert_eq!(outcomes.last(), Some(&StepOutcome::Exhausted));
        assert_eq!(grid.count(Cell::Occupied), 1);
        assert_eq!(grid.count(Cell::Dead), 2);
    }
}
