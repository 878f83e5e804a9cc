//! Bouncing balls on a toroidal grid, simulated bulk-synchronously.
//!
//! Balls are split across a worker group in contiguous input-order chunks.
//! Each step, every worker publishes the occupancy of its own balls (cell
//! plus heading) through the group's variable-length exchange; everyone then
//! holds the identical global occupancy map and can resolve its own balls'
//! collisions without ever seeing another worker's ball list directly.
//!
//! Collision rule: a ball moves one cell along its heading (wrapping at the
//! grid edges). If exactly two balls arrive at the same destination cell they
//! both turn 90 degrees; if all four inbound lanes are occupied they all
//! reverse; any other arrival count leaves headings unchanged.

use std::path::Path;

use fnv::FnvHashMap;
use tracing::{info, trace};

use bulk_sync::{execute, AbortError, Config, Worker};

pub mod error;
pub mod io;

pub use error::Error;

use io::Setup;

pub type Coord = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The heading after a two-ball collision.
    pub fn rotated(self) -> Self {
        match self {
            Direction::Left => Direction::Up,
            Direction::Right => Direction::Down,
            Direction::Up => Direction::Right,
            Direction::Down => Direction::Left,
        }
    }

    /// The heading after a four-ball collision.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Up => 'U',
            Direction::Down => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            _ => None,
        }
    }

    /// Wire encoding for the occupancy exchange.
    pub(crate) fn code(self) -> i64 {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    pub(crate) fn from_code(code: i64) -> Self {
        match code {
            0 => Direction::Left,
            1 => Direction::Right,
            2 => Direction::Up,
            3 => Direction::Down,
            _ => unreachable!("direction code {code} out of range"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ball {
    pub row: Coord,
    pub col: Coord,
    pub dir: Direction,
}

#[derive(Clone, Copy, Debug)]
pub struct Grid {
    pub rows: Coord,
    pub cols: Coord,
}

impl Grid {
    /// The cell a ball reaches after one step, wrapping at the edges.
    pub fn destination(&self, ball: Ball) -> (Coord, Coord) {
        match ball.dir {
            Direction::Right => (ball.row, (ball.col + 1) % self.cols),
            Direction::Left => (ball.row, (ball.col + self.cols - 1) % self.cols),
            Direction::Down => ((ball.row + 1) % self.rows, ball.col),
            Direction::Up => ((ball.row + self.rows - 1) % self.rows, ball.col),
        }
    }
}

type Occupancy = FnvHashMap<(Coord, Coord, Direction), i64>;

/// Advances this worker's `balls` by `steps` steps. Must be called
/// collectively; the per-step occupancy exchange is the only coordination.
pub fn simulate(
    worker: &Worker,
    grid: Grid,
    steps: u32,
    mut balls: Vec<Ball>,
) -> Result<Vec<Ball>, AbortError> {
    for step in 0..steps {
        let mut local = Occupancy::default();
        for ball in &balls {
            *local.entry((ball.row, ball.col, ball.dir)).or_insert(0) += 1;
        }

        let mut outgoing = Vec::with_capacity(local.len() * 4);
        for ((row, col, dir), count) in &local {
            outgoing.extend([i64::from(*row), i64::from(*col), dir.code(), *count]);
        }
        let (incoming, _counts) = worker.all_gather_varying(outgoing)?;

        let mut global = Occupancy::default();
        for record in incoming.chunks_exact(4) {
            let key = (record[0] as Coord, record[1] as Coord, Direction::from_code(record[2]));
            *global.entry(key).or_insert(0) += record[3];
        }

        balls = balls
            .iter()
            .map(|&ball| {
                let (row, col) = grid.destination(ball);
                let dir = match inbound(&global, &grid, row, col) {
                    2 => ball.dir.rotated(),
                    4 => ball.dir.reversed(),
                    _ => ball.dir,
                };
                Ball { row, col, dir }
            })
            .collect();
        trace!(worker = worker.index(), step, balls = balls.len(), "step resolved");
    }
    Ok(balls)
}

/// Counts the balls about to arrive at `(row, col)`: one inbound lane per
/// side, each keyed by the neighboring cell and the heading pointing in.
fn inbound(occupancy: &Occupancy, grid: &Grid, row: Coord, col: Coord) -> i64 {
    let above = ((row + grid.rows - 1) % grid.rows, col, Direction::Down);
    let below = ((row + 1) % grid.rows, col, Direction::Up);
    let left = (row, (col + grid.cols - 1) % grid.cols, Direction::Right);
    let right = (row, (col + 1) % grid.cols, Direction::Left);
    [above, below, left, right]
        .iter()
        .filter_map(|key| occupancy.get(key))
        .sum()
}

/// Runs the whole pipeline on a group of `workers`: worker 0 reads and
/// broadcasts the setup, each worker simulates its chunk, worker 0 writes
/// the final positions in input order.
pub fn run(workers: usize, input: &Path, output: &Path) -> Result<(), Error> {
    execute(Config::process(workers), move |worker| -> Result<(), Error> {
        let setup = if worker.index() == 0 {
            let setup = Setup::read(input)?;
            worker.broadcast(0, Some(setup))?
        } else {
            worker.broadcast(0, None)?
        };

        // Contiguous chunks keep the final gather in input order.
        let chunk = setup.balls.len().div_ceil(worker.peers());
        let start = (worker.index() * chunk).min(setup.balls.len());
        let end = (start + chunk).min(setup.balls.len());
        let own = setup.balls[start..end].to_vec();

        let finished = simulate(worker, setup.grid, setup.steps, own)?;

        let mut flat = Vec::with_capacity(finished.len() * 3);
        for ball in &finished {
            flat.extend([i64::from(ball.row), i64::from(ball.col), ball.dir.code()]);
        }
        let (gathered, _counts) = worker.all_gather_varying(flat)?;

        if worker.index() == 0 {
            let balls: Vec<Ball> = gathered
                .chunks_exact(3)
                .map(|record| Ball {
                    row: record[0] as Coord,
                    col: record[1] as Coord,
                    dir: Direction::from_code(record[2]),
                })
                .collect();
            io::write_balls(output, &balls)?;
            info!(workers = worker.peers(), balls = balls.len(), steps = setup.steps, "simulation complete");
        }
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_and_reversal_are_involutions_where_expected() {
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            assert_eq!(dir.reversed().reversed(), dir);
            assert_eq!(dir.rotated().rotated(), dir.reversed());
            assert_eq!(Direction::from_code(dir.code()), dir);
            assert_eq!(Direction::from_symbol(dir.symbol()), Some(dir));
        }
    }

    #[test]
    fn destinations_wrap_at_every_edge() {
        let grid = Grid { rows: 3, cols: 4 };
        let at = |row, col, dir| Ball { row, col, dir };
        assert_eq!(grid.destination(at(0, 3, Direction::Right)), (0, 0));
        assert_eq!(grid.destination(at(0, 0, Direction::Left)), (0, 3));
        assert_eq!(grid.destination(at(2, 1, Direction::Down)), (0, 1));
        assert_eq!(grid.destination(at(0, 1, Direction::Up)), (2, 1));
    }
}
