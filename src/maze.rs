use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::debug;

use crate::world::{Cell, Grid};

pub const ROOM_SIZE: usize = 3;
pub const MIN_DIMENSION: usize = 7;

// (dx, dy) in lattice steps; a neighbour sits two cells away.
const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be odd and at least {MIN_DIMENSION}, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

pub fn check_dimensions(width: usize, height: usize) -> Result<(), MazeError> {
    let ok = |d: usize| d >= MIN_DIMENSION && d % 2 == 1;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(MazeError::InvalidDimensions { width, height })
    }
}

/// Carves a perfect maze from (1, 1), stamps `extra_rooms` random 3x3 rooms,
/// then forces the spawn room at (1, 1) open.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    extra_rooms: usize,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    check_dimensions(width, height)?;

    let mut grid = Grid::filled(width, height, Cell::Wall);
    carve(&mut grid, rng);

    for _ in 0..extra_rooms {
        place_random_room(&mut grid, rng);
    }
    place_room(&mut grid, 1, 1);

    debug!(width, height, open = grid.open_cells(), "maze generated");
    Ok(grid)
}

/// Recursive backtracker on an explicit stack. Each stack frame keeps its own
/// shuffled direction list and the index of the next direction to try.
fn carve<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let mut stack: Vec<((i64, i64), [(i64, i64); 4], usize)> = Vec::new();

    grid.set(1, 1, Cell::Open);
    stack.push(((1, 1), shuffled(rng), 0));

    while let Some(top) = stack.last_mut() {
        let ((x, y), dirs, next) = top;
        if *next == dirs.len() {
            stack.pop();
            continue;
        }

        let (dx, dy) = dirs[*next];
        *next += 1;

        let (nx, ny) = (*x + dx * 2, *y + dy * 2);
        let in_bounds =
            nx >= 0 && ny >= 0 && (nx as usize) < grid.width() && (ny as usize) < grid.height();
        if !in_bounds || !grid.is_wall(nx, ny) {
            continue;
        }

        // Knock down the wall between the two lattice cells
        grid.set((*x + dx) as usize, (*y + dy) as usize, Cell::Open);
        grid.set(nx as usize, ny as usize, Cell::Open);
        stack.push(((nx, ny), shuffled(rng), 0));
    }
}

fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [(i64, i64); 4] {
    let mut dirs = DIRECTIONS;
    dirs.shuffle(rng);
    dirs
}

/// Opens a 3x3 block with its top-left corner at (x, y). Cells outside the grid are skipped.
pub fn place_room(grid: &mut Grid, x: usize, y: usize) {
    for dy in 0..ROOM_SIZE {
        for dx in 0..ROOM_SIZE {
            grid.set(x + dx, y + dy, Cell::Open);
        }
    }
}

/// Top-left corner is uniform in [3, dim - 4] on both axes, so the room
/// never touches the border.
pub fn place_random_room<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let x = rng.random_range(3..=grid.width() - 4);
    let y = rng.random_range(3..=grid.height() - 4);
    place_room(grid, x, y);
}
