#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

/// Row-major grid of cells, indexed `[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

// 9 wide, 10 tall. 1 = wall.
const FIXED_MAP: [[u8; 9]; 10] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 0, 1, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 1, 0, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1],
];

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Builds a grid from rows of 0 (open) / non-zero (wall). Short rows are padded with walls.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut grid = Self::filled(width, height, Cell::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.as_ref().iter().enumerate() {
                if v == 0 {
                    grid.set(x, y, Cell::Open);
                }
            }
        }
        grid
    }

    /// The hand-authored map of the first demo.
    pub fn fixed_demo() -> Self {
        Self::from_rows(&FIXED_MAP)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    /// Writes a cell; out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.cells[i] = cell;
        }
    }

    /// Anything outside the grid counts as wall.
    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        !matches!(self.get(x as usize, y as usize), Some(Cell::Open))
    }

    /// Wall test for a continuous position in grid units.
    #[inline]
    pub fn is_wall_at(&self, px: f32, py: f32) -> bool {
        self.is_wall(px.floor() as i64, py.floor() as i64)
    }

    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Open).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_map_dimensions_and_border() {
        let grid = Grid::fixed_demo();
        assert_eq!(grid.width(), 9);
        assert_eq!(grid.height(), 10);
        for x in 0..9 {
            assert!(grid.is_wall(x, 0));
            assert!(grid.is_wall(x, 9));
        }
        for y in 0..10 {
            assert!(grid.is_wall(0, y));
            assert!(grid.is_wall(8, y));
        }
        assert!(!grid.is_wall(1, 1));
        assert!(grid.is_wall(2, 2));
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let grid = Grid::filled(3, 3, Cell::Open);
        assert!(grid.is_wall(-1, 0));
        assert!(grid.is_wall(0, -1));
        assert!(grid.is_wall(3, 0));
        assert!(grid.is_wall(0, 3));
        assert!(!grid.is_wall(2, 2));
        assert!(grid.is_wall_at(-0.01, 1.5));
        assert!(!grid.is_wall_at(2.99, 2.99));
    }

    #[test]
    fn from_rows_pads_short_rows_with_walls() {
        let grid = Grid::from_rows(&[vec![0u8, 0, 0], vec![0u8]]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(0, 1), Some(Cell::Open));
        assert_eq!(grid.get(1, 1), Some(Cell::Wall));
        assert_eq!(grid.open_cells(), 4);
    }
}
