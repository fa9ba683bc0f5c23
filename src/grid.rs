//! Grid: locked tiles framed by a one-cell border ring. y=0 is the top row.

use crate::shapes::TetrominoKind;

/// Single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Border,
    Locked(TetrominoKind),
}

/// Row-major grid of cells, `width` x `height` including the border ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// New grid with the border ring in place and an empty interior.
    pub fn new(width: usize, height: usize) -> Self {
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        };
        grid.initialize();
        grid
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes `cell` at (x, y). Returns false if the position is off the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// True only for an in-bounds EMPTY cell; off-grid positions count as blocked.
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(Cell::Empty)
    }

    fn is_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Border ring to BORDER, interior to EMPTY, regardless of prior contents.
    pub fn initialize(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.cells[y * self.width + x] = if self.is_edge(x, y) {
                    Cell::Border
                } else {
                    Cell::Empty
                };
            }
        }
    }

    fn interior_row(&self, y: usize) -> &[Cell] {
        let start = y * self.width + 1;
        &self.cells[start..start + self.width - 2]
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y > 0 && y + 1 < self.height && self.interior_row(y).iter().all(|c| *c != Cell::Empty)
    }

    /// Single top-down pass over the interior rows. Each full row is removed by copying
    /// every interior row above it down one; interior row 1 is then blanked.
    /// Returns the cleared row indices in scan order.
    pub fn clear_completed_rows(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        let inner = self.width.saturating_sub(2);
        for y in 1..self.height.saturating_sub(1) {
            if !self.is_row_full(y) {
                continue;
            }
            for k in (2..=y).rev() {
                let src = (k - 1) * self.width + 1;
                let dst = k * self.width + 1;
                self.cells.copy_within(src..src + inner, dst);
            }
            let top = self.width + 1;
            self.cells[top..top + inner].fill(Cell::Empty);
            cleared.push(y);
        }
        cleared
    }

    /// Cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (i % self.width, i / self.width, *c))
    }

    /// Ring is BORDER and no interior cell is BORDER.
    #[cfg(test)]
    pub fn border_intact(&self) -> bool {
        self.iter()
            .all(|(x, y, c)| (c == Cell::Border) == self.is_edge(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: usize = 12;
    const H: usize = 22;

    fn fill_row(grid: &mut Grid, y: i32, kind: TetrominoKind) {
        for x in 1..(grid.width as i32 - 1) {
            grid.set(x, y, Cell::Locked(kind));
        }
    }

    #[test]
    fn new_grid_has_border_ring_and_empty_interior() {
        let grid = Grid::new(W, H);
        for (x, y, c) in grid.iter() {
            let edge = x == 0 || y == 0 || x == W - 1 || y == H - 1;
            assert_eq!(c, if edge { Cell::Border } else { Cell::Empty }, "({x},{y})");
        }
        assert!(grid.border_intact());
    }

    #[test]
    fn off_grid_reads_are_none_and_blocked() {
        let grid = Grid::new(W, H);
        assert_eq!(grid.get(-1, 5), None);
        assert_eq!(grid.get(W as i32, 5), None);
        assert_eq!(grid.get(3, H as i32), None);
        assert!(!grid.is_free(-1, 5));
        assert!(!grid.is_free(0, 5));
        assert!(grid.is_free(1, 1));
    }

    #[test]
    fn off_grid_writes_are_refused() {
        let mut grid = Grid::new(W, H);
        let before = grid.clone();
        assert!(!grid.set(-1, 0, Cell::Locked(TetrominoKind::T)));
        assert!(!grid.set(0, H as i32, Cell::Locked(TetrominoKind::T)));
        assert_eq!(grid, before);
    }

    #[test]
    fn completing_a_row_clears_it_and_shifts_above_down() {
        let mut grid = Grid::new(W, H);
        for x in 1..(W as i32 - 2) {
            grid.set(x, 20, Cell::Locked(TetrominoKind::L));
        }
        grid.set(4, 19, Cell::Locked(TetrominoKind::T));
        grid.set(7, 1, Cell::Locked(TetrominoKind::S));
        assert!(!grid.is_row_full(20));
        assert!(grid.clear_completed_rows().is_empty());

        grid.set(W as i32 - 2, 20, Cell::Locked(TetrominoKind::I));
        assert!(grid.is_row_full(20));
        assert_eq!(grid.clear_completed_rows(), vec![20]);

        assert_eq!(grid.get(4, 20), Some(Cell::Locked(TetrominoKind::T)));
        assert_eq!(grid.get(7, 2), Some(Cell::Locked(TetrominoKind::S)));
        for x in 1..(W as i32 - 1) {
            assert_eq!(grid.get(x, 1), Some(Cell::Empty));
            if x != 4 {
                assert_eq!(grid.get(x, 20), Some(Cell::Empty));
            }
        }
        assert!(grid.border_intact());
    }

    #[test]
    fn multiple_full_rows_clear_in_one_pass() {
        let mut grid = Grid::new(W, H);
        fill_row(&mut grid, 19, TetrominoKind::J);
        fill_row(&mut grid, 20, TetrominoKind::Z);
        grid.set(3, 18, Cell::Locked(TetrominoKind::O));
        assert_eq!(grid.clear_completed_rows(), vec![19, 20]);
        assert_eq!(grid.get(3, 20), Some(Cell::Locked(TetrominoKind::O)));
        assert_eq!(grid.iter().filter(|(_, _, c)| matches!(c, Cell::Locked(_))).count(), 1);
    }

    #[test]
    fn full_top_row_is_blanked() {
        let mut grid = Grid::new(W, H);
        fill_row(&mut grid, 1, TetrominoKind::T);
        assert_eq!(grid.clear_completed_rows(), vec![1]);
        assert_eq!(grid, Grid::new(W, H));
    }

    #[test]
    fn border_rows_never_count_as_full() {
        let grid = Grid::new(W, H);
        assert!(!grid.is_row_full(0));
        assert!(!grid.is_row_full(H - 1));
    }

    fn arb_cell() -> impl Strategy<Value = Cell> {
        prop_oneof![
            3 => Just(Cell::Empty),
            1 => Just(Cell::Border),
            2 => prop::sample::select(TetrominoKind::ALL.to_vec()).prop_map(Cell::Locked),
        ]
    }

    proptest! {
        #[test]
        fn initialize_is_a_full_reset(cells in prop::collection::vec(arb_cell(), W * H)) {
            let mut grid = Grid::new(W, H);
            for (i, c) in cells.into_iter().enumerate() {
                grid.set((i % W) as i32, (i / W) as i32, c);
            }
            grid.initialize();
            prop_assert_eq!(&grid, &Grid::new(W, H));
            grid.initialize();
            prop_assert_eq!(grid, Grid::new(W, H));
        }

        #[test]
        fn clearing_only_touches_full_rows(
            rows in prop::collection::vec(prop::collection::vec(any::<bool>(), W - 2), H - 2),
        ) {
            let mut grid = Grid::new(W, H);
            for (j, row) in rows.iter().enumerate() {
                for (i, filled) in row.iter().enumerate() {
                    if *filled {
                        grid.set(i as i32 + 1, j as i32 + 1, Cell::Locked(TetrominoKind::T));
                    }
                }
            }
            let kept: Vec<&Vec<bool>> = rows.iter().filter(|r| !r.iter().all(|f| *f)).collect();
            let cleared = grid.clear_completed_rows();
            prop_assert_eq!(cleared.len(), rows.len() - kept.len());
            prop_assert!(grid.border_intact());

            // Surviving rows keep their order and sit at the bottom of the interior.
            let offset = rows.len() - kept.len();
            for (k, row) in kept.iter().enumerate() {
                let y = (offset + k + 1) as i32;
                for (i, filled) in row.iter().enumerate() {
                    prop_assert_eq!(grid.is_free(i as i32 + 1, y), !*filled);
                }
            }
            for y in 1..=offset as i32 {
                for x in 1..(W as i32 - 1) {
                    prop_assert!(grid.is_free(x, y));
                }
            }
        }
    }
}
