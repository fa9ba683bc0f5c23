//! Tetromino kinds and their 4x4 occupancy masks for each rotation state.

/// Tetromino kinds, in the order used by the uniform random draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

/// One rotation state: four rows, bit 3 of each row is local column 0.
type Mask = [u8; 4];

const I_MASKS: [Mask; 4] = [
    [0b0000, 0b1111, 0b0000, 0b0000],
    [0b0010, 0b0010, 0b0010, 0b0010],
    [0b0000, 0b0000, 0b1111, 0b0000],
    [0b0100, 0b0100, 0b0100, 0b0100],
];

const O_MASKS: [Mask; 4] = [[0b0000, 0b0110, 0b0110, 0b0000]; 4];

const T_MASKS: [Mask; 4] = [
    [0b0000, 0b0100, 0b1110, 0b0000],
    [0b0000, 0b0100, 0b0110, 0b0100],
    [0b0000, 0b0000, 0b1110, 0b0100],
    [0b0000, 0b0100, 0b1100, 0b0100],
];

const J_MASKS: [Mask; 4] = [
    [0b0000, 0b1000, 0b1110, 0b0000],
    [0b0000, 0b0110, 0b0100, 0b0100],
    [0b0000, 0b0000, 0b1110, 0b0010],
    [0b0000, 0b0100, 0b0100, 0b1100],
];

const L_MASKS: [Mask; 4] = [
    [0b0000, 0b0010, 0b1110, 0b0000],
    [0b0000, 0b0100, 0b0100, 0b0110],
    [0b0000, 0b0000, 0b1110, 0b1000],
    [0b0000, 0b1100, 0b0100, 0b0100],
];

const S_MASKS: [Mask; 4] = [
    [0b0000, 0b0110, 0b1100, 0b0000],
    [0b0000, 0b0100, 0b0110, 0b0010],
    [0b0000, 0b0000, 0b0110, 0b1100],
    [0b0000, 0b1000, 0b1100, 0b0100],
];

const Z_MASKS: [Mask; 4] = [
    [0b0000, 0b1100, 0b0110, 0b0000],
    [0b0000, 0b0010, 0b0110, 0b0100],
    [0b0000, 0b0000, 0b1100, 0b0110],
    [0b0000, 0b0100, 0b1100, 0b1000],
];

impl TetrominoKind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::J, Self::L, Self::S, Self::Z];

    fn masks(self) -> &'static [Mask; 4] {
        match self {
            Self::I => &I_MASKS,
            Self::O => &O_MASKS,
            Self::T => &T_MASKS,
            Self::J => &J_MASKS,
            Self::L => &L_MASKS,
            Self::S => &S_MASKS,
            Self::Z => &Z_MASKS,
        }
    }

    /// True if local cell (lx, ly) of the 4x4 box is filled in `rotation` (taken mod 4).
    /// Anything outside the box is empty.
    pub fn occupied(self, rotation: u8, lx: usize, ly: usize) -> bool {
        if lx >= 4 || ly >= 4 {
            return false;
        }
        let row = self.masks()[(rotation % 4) as usize][ly];
        (row >> (3 - lx)) & 1 == 1
    }

    /// Local (lx, ly) offsets of the filled cells, row by row.
    pub fn cells(self, rotation: u8) -> impl Iterator<Item = (usize, usize)> {
        (0..4).flat_map(move |ly| {
            (0..4).filter_map(move |lx| self.occupied(rotation, lx, ly).then_some((lx, ly)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rotation_has_four_cells() {
        for kind in TetrominoKind::ALL {
            for rotation in 0..4 {
                assert_eq!(kind.cells(rotation).count(), 4, "{kind:?} rotation {rotation}");
            }
        }
    }

    #[test]
    fn spawn_rotation_leaves_top_row_empty() {
        for kind in TetrominoKind::ALL {
            assert!((0..4).all(|lx| !kind.occupied(0, lx, 0)), "{kind:?}");
        }
    }

    #[test]
    fn i_piece_spawns_flat_on_second_row() {
        let cells: Vec<_> = TetrominoKind::I.cells(0).collect();
        assert_eq!(cells, vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
        let cells: Vec<_> = TetrominoKind::I.cells(1).collect();
        assert_eq!(cells, vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn rotation_wraps_mod_four() {
        for kind in TetrominoKind::ALL {
            let a: Vec<_> = kind.cells(1).collect();
            let b: Vec<_> = kind.cells(5).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn o_piece_is_rotation_invariant() {
        let spawn: Vec<_> = TetrominoKind::O.cells(0).collect();
        for rotation in 1..4 {
            assert_eq!(TetrominoKind::O.cells(rotation).collect::<Vec<_>>(), spawn);
        }
    }

    #[test]
    fn out_of_box_is_empty() {
        assert!(!TetrominoKind::I.occupied(0, 4, 1));
        assert!(!TetrominoKind::I.occupied(0, 0, 4));
    }
}
