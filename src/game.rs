//! Game state: grid, active piece, clock/pause; per-frame update and gravity tick.

use crate::GameConfig;
use crate::grid::{Cell, Grid};
use crate::randomizer::PieceSource;
use crate::shapes::TetrominoKind;
use tracing::{debug, info, trace};

/// Active piece: anchor is the top-left corner of its 4x4 box, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: TetrominoKind,
    pub x: i32,
    pub y: i32,
    pub rotation: u8, // 0..4
}

impl Piece {
    /// Fresh piece at the horizontal centre of the top row, rotation 0.
    pub fn spawn(kind: TetrominoKind, grid_width: usize) -> Self {
        Self {
            kind,
            x: (grid_width / 2) as i32,
            y: 0,
            rotation: 0,
        }
    }

    /// Grid coordinates of the four filled cells.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        self.kind
            .cells(self.rotation)
            .map(move |(lx, ly)| (self.x + lx as i32, self.y + ly as i32))
    }

    fn moved(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    fn rotated(self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..self
        }
    }
}

/// True if any filled cell of `piece` lands on a non-EMPTY or off-grid cell.
pub fn collides(grid: &Grid, piece: &Piece) -> bool {
    piece.cells().any(|(x, y)| !grid.is_free(x, y))
}

/// Keys as seen by one frame: edges for everything but soft drop, which is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub pause: bool,
    pub rotate: bool,
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub paused: bool,
    /// Frames since the last gravity tick.
    pub frame: u32,
    /// Frames per gravity step.
    pub tick_frames: u32,
}

/// What a gravity tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Fell,
    Locked { cleared_rows: Vec<usize> },
    /// The piece overlapped the stack; the grid was reset.
    Lost,
}

#[derive(Debug)]
pub struct GameState {
    pub grid: Grid,
    pub piece: Piece,
    pub clock: Clock,
    source: Box<dyn PieceSource>,
}

impl GameState {
    pub fn new(config: &GameConfig, mut source: Box<dyn PieceSource>) -> Self {
        let grid = Grid::new(config.width, config.height);
        let piece = Piece::spawn(source.next_kind(), grid.width);
        Self {
            grid,
            piece,
            clock: Clock {
                paused: false,
                frame: 0,
                tick_frames: config.tick_frames,
            },
            source,
        }
    }

    pub fn collides(&self, piece: &Piece) -> bool {
        collides(&self.grid, piece)
    }

    /// One simulation frame. Returns the tick outcome when gravity fired this frame.
    pub fn update(&mut self, input: FrameInput) -> Option<TickOutcome> {
        if input.pause {
            self.toggle_pause();
        }
        if self.clock.paused {
            return None;
        }
        self.clock.frame = self.clock.frame.saturating_add(1);

        if input.rotate {
            self.rotate();
        }
        if input.soft_drop {
            self.clock.frame = self.clock.frame.saturating_add(self.clock.tick_frames);
        }
        if input.left {
            self.shift(-1);
        }
        if input.right {
            self.shift(1);
        }

        (self.clock.frame >= self.clock.tick_frames).then(|| self.gravity_tick())
    }

    pub fn toggle_pause(&mut self) {
        self.clock.paused = !self.clock.paused;
        debug!(paused = self.clock.paused, "pause toggled");
    }

    /// Rotates one step clockwise in place; reverts if the new mask collides. No kicks.
    pub fn rotate(&mut self) -> bool {
        let rotated = self.piece.rotated();
        if self.collides(&rotated) {
            return false;
        }
        self.piece = rotated;
        true
    }

    /// Shifts by `dx` columns if the shifted mask is clear.
    pub fn shift(&mut self, dx: i32) -> bool {
        let moved = self.piece.moved(dx, 0);
        if self.collides(&moved) {
            return false;
        }
        self.piece = moved;
        true
    }

    /// Loss check, then lock/respawn, row clear and one row of fall.
    pub fn gravity_tick(&mut self) -> TickOutcome {
        self.clock.frame = 0;

        if self.collides(&self.piece) {
            info!(
                kind = ?self.piece.kind,
                x = self.piece.x,
                y = self.piece.y,
                "piece overlaps the stack, resetting grid"
            );
            self.grid.initialize();
            self.spawn_next();
            return TickOutcome::Lost;
        }

        let landed = self.collides(&self.piece.moved(0, 1));
        if landed {
            self.lock_piece();
            self.spawn_next();
        }

        let cleared_rows = self.grid.clear_completed_rows();
        if !cleared_rows.is_empty() {
            debug!(rows = ?cleared_rows, "rows cleared");
        }

        self.piece.y += 1;
        trace!(x = self.piece.x, y = self.piece.y, "gravity step");

        if landed {
            TickOutcome::Locked { cleared_rows }
        } else {
            TickOutcome::Fell
        }
    }

    /// Writes the piece into the grid where it currently sits.
    fn lock_piece(&mut self) {
        let piece = self.piece;
        for (x, y) in piece.cells() {
            let written = self.grid.set(x, y, Cell::Locked(piece.kind));
            debug_assert!(written, "locked cell ({x},{y}) off grid");
        }
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, "piece locked");
    }

    fn spawn_next(&mut self) {
        self.piece = Piece::spawn(self.source.next_kind(), self.grid.width);
    }
}
