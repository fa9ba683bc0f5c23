//! Layout and drawing: board canvas, pause veil, status line, row-clear flash.

use crate::canvas::{Canvas, VEIL_ALPHA};
use crate::game::GameState;
use crate::grid::Grid;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Duration of the row-clear flash (TachyonFX fade) in ms.
const CLEAR_FLASH_MS: u32 = 180;

const HINT: &str = "A/D move  W rotate  S drop  Space pause  Q quit";
const PAUSED_HINT: &str = "PAUSED  Space resume  Q quit";

/// Row-clear flash: grid rows to flash, and the effect once created.
#[derive(Default)]
pub struct ClearFlash {
    rows: Vec<usize>,
    effect: Option<Effect>,
    processed_at: Option<Instant>,
}

impl ClearFlash {
    pub fn start(&mut self, rows: Vec<usize>) {
        *self = Self {
            rows,
            ..Self::default()
        };
    }

    pub fn is_active(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Drop a finished effect so the next frame draws plain tiles.
    pub fn retire_if_done(&mut self) {
        if self.effect.as_ref().is_some_and(Effect::done) {
            *self = Self::default();
        }
    }
}

/// Board footprint in terminal cells (width, height) for a grid at `tile_size` pixels per tile.
pub fn board_size(grid: &Grid, tile_size: u16) -> (u16, u16) {
    let t = usize::from(tile_size);
    let w = grid.width * t;
    let h = (grid.height * t).div_ceil(2);
    (
        u16::try_from(w).unwrap_or(u16::MAX),
        u16::try_from(h).unwrap_or(u16::MAX),
    )
}

/// Terminal rows (relative to the board) covering the given grid rows.
fn terminal_rows(grid_rows: &[usize], tile_size: u16) -> HashSet<u16> {
    let t = usize::from(tile_size.max(1));
    grid_rows
        .iter()
        .flat_map(|&r| (r * t / 2)..=(((r + 1) * t - 1) / 2))
        .filter_map(|y| u16::try_from(y).ok())
        .collect()
}

/// Clear to background, paint locked tiles and border, the active piece on top, then the
/// pause veil.
pub fn paint_board(canvas: &mut Canvas, state: &GameState, theme: &Theme, tile_size: u16) {
    let t = i32::from(tile_size);
    canvas.clear(theme.bg);
    for (x, y, cell) in state.grid.iter() {
        if let Some(color) = theme.cell_color(cell) {
            canvas.draw_shadowed_tile(x as i32 * t, y as i32 * t, t, color);
        }
    }
    let color = theme.piece_color(state.piece.kind);
    for (x, y) in state.piece.cells() {
        canvas.draw_shadowed_tile(x * t, y * t, t, color);
    }
    if state.clock.paused {
        canvas.fill_rect(0, 0, canvas.width as i32, canvas.height as i32, Color::Black, VEIL_ALPHA);
    }
}

/// Draw one frame: centred board, status line under it, and the row-clear flash if running.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    tile_size: u16,
    flash: &mut ClearFlash,
    now: Instant,
) {
    let area = frame.area();
    let (bw, bh) = board_size(&state.grid, tile_size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
    let board_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bw),
            Constraint::Fill(1),
        ])
        .split(rows[1]);
    let board_rect = board_row[1];

    let t = usize::from(tile_size);
    let mut canvas = Canvas::new(state.grid.width * t, state.grid.height * t, theme.bg);
    paint_board(&mut canvas, state, theme, tile_size);
    canvas.blit(frame.buffer_mut(), board_rect);

    let hint = if state.clock.paused { PAUSED_HINT } else { HINT };
    Paragraph::new(Line::from(hint))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.main_fg))
        .render(rows[2], frame.buffer_mut());

    if flash.is_active() {
        apply_clear_flash(frame, board_rect, tile_size, theme, flash, now);
    }
}

/// Create or advance the flash effect: cleared rows fade toward the flash colour.
fn apply_clear_flash(
    frame: &mut Frame,
    board_rect: Rect,
    tile_size: u16,
    theme: &Theme,
    flash: &mut ClearFlash,
    now: Instant,
) {
    let delta = flash
        .processed_at
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    flash.processed_at = Some(now);

    if flash.effect.is_none() {
        let rows: HashSet<u16> = terminal_rows(&flash.rows, tile_size)
            .into_iter()
            .map(|r| board_rect.y.saturating_add(r))
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| rows.contains(&pos.y)));
        let effect = fx::fade_to(theme.flash, theme.flash, (CLEAR_FLASH_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        flash.effect = Some(effect);
    }

    if let Some(effect) = &mut flash.effect {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}
