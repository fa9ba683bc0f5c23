//! Pixel canvas with alpha-blended rectangle fills, flushed to the terminal as half-blocks
//! (one terminal cell = one pixel wide, two pixels tall).

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

/// Shadow drawn over tiles: black at 32/255.
const SHADOW_ALPHA: u8 = 32;
/// Pause veil: black at 128/255.
pub const VEIL_ALPHA: u8 = 128;

type Rgb = (u8, u8, u8);

fn rgb(color: Color) -> Rgb {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (192, 192, 192),
        Color::DarkGray => (128, 128, 128),
        Color::White => (255, 255, 255),
        _ => (128, 128, 128),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb(background); width * height],
        }
    }

    pub fn clear(&mut self, background: Color) {
        self.pixels.fill(rgb(background));
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| {
            let (r, g, b) = self.pixels[y * self.width + x];
            Color::Rgb(r, g, b)
        })
    }

    /// Blends `color` at `alpha` over the rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, alpha: u8) {
        let x0 = x.clamp(0, self.width as i32) as usize;
        let y0 = y.clamp(0, self.height as i32) as usize;
        let x1 = x.saturating_add(w.max(0)).clamp(0, self.width as i32) as usize;
        let y1 = y.saturating_add(h.max(0)).clamp(0, self.height as i32) as usize;
        let src = rgb(color);
        for py in y0..y1 {
            for px in x0..x1 {
                let dst = &mut self.pixels[py * self.width + px];
                *dst = blend(*dst, src, alpha);
            }
        }
    }

    /// Base square plus three translucent shadows: one offset by a tenth of the tile down-right,
    /// a strip on the right edge and a strip along the bottom edge.
    pub fn draw_shadowed_tile(&mut self, x: i32, y: i32, size: i32, color: Color) {
        let offset = (size / 10).max(1);
        let inv = size - offset;
        self.fill_rect(x, y, size, size, color, u8::MAX);
        self.fill_rect(x + offset, y + offset, size - offset, size - offset, Color::Black, SHADOW_ALPHA);
        self.fill_rect(x + inv, y, offset, size, Color::Black, SHADOW_ALPHA);
        self.fill_rect(x, y + inv, inv, offset, Color::Black, SHADOW_ALPHA);
    }

    /// Upper-half-block per terminal cell: fg = even pixel row, bg = odd pixel row.
    pub fn blit(&self, buf: &mut Buffer, area: Rect) {
        for row in 0..self.height.div_ceil(2) {
            let ry = area.y + row as u16;
            if ry >= area.y + area.height {
                break;
            }
            for x in 0..self.width {
                let rx = area.x + x as u16;
                if rx >= area.x + area.width {
                    break;
                }
                let top = self.pixel(x, row * 2).unwrap_or(Color::Reset);
                let bottom = self.pixel(x, row * 2 + 1).unwrap_or(Color::Reset);
                buf[(rx, ry)]
                    .set_symbol("▀")
                    .set_style(Style::default().fg(top).bg(bottom));
            }
        }
    }
}

fn blend(dst: Rgb, src: Rgb, alpha: u8) -> Rgb {
    let a = u16::from(alpha);
    let mix = |d: u8, s: u8| ((u16::from(s) * a + u16::from(d) * (255 - a) + 127) / 255) as u8;
    (mix(dst.0, src.0), mix(dst.1, src.1), mix(dst.2, src.2))
}
