//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::grid::Cell;
use crate::shapes::TetrominoKind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Tile and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Piece colours in `TetrominoKind` order: I, O, T, J, L, S, Z.
    pub pieces: [Color; 7],
    /// Border ring tiles.
    pub border: Color,
    /// Playfield background (EMPTY cells are not painted).
    pub bg: Color,
    /// Hint / status text.
    pub main_fg: Color,
    /// Row-clear flash target.
    pub flash: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const PIECE_KEYS: [&str; 7] = [
    "piece_i", "piece_o", "piece_t", "piece_j", "piece_l", "piece_s", "piece_z",
];

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// The classic palette: cyan I, yellow O, purple T, blue J, orange L, green S, red Z.
    pub fn classic() -> Self {
        Self {
            pieces: [
                Color::Rgb(102, 191, 255),
                Color::Rgb(253, 249, 0),
                Color::Rgb(200, 122, 255),
                Color::Rgb(0, 121, 241),
                Color::Rgb(255, 161, 0),
                Color::Rgb(0, 228, 48),
                Color::Rgb(230, 41, 55),
            ],
            border: Color::Rgb(130, 130, 130),
            bg: Color::Rgb(0, 0, 0),
            main_fg: Color::Rgb(171, 178, 191),
            flash: Color::Rgb(255, 255, 255),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the classic palette if path is None or the file does not exist.
    /// `palette` then overrides piece colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))?
            }
            _ => Self::classic(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => {
                self.pieces = [
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0x00, 0x88, 0xFF),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x00, 0x00),
                ];
            }
            crate::Palette::Colorblind => {
                // Okabe-Ito: distinguishable without relying on red/green.
                self.pieces = [
                    Color::Rgb(0x56, 0xB4, 0xE9),
                    Color::Rgb(0xF0, 0xE4, 0x42),
                    Color::Rgb(0xCC, 0x79, 0xA7),
                    Color::Rgb(0x00, 0x72, 0xB2),
                    Color::Rgb(0xE6, 0x9F, 0x00),
                    Color::Rgb(0x00, 0x9E, 0x73),
                    Color::Rgb(0xD5, 0x5E, 0x00),
                ];
            }
        }
    }

    /// Missing keys keep the classic value; a present but malformed value is an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::classic();
        let get = |key: &str| map.get(key).map(|v| parse_hex(v)).transpose();
        for (slot, key) in theme.pieces.iter_mut().zip(PIECE_KEYS) {
            if let Some(c) = get(key)? {
                *slot = c;
            }
        }
        if let Some(c) = get("border")? {
            theme.border = c;
        }
        if let Some(c) = get("main_bg")? {
            theme.bg = c;
        }
        if let Some(c) = get("main_fg")? {
            theme.main_fg = c;
        }
        if let Some(c) = get("flash")? {
            theme.flash = c;
        }
        Ok(theme)
    }

    #[inline]
    pub fn piece_color(&self, kind: TetrominoKind) -> Color {
        self.pieces[kind as usize]
    }

    /// Colour a grid cell is painted with; EMPTY is not painted.
    pub fn cell_color(&self, cell: Cell) -> Option<Color> {
        match cell {
            Cell::Empty => None,
            Cell::Border => Some(self.border),
            Cell::Locked(kind) => Some(self.piece_color(kind)),
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
