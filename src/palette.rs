// Colour table for the boards.
// Rows are shades, columns are boards: colors[shade][board].
// Every board gets its own ink colour for the same shade, which is what
// makes the panels look like a pop-art print run.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Named ink selector shared by all boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shade {
    Dark,
    Light,
}

impl Shade {
    pub const ALL: [Shade; 2] = [Shade::Dark, Shade::Light];

    #[inline]
    fn row(self) -> usize {
        match self {
            Shade::Dark => 0,
            Shade::Light => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shade::Dark => "dark",
            Shade::Light => "light",
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shade {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Shade::Dark),
            "light" => Ok(Shade::Light),
            _ => Err(Error::UnknownShade(s.to_string())),
        }
    }
}

pub const DEFAULT_DARK: [&str; 6] = ["#201f7c", "#ec027b", "#e9061d", "#7d4292", "#404b9c", "#ed6c03"];
pub const DEFAULT_LIGHT: [&str; 6] = ["#8cb21d", "#fefb00", "#f693c3", "#7dbbf4", "#fcfafb", "#fcfea8"];
pub const DEFAULT_BACKGROUND: [&str; 6] = ["#fefa08", "#0279ea", "#281f80", "#ee8609", "#e30f21", "#90b70b"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [Vec<u32>; 2],
    background: Vec<u32>,
}

impl Palette {
    /// Build from packed 0x00RRGGBB values. All rows must cover the same,
    /// non-zero number of boards.
    pub fn new(dark: Vec<u32>, light: Vec<u32>, background: Vec<u32>) -> Result<Self> {
        let n = background.len();
        if n == 0 {
            return Err(Error::Config("palette must define at least one board".into()));
        }
        if dark.len() != n || light.len() != n {
            return Err(Error::Config(format!(
                "palette rows differ in length: dark={}, light={}, background={n}",
                dark.len(),
                light.len()
            )));
        }
        Ok(Self {
            colors: [dark, light],
            background,
        })
    }

    /// Build from `#rrggbb` strings (the config file format).
    pub fn from_hex<S: AsRef<str>>(dark: &[S], light: &[S], background: &[S]) -> Result<Self> {
        let parse = |row: &[S]| row.iter().map(|s| parse_hex_color(s.as_ref())).collect::<Result<Vec<_>>>();
        Self::new(parse(dark)?, parse(light)?, parse(background)?)
    }

    /// Number of boards this palette can colour.
    pub fn len(&self) -> usize {
        self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty()
    }

    /// Ink colour for `shade` on board `board`.
    pub fn resolve(&self, board: usize, shade: Shade) -> Result<u32> {
        self.colors[shade.row()]
            .get(board)
            .copied()
            .ok_or(Error::OutOfRange { index: board, count: self.len() })
    }

    /// Like [`Palette::resolve`] but with the shade given by name.
    pub fn resolve_named(&self, board: usize, shade: &str) -> Result<u32> {
        self.resolve(board, shade.parse()?)
    }

    pub fn background(&self, board: usize) -> Result<u32> {
        self.background
            .get(board)
            .copied()
            .ok_or(Error::OutOfRange { index: board, count: self.len() })
    }
}

impl Default for Palette {
    fn default() -> Self {
        // The default table is known-good; parsing it cannot fail.
        let parse = |row: [&str; 6]| row.map(|s| parse_hex_color(s).unwrap_or(0)).to_vec();
        Self {
            colors: [parse(DEFAULT_DARK), parse(DEFAULT_LIGHT)],
            background: parse(DEFAULT_BACKGROUND),
        }
    }
}

/// "#rrggbb" (leading '#' optional) -> 0x00RRGGBB.
pub fn parse_hex_color(s: &str) -> Result<u32> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Config(format!("invalid colour '{s}', expected #rrggbb")));
    }
    u32::from_str_radix(hex, 16).map_err(|e| Error::Config(format!("invalid colour '{s}': {e}")))
}
