#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Console rendering of generated grids.

use anyhow::{Context, Result as AnyResult};
use std::io;
use tilemap_pcg_core::{Cell, EnemyKind, Grid, PowerUpKind};

/// Header printed above a framed map.
pub const FRAME_HEADER: &str = "--- Current Map ---";
/// Footer printed below a framed map.
pub const FRAME_FOOTER: &str = "-------------------";

/// Glyph set used to draw cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    /// Bomberman glyphs: `X` walls, `*` destructible walls, `S` exit, `-` floor.
    Bomberman,
    /// Dungeon glyphs: `#` filled, `.` floor, `@` agent.
    Dungeon,
}

impl Palette {
    /// Glyph drawn for the provided cell.
    #[must_use]
    pub const fn glyph(self, cell: Cell) -> char {
        match self {
            Self::Bomberman => match cell {
                Cell::Empty => '-',
                Cell::Wall => 'X',
                Cell::DestructibleWall => '*',
                Cell::PowerUp(kind) => power_up_glyph(kind),
                Cell::Enemy(kind) => enemy_glyph(kind),
                Cell::Exit => 'S',
                Cell::Agent => 'A',
            },
            Self::Dungeon => match cell {
                Cell::Empty => '.',
                Cell::Agent => '@',
                _ => '#',
            },
        }
    }
}

const fn power_up_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Bombs => '#',
        PowerUpKind::Flames => '$',
        PowerUpKind::Speed => '@',
        PowerUpKind::Detonator => '&',
    }
}

const fn enemy_glyph(kind: EnemyKind) -> char {
    match kind {
        EnemyKind::Ballom => 'B',
        EnemyKind::Onil => 'O',
        EnemyKind::Dahl => 'D',
        EnemyKind::Minvo => 'M',
    }
}

/// How glyphs are laid out within a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Each glyph right-aligned in a field of the given width.
    RightAligned(usize),
    /// Each glyph followed by a single space.
    Spaced,
}

/// Renders grids row by row using a palette and layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRenderer {
    palette: Palette,
    layout: Layout,
    framed: bool,
}

impl GridRenderer {
    /// Creates a renderer without a frame.
    #[must_use]
    pub const fn new(palette: Palette, layout: Layout) -> Self {
        Self {
            palette,
            layout,
            framed: false,
        }
    }

    /// Renderer for Bomberman maps using right-aligned fields of `width`.
    #[must_use]
    pub const fn bomberman(width: usize) -> Self {
        Self::new(Palette::Bomberman, Layout::RightAligned(width))
    }

    /// Framed renderer for dungeon maps.
    #[must_use]
    pub const fn dungeon() -> Self {
        Self::new(Palette::Dungeon, Layout::Spaced).with_frame(true)
    }

    /// Enables or disables the header and footer lines.
    #[must_use]
    pub const fn with_frame(mut self, framed: bool) -> Self {
        self.framed = framed;
        self
    }

    /// Renders the grid into a string, one line per row.
    #[must_use]
    pub fn render(&self, grid: &Grid) -> String {
        let mut output = String::new();
        if self.framed {
            output.push_str(FRAME_HEADER);
            output.push('\n');
        }
        for row in grid.iter_rows() {
            for &cell in row {
                let glyph = self.palette.glyph(cell);
                match self.layout {
                    Layout::RightAligned(width) => {
                        output.push_str(&format!("{glyph:>width$}"));
                    }
                    Layout::Spaced => {
                        output.push(glyph);
                        output.push(' ');
                    }
                }
            }
            output.push('\n');
        }
        if self.framed {
            output.push_str(FRAME_FOOTER);
            output.push('\n');
        }
        output
    }

    /// Writes the rendered grid to `out`.
    pub fn write<W: io::Write>(&self, grid: &Grid, out: &mut W) -> AnyResult<()> {
        out.write_all(self.render(grid).as_bytes())
            .context("failed to write rendered map")
    }
}
