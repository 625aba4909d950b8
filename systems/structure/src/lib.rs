#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure structural system that stamps the fixed wall layout of a Bomberman map.
//!
//! The layout is an impassable outer ring plus a lattice of pillars on every
//! cell whose row and column are both even. No randomness is involved.

use tilemap_pcg_core::{Cell, CellCoord, Grid};

/// Side length of the canonical Bomberman map.
pub const CLASSIC_SIZE: u32 = 15;

/// Reports whether the cell belongs to the fixed ring-and-lattice layout.
#[must_use]
pub const fn is_structural(cell: CellCoord, columns: u32, rows: u32) -> bool {
    is_ring(cell, columns, rows) || (cell.column() % 2 == 0 && cell.row() % 2 == 0)
}

/// Reports whether the cell lies on the outer ring of the grid.
#[must_use]
pub const fn is_ring(cell: CellCoord, columns: u32, rows: u32) -> bool {
    cell.row() == 0
        || cell.column() == 0
        || cell.row() + 1 == rows
        || cell.column() + 1 == columns
}

/// Marks every ring and lattice cell of the grid as [`Cell::Wall`].
pub fn stamp(grid: &mut Grid) {
    let (columns, rows) = (grid.columns(), grid.rows());
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            if is_structural(cell, columns, rows) {
                grid.set(cell, Cell::Wall);
            }
        }
    }
}

/// Collects the interior cells that are still empty, in row-major order.
///
/// Ring cells are never returned, even when a caller cleared them.
#[must_use]
pub fn free_cells(grid: &Grid) -> Vec<CellCoord> {
    let (columns, rows) = (grid.columns(), grid.rows());
    grid.iter()
        .filter(|(cell, value)| *value == Cell::Empty && !is_ring(*cell, columns, rows))
        .map(|(cell, _)| cell)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_detection_covers_all_four_edges() {
        assert!(is_ring(CellCoord::new(0, 5), 15, 15));
        assert!(is_ring(CellCoord::new(14, 5), 15, 15));
        assert!(is_ring(CellCoord::new(5, 0), 15, 15));
        assert!(is_ring(CellCoord::new(5, 14), 15, 15));
        assert!(!is_ring(CellCoord::new(1, 13), 15, 15));
    }
}
