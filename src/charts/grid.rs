//! Tile-grid layout for US states and territories.
//!
//! Plotters has no built-in state geometry, so the map is a cartogram:
//! one fixed cell per reporting unit, laid out in the conventional
//! "state tiles" arrangement (coasts on the edges, territories below).

/// `(abbreviation, column, row)` for each tile. Columns run 0..=11,
/// rows 0..=8.
pub static STATE_TILES: &[(&str, i32, i32)] = &[
    ("AK", 0, 0),
    ("ME", 11, 0),
    ("VT", 9, 1),
    ("NH", 10, 1),
    ("WA", 0, 2),
    ("ID", 1, 2),
    ("MT", 2, 2),
    ("ND", 3, 2),
    ("MN", 4, 2),
    ("IL", 5, 2),
    ("WI", 6, 2),
    ("MI", 7, 2),
    ("NY", 8, 2),
    ("MA", 9, 2),
    ("RI", 10, 2),
    ("OR", 0, 3),
    ("NV", 1, 3),
    ("WY", 2, 3),
    ("SD", 3, 3),
    ("IA", 4, 3),
    ("IN", 5, 3),
    ("OH", 6, 3),
    ("PA", 7, 3),
    ("NJ", 8, 3),
    ("CT", 9, 3),
    ("CA", 0, 4),
    ("UT", 1, 4),
    ("CO", 2, 4),
    ("NE", 3, 4),
    ("MO", 4, 4),
    ("KY", 5, 4),
    ("WV", 6, 4),
    ("VA", 7, 4),
    ("MD", 8, 4),
    ("DE", 9, 4),
    ("AZ", 1, 5),
    ("NM", 2, 5),
    ("KS", 3, 5),
    ("AR", 4, 5),
    ("TN", 5, 5),
    ("NC", 6, 5),
    ("SC", 7, 5),
    ("DC", 8, 5),
    ("OK", 3, 6),
    ("LA", 4, 6),
    ("MS", 5, 6),
    ("AL", 6, 6),
    ("GA", 7, 6),
    ("HI", 0, 7),
    ("TX", 3, 7),
    ("FL", 8, 7),
    // Territories reporting into the CDC dataset.
    ("PR", 3, 8),
    ("VI", 4, 8),
    ("GU", 5, 8),
    ("MP", 6, 8),
    ("AS", 7, 8),
];

pub const GRID_COLS: i32 = 12;
pub const GRID_ROWS: i32 = 9;

/// Looks up the tile position for a region abbreviation. Reporting
/// units without a tile (e.g. the separate NYC row) return `None` and
/// are simply not drawn.
pub fn tile_for(region: &str) -> Option<(i32, i32)> {
    STATE_TILES
        .iter()
        .find(|(abbr, _, _)| *abbr == region)
        .map(|(_, col, row)| (*col, *row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tiles_are_unique() {
        let mut abbrs = HashSet::new();
        let mut cells = HashSet::new();
        for (abbr, col, row) in STATE_TILES {
            assert!(abbrs.insert(*abbr), "duplicate abbreviation {abbr}");
            assert!(cells.insert((*col, *row)), "overlapping cell for {abbr}");
        }
    }

    #[test]
    fn test_tiles_fit_grid() {
        for (abbr, col, row) in STATE_TILES {
            assert!(
                (0..GRID_COLS).contains(col) && (0..GRID_ROWS).contains(row),
                "{abbr} outside grid"
            );
        }
    }

    #[test]
    fn test_covers_fifty_states_dc_and_territories() {
        // 50 states + DC + 5 territories.
        assert_eq!(STATE_TILES.len(), 56);
        assert_eq!(tile_for("VA"), Some((7, 4)));
        assert_eq!(tile_for("NYC"), None);
    }
}
