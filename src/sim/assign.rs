//! Column assignment policy
//!
//! Pure mapping from an isopod's column to the crate it should climb toward.

use glam::Vec2;

use super::state::Crate;

/// Find the nearest intact crate in `column`.
///
/// Scans the row-major wall (`index = row * columns + column`), skips broken
/// crates, and picks the minimum Euclidean distance from `from`; ties keep
/// the first-encountered (lowest-row) crate. `None` means the column is
/// cleared out - the one signal that sends an isopod falling.
pub fn nearest_intact_crate(crates: &[Crate], columns: u32, column: u32, from: Vec2) -> Option<u32> {
    if columns == 0 {
        return None;
    }
    let rows = crates.len() as u32 / columns;
    let mut nearest: Option<(u32, f32)> = None;

    for row in 0..rows {
        let index = (row * columns + column) as usize;
        let Some(c) = crates.get(index) else { continue };
        if c.broken {
            continue;
        }
        let distance = from.distance(c.pos);
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((c.id, distance));
        }
    }

    nearest.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One column of crates at the given distances above the origin
    fn column_at_heights(heights: &[f32]) -> Vec<Crate> {
        heights
            .iter()
            .enumerate()
            .map(|(row, &y)| Crate::new(row as u32 + 1, row as u32, 0, Vec2::new(0.0, y), 100, 10))
            .collect()
    }

    #[test]
    fn test_picks_nearest_intact() {
        let crates = column_at_heights(&[5.0, 2.0, 8.0]);
        let id = nearest_intact_crate(&crates, 1, 0, Vec2::ZERO);
        assert_eq!(id, Some(crates[1].id));
    }

    #[test]
    fn test_skips_broken() {
        let mut crates = column_at_heights(&[5.0, 2.0, 8.0]);
        crates[1].apply_damage(1000.0);
        let id = nearest_intact_crate(&crates, 1, 0, Vec2::ZERO);
        assert_eq!(id, Some(crates[0].id));
    }

    #[test]
    fn test_tie_keeps_lowest_row() {
        let crates = column_at_heights(&[3.0, 3.0]);
        let id = nearest_intact_crate(&crates, 1, 0, Vec2::ZERO);
        assert_eq!(id, Some(crates[0].id));
    }

    #[test]
    fn test_empty_column_is_none() {
        let mut crates = column_at_heights(&[5.0, 2.0]);
        for c in &mut crates {
            c.apply_damage(1000.0);
        }
        assert_eq!(nearest_intact_crate(&crates, 1, 0, Vec2::ZERO), None);
    }

    #[test]
    fn test_only_scans_requested_column() {
        // 2 columns x 2 rows; column 1 broken everywhere, column 0 intact
        let mut crates = Vec::new();
        let mut id = 1;
        for row in 0..2u32 {
            for col in 0..2u32 {
                let mut c = Crate::new(id, row, col, Vec2::new(col as f32, row as f32), 100, 10);
                if col == 1 {
                    c.apply_damage(1000.0);
                }
                crates.push(c);
                id += 1;
            }
        }
        assert_eq!(nearest_intact_crate(&crates, 2, 1, Vec2::ZERO), None);
        assert!(nearest_intact_crate(&crates, 2, 0, Vec2::ZERO).is_some());
    }
}
