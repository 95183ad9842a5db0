// THEORY:
// The `SeedLocator` nudges each grid seed away from edges before clustering
// starts. A seed placed on an edge averages two regions on its first update and
// drifts badly, so instead of taking the grid point verbatim we look at its 3x3
// neighbourhood and move to the pixel whose lightness changes least towards its
// right and bottom neighbours.
//
// It is a stateless utility, used only while seeding and never during iteration.

use crate::core_modules::center::Point;
use crate::core_modules::lab::LabImage;

/// Forward-difference lightness gradient at `(row, col)`.
/// Requires `row + 1 < height` and `col + 1 < width`.
#[inline]
fn gradient(lab: &LabImage, row: usize, col: usize) -> f64 {
    let here = lab.lightness(row, col);
    let right = lab.lightness(row, col + 1);
    let below = lab.lightness(row + 1, col);
    (right - here).abs() + (below - here).abs()
}

/// Returns the lowest-gradient coordinate in the 3x3 window around `point`.
///
/// The window is clamped to the image and never includes the last row or column,
/// which have no forward neighbour. Ties keep the first candidate in row-major
/// order. When no candidate exists (an image one pixel wide or tall) `point` is
/// returned unchanged.
pub fn find_local_minimum(lab: &LabImage, point: Point) -> Point {
    let (height, width) = (lab.height(), lab.width());
    if height < 2 || width < 2 {
        return point;
    }

    let row_start = point.row.saturating_sub(1);
    let row_end = (point.row + 1).min(height - 2);
    let col_start = point.col.saturating_sub(1);
    let col_end = (point.col + 1).min(width - 2);

    let mut best = point;
    let mut min_gradient = f64::MAX;

    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let g = gradient(lab, row, col);
            if g < min_gradient {
                min_gradient = g;
                best = Point::new(row, col);
            }
        }
    }

    best
}
