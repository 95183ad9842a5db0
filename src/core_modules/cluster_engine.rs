// THEORY:
// The `ClusterEngine` is the heart of the pixelator. It runs a localized variant of
// Lloyd's algorithm (k-means) over the pixel lattice, where each pixel's feature is
// its Lab color plus its position.
//
// Key architectural principles & algorithm steps:
// 1.  **Seeding**: Centers are laid on a regular grid of spacing `step`, starting
//     at `(step, step)`. Each grid point is refined by the seed locator so no
//     center starts on an edge. Grid order is the center table's fixed index and
//     the identity every assignment refers to for the rest of the run.
// 2.  **Localized Assignment**: A center only competes for pixels inside the
//     square window `[pos - step, pos + step]` around it. This bounds the work to
//     O(N * step^2) instead of O(N * K). Both ends of the window are inclusive,
//     so a pixel exactly `step` away from a center is still in reach.
// 3.  **Combined Distance**: `D = (dc / color_weight)^2 + (ds / step)^2`, with `dc`
//     the Lab distance and `ds` the lattice distance. A pixel moves to a center only
//     on a strictly smaller `D`, so earlier centers win ties.
// 4.  **Double-Buffered Update**: New centers are built into a second table from
//     per-center sums, then the tables are swapped. A center that ended up owning
//     no pixel keeps its position and color from the current table (with a zero
//     count), so it stays where it was and can win pixels again on the next pass.
// 5.  **Fixed Iteration Count**: There is no convergence test; a run performs
//     exactly `iterations` assign/update rounds.

use crate::core_modules::center::{Center, Point};
use crate::core_modules::lab::{LabColor, LabImage};
use crate::core_modules::seed_locator::find_local_minimum;
use crate::core_modules::segmentation::Segmentation;
use tracing::{debug, info, warn};

/// Per-center running sums for one update pass.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    l: f64,
    a: f64,
    b: f64,
    row_sum: usize,
    col_sum: usize,
    count: usize,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, color: LabColor, row: usize, col: usize) {
        self.l += color.l;
        self.a += color.a;
        self.b += color.b;
        self.row_sum += row;
        self.col_sum += col;
        self.count += 1;
    }

    /// The mean of the accumulated pixels, coordinates floored to the lattice.
    fn mean(&self) -> Option<Center> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(Center {
            row: self.row_sum / self.count,
            col: self.col_sum / self.count,
            l: self.l / n,
            a: self.a / n,
            b: self.b / n,
            pixel_count: self.count,
        })
    }
}

/// Grid coordinates along one axis: `step, 2*step, ...` below `dimension`.
/// An axis shorter than one step gets a single seed in its middle.
fn grid_axis(dimension: usize, step: usize) -> Vec<usize> {
    let coords: Vec<usize> = (step..dimension).step_by(step).collect();
    if coords.is_empty() {
        vec![dimension / 2]
    } else {
        coords
    }
}

/// Owns the center table and the per-pixel cluster assignment for one image.
pub struct ClusterEngine {
    width: usize,
    height: usize,
    /// Grid spacing of the seeds and half-width of every search window.
    step: usize,
    /// Divides the color term of the distance; larger values favour compactness.
    color_weight: f64,
    /// The live center table, indexed by cluster id.
    centers: Vec<Center>,
    /// The table the next update is written into before the swap.
    next_centers: Vec<Center>,
    /// Owning cluster id for every pixel, `None` while unassigned.
    assignment: Vec<Option<usize>>,
    /// Best distance found so far for every pixel in the current assignment pass.
    distances: Vec<f64>,
}

impl ClusterEngine {
    /// Seeds a new engine on `lab`.
    ///
    /// `step` must be positive and `color_weight` finite and positive; the
    /// `Pixelator` validates both before calling this.
    pub fn seed(lab: &LabImage, step: usize, color_weight: f64) -> Self {
        let (width, height) = (lab.width(), lab.height());
        let rows = grid_axis(height, step);
        let cols = grid_axis(width, step);
        if height <= step || width <= step {
            warn!(width, height, step, "image is smaller than one grid step along an axis; seeding its middle");
        }

        let mut centers = Vec::with_capacity(rows.len() * cols.len());
        for &row in &rows {
            for &col in &cols {
                let position = find_local_minimum(lab, Point::new(row, col));
                centers.push(Center::new(position, lab.color(position.row, position.col)));
            }
        }

        let num_pixels = width * height;
        Self {
            width,
            height,
            step,
            color_weight,
            next_centers: centers.clone(),
            centers,
            assignment: vec![None; num_pixels],
            distances: vec![f64::INFINITY; num_pixels],
        }
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    pub fn assignment(&self) -> &[Option<usize>] {
        &self.assignment
    }

    /// Runs exactly `iterations` assign/update rounds.
    pub fn run(&mut self, lab: &LabImage, iterations: usize) {
        info!(
            centers = self.centers.len(),
            step = self.step,
            iterations,
            color_weight = self.color_weight,
            "clustering"
        );
        for iteration in 0..iterations {
            self.assign(lab, self.step);
            let rolled_back = self.update(lab);
            debug!(iteration, rolled_back, "iteration complete");
        }
        let unassigned = self.assignment.iter().filter(|id| id.is_none()).count();
        info!(unassigned, "clustering complete");
    }

    /// Assignment step: every pixel goes to the closest center whose window of
    /// half-width `radius` contains it. Pixels outside every window stay `None`.
    pub fn assign(&mut self, lab: &LabImage, radius: usize) {
        self.distances.fill(f64::INFINITY);
        self.assignment.fill(None);

        let color_scale = self.color_weight * self.color_weight;
        let spatial_scale = (self.step as f64).powi(2);

        for (id, center) in self.centers.iter().enumerate() {
            let center_color = center.color();
            let center_position = center.position();

            let row_start = center.row.saturating_sub(radius);
            let row_end = center.row.saturating_add(radius).saturating_add(1).min(self.height);
            let col_start = center.col.saturating_sub(radius);
            let col_end = center.col.saturating_add(radius).saturating_add(1).min(self.width);

            for row in row_start..row_end {
                for col in col_start..col_end {
                    let index = row * self.width + col;
                    let dc_squared = center_color.distance_squared(&lab.color(row, col));
                    let ds = center_position.distance(&Point::new(row, col));
                    let d = dc_squared / color_scale + (ds * ds) / spatial_scale;

                    if d < self.distances[index] {
                        self.distances[index] = d;
                        self.assignment[index] = Some(id);
                    }
                }
            }
        }
    }

    /// Update step: moves every center to the mean of its pixels. Returns the
    /// number of centers that owned no pixel and kept their previous state.
    pub fn update(&mut self, lab: &LabImage) -> usize {
        let mut sums = vec![Accumulator::default(); self.centers.len()];
        for row in 0..self.height {
            for col in 0..self.width {
                if let Some(id) = self.assignment[row * self.width + col] {
                    sums[id].add(lab.color(row, col), row, col);
                }
            }
        }

        let mut rolled_back = 0;
        for ((next, current), sum) in self.next_centers.iter_mut().zip(&self.centers).zip(&sums) {
            *next = match sum.mean() {
                Some(mean) => mean,
                None => {
                    rolled_back += 1;
                    Center {
                        pixel_count: 0,
                        ..*current
                    }
                }
            };
        }
        std::mem::swap(&mut self.centers, &mut self.next_centers);
        rolled_back
    }

    /// An immutable copy of the current state for renderers and overlays.
    pub fn snapshot(&self) -> Segmentation {
        Segmentation::new(
            self.width,
            self.height,
            self.centers.clone(),
            self.assignment.clone(),
        )
    }
}
