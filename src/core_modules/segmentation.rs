// THEORY:
// `Segmentation` is the read-only view of a finished clustering run. The engine
// hands out an immutable copy of its center table and cluster assignment after
// each run instead of references into its live state, so overlays and renderers
// can hold on to a result while the engine re-clusters with new parameters.
//
// Key architectural principles:
// 1.  **Snapshot, not View**: It owns its data. Nothing about it changes after
//     construction.
// 2.  **Stable Identity**: Cluster ids are indices into `centers`. `None` in the
//     assignment means "unassigned" and is never confused with a real id.
// 3.  **Boundary Queries**: Segment contours are defined purely by comparing a
//     pixel's cluster id with its 8 neighbours', which the snapshot can answer
//     on its own.

use crate::core_modules::center::{Center, Point};

/// Neighbour offsets (row, col), starting north and turning counter-clockwise.
const NEIGHBOURS_8: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// A pixel becomes a contour pixel once this many of its neighbours differ.
const CONTOUR_MIN_DIFFERING_NEIGHBOURS: usize = 2;

/// An immutable result of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    width: usize,
    height: usize,
    centers: Vec<Center>,
    assignment: Vec<Option<usize>>,
}

impl Segmentation {
    pub fn new(width: usize, height: usize, centers: Vec<Center>, assignment: Vec<Option<usize>>) -> Self {
        debug_assert_eq!(assignment.len(), width * height);
        Self {
            width,
            height,
            centers,
            assignment,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    pub fn center(&self, id: usize) -> Option<&Center> {
        self.centers.get(id)
    }

    /// Cluster ids for every pixel, row-major.
    pub fn assignment(&self) -> &[Option<usize>] {
        &self.assignment
    }

    #[inline]
    pub fn cluster_at(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.assignment[row * self.width + col]
    }

    pub fn unassigned_count(&self) -> usize {
        self.assignment.iter().filter(|id| id.is_none()).count()
    }

    /// Pixels that lie on a boundary between segments, in row-major order.
    ///
    /// A pixel qualifies when at least two of its in-bounds neighbours carry a
    /// different cluster id and are not contour pixels themselves. Marking found
    /// pixels keeps the boundary about one pixel thick.
    pub fn contour_pixels(&self) -> Vec<Point> {
        let mut contours = Vec::new();
        let mut is_taken = vec![false; self.width * self.height];

        for row in 0..self.height {
            for col in 0..self.width {
                let here = self.assignment[row * self.width + col];
                let mut differing = 0;

                for (dr, dc) in NEIGHBOURS_8 {
                    let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc)) else {
                        continue;
                    };
                    if nr >= self.height || nc >= self.width {
                        continue;
                    }
                    let neighbour = nr * self.width + nc;
                    if !is_taken[neighbour] && self.assignment[neighbour] != here {
                        differing += 1;
                    }
                }

                if differing >= CONTOUR_MIN_DIFFERING_NEIGHBOURS {
                    contours.push(Point::new(row, col));
                    is_taken[row * self.width + col] = true;
                }
            }
        }

        contours
    }
}
