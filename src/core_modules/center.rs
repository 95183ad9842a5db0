// THEORY:
// A `Center` is the state of one superpixel cluster: where it sits on the pixel
// lattice and the average Lab color of the pixels it owns. It is a plain `Copy`
// record so the cluster engine can keep two tables of them (the current one and
// the one being built) and fall back to the previous value of any cluster that
// ends an iteration empty.

use crate::core_modules::lab::LabColor;

/// An integer coordinate on the pixel lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance on the lattice.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

/// One cluster of the segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Center {
    /// Lattice row of the center.
    pub row: usize,
    /// Lattice column of the center.
    pub col: usize,
    /// Averaged lightness of the member pixels.
    pub l: f64,
    /// Averaged a-axis chroma of the member pixels.
    pub a: f64,
    /// Averaged b-axis chroma of the member pixels.
    pub b: f64,
    /// Number of pixels assigned in the last update; zero right after seeding.
    pub pixel_count: usize,
}

impl Center {
    pub fn new(position: Point, color: LabColor) -> Self {
        Self {
            row: position.row,
            col: position.col,
            l: color.l,
            a: color.a,
            b: color.b,
            pixel_count: 0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.row, self.col)
    }

    pub fn color(&self) -> LabColor {
        LabColor::new(self.l, self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_is_euclidean() {
        assert_eq!(Point::new(0, 0).distance(&Point::new(3, 4)), 5.0);
        assert_eq!(Point::new(3, 4).distance(&Point::new(0, 0)), 5.0);
    }

    #[test]
    fn new_center_starts_empty() {
        let center = Center::new(Point::new(2, 5), LabColor::new(50.0, 1.0, -1.0));
        assert_eq!(center.position(), Point::new(2, 5));
        assert_eq!(center.color(), LabColor::new(50.0, 1.0, -1.0));
        assert_eq!(center.pixel_count, 0);
    }
}
