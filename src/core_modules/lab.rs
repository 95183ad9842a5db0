// THEORY:
// The `lab` module is the Color Converter. Clustering compares colors by Euclidean
// distance, which only approximates perceived difference in a perceptually
// uniform space, so every pixel is moved from sRGB to CIE Lab before any seed is
// placed.
//
// Pipeline per pixel: sRGB byte -> linear light (shared LUT in `pixel`) -> CIE
// XYZ (sRGB primaries) -> CIE Lab against the D65 white point.
//
// The converted colors live in `LabImage`, a buffer of their own. The original
// RGBA bytes are never overwritten, because the renderer needs them untouched.

use crate::core_modules::pixel::pixel::{Byte, Pixel, PixelBuffer};

/// Reference white (D65).
const WHITE_X: f64 = 0.950456;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088754;

/// CIE threshold between the linear and cube-root segments of Lab companding.
const EPSILON: f64 = 0.008856;
/// CIE slope of the linear segment.
const KAPPA: f64 = 903.3;

/// A color in CIE Lab.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabColor {
    /// Lightness, 0 (black) to 100 (white).
    pub l: f64,
    /// Green (negative) to red (positive).
    pub a: f64,
    /// Blue (negative) to yellow (positive).
    pub b: f64,
}

impl LabColor {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance (CIE76 ΔE²).
    #[inline]
    pub fn distance_squared(&self, other: &LabColor) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

impl From<Pixel> for LabColor {
    fn from(pixel: Pixel) -> Self {
        rgb_to_lab(pixel.red, pixel.green, pixel.blue)
    }
}

#[inline]
fn companding(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

/// Converts an sRGB triple to CIE Lab. Total over the whole byte domain.
pub fn rgb_to_lab(red: Byte, green: Byte, blue: Byte) -> LabColor {
    let (r, g, b) = Pixel::new(red, green, blue, u8::MAX).linearized();

    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

    let fx = companding(x / WHITE_X);
    let fy = companding(y / WHITE_Y);
    let fz = companding(z / WHITE_Z);

    LabColor {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// The working color buffer: one Lab color per pixel, row-major.
#[derive(Debug, Clone)]
pub struct LabImage {
    width: usize,
    height: usize,
    colors: Vec<LabColor>,
}

impl LabImage {
    /// Converts every pixel of `buffer` exactly once.
    pub fn from_pixels(buffer: &PixelBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            colors: buffer.pixels().map(LabColor::from).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn color(&self, row: usize, col: usize) -> LabColor {
        self.colors[row * self.width + col]
    }

    #[inline]
    pub fn lightness(&self, row: usize, col: usize) -> f64 {
        self.colors[row * self.width + col].l
    }

    pub fn colors(&self) -> &[LabColor] {
        &self.colors
    }
}
