// THEORY:
// The `Pixel` module is the most fundamental unit of the pixelator. It holds two
// "dumb" data containers:
//
// 1.  **Pixel**: a single RGBA quadruple, plus the gamma-decoded (linear light)
//     view of its color channels. Decoding goes through a 256-entry `OnceLock`
//     lookup table, so the hot path of the color conversion is a table read
//     instead of a `powf` per channel.
// 2.  **PixelBuffer**: the flat, row-major RGBA byte buffer an image arrives in and
//     the renderer writes out. Its dimensions are fixed at construction and it
//     refuses to exist with zero area or a byte length that disagrees with them.
//
// Neither container knows about clustering. They only answer "what bytes live at
// (row, col)" and "what is this pixel in linear light".

pub mod pixel {
    use crate::error::{PixelateError, Result};
    use std::sync::OnceLock;

    pub type Byte = u8;
    pub type Channel = Byte;
    pub type LinearChannel = f64;

    /// Number of bytes per pixel in every buffer handled by the engine.
    pub const CHANNELS: usize = 4;

    /// Upper bound of the linear segment of the sRGB transfer curve.
    const SRGB_LINEAR_THRESHOLD: f64 = 0.04045;

    // sRGB byte (0..255) -> linear normalized (0..1)
    static SRGB_TO_LINEAR_LUT: OnceLock<[LinearChannel; 256]> = OnceLock::new();

    /// A single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);

        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Gamma-decoded red, green and blue in 0.0..=1.0. Alpha is not gamma-encoded
        /// and has no linear form.
        pub fn linearized(&self) -> (LinearChannel, LinearChannel, LinearChannel) {
            (
                srgb_to_linear(self.red),
                srgb_to_linear(self.green),
                srgb_to_linear(self.blue),
            )
        }

        pub fn to_bytes(self) -> [Byte; CHANNELS] {
            [self.red, self.green, self.blue, self.alpha]
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    /// Decodes one sRGB byte into linear light, normalized to 0.0..=1.0.
    #[inline]
    pub fn srgb_to_linear(srgb_value: Byte) -> LinearChannel {
        let table = SRGB_TO_LINEAR_LUT.get_or_init(|| {
            let mut table = [0.0f64; 256];
            for (i, slot) in table.iter_mut().enumerate() {
                let srgb_normalized = i as f64 / 255.0;
                *slot = if srgb_normalized <= SRGB_LINEAR_THRESHOLD {
                    srgb_normalized / 12.92
                } else {
                    ((srgb_normalized + 0.055) / 1.055).powf(2.4)
                };
            }
            table
        });
        table[srgb_value as usize]
    }

    /// A row-major RGBA8 image buffer with fixed dimensions.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PixelBuffer {
        width: usize,
        height: usize,
        data: Vec<Byte>,
    }

    impl PixelBuffer {
        /// Wraps an existing RGBA byte buffer.
        ///
        /// Fails when either dimension is zero or when `data` does not hold exactly
        /// `width * height * 4` bytes.
        pub fn new(width: usize, height: usize, data: Vec<Byte>) -> Result<Self> {
            if width == 0 || height == 0 {
                return Err(PixelateError::EmptyImage { width, height });
            }
            let expected = width
                .checked_mul(height)
                .and_then(|area| area.checked_mul(CHANNELS))
                .ok_or_else(|| {
                    PixelateError::InvalidConfig(format!(
                        "image of {width}x{height} pixels does not fit in memory"
                    ))
                })?;
            if data.len() != expected {
                return Err(PixelateError::BufferSizeMismatch {
                    expected,
                    actual: data.len(),
                });
            }
            Ok(Self {
                width,
                height,
                data,
            })
        }

        /// A buffer where every pixel is `fill`.
        pub fn filled(width: usize, height: usize, fill: Pixel) -> Result<Self> {
            let pixels = width
                .checked_mul(height)
                .filter(|area| area.checked_mul(CHANNELS).is_some())
                .ok_or_else(|| {
                    PixelateError::InvalidConfig(format!(
                        "image of {width}x{height} pixels does not fit in memory"
                    ))
                })?;
            Self::new(width, height, fill.to_bytes().repeat(pixels))
        }

        pub fn width(&self) -> usize {
            self.width
        }

        pub fn height(&self) -> usize {
            self.height
        }

        /// Number of pixels, `width * height`.
        pub fn pixel_count(&self) -> usize {
            self.width * self.height
        }

        pub fn as_bytes(&self) -> &[Byte] {
            &self.data
        }

        #[inline]
        fn byte_index(&self, row: usize, col: usize) -> usize {
            (row * self.width + col) * CHANNELS
        }

        /// The pixel at `(row, col)`. Callers must stay inside the buffer.
        #[inline]
        pub fn pixel(&self, row: usize, col: usize) -> Pixel {
            let start = self.byte_index(row, col);
            Pixel::new(
                self.data[start],
                self.data[start + 1],
                self.data[start + 2],
                self.data[start + 3],
            )
        }

        #[inline]
        pub fn set_pixel(&mut self, row: usize, col: usize, pixel: Pixel) {
            let start = self.byte_index(row, col);
            self.data[start..start + CHANNELS].copy_from_slice(&pixel.to_bytes());
        }

        /// All pixels in row-major order.
        pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
            self.data
                .chunks_exact(CHANNELS)
                .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use crate::error::PixelateError;

    #[test]
    fn linearization_endpoints() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-12);
        // Byte 10 sits on the linear segment of the curve.
        assert!((srgb_to_linear(10) - (10.0 / 255.0) / 12.92).abs() < 1e-12);
    }

    #[test]
    fn buffer_rejects_zero_area() {
        let err = PixelBuffer::new(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, PixelateError::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn buffer_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            PixelateError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn filled_rejects_overflowing_dimensions() {
        let err = PixelBuffer::filled(usize::MAX, 2, Pixel::TRANSPARENT).unwrap_err();
        assert!(matches!(err, PixelateError::InvalidConfig(_)));
        let err = PixelBuffer::filled(usize::MAX / 4, 2, Pixel::TRANSPARENT).unwrap_err();
        assert!(matches!(err, PixelateError::InvalidConfig(_)));
    }

    #[test]
    fn pixel_access_is_row_major() {
        let mut buffer = PixelBuffer::filled(3, 2, Pixel::new(1, 2, 3, 4)).expect("valid buffer");
        buffer.set_pixel(1, 2, Pixel::new(9, 8, 7, 6));

        assert_eq!(buffer.pixel(1, 2), Pixel::new(9, 8, 7, 6));
        assert_eq!(&buffer.as_bytes()[20..24], &[9, 8, 7, 6]);
        assert_eq!(buffer.pixels().filter(|p| *p == Pixel::new(1, 2, 3, 4)).count(), 5);
        assert_eq!(buffer.pixel_count(), 6);
    }
}
