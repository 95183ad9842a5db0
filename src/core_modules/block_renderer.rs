// THEORY:
// The `BlockRenderer` is the last stage of the pixelator. It owns no state beyond
// its tile size; given the original image and a finished `Segmentation`, it slices
// the lattice into a grid of `Block`s and paints each one.
//
// Key architectural principles:
// 1.  **Orchestration**: It is not an analyzer itself. It walks the block grid in
//     row-major order and lets each `Block` decide its dominant cluster.
// 2.  **True Colors**: A block is filled with the original RGBA bytes found at the
//     winning center's coordinate, not with the center's averaged Lab color, so the
//     output only ever contains colors that exist in the source image.
// 3.  **Decoupling**: It reads the segmentation snapshot and never touches the
//     cluster engine, so changing the block size re-renders without re-clustering.
// 4.  **Explicit Fallback**: A block without a single assigned pixel has no winner
//     and is filled with transparent black.

use crate::core_modules::block::block::Block;
use crate::core_modules::pixel::pixel::{Pixel, PixelBuffer};
use crate::core_modules::segmentation::Segmentation;
use crate::error::{PixelateError, Result};
use tracing::{debug, warn};

/// Fill used for blocks in which no pixel belongs to any cluster.
pub const UNASSIGNED_FILL: Pixel = Pixel::TRANSPARENT;

/// Renders a segmentation as a grid of flat-colored square tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRenderer {
    /// Edge length of a tile in pixels.
    block_size: usize,
}

impl BlockRenderer {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(PixelateError::InvalidConfig(
                "block_size must be at least 1".to_string(),
            ));
        }
        Ok(Self { block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of block rows and block columns covering a `width` x `height` image.
    pub fn grid_dimensions(&self, width: usize, height: usize) -> (usize, usize) {
        (height.div_ceil(self.block_size), width.div_ceil(self.block_size))
    }

    /// Paints every block with the original color of its dominant cluster's center.
    ///
    /// `original` and `segmentation` must describe the same image.
    pub fn render(&self, original: &PixelBuffer, segmentation: &Segmentation) -> Result<PixelBuffer> {
        let (width, height) = (original.width(), original.height());
        if segmentation.width() != width || segmentation.height() != height {
            return Err(PixelateError::InvalidConfig(format!(
                "segmentation is {}x{} but the image is {width}x{height}",
                segmentation.width(),
                segmentation.height()
            )));
        }

        let (grid_rows, grid_cols) = self.grid_dimensions(width, height);
        let mut output = PixelBuffer::filled(width, height, UNASSIGNED_FILL)?;
        let mut empty_blocks = 0usize;

        for block_index in 0..grid_rows * grid_cols {
            let block = Block::new(
                block_index / grid_cols,
                block_index % grid_cols,
                self.block_size,
                width,
                height,
            );

            let fill = match block
                .dominant_cluster(segmentation)
                .and_then(|id| segmentation.center(id))
            {
                Some(center) => original.pixel(center.row, center.col),
                None => {
                    empty_blocks += 1;
                    UNASSIGNED_FILL
                }
            };

            for row in block.rows.clone() {
                for col in block.cols.clone() {
                    output.set_pixel(row, col, fill);
                }
            }
        }

        if empty_blocks > 0 {
            warn!(empty_blocks, "blocks without assigned pixels were left transparent");
        }
        debug!(grid_rows, grid_cols, block_size = self.block_size, "render complete");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::center::{Center, Point};
    use crate::core_modules::lab::LabColor;

    const RED: Pixel = Pixel::new(255, 0, 0, 255);
    const BLUE: Pixel = Pixel::new(0, 0, 255, 255);

    fn half_split(width: usize, height: usize) -> (PixelBuffer, Segmentation) {
        let mut image = PixelBuffer::filled(width, height, RED).expect("valid buffer");
        for row in 0..height {
            for col in width / 2..width {
                image.set_pixel(row, col, BLUE);
            }
        }
        let centers = vec![
            Center::new(Point::new(0, 0), LabColor::default()),
            Center::new(Point::new(0, width - 1), LabColor::default()),
        ];
        let assignment = (0..width * height)
            .map(|i| Some(usize::from(i % width >= width / 2)))
            .collect();
        (image, Segmentation::new(width, height, centers, assignment))
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(matches!(BlockRenderer::new(0), Err(PixelateError::InvalidConfig(_))));
    }

    #[test]
    fn grid_rounds_up() {
        let renderer = BlockRenderer::new(4).expect("valid size");
        assert_eq!(renderer.grid_dimensions(10, 8), (2, 3));
        assert_eq!(renderer.grid_dimensions(1, 1), (1, 1));
    }

    #[test]
    fn blocks_take_the_original_color_at_the_center() {
        let (image, seg) = half_split(8, 4);
        let output = BlockRenderer::new(4)
            .expect("valid size")
            .render(&image, &seg)
            .expect("matching dimensions");

        assert_eq!(output.pixel(3, 0), RED);
        assert_eq!(output.pixel(0, 7), BLUE);
        assert_eq!(output.width(), 8);
        assert_eq!(output.height(), 4);
    }

    #[test]
    fn straddling_block_uses_the_majority() {
        // Width 6, split at col 3, block size 4: the second block column covers
        // cols 4..6 (all blue); the first covers 0..4, three red columns to one blue.
        let (image, seg) = half_split(6, 4);
        let output = BlockRenderer::new(4)
            .expect("valid size")
            .render(&image, &seg)
            .expect("matching dimensions");

        assert!((0..4).all(|col| output.pixel(0, col) == RED));
        assert!((4..6).all(|col| output.pixel(3, col) == BLUE));
    }

    #[test]
    fn unassigned_blocks_fall_back_to_transparent() {
        let image = PixelBuffer::filled(4, 4, RED).expect("valid buffer");
        let seg = Segmentation::new(4, 4, vec![Center::default()], vec![None; 16]);
        let output = BlockRenderer::new(2)
            .expect("valid size")
            .render(&image, &seg)
            .expect("matching dimensions");

        assert!(output.pixels().all(|p| p == UNASSIGNED_FILL));
    }

    #[test]
    fn rendering_is_idempotent() {
        let (image, seg) = half_split(9, 7);
        let renderer = BlockRenderer::new(3).expect("valid size");
        let first = renderer.render(&image, &seg).expect("matching dimensions");
        let second = renderer.render(&image, &seg).expect("matching dimensions");
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn mismatched_segmentation_is_rejected() {
        let (image, _) = half_split(4, 4);
        let seg = Segmentation::new(2, 2, vec![Center::default()], vec![Some(0); 4]);
        let renderer = BlockRenderer::new(2).expect("valid size");
        assert!(renderer.render(&image, &seg).is_err());
    }
}
