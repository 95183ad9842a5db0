// THEORY:
// The `Block` module represents one rendering tile: a rectangular group of pixels
// that ends up painted a single color. It is the unit of the posterization step.
//
// Key architectural principles:
// 1.  **Spatial Pooling**: By grouping pixels (e.g., in an 8x8 tile), the output
//     turns from a per-pixel segmentation into a coarse, pixel-art grid.
// 2.  **Majority Vote**: The core operation of a block is `dominant_cluster`. The
//     cluster owning the most pixels of the tile decides its color, which hides
//     ragged superpixel boundaries inside the tile.
// 3.  **Data Container**: Like `Pixel`, `Block` is a "dumb" data container. It
//     knows its own bounds and how to tally a segmentation inside them. It does
//     not know how to paint itself.

pub mod block {
    use crate::core_modules::segmentation::Segmentation;
    use std::collections::BTreeMap;
    use std::ops::Range;

    /// A rectangular tile of the image, clipped to the image bounds.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Block {
        /// The rows covered by this block.
        pub rows: Range<usize>,
        /// The columns covered by this block.
        pub cols: Range<usize>,
    }

    impl Block {
        /// The block at grid cell `(block_row, block_col)` for tiles of `size`
        /// pixels on an image of `width` x `height`.
        pub fn new(block_row: usize, block_col: usize, size: usize, width: usize, height: usize) -> Self {
            let top = block_row * size;
            let left = block_col * size;
            Self {
                rows: top..(top + size).min(height),
                cols: left..(left + size).min(width),
            }
        }

        pub fn area(&self) -> usize {
            self.rows.len() * self.cols.len()
        }

        /// Number of pixels each cluster owns inside the block, keyed by cluster
        /// id in ascending order. Unassigned pixels are not counted.
        pub fn tally(&self, segmentation: &Segmentation) -> BTreeMap<usize, usize> {
            let mut counts = BTreeMap::new();
            for row in self.rows.clone() {
                for col in self.cols.clone() {
                    if let Some(id) = segmentation.cluster_at(row, col) {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
            }
            counts
        }

        /// The cluster owning the most pixels of the block. Ties go to the lowest
        /// cluster id. `None` when no pixel in the block is assigned.
        pub fn dominant_cluster(&self, segmentation: &Segmentation) -> Option<usize> {
            let mut winner = None;
            let mut max = 0;
            for (id, count) in self.tally(segmentation) {
                if count > max {
                    max = count;
                    winner = Some(id);
                }
            }
            winner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::block::Block;
    use crate::core_modules::center::Center;
    use crate::core_modules::segmentation::Segmentation;

    fn segmentation(width: usize, height: usize, ids: &[Option<usize>]) -> Segmentation {
        Segmentation::new(width, height, vec![Center::default(); 4], ids.to_vec())
    }

    #[test]
    fn edge_blocks_are_clipped() {
        let block = Block::new(1, 2, 4, 10, 6);
        assert_eq!(block.rows, 4..6);
        assert_eq!(block.cols, 8..10);
        assert_eq!(block.area(), 4);
    }

    #[test]
    fn majority_wins() {
        let seg = segmentation(2, 2, &[Some(3), Some(1), Some(3), None]);
        let block = Block::new(0, 0, 2, 2, 2);
        assert_eq!(block.tally(&seg).get(&3), Some(&2));
        assert_eq!(block.dominant_cluster(&seg), Some(3));
    }

    #[test]
    fn ties_go_to_the_lowest_id() {
        let seg = segmentation(2, 2, &[Some(2), Some(1), Some(2), Some(1)]);
        assert_eq!(Block::new(0, 0, 2, 2, 2).dominant_cluster(&seg), Some(1));
    }

    #[test]
    fn unassigned_block_has_no_winner() {
        let seg = segmentation(2, 2, &[None; 4]);
        let block = Block::new(0, 0, 2, 2, 2);
        assert!(block.tally(&seg).is_empty());
        assert_eq!(block.dominant_cluster(&seg), None);
    }
}
