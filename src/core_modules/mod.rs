pub mod block;
pub mod block_renderer;
pub mod center;
pub mod cluster_engine;
pub mod lab;
pub mod pixel;
pub mod seed_locator;
pub mod segmentation;
pub mod utils;
