// THEORY:
// This file is the main entry point for the `slic_pixelator` library crate.
// It exports the `Pixelator` and its associated data structures
// (`RunParameters`, `Segmentation`, `PixelBuffer`, etc.) as the high-level
// interface of the engine. The `core_modules` hold the individual stages:
// color conversion, seed location, clustering and block rendering.
//
// Data flows one way through them:
//   PixelBuffer -> LabImage -> ClusterEngine -> Segmentation -> BlockRenderer -> PixelBuffer

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod shared_pipeline;

pub use config::RunParameters;
pub use core_modules::pixel::pixel::{Pixel, PixelBuffer};
pub use core_modules::segmentation::Segmentation;
pub use error::{PixelateError, Result};
pub use pipeline::{ParamChange, Pixelator};
pub use shared_pipeline::SharedPixelator;
