// THEORY:
// The `pipeline` module is the top-level API of the pixelator. It encapsulates the
// whole stack (color conversion, seeding, clustering, rendering) behind one
// `Pixelator` that owns the image for its lifetime.
//
// Key architectural principles:
// 1.  **Convert Once**: The Lab buffer is built at construction. Every later run,
//     whatever its parameters, reads the same converted colors.
// 2.  **Re-entrant on Parameter Change**: Changing a clustering parameter throws
//     away the current segmentation and clusters again. Changing only the block
//     size re-renders the existing segmentation.
// 3.  **Snapshots Out**: Callers receive `Arc<Segmentation>` copies. The engine's
//     live buffers are never handed out.

use crate::config::RunParameters;
use crate::core_modules::block_renderer::BlockRenderer;
use crate::core_modules::cluster_engine::ClusterEngine;
use crate::core_modules::lab::LabImage;
use crate::core_modules::pixel::pixel::PixelBuffer;
use crate::core_modules::segmentation::Segmentation;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

// Re-export key data structures for the public API.
pub use crate::core_modules::center::{Center, Point};
pub use crate::core_modules::lab::{LabColor, rgb_to_lab};
pub use crate::core_modules::pixel::pixel::Pixel;

/// A single parameter change, as issued by an interactive caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Step(usize),
    Iterations(usize),
    ColorWeight(f64),
    BlockSize(usize),
    All(RunParameters),
}

/// The main, top-level struct of the pixelator.
pub struct Pixelator {
    /// The untouched source image; rendered blocks copy their colors from here.
    original: PixelBuffer,
    /// The source image in Lab, converted once.
    lab: LabImage,
    params: RunParameters,
    renderer: BlockRenderer,
    /// Result of the last clustering run; `None` until one has run with the
    /// current clustering parameters.
    segmentation: Option<Arc<Segmentation>>,
}

impl Pixelator {
    pub fn new(original: PixelBuffer, params: RunParameters) -> Result<Self> {
        params.validate()?;
        let renderer = BlockRenderer::new(params.block_size)?;
        let lab = LabImage::from_pixels(&original);
        info!(
            width = original.width(),
            height = original.height(),
            pixels = original.pixel_count(),
            "pixelator ready"
        );
        Ok(Self {
            original,
            lab,
            params,
            renderer,
            segmentation: None,
        })
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    pub fn parameters(&self) -> &RunParameters {
        &self.params
    }

    /// The last clustering result, if it is still valid for the current parameters.
    pub fn segmentation(&self) -> Option<Arc<Segmentation>> {
        self.segmentation.clone()
    }

    /// Clusters unconditionally with the current parameters and stores the result.
    pub fn cluster(&mut self) -> Arc<Segmentation> {
        let mut engine = ClusterEngine::seed(&self.lab, self.params.step, self.params.color_weight);
        engine.run(&self.lab, self.params.iterations);
        let segmentation = Arc::new(engine.snapshot());
        self.segmentation = Some(Arc::clone(&segmentation));
        segmentation
    }

    /// Renders the current segmentation, clustering first if there is none.
    pub fn render(&mut self) -> Result<PixelBuffer> {
        let segmentation = match &self.segmentation {
            Some(segmentation) => Arc::clone(segmentation),
            None => self.cluster(),
        };
        self.renderer.render(&self.original, &segmentation)
    }

    /// Clusters (when needed) and renders: the one-call path from image to output.
    pub fn process(&mut self) -> Result<PixelBuffer> {
        self.render()
    }

    pub fn set_step(&mut self, step: usize) -> Result<PixelBuffer> {
        self.set_parameters(RunParameters { step, ..self.params })
    }

    pub fn set_iterations(&mut self, iterations: usize) -> Result<PixelBuffer> {
        self.set_parameters(RunParameters { iterations, ..self.params })
    }

    pub fn set_color_weight(&mut self, color_weight: f64) -> Result<PixelBuffer> {
        self.set_parameters(RunParameters { color_weight, ..self.params })
    }

    /// Re-renders with a new tile size; the segmentation is reused.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<PixelBuffer> {
        self.set_parameters(RunParameters { block_size, ..self.params })
    }

    /// Applies a full parameter set. Invalid parameters leave the pixelator
    /// unchanged.
    pub fn set_parameters(&mut self, params: RunParameters) -> Result<PixelBuffer> {
        params.validate()?;
        let renderer = BlockRenderer::new(params.block_size)?;
        if self.params.requires_reclustering(&params) {
            self.segmentation = None;
        }
        self.params = params;
        self.renderer = renderer;
        self.render()
    }

    pub fn apply(&mut self, change: ParamChange) -> Result<PixelBuffer> {
        match change {
            ParamChange::Step(step) => self.set_step(step),
            ParamChange::Iterations(iterations) => self.set_iterations(iterations),
            ParamChange::ColorWeight(color_weight) => self.set_color_weight(color_weight),
            ParamChange::BlockSize(block_size) => self.set_block_size(block_size),
            ParamChange::All(params) => self.set_parameters(params),
        }
    }
}
