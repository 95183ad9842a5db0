// THEORY:
// `SharedPixelator` makes one `Pixelator` usable from many async tasks. Clustering
// mutates the engine's center table and assignment in place, so runs are
// serialized behind a mutex and executed on the blocking thread pool. Readers
// never see the engine itself; after each run the new segmentation is published
// as an `Arc` snapshot behind a `RwLock` that overlays can read at any time.

use crate::config::RunParameters;
use crate::core_modules::pixel::pixel::PixelBuffer;
use crate::core_modules::segmentation::Segmentation;
use crate::error::{PixelateError, Result};
use crate::pipeline::{ParamChange, Pixelator};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct SharedPixelator {
    engine: Arc<Mutex<Pixelator>>,
    latest: Arc<RwLock<Option<Arc<Segmentation>>>>,
}

impl SharedPixelator {
    pub fn new(original: PixelBuffer, params: RunParameters) -> Result<Self> {
        Ok(Self {
            engine: Arc::new(Mutex::new(Pixelator::new(original, params)?)),
            latest: Arc::new(RwLock::new(None)),
        })
    }

    /// Clusters (if needed) and renders with the current parameters.
    pub async fn process(&self) -> Result<PixelBuffer> {
        self.run(|pixelator| pixelator.process()).await
    }

    /// Applies a parameter change and returns the re-rendered image.
    pub async fn apply(&self, change: ParamChange) -> Result<PixelBuffer> {
        self.run(move |pixelator| pixelator.apply(change)).await
    }

    /// The segmentation published by the most recent completed run.
    pub async fn latest_segmentation(&self) -> Option<Arc<Segmentation>> {
        self.latest.read().await.clone()
    }

    pub async fn parameters(&self) -> Result<RunParameters> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || {
            let guard = engine
                .lock()
                .map_err(|_| PixelateError::TaskJoin("pixelator lock poisoned".to_string()))?;
            Ok::<_, PixelateError>(*guard.parameters())
        })
        .await
        .map_err(|e| PixelateError::TaskJoin(e.to_string()))?
    }

    async fn run<F>(&self, job: F) -> Result<PixelBuffer>
    where
        F: FnOnce(&mut Pixelator) -> Result<PixelBuffer> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let latest = Arc::clone(&self.latest);
        tokio::task::spawn_blocking(move || {
            let mut guard = engine
                .lock()
                .map_err(|_| PixelateError::TaskJoin("pixelator lock poisoned".to_string()))?;
            let output = job(&mut guard)?;
            // Published under the engine lock so snapshots land in run order.
            *latest.blocking_write() = guard.segmentation();
            Ok::<_, PixelateError>(output)
        })
        .await
        .map_err(|e| PixelateError::TaskJoin(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    fn image() -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(24, 24, Pixel::new(200, 10, 10, 255)).expect("valid buffer");
        for row in 0..24 {
            for col in 12..24 {
                buffer.set_pixel(row, col, Pixel::new(10, 200, 10, 255));
            }
        }
        buffer
    }

    fn params() -> RunParameters {
        RunParameters {
            step: 6,
            iterations: 2,
            block_size: 4,
            color_weight: 5.0,
        }
    }

    #[tokio::test]
    async fn publishes_a_snapshot_after_each_run() {
        let shared = SharedPixelator::new(image(), params()).expect("valid setup");
        assert!(shared.latest_segmentation().await.is_none());

        shared.process().await.expect("render succeeds");
        let first = shared.latest_segmentation().await.expect("published");
        assert_eq!(first.centers().len(), 9);

        shared.apply(ParamChange::Step(8)).await.expect("render succeeds");
        let second = shared.latest_segmentation().await.expect("published");
        assert_eq!(second.centers().len(), 4);
        assert_eq!(first.centers().len(), 9);
        assert_eq!(shared.parameters().await.expect("readable").step, 8);
    }

    #[tokio::test]
    async fn concurrent_changes_are_serialized() {
        let shared = SharedPixelator::new(image(), params()).expect("valid setup");
        let handles: Vec<_> = (1..=4)
            .map(|size| {
                let shared = shared.clone();
                tokio::spawn(async move { shared.apply(ParamChange::BlockSize(size)).await })
            })
            .collect();

        for handle in handles {
            let output = handle.await.expect("task completes").expect("render succeeds");
            assert_eq!((output.width(), output.height()), (24, 24));
        }
        assert!(shared.latest_segmentation().await.is_some());
    }

    #[tokio::test]
    async fn invalid_change_is_reported() {
        let shared = SharedPixelator::new(image(), params()).expect("valid setup");
        let err = shared.apply(ParamChange::Step(0)).await.unwrap_err();
        assert!(matches!(err, PixelateError::InvalidConfig(_)));
    }
}
