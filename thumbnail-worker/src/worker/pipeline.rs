//! Single-object pipeline: fetch, transform, store, emit

use std::sync::Arc;
use std::time::Instant;

use media_storage::media_bucket::{BucketError, MediaBucketApi};
use media_storage::upload_queue::ObjectRecord;
use thiserror::Error;
use tracing::{debug, error};

use crate::metrics::MetricsEmitter;
use crate::thumbnail::{self, TransformError};

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from one pipeline run, tagged with the failing stage
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Fetching the source object failed
    #[error("Failed to fetch source object")]
    Fetch(#[source] BucketError),

    /// Decoding or encoding the image failed
    #[error("Failed to generate thumbnail")]
    Transform(#[from] TransformError),

    /// The blocking transform task did not complete
    #[error("Thumbnail generation task panicked")]
    TransformTask(#[from] tokio::task::JoinError),

    /// Storing the derivative failed
    #[error("Failed to store thumbnail")]
    Store(#[source] BucketError),
}

/// Processes one uploaded object into a stored thumbnail derivative
pub struct ThumbnailPipeline {
    media_bucket: Arc<dyn MediaBucketApi>,
    metrics: Arc<dyn MetricsEmitter>,
}

impl ThumbnailPipeline {
    /// Creates a new pipeline over the given gateway and metrics emitter
    #[must_use]
    pub const fn new(media_bucket: Arc<dyn MediaBucketApi>, metrics: Arc<dyn MetricsEmitter>) -> Self {
        Self {
            media_bucket,
            metrics,
        }
    }

    /// Runs fetch → decode → resize → encode → store → emit for one record
    ///
    /// The store happens only after a fully encoded derivative exists, so a
    /// failed run leaves no partial artifact at the destination. Metrics are
    /// emitted only on success, and an emission failure is logged and
    /// swallowed here so it can never fail the run.
    ///
    /// # Errors
    ///
    /// Returns a `PipelineError` tagging the stage that failed along with
    /// the original cause
    pub async fn process(&self, record: &ObjectRecord) -> PipelineResult<()> {
        let started = Instant::now();

        let source = self
            .media_bucket
            .fetch_object(&record.bucket, &record.key)
            .await
            .map_err(PipelineError::Fetch)?;

        // The transform is CPU-bound; keep it off the async runtime
        let derivative =
            tokio::task::spawn_blocking(move || thumbnail::generate(&source)).await??;

        self.media_bucket
            .store_thumbnail(&record.key, derivative)
            .await
            .map_err(PipelineError::Store)?;

        let latency_seconds = started.elapsed().as_secs_f64();
        if let Err(e) = self.metrics.emit_thumbnail_generated(latency_seconds).await {
            error!(key = %record.key, error = %e, "Failed to emit thumbnail metrics");
        }

        debug!(bucket = %record.bucket, key = %record.key, "Thumbnail stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::Bytes;
    use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat, Rgb, RgbImage};
    use media_storage::media_bucket::mock::MockMediaBucket;
    use pretty_assertions::assert_eq;

    use crate::metrics::mock::MockMetricsEmitter;

    use super::*;

    fn png_bytes() -> Bytes {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(320, 200, Rgb([10, 200, 80])));
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .expect("Failed to encode test PNG");
        Bytes::from(buf)
    }

    fn record(key: &str) -> ObjectRecord {
        ObjectRecord {
            bucket: "media-uploads".to_string(),
            key: key.to_string(),
        }
    }

    fn pipeline(
        media_bucket: &Arc<MockMediaBucket>,
        metrics: &Arc<MockMetricsEmitter>,
    ) -> ThumbnailPipeline {
        ThumbnailPipeline::new(media_bucket.clone(), metrics.clone())
    }

    #[tokio::test]
    async fn test_process_stores_thumbnail_and_emits_metric() {
        let media_bucket = Arc::new(MockMediaBucket::new());
        let metrics = Arc::new(MockMetricsEmitter::new());
        media_bucket.seed_object("media-uploads", "uploads/cat.png", png_bytes());

        pipeline(&media_bucket, &metrics)
            .process(&record("uploads/cat.png"))
            .await
            .expect("Pipeline run should succeed");

        let stored = media_bucket.stored_objects();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].0, "thumbnails/uploads/cat.png");

        // The derivative must be a 128x128 JPEG
        assert_eq!(
            image::guess_format(&stored[0].1).expect("Failed to guess format"),
            ImageFormat::Jpeg
        );
        let decoded =
            image::load_from_memory(&stored[0].1).expect("Failed to decode stored thumbnail");
        assert_eq!(decoded.dimensions(), (128, 128));

        // Exactly one emission, with a non-negative latency sample
        let samples = metrics.latency_samples();
        assert_eq!(samples.len(), 1);
        assert!(samples[0] >= 0.0);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_store_and_metrics() {
        let media_bucket = Arc::new(MockMediaBucket::new());
        let metrics = Arc::new(MockMetricsEmitter::new());

        let result = pipeline(&media_bucket, &metrics)
            .process(&record("uploads/missing.png"))
            .await;

        assert!(matches!(result, Err(PipelineError::Fetch(_))));
        assert!(media_bucket.stored_objects().is_empty());
        assert!(metrics.latency_samples().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_image_bytes_fail_transform() {
        let media_bucket = Arc::new(MockMediaBucket::new());
        let metrics = Arc::new(MockMetricsEmitter::new());
        media_bucket.seed_object(
            "media-uploads",
            "uploads/not-an-image.txt",
            Bytes::from_static(b"plain text"),
        );

        let result = pipeline(&media_bucket, &metrics)
            .process(&record("uploads/not-an-image.txt"))
            .await;

        assert!(matches!(result, Err(PipelineError::Transform(_))));
        assert!(media_bucket.stored_objects().is_empty());
        assert!(metrics.latency_samples().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_emits_no_metric() {
        let media_bucket = Arc::new(MockMediaBucket::new());
        let metrics = Arc::new(MockMetricsEmitter::new());
        media_bucket.seed_object("media-uploads", "uploads/cat.png", png_bytes());
        media_bucket.fail_stores();

        let result = pipeline(&media_bucket, &metrics)
            .process(&record("uploads/cat.png"))
            .await;

        assert!(matches!(result, Err(PipelineError::Store(_))));
        assert!(metrics.latency_samples().is_empty());
    }

    #[tokio::test]
    async fn test_metrics_failure_is_swallowed() {
        let media_bucket = Arc::new(MockMediaBucket::new());
        let metrics = Arc::new(MockMetricsEmitter::new());
        media_bucket.seed_object("media-uploads", "uploads/cat.png", png_bytes());
        metrics.fail_emissions();

        pipeline(&media_bucket, &metrics)
            .process(&record("uploads/cat.png"))
            .await
            .expect("Emission failure must not fail the pipeline run");

        assert_eq!(media_bucket.stored_objects().len(), 1);
    }
}
