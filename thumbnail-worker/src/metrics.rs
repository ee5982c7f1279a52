//! CloudWatch metrics for thumbnail generation
//!
//! Emission is best-effort: callers log and discard errors so metrics
//! delivery can never fail or block a pipeline run.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_cloudwatch::{
    error::SdkError,
    operation::put_metric_data::PutMetricDataError,
    types::{MetricDatum, StandardUnit},
    Client as CloudWatchClient,
};
use thiserror::Error;

/// CloudWatch namespace for thumbnail generation metrics
pub const METRICS_NAMESPACE: &str = "ThumbnailGeneration";

/// Count of thumbnails produced
const THUMBNAILS_GENERATED: &str = "ThumbnailsGenerated";
/// End-to-end generation latency in seconds
const THUMBNAIL_GENERATION_TIME: &str = "ThumbnailGenerationTime";

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors that can occur while emitting metrics
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Error sending metric data to CloudWatch
    #[error("Failed to put metric data: {0}")]
    PutMetricData(String),
}

impl From<SdkError<PutMetricDataError>> for MetricsError {
    fn from(error: SdkError<PutMetricDataError>) -> Self {
        Self::PutMetricData(error.to_string())
    }
}

/// Trait for emitting thumbnail generation metrics
#[async_trait]
pub trait MetricsEmitter: Send + Sync {
    /// Emits one count sample (value 1) and one latency sample for a
    /// generated thumbnail, batched into a single report
    ///
    /// # Errors
    ///
    /// Returns `MetricsError` if the report cannot be delivered
    async fn emit_thumbnail_generated(&self, latency_seconds: f64) -> MetricsResult<()>;
}

/// CloudWatch-backed metrics emitter
pub struct CloudWatchMetrics {
    cloudwatch_client: Arc<CloudWatchClient>,
}

impl CloudWatchMetrics {
    /// Creates a new CloudWatch metrics emitter
    #[must_use]
    pub const fn new(cloudwatch_client: Arc<CloudWatchClient>) -> Self {
        Self { cloudwatch_client }
    }
}

#[async_trait]
impl MetricsEmitter for CloudWatchMetrics {
    async fn emit_thumbnail_generated(&self, latency_seconds: f64) -> MetricsResult<()> {
        self.cloudwatch_client
            .put_metric_data()
            .namespace(METRICS_NAMESPACE)
            .metric_data(
                MetricDatum::builder()
                    .metric_name(THUMBNAILS_GENERATED)
                    .value(1.0)
                    .unit(StandardUnit::Count)
                    .build(),
            )
            .metric_data(
                MetricDatum::builder()
                    .metric_name(THUMBNAIL_GENERATION_TIME)
                    .value(latency_seconds)
                    .unit(StandardUnit::Seconds)
                    .build(),
            )
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{MetricsEmitter, MetricsError, MetricsResult};

    /// Recording metrics emitter for tests
    #[derive(Default)]
    pub struct MockMetricsEmitter {
        samples: Mutex<Vec<f64>>,
        fail_emit: Mutex<bool>,
    }

    impl MockMetricsEmitter {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every subsequent emission fail
        pub fn fail_emissions(&self) {
            *self.fail_emit.lock().unwrap() = true;
        }

        /// Returns the recorded latency samples in emission order
        #[must_use]
        pub fn latency_samples(&self) -> Vec<f64> {
            self.samples.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetricsEmitter for MockMetricsEmitter {
        async fn emit_thumbnail_generated(&self, latency_seconds: f64) -> MetricsResult<()> {
            if *self.fail_emit.lock().unwrap() {
                return Err(MetricsError::PutMetricData(
                    "simulated emission failure".to_string(),
                ));
            }
            self.samples.lock().unwrap().push(latency_seconds);
            Ok(())
        }
    }
}
