//! Thumbnail worker: queue polling, batch dispatch, and acknowledgement

pub mod dispatcher;
pub mod pipeline;

use std::sync::Arc;

use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use media_storage::media_bucket::MediaBucket;
use media_storage::upload_queue::{QueueMessage, UploadEventQueue};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::metrics::CloudWatchMetrics;
use crate::types::environment::Environment;

use self::dispatcher::BatchDispatcher;
use self::pipeline::ThumbnailPipeline;

/// Worker that turns queued upload notifications into stored thumbnails
pub struct ThumbnailWorker {
    upload_queue: Arc<UploadEventQueue>,
    dispatcher: BatchDispatcher,
    shutdown_token: CancellationToken,
}

impl ThumbnailWorker {
    /// Creates a worker with AWS clients configured for the environment
    ///
    /// Clients and the destination bucket name are resolved once here and
    /// shared read-only for the lifetime of the worker.
    pub async fn new(env: &Environment) -> Self {
        let aws_config = env.aws_config().await;

        let sqs_client = Arc::new(SqsClient::new(&aws_config));
        let s3_client = Arc::new(S3Client::from_conf(env.s3_client_config().await));
        let cloudwatch_client = Arc::new(CloudWatchClient::new(&aws_config));

        let upload_queue = Arc::new(UploadEventQueue::new(
            sqs_client,
            env.upload_queue_config(),
        ));
        let media_bucket = Arc::new(MediaBucket::new(s3_client, env.thumbnail_bucket()));
        let metrics = Arc::new(CloudWatchMetrics::new(cloudwatch_client));

        let pipeline = ThumbnailPipeline::new(media_bucket, metrics);

        Self::from_parts(upload_queue, BatchDispatcher::new(pipeline))
    }

    /// Assembles a worker from already-constructed components
    #[must_use]
    pub fn from_parts(upload_queue: Arc<UploadEventQueue>, dispatcher: BatchDispatcher) -> Self {
        Self {
            upload_queue,
            dispatcher,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Returns a clone of the shutdown token for external control
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the poll/dispatch/ack loop until the shutdown token is cancelled
    ///
    /// # Errors
    ///
    /// Currently infallible at the loop level; poll and ack errors are
    /// logged and the loop continues.
    pub async fn start(self) -> anyhow::Result<()> {
        info!("Starting thumbnail worker loop");

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Thumbnail worker received shutdown signal");
                    break;
                }
                () = self.poll_once() => {}
            }
        }

        info!("Thumbnail worker stopped");
        Ok(())
    }

    async fn poll_once(&self) {
        match self.upload_queue.poll_messages().await {
            Ok(envelopes) => {
                if !envelopes.is_empty() {
                    self.handle_batch(&envelopes).await;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to poll upload events queue");
            }
        }
    }

    /// Dispatches a batch and acknowledges every delivered envelope
    ///
    /// Dispatch itself never fails, so all envelopes are acknowledged. A
    /// failed ack leaves the message to reappear after the visibility
    /// timeout; thumbnail writes are idempotent, so redelivery is safe.
    async fn handle_batch(&self, envelopes: &[QueueMessage]) {
        self.dispatcher.dispatch(envelopes).await;

        for envelope in envelopes {
            if let Err(e) = self.upload_queue.ack_message(&envelope.receipt_handle).await {
                error!(
                    message_id = %envelope.message_id,
                    error = %e,
                    "Failed to acknowledge message"
                );
            }
        }
    }
}
