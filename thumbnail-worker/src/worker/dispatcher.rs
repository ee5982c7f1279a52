//! Batch dispatch of upload event envelopes

use media_storage::upload_queue::{QueueMessage, UploadNotification};
use tracing::{error, info};

use super::pipeline::ThumbnailPipeline;

/// Dispatches batches of queue envelopes to the thumbnail pipeline
///
/// Dispatch never fails as a whole: malformed envelopes and per-object
/// pipeline errors are logged and skipped so the rest of the batch proceeds.
pub struct BatchDispatcher {
    pipeline: ThumbnailPipeline,
}

impl BatchDispatcher {
    /// Creates a dispatcher over the given pipeline
    #[must_use]
    pub const fn new(pipeline: ThumbnailPipeline) -> Self {
        Self { pipeline }
    }

    /// Processes each envelope in the batch independently, in delivery order
    pub async fn dispatch(&self, envelopes: &[QueueMessage]) {
        for envelope in envelopes {
            self.dispatch_envelope(envelope).await;
        }
    }

    async fn dispatch_envelope(&self, envelope: &QueueMessage) {
        let notification = match UploadNotification::parse(&envelope.body) {
            Ok(notification) => notification,
            Err(e) => {
                error!(
                    message_id = %envelope.message_id,
                    error = %e,
                    "Failed to parse upload notification, skipping envelope"
                );
                return;
            }
        };

        match notification {
            UploadNotification::Empty => {
                info!(
                    message_id = %envelope.message_id,
                    "Received upload notification without records, skipping"
                );
            }
            UploadNotification::Uploads(records) => {
                for record in records {
                    if let Err(e) = self.pipeline.process(&record).await {
                        error!(
                            bucket = %record.bucket,
                            key = %record.key,
                            error = %e,
                            "Failed to process uploaded object"
                        );
                    }
                }
            }
        }
    }
}
