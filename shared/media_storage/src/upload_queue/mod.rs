//! SQS adapter for S3 upload event notifications
//!
//! Bodies travel through this adapter as raw text; redelivery and visibility
//! semantics stay with SQS itself.

/// Error types for queue operations
pub mod error;
/// Message, configuration, and notification wire types
pub mod types;

pub use error::{QueueError, QueueResult};
pub use types::{
    ObjectRecord, QueueConfig, QueueMessage, S3EventNotification, UploadNotification,
};

use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;

/// SQS queue delivering S3 upload event notifications
pub struct UploadEventQueue {
    sqs_client: Arc<SqsClient>,
    config: QueueConfig,
}

impl UploadEventQueue {
    /// Creates a new upload event queue adapter
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client
    /// * `config` - Queue configuration including URL and default parameters
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>, config: QueueConfig) -> Self {
        Self { sqs_client, config }
    }

    /// Sends a raw notification body to the queue
    ///
    /// Used by producers and tests; the worker itself only consumes.
    ///
    /// # Returns
    ///
    /// The message ID if successful or an empty string
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the send operation fails
    pub async fn send_message(&self, body: &str) -> QueueResult<String> {
        let result = self
            .sqs_client
            .send_message()
            .queue_url(&self.config.queue_url)
            .message_body(body)
            .send()
            .await?;

        Ok(result
            .message_id()
            .map(std::string::ToString::to_string)
            .unwrap_or_default())
    }

    /// Polls a batch of messages using long polling
    ///
    /// Bodies are returned raw and undeserialized.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the poll operation fails
    pub async fn poll_messages(&self) -> QueueResult<Vec<QueueMessage>> {
        let result = self
            .sqs_client
            .receive_message()
            .queue_url(&self.config.queue_url)
            .max_number_of_messages(self.config.default_max_messages)
            .visibility_timeout(self.config.default_visibility_timeout)
            .wait_time_seconds(self.config.default_wait_time_seconds)
            .send()
            .await?;

        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                Some(QueueMessage {
                    body: msg.body()?.to_string(),
                    receipt_handle: msg.receipt_handle()?.to_string(),
                    message_id: msg.message_id()?.to_string(),
                })
            })
            .collect();

        Ok(messages)
    }

    /// Acknowledges receipt of a message by deleting it from the queue
    ///
    /// # Arguments
    ///
    /// * `receipt_handle` - The receipt handle from the received message
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the acknowledgment fails
    pub async fn ack_message(&self, receipt_handle: &str) -> QueueResult<()> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.config.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
