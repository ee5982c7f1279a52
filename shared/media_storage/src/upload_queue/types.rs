use serde::Deserialize;

/// Wrapper for received queue messages with delivery metadata
///
/// The body is kept as raw text. Parsing is left to the consumer so a
/// malformed payload surfaces as a per-envelope skip instead of being
/// silently dropped at the transport.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    /// Raw UTF-8 message body
    pub body: String,
    /// Receipt handle for acknowledging the message
    pub receipt_handle: String,
    /// Message ID
    pub message_id: String,
}

/// Configuration for queue operations
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Queue URL
    pub queue_url: String,
    /// Default maximum number of messages to retrieve
    pub default_max_messages: i32,
    /// Default visibility timeout for messages (in seconds)
    pub default_visibility_timeout: i32,
    /// Default wait time for long polling
    pub default_wait_time_seconds: i32,
}

/// One (bucket, key) reference inside an upload notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Source bucket name
    pub bucket: String,
    /// Source object key
    pub key: String,
}

/// S3 event notification as delivered in the queue message body
///
/// Only the fields this worker consumes are modeled; unknown fields are
/// ignored. A missing `Records` field deserializes as an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct S3EventNotification {
    /// Object records carried by the event
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

/// One record inside an S3 event notification
#[derive(Debug, Clone, Deserialize)]
pub struct S3EventRecord {
    /// S3 entity describing the affected bucket and object
    pub s3: S3Entity,
}

/// Bucket and object references of one S3 event record
#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    /// Bucket reference
    pub bucket: S3BucketRef,
    /// Object reference
    pub object: S3ObjectRef,
}

/// Bucket reference inside an S3 event record
#[derive(Debug, Clone, Deserialize)]
pub struct S3BucketRef {
    /// Bucket name
    pub name: String,
}

/// Object reference inside an S3 event record
#[derive(Debug, Clone, Deserialize)]
pub struct S3ObjectRef {
    /// Object key
    pub key: String,
}

/// Classified upload notification
///
/// Zero records is a first-class benign state: S3 sends a record-less
/// `s3:TestEvent` probe when bucket notifications are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadNotification {
    /// Notification without object records
    Empty,
    /// One or more uploaded objects to process, in delivery order
    Uploads(Vec<ObjectRecord>),
}

impl UploadNotification {
    /// Parses a raw message body into a classified notification
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json::Error` if the body is not valid
    /// JSON matching the S3 event notification shape.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let event: S3EventNotification = serde_json::from_str(body)?;
        if event.records.is_empty() {
            return Ok(Self::Empty);
        }

        Ok(Self::Uploads(
            event
                .records
                .into_iter()
                .map(|record| ObjectRecord {
                    bucket: record.s3.bucket.name,
                    key: record.s3.object.key,
                })
                .collect(),
        ))
    }
}
