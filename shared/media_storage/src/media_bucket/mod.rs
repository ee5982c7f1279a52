//! S3 gateway for source media and thumbnail derivatives
mod error;

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::get_object::GetObjectError, primitives::ByteStream,
    Client as S3Client,
};
use bytes::Bytes;

pub use error::{BucketError, BucketResult};

/// Key prefix under which thumbnail derivatives are stored
pub const THUMBNAIL_KEY_PREFIX: &str = "thumbnails/";

/// Content type for stored thumbnail derivatives
const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Derives the destination key for a thumbnail from its source key
///
/// The source key is reproduced verbatim after the prefix, so reprocessing
/// the same source object always overwrites the same destination key.
#[must_use]
pub fn thumbnail_key(source_key: &str) -> String {
    format!("{THUMBNAIL_KEY_PREFIX}{source_key}")
}

/// Trait for media bucket operations
#[async_trait]
pub trait MediaBucketApi: Send + Sync {
    /// Fetches the full body of a source object
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ObjectNotFound` if the object does not exist,
    /// `BucketError::S3Error` or `BucketError::AwsError` on service or
    /// transport failures. Errors are propagated, not retried here.
    async fn fetch_object(&self, bucket: &str, key: &str) -> BucketResult<Bytes>;

    /// Stores a thumbnail derivative under `thumbnails/<source_key>` in the
    /// destination bucket, overwriting any existing object at that key
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` or `BucketError::AwsError` on service
    /// or transport failures
    async fn store_thumbnail(&self, source_key: &str, body: Bytes) -> BucketResult<()>;
}

/// S3-backed media bucket gateway
pub struct MediaBucket {
    s3_client: Arc<S3Client>,
    thumbnail_bucket: String,
}

impl MediaBucket {
    /// Creates a new media bucket gateway
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `thumbnail_bucket` - Destination bucket for thumbnail derivatives
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, thumbnail_bucket: String) -> Self {
        Self {
            s3_client,
            thumbnail_bucket,
        }
    }
}

#[async_trait]
impl MediaBucketApi for MediaBucket {
    async fn fetch_object(&self, bucket: &str, key: &str) -> BucketResult<Bytes> {
        let result = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
            {
                return Err(BucketError::ObjectNotFound(format!("{bucket}/{key}")));
            }
            Err(e) => return Err(BucketError::from(e)),
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BucketError::AwsError(e.to_string()))?;

        Ok(body.into_bytes())
    }

    async fn store_thumbnail(&self, source_key: &str, body: Bytes) -> BucketResult<()> {
        self.s3_client
            .put_object()
            .bucket(&self.thumbnail_bucket)
            .key(thumbnail_key(source_key))
            .content_type(THUMBNAIL_CONTENT_TYPE)
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::{thumbnail_key, BucketError, BucketResult, MediaBucketApi};

    /// In-memory media bucket for tests
    ///
    /// Source objects are seeded up front; stores are recorded in write order
    /// so tests can assert on destination keys and bodies.
    #[derive(Default)]
    pub struct MockMediaBucket {
        objects: Mutex<HashMap<(String, String), Bytes>>,
        stored: Mutex<Vec<(String, Bytes)>>,
        fail_store: Mutex<bool>,
    }

    impl MockMediaBucket {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a source object that `fetch_object` can return
        pub fn seed_object(&self, bucket: &str, key: &str, body: Bytes) {
            self.objects
                .lock()
                .unwrap()
                .insert((bucket.to_string(), key.to_string()), body);
        }

        /// Makes every subsequent `store_thumbnail` call fail
        pub fn fail_stores(&self) {
            *self.fail_store.lock().unwrap() = true;
        }

        /// Returns all stored (destination key, body) pairs in write order
        #[must_use]
        pub fn stored_objects(&self) -> Vec<(String, Bytes)> {
            self.stored.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaBucketApi for MockMediaBucket {
        async fn fetch_object(&self, bucket: &str, key: &str) -> BucketResult<Bytes> {
            self.objects
                .lock()
                .unwrap()
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| BucketError::ObjectNotFound(format!("{bucket}/{key}")))
        }

        async fn store_thumbnail(&self, source_key: &str, body: Bytes) -> BucketResult<()> {
            if *self.fail_store.lock().unwrap() {
                return Err(BucketError::S3Error("simulated store failure".to_string()));
            }
            self.stored
                .lock()
                .unwrap()
                .push((thumbnail_key(source_key), body));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::thumbnail_key;

    #[test]
    fn test_thumbnail_key_prefixes_source_key() {
        assert_eq!(thumbnail_key("uploads/cat.png"), "thumbnails/uploads/cat.png");
    }

    #[test]
    fn test_thumbnail_key_keeps_source_key_verbatim() {
        // No sanitization: traversal-looking segments are reproduced as-is
        assert_eq!(thumbnail_key("../escape.png"), "thumbnails/../escape.png");
        assert_eq!(
            thumbnail_key("a b+c%20d.jpg"),
            "thumbnails/a b+c%20d.jpg"
        );
    }
}
