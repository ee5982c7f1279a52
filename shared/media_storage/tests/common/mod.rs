//! LocalStack test setup utilities

#![allow(dead_code)]

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use std::sync::Arc;
use uuid::Uuid;

/// LocalStack endpoint used by all integration tests
pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Builds an AWS config pointed at LocalStack with hardcoded credentials for CI
pub async fn localstack_config() -> aws_config::SdkConfig {
    let credentials = Credentials::from_keys(
        "test", // AWS_ACCESS_KEY_ID
        "test", // AWS_SECRET_ACCESS_KEY
        None,   // no session token
    );

    aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .credentials_provider(credentials)
        .region(aws_config::Region::new("us-east-1"))
        .load()
        .await
}

/// Test context that provides an S3 client and a unique bucket
pub struct BucketTestContext {
    pub s3_client: Arc<S3Client>,
    pub bucket_name: String,
}

impl BucketTestContext {
    /// Creates a new test context with a unique bucket
    pub async fn new(test_name: &str) -> Self {
        let bucket_name = format!("{}-{}", test_name, Uuid::new_v4());

        let config = localstack_config().await;
        let s3_config: aws_sdk_s3::Config = (&config).into();
        let s3_client = Arc::new(S3Client::from_conf(
            // Path-style addressing for LocalStack compatibility
            s3_config.to_builder().force_path_style(true).build(),
        ));

        s3_client
            .create_bucket()
            .bucket(&bucket_name)
            .send()
            .await
            .expect("Failed to create test bucket");

        Self {
            s3_client,
            bucket_name,
        }
    }
}

/// Test context that provides an SQS client and a unique standard queue
pub struct QueueTestContext {
    pub sqs_client: Arc<SqsClient>,
    pub queue_url: String,
}

impl QueueTestContext {
    /// Creates a new test context with a unique standard queue
    pub async fn new(test_name: &str) -> Self {
        let queue_name = format!("{}-{}", test_name, Uuid::new_v4());

        let config = localstack_config().await;
        let sqs_client = Arc::new(SqsClient::new(&config));

        let result = sqs_client
            .create_queue()
            .queue_name(&queue_name)
            .send()
            .await
            .expect("Failed to create test queue");

        let queue_url = result
            .queue_url()
            .expect("Queue URL not returned")
            .to_string();

        Self {
            sqs_client,
            queue_url,
        }
    }
}

impl Drop for QueueTestContext {
    fn drop(&mut self) {
        // Clean up the queue
        let client = self.sqs_client.clone();
        let queue_url = self.queue_url.clone();

        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client.delete_queue().queue_url(&queue_url).send().await;
            });
        }
    }
}
