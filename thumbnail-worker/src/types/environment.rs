//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use media_storage::upload_queue::QueueConfig;
use tracing::Level;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the destination bucket for thumbnail derivatives
    ///
    /// Deliberately not validated up front: if `THUMBNAIL_BUCKET` is unset,
    /// the bucket name is empty and every store attempt fails when first
    /// tried.
    #[must_use]
    pub fn thumbnail_bucket(&self) -> String {
        env::var("THUMBNAIL_BUCKET").unwrap_or_default()
    }

    /// Returns the URL of the upload events queue
    ///
    /// # Panics
    ///
    /// Panics if the `UPLOAD_EVENTS_QUEUE_URL` environment variable is not
    /// set outside development
    #[must_use]
    pub fn upload_events_queue_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("UPLOAD_EVENTS_QUEUE_URL")
                .expect("UPLOAD_EVENTS_QUEUE_URL environment variable is not set"),
            Self::Development => env::var("UPLOAD_EVENTS_QUEUE_URL").unwrap_or_else(|_| {
                "http://localhost:4566/000000000000/upload-events".to_string()
            }),
        }
    }

    /// Queue configuration for the upload events queue
    #[must_use]
    pub fn upload_queue_config(&self) -> QueueConfig {
        QueueConfig {
            queue_url: self.upload_events_queue_url(),
            default_max_messages: 10,
            default_visibility_timeout: 60,
            default_wait_time_seconds: 20,
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Default tracing level, overridable with `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
