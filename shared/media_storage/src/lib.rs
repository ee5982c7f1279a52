//! Media storage services for the thumbnail worker
//!
//! This crate provides the S3 gateway used to read uploaded media and write
//! thumbnail derivatives, plus the SQS adapter for upload event notifications.

pub mod media_bucket;
pub mod upload_queue;
