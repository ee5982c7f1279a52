//! Shared types for the thumbnail worker

pub mod environment;

pub use environment::Environment;
