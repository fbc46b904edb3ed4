//! REST client for the assessment platform backend.

pub mod client;
pub mod constants;
pub mod models;

pub use client::{AssessmentApi, SyncGateway};
pub use models::*;
