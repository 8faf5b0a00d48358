//! Shared foundation for the contact-intake service: configuration
//! loading and the contact submission domain type.

pub mod config;
pub mod submission;

pub use submission::{ContactSubmission, ValidationError};
