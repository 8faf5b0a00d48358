//! CRM Integration - Pipedrive gateway and the intake pipeline
//!
//! This crate owns the remote side of contact intake:
//! - **Gateway** (`client`) - the `CrmGateway` trait and the Pipedrive
//!   HTTP implementation
//! - **Pipeline** (`pipeline`) - the ordered person → organization →
//!   deal → note orchestration with fail-fast error propagation
//! - **Records** (`types`) - request/response shapes for the four
//!   create operations
//!
//! # Key Types
//!
//! - `CrmGateway` - trait seam for the four create calls
//! - `PipedriveClient` - reqwest-backed gateway against the v1 API
//! - `IntakePipeline` - runs the dependent call sequence
//! - `PipelineError` - single aggregated failure naming the step

pub mod client;
pub mod error;
pub mod pipeline;
pub mod types;

pub use client::{CrmGateway, PipedriveClient};
pub use error::{CrmError, PipelineError, PipelineStep};
pub use pipeline::{IntakeOutcome, IntakePipeline};
pub use types::{
    Deal, NewDeal, NewNote, NewOrganization, NewPerson, Note, Organization, Person, RecordId,
};
