//! Outcome notifications for contact intake
//!
//! - **Report** (`report`) - pure rendering of the localized outcome
//!   text (success and failure variants) from the submission fields
//! - **Webhook** (`webhook`) - dispatch of the rendered text to the
//!   configured chat incoming-webhook destination

pub mod report;
pub mod webhook;

pub use report::{render, OutcomeKind};
pub use webhook::{HttpWebhookSender, NoopWebhookSender, WebhookError, WebhookSender};
