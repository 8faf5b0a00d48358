use std::sync::Arc;

use intake_core::ContactSubmission;
use tracing::{debug, info};

use crate::client::CrmGateway;
use crate::error::{PipelineError, PipelineStep};
use crate::types::{NewDeal, NewNote, NewOrganization, NewPerson, RecordId};

/// Identifiers accumulated by a completed pipeline run. This is the
/// explicit record threaded between steps; no step reads state that an
/// earlier step did not put here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub person_id: RecordId,
    pub organization_id: RecordId,
    pub deal_id: RecordId,
    pub note_id: RecordId,
}

/// Orchestrates the four dependent CRM creates for one submission:
/// person and organization first (concurrently, neither depends on the
/// other), then the deal referencing both, then the note referencing
/// the deal and the person.
///
/// Fail-fast: the first failing step short-circuits everything that
/// depends on it and is surfaced as a single [`PipelineError`]. A deal
/// is never attempted without both upstream identifiers, a note never
/// without the deal and person identifiers.
pub struct IntakePipeline {
    gateway: Arc<dyn CrmGateway>,
}

impl IntakePipeline {
    pub fn new(gateway: Arc<dyn CrmGateway>) -> Self {
        Self { gateway }
    }

    pub async fn run(&self, submission: &ContactSubmission) -> Result<IntakeOutcome, PipelineError> {
        let person_call = async {
            self.gateway
                .create_person(NewPerson::from_submission(submission))
                .await
                .map_err(|source| PipelineError { step: PipelineStep::Person, source })
        };
        let organization_call = async {
            self.gateway
                .create_organization(NewOrganization::from_submission(submission))
                .await
                .map_err(|source| PipelineError { step: PipelineStep::Organization, source })
        };

        let (person, organization) = tokio::try_join!(person_call, organization_call)?;
        debug!(
            person_id = person.id,
            organization_id = organization.id,
            "person and organization created"
        );

        let deal = self
            .gateway
            .create_deal(NewDeal {
                title: submission.title.clone(),
                value: submission.budget.clone(),
                person_id: person.id,
                org_id: organization.id,
            })
            .await
            .map_err(|source| PipelineError { step: PipelineStep::Deal, source })?;

        let note = self
            .gateway
            .create_note(NewNote {
                content: submission.contact_body.clone(),
                deal_id: deal.id,
                person_id: person.id,
            })
            .await
            .map_err(|source| PipelineError { step: PipelineStep::Note, source })?;

        let outcome = IntakeOutcome {
            person_id: person.id,
            organization_id: organization.id,
            deal_id: deal.id,
            note_id: note.id,
        };
        info!(
            person_id = outcome.person_id,
            organization_id = outcome.organization_id,
            deal_id = outcome.deal_id,
            note_id = outcome.note_id,
            "intake pipeline completed"
        );

        Ok(outcome)
    }
}
