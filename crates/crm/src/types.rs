use intake_core::ContactSubmission;
use serde::{Deserialize, Serialize};

/// Pipedrive assigns numeric identifiers to every record it creates.
pub type RecordId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPerson {
    pub name: String,
    pub email: Vec<String>,
    pub phone: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Person {
    pub id: RecordId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewOrganization {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Organization {
    pub id: RecordId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewDeal {
    pub title: String,
    /// The form submits the budget as free text; Pipedrive accepts the
    /// deal value as a string and parses it server-side.
    pub value: String,
    pub person_id: RecordId,
    pub org_id: RecordId,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Deal {
    pub id: RecordId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub content: String,
    pub deal_id: RecordId,
    pub person_id: RecordId,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Note {
    pub id: RecordId,
}

/// Pipedrive wraps every response body in `{ "success": .., "data": .. }`.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl NewPerson {
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        Self {
            name: submission.name.clone(),
            email: vec![submission.email.clone()],
            phone: vec![submission.phone.clone()],
        }
    }
}

impl NewOrganization {
    pub fn from_submission(submission: &ContactSubmission) -> Self {
        Self { name: submission.organization_name.clone() }
    }
}
