use std::time::Duration;

use async_trait::async_trait;
use intake_core::config::CrmConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::CrmError;
use crate::types::{
    Deal, Envelope, NewDeal, NewNote, NewOrganization, NewPerson, Note, Organization, Person,
};

/// Seam between the pipeline and the remote CRM. One method per create
/// operation; each either returns the created record or fails.
#[async_trait]
pub trait CrmGateway: Send + Sync {
    async fn create_person(&self, input: NewPerson) -> Result<Person, CrmError>;
    async fn create_organization(&self, input: NewOrganization) -> Result<Organization, CrmError>;
    async fn create_deal(&self, input: NewDeal) -> Result<Deal, CrmError>;
    async fn create_note(&self, input: NewNote) -> Result<Note, CrmError>;
}

/// Gateway implementation against the Pipedrive v1 REST API. The API
/// token travels as the `api_token` query parameter on every call.
pub struct PipedriveClient {
    http: reqwest::Client,
    base_url: String,
    api_token: SecretString,
}

impl PipedriveClient {
    pub fn new(config: &CrmConfig) -> Result<Self, CrmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(CrmError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    async fn create_record<B, T>(&self, resource: &str, input: &B) -> Result<T, CrmError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(resource, "issuing CRM create call");

        let response = self
            .http
            .post(&url)
            .query(&[("api_token", self.api_token.expose_secret())])
            .json(input)
            .send()
            .await
            .map_err(CrmError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CrmError::Remote { status: status.as_u16(), detail });
        }

        let envelope: Envelope<T> =
            response.json().await.map_err(|error| CrmError::Decode(error.to_string()))?;

        match envelope {
            Envelope { success: true, data: Some(record) } => Ok(record),
            _ => Err(CrmError::MissingData),
        }
    }
}

#[async_trait]
impl CrmGateway for PipedriveClient {
    async fn create_person(&self, input: NewPerson) -> Result<Person, CrmError> {
        self.create_record("persons", &input).await
    }

    async fn create_organization(&self, input: NewOrganization) -> Result<Organization, CrmError> {
        self.create_record("organizations", &input).await
    }

    async fn create_deal(&self, input: NewDeal) -> Result<Deal, CrmError> {
        self.create_record("deals", &input).await
    }

    async fn create_note(&self, input: NewNote) -> Result<Note, CrmError> {
        self.create_record("notes", &input).await
    }
}
