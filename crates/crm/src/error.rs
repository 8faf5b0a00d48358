use thiserror::Error;

/// Failure of a single CRM create call.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("request to CRM failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("CRM call exceeded its deadline")]
    Timeout,
    #[error("CRM rejected the request with status {status}: {detail}")]
    Remote { status: u16, detail: String },
    #[error("CRM response could not be decoded: {0}")]
    Decode(String),
    #[error("CRM reported success without record data")]
    MissingData,
}

impl CrmError {
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(error)
        }
    }

    /// Status code the remote answered with, when it answered at all.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStep {
    Person,
    Organization,
    Deal,
    Note,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Deal => "deal",
            Self::Note => "note",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single aggregated failure surfaced by the pipeline. Carries the
/// identity of the step that failed and the underlying CRM error;
/// dependent steps after it were never attempted.
#[derive(Debug, Error)]
#[error("intake pipeline failed at the {step} step: {source}")]
pub struct PipelineError {
    pub step: PipelineStep,
    #[source]
    pub source: CrmError,
}

impl PipelineError {
    /// HTTP status for the caller: the status the CRM answered with, or
    /// 500 when the failure never produced one (timeout, transport).
    pub fn http_status(&self) -> u16 {
        self.source.remote_status().unwrap_or(500)
    }
}
