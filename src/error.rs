use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a single stage invocation.
///
/// Any of these returned from a push route turns into a non-2xx response, which
/// tells the event infrastructure the delivery failed. Redelivery is its job.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to decode inbound payload: {0}")]
    Decode(String),

    #[error("{service} call failed: {source}")]
    Collaborator {
        service: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("non supported language {0}")]
    UnsupportedLanguage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{failed} of {total} publishes failed")]
    PartialPublish { failed: usize, total: usize },
}

impl PipelineError {
    pub fn collaborator(service: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator { service, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedLanguage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Collaborator { .. } | Self::PartialPublish { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
