//! Error types for the `domain` layer.
use meeting_ai::Error as ProviderError;
use meeting_auth::error::{Error as MeetingAuthError, ErrorKind as MeetingAuthErrorKind, HttpErrorKind};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `meeting-ai`, and `web` is dependent on `domain`,
/// but `web` should not be dependent, directly, on `meeting-ai`. Ultimately the various
/// `error_kind`s are used by `web` to return appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Pipeline(PipelineErrorKind),
}

/// Errors caused by the caller's input or by this service's own setup.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Validation,
    Config,
    Other(String),
}

/// Errors from talking to a provider outside of the summarization pipeline.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Authentication,
    Other(String),
}

/// Fatal failures of one summarization pipeline stage.
#[derive(Debug, PartialEq)]
pub enum PipelineErrorKind {
    /// The engine rejected task or execution creation.
    Submission,
    /// The engine could not be queried for the execution status.
    Polling,
    /// No terminal status was observed before the poll timeout.
    Timeout,
    /// The engine reported the execution as failed.
    EngineFailure,
    /// The model output holds no well-formed, schema-valid result block.
    OutputFormat(OutputFormatErrorKind),
    /// The caller went away while the execution was still running.
    Cancelled,
}

/// The specific way the model output failed to match the expected block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatErrorKind {
    MissingFence,
    UnterminatedFence,
    EmptyPayload,
    Malformed,
    Schema,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let summary = match &self.error_kind {
            // Validation messages are written for the caller and stand on their own.
            DomainErrorKind::Internal(InternalErrorKind::Validation) => {
                return match &self.source {
                    Some(source) => write!(f, "{source}"),
                    None => write!(f, "Invalid request"),
                };
            }
            DomainErrorKind::Internal(InternalErrorKind::Config) => "Missing configuration",
            DomainErrorKind::Internal(InternalErrorKind::Other(msg)) => msg.as_str(),
            DomainErrorKind::External(ExternalErrorKind::Network) => "Network error",
            DomainErrorKind::External(ExternalErrorKind::Authentication) => {
                "Authentication failed"
            }
            DomainErrorKind::External(ExternalErrorKind::Other(msg)) => msg.as_str(),
            DomainErrorKind::Pipeline(kind) => match kind {
                PipelineErrorKind::Submission => "Error submitting task to the execution engine",
                PipelineErrorKind::Polling => "Error retrieving execution result",
                PipelineErrorKind::Timeout => "Execution did not finish in time",
                PipelineErrorKind::EngineFailure => "Execution failed",
                PipelineErrorKind::OutputFormat(_) => "Model output could not be parsed",
                PipelineErrorKind::Cancelled => "Execution was cancelled",
            },
        };

        match &self.source {
            Some(source) => write!(f, "{summary}: {source}"),
            None => write!(f, "{summary}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Builds a validation error whose message is shown to the caller as-is.
pub fn validation_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation),
    }
}

/// Builds a configuration error naming the missing setting.
pub fn config_error(message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    }
}

/// Builds a pipeline stage error wrapping its cause.
pub fn pipeline_error<E>(kind: PipelineErrorKind, source: E) -> Error
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    Error {
        source: Some(source.into()),
        error_kind: DomainErrorKind::Pipeline(kind),
    }
}

/// Builds an output format error with a description of the malformation.
pub fn output_format_error(kind: OutputFormatErrorKind, detail: impl Into<String>) -> Error {
    pipeline_error(PipelineErrorKind::OutputFormat(kind), detail.into())
}

// This is where we translate provider errors from `meeting-ai` to the `domain` layer.
impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        let error_kind = match &err {
            ProviderError::Network(_)
            | ProviderError::Timeout(_)
            | ProviderError::RateLimited { .. } => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
            ProviderError::Authentication(_) => {
                DomainErrorKind::External(ExternalErrorKind::Authentication)
            }
            ProviderError::Configuration(_) => DomainErrorKind::Internal(InternalErrorKind::Config),
            _ => DomainErrorKind::External(ExternalErrorKind::Other(
                "Provider request failed".to_string(),
            )),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<MeetingAuthError> for Error {
    fn from(err: MeetingAuthError) -> Self {
        let error_kind = match &err.error_kind {
            MeetingAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build HTTP client".to_string()),
            ),
            MeetingAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            MeetingAuthErrorKind::ApiKey(_) => DomainErrorKind::Internal(InternalErrorKind::Config),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}
