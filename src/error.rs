use std::fmt;

use miette::Diagnostic;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::form::ValidationErrors;
use crate::repository::RecordId;

/// Postgres error code raised when a row is still referenced by a foreign key.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgREST code for a request that expected one row and matched none.
pub const NO_MATCHING_ROW: &str = "PGRST116";

/// Error body returned by the hosted store (PostgREST format).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The store answered successfully but no row carried the requested identifier.
    #[must_use]
    pub fn no_matching_row(entity: &str, id: RecordId) -> Self {
        Self::new(format!("{entity} {id} was not found")).with_code(NO_MATCHING_ROW)
    }

    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        self.code.as_deref() == Some(FOREIGN_KEY_VIOLATION)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors that can occur while talking to the store or driving a page.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("error making request: {source}")]
    #[diagnostic(
        code(hondupay::request_error),
        help("Check your network connection and the availability of the data store")
    )]
    Request {
        #[source]
        source: reqwest::Error,
        span_trace: SpanTrace,
    },

    #[error("error decoding response: {source}")]
    #[diagnostic(
        code(hondupay::deserialization_error),
        help("The store returned rows in an unexpected shape; check the table columns")
    )]
    DeserializationError {
        #[source]
        source: serde_json::Error,
        body: Option<String>,
    },

    #[error("endpoint could not be parsed as a URL")]
    #[diagnostic(
        code(hondupay::invalid_endpoint),
        help("Check that the store URL and table name form a valid URL")
    )]
    InvalidEndpoint,

    #[error("invalid configuration for {variable}: {reason}")]
    #[diagnostic(
        code(hondupay::config),
        help("Set SUPABASE_URL and SUPABASE_ANON_KEY to the project URL and its anon key")
    )]
    Config {
        variable: &'static str,
        reason: String,
    },

    /// The store rejected the operation. The message is the store's own, verbatim.
    #[error("{store}")]
    #[diagnostic(
        code(hondupay::persistence),
        help("The data store rejected the operation; review the message and try again")
    )]
    Persistence {
        store: StoreError,
        url: Option<String>,
        status_code: Option<StatusCode>,
        span_trace: SpanTrace,
    },

    /// A delete was refused because other records still reference the row.
    #[error("cannot delete: {entity} has associated records")]
    #[diagnostic(
        code(hondupay::dependency_conflict),
        help("Remove or reassign the records that reference it first")
    )]
    DependencyConflict {
        entity: &'static str,
        id: RecordId,
        store: StoreError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("page is busy ({state}); wait for the current operation to finish")]
    #[diagnostic(code(hondupay::page_busy))]
    PageBusy { state: &'static str },

    #[error("no delete is awaiting confirmation")]
    #[diagnostic(code(hondupay::no_pending_delete))]
    NoPendingDelete,
}

impl Error {
    /// Builds a persistence error, capturing the current span trace.
    #[must_use]
    pub fn persistence(
        store: StoreError,
        url: Option<String>,
        status_code: Option<StatusCode>,
    ) -> Self {
        Self::Persistence {
            store,
            url,
            status_code,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Span trace captured where the error was raised, when one was recorded.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Request { span_trace, .. } | Self::Persistence { span_trace, .. } => {
                Some(span_trace)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Request { source, .. } => source.url().map(url::Url::as_str),
            Self::Persistence { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Request { source, .. } => source.status(),
            Self::Persistence { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// The store's error body, for persistence failures and dependency conflicts.
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Persistence { store, .. } | Self::DependencyConflict { store, .. } => Some(store),
            _ => None,
        }
    }

    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::DeserializationError { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_dependency_conflict(&self) -> bool {
        matches!(self, Self::DependencyConflict { .. })
    }

    /// `true` for every store failure other than a dependency conflict:
    /// transport errors, undecodable responses and store-reported errors.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::DeserializationError { .. } | Self::Persistence { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request {
            source: e,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::DeserializationError { source: e, body: None }
    }
}

/// Type alias for results from this crate.
pub type Result<O> = std::result::Result<O, Error>;
