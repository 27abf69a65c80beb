use std::fmt;

/// Core error type for the homework bot.
///
/// Adapter crates map their specific errors into this type so the poll loop
/// can relay every failure the same way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid response: {0}")]
    Shape(#[from] ShapeError),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The homework API could not be reached or answered with a non-200 status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    pub endpoint: String,
    /// Request headers as sent, with credentials redacted.
    pub headers: Vec<(String, String)>,
    /// `None` when the request failed before a status line was received.
    pub status: Option<u16>,
    pub reason: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers = self
            .headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "request to {} failed", self.endpoint)?;
        match self.status {
            Some(code) => write!(f, " with status {code}")?,
            None => write!(f, " without a response")?,
        }
        write!(f, " (headers: {{{headers}}}): {}", self.reason)
    }
}

impl std::error::Error for FetchError {}

/// Malformed API response or homework record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("not a mapping")]
    NotAMapping,

    #[error("missing homeworks")]
    MissingHomeworks,

    #[error("homeworks not a list")]
    HomeworksNotAList,

    #[error("homework record not a mapping")]
    RecordNotAMapping,

    #[error("missing homework_name")]
    MissingName,

    #[error("missing status")]
    MissingStatus,

    #[error("unknown status: {0}")]
    UnknownStatus(String),
}
