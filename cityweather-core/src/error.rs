use reqwest::StatusCode;
use thiserror::Error;

/// A query that names neither a city nor a complete coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid weather query: {reason}")]
pub struct InvalidQuery {
    reason: &'static str,
}

impl InvalidQuery {
    pub(crate) fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Input to [`Route::parse`](crate::Route::parse) that is not an in-app path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRoute {
    #[error("route must be a path starting with '/', got '{0}'")]
    NotAPath(String),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Failure while talking to the weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The wrapped error never carries the request URL, which holds the API key.
    #[error("failed to reach the weather provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather provider responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse the weather provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }

    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        FetchError::Status { status, body: truncate_body(body) }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
