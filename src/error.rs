use thiserror::Error;

/// Failures from the backend API boundary.
///
/// Everything the client can hit collapses into two cases: the transport
/// failed outright, or the backend answered with a non-2xx status. Callers
/// that feed the rendering layer convert both into an empty board rather
/// than propagating them further.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned {status}")]
    Upstream { status: reqwest::StatusCode },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
