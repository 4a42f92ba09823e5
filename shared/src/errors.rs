use thiserror::Error;

/// Failures surfaced by the remote API client.
///
/// Retryable conditions (`RateLimited`, `Transient`) are only returned once
/// the client has exhausted its retry budget; the other variants are
/// terminal on first sight.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limited upstream, gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("transient upstream failure (status {status:?}): {message}")]
    Transient { status: Option<u16>, message: String },

    #[error("resource not found upstream")]
    NotFound,

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// A call to the Riot API either succeeds with the decoded payload or fails
/// with an [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;
