// crates/framedeck-api/src/error.rs

use thiserror::Error;

/// Failure modes of one backend call, as the rest of the client needs to
/// distinguish them:
///
///   - `Transport` / `Io` — the request never produced a usable response.
///     During polling these are swallowed and retried; during submission
///     they surface like any other rejection.
///   - `Rejected` — the server answered and said no (non-2xx, or a 2xx
///     carrying an `{error}` body). The message is shown to the user.
///   - `BadBody` — the server answered 2xx with something that doesn't
///     parse as the expected shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Rejected { message: String },

    #[error("malformed response body: {0}")]
    BadBody(#[from] serde_json::Error),
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ApiError::Rejected { message: message.into() }
    }
}
