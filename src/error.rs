use thiserror::Error;

/// Failures below the view boundary. Server-reported rejections are not
/// errors here; they arrive as an `Envelope` with `success == false`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("unexpected payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

pub type FetchResult<T> = Result<T, FetchError>;
