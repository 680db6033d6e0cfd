use thiserror::Error;

/// REST-side failures. Transport drops are not errors: they surface as
/// channel state (`connected=false`) and the engine keeps its last-known
/// inbox.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
