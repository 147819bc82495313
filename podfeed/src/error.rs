use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("RSS serialization failed: {0}")]
    Serialize(#[from] quick_xml::SeError),
}

pub type Result<T> = std::result::Result<T, Error>;
