use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while validating input, talking to the remote API, or
/// persisting records.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested board is not part of the static allow-list.
    #[error("'{0}' is not a valid board")]
    InvalidBoard(String),

    /// The HTTP exchange itself failed: connection error, timeout, or a
    /// response body that could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The remote API answered with a non-success status code.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Status code carried by the response.
        status: StatusCode,
    },

    /// The response body was not the expected JSON shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// The output directory layout could not be created.
    #[error("could not create output directory {}: {}", .path.display(), .source)]
    Filesystem {
        /// Directory that failed to be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing records to an output file failed.
    #[error("could not write records to {}: {}", .path.display(), .source)]
    Io {
        /// Target file of the failed write.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A record could not be serialized into a JSON line.
    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
