use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("{0}")]
    Other(String),
}

/// Failures of the content checksum engine. Always scoped to a single file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("MD5 calculation not implemented for {0}-bit depth")]
    UnsupportedBitDepth(u32),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("stream declares no bit depth")]
    UnknownBitDepth,
}
