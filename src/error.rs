use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid segment count {0}: a ring needs at least one segment")]
    InvalidSegmentCount(u32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Unknown mesh: {0}")]
    UnknownMesh(String),
}

pub type Result<T> = std::result::Result<T, Error>;
