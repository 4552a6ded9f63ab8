// ABOUTME: Error types for the clashdice library.
// ABOUTME: All failures occur at the input boundary; rolling itself is infallible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Color '{color}' has {count} faces, expected {expected}")]
    WrongFaceCount {
        color: String,
        count: usize,
        expected: usize,
    },

    #[error("Face index {0} out of range (0-7)")]
    FaceIndexOutOfRange(usize),

    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(String),
}

pub type Result<T> = std::result::Result<T, Error>;
