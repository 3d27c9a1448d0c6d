//! Error kinds for loading, building and saving BVH files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of the BVH file core.
///
/// Every parse failure is non-recoverable for that load attempt: the
/// aggregate is cleared before the error is returned, so a failed load never
/// leaves a partial skeleton behind.
#[derive(Debug, Error)]
pub enum BvhError {
    #[error("cannot open {path:?}: {source}")]
    FileNotOpenable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unexpected token, unmatched brace, unrecognized channel-type token,
    /// or end of input before the MOTION marker.
    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    /// Missing `Frames`/`Frame Time` header lines or unparsable numbers.
    #[error("malformed motion header: {0}")]
    MalformedMotionHeader(String),

    /// Fewer value tokens than declared channels, fewer lines than declared
    /// frames, or a frame value that is not a number.
    #[error("truncated motion data: {0}")]
    TruncatedMotionData(String),

    /// A programmatically supplied skeleton failed cross-reference
    /// validation, or the writer was asked to save an empty skeleton.
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),
}
