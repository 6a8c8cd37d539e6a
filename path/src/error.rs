use thiserror::Error;

/// Errors from key path parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    /// The textual form did not begin with `/`.
    #[error("key path must begin with `/`")]
    InvalidPrefix,
    /// Two consecutive separators, a trailing separator, or a bare `/`.
    #[error("key path contains an empty segment")]
    EmptySegment,
    /// A segment that is neither valid hex after `x:` nor a legal
    /// percent-encoded form.
    #[error("unknown encoding in segment {0:?}")]
    UnknownEncoding(String),
}
