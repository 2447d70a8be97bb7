//! Error types shared across the document, selector, and storage layers.
//!
//! Nothing in the toggle widget is fatal. These errors surface from the
//! collaborators (document, storage) and are logged at the call site before
//! the widget degrades to its documented no-op behavior.

/// Failure while mutating or reading a document element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle does not refer to an element of this document.
    #[error("unknown element handle: {0}")]
    UnknownElement(usize),
    /// Attribute names must be non-empty and free of whitespace.
    #[error("invalid attribute name: {0:?}")]
    InvalidAttributeName(String),
    /// Class tokens must be non-empty and free of whitespace.
    #[error("invalid class token: {0:?}")]
    InvalidClassToken(String),
    /// The browser rejected the operation.
    #[error("browser dom error: {0}")]
    Browser(String),
}

/// Failure while parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one item of a selector list) is empty.
    #[error("empty selector")]
    Empty,
    /// The selector uses syntax outside the supported subset.
    #[error("unsupported selector syntax in {selector:?}: {reason}")]
    Unsupported { selector: String, reason: &'static str },
    /// The selector is syntactically broken.
    #[error("malformed selector {selector:?}: {reason}")]
    Malformed { selector: String, reason: &'static str },
}

/// Failure while reading or writing durable client storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The storage backend is not reachable (no window, storage disabled).
    #[error("storage unavailable")]
    Unavailable,
    /// The browser rejected the operation (quota, security policy).
    #[error("browser storage error: {0}")]
    Browser(String),
}

/// Failure while reading, decoding, or updating the layout configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The persisted value could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The persisted value is not valid JSON.
    #[error("malformed persisted config: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The persisted value is valid JSON but not an object.
    #[error("persisted config is not a JSON object")]
    NotAnObject,
    /// The property path cannot be written.
    #[error("cannot set config path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
}
