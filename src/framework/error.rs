//! # Store Errors
//!
//! Errors raised by the collection plumbing itself. Record-specific failures
//! travel inside [`StoreError::Rejected`] so typed clients can recover them.

/// Errors that can occur while talking to a collection actor.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection closed")]
    CollectionClosed,
    #[error("Collection dropped response channel")]
    CollectionDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Recovers the record's own error type from a [`StoreError::Rejected`].
    ///
    /// Returns the original error unchanged when it holds something else.
    pub fn downcast_rejection<E>(self) -> Result<E, StoreError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            StoreError::Rejected(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(StoreError::Rejected(other)),
            },
            other => Err(other),
        }
    }
}
