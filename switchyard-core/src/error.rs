// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for switchyard streams
//!
//! Every failure a switching stream can observe ends up as a [`SwitchError`] carried
//! downstream inside [`StreamItem::Error`](crate::StreamItem::Error). Nothing is thrown
//! across the stream boundary.
//!
//! # Examples
//!
//! ```
//! use switchyard_core::{Result, SwitchError};
//!
//! fn open_feed(name: &str) -> Result<()> {
//!     Err(SwitchError::factory_error(format!("no feed named {name}")))
//! }
//!
//! assert!(open_feed("quotes").is_err());
//! ```

/// Root error type for all switchyard operations
#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    /// Stream processing encountered an error
    ///
    /// General-purpose variant for failures reported by a source stream.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by user-provided functions and callbacks.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The inner-stream factory failed for a token
    ///
    /// No inner stream became live for that token.
    #[error("Factory error: {context}")]
    FactoryError {
        /// Description of the factory failure
        context: String,
    },

    /// Multiple errors occurred
    ///
    /// Used by subscribers without an error callback to report every handler failure at once.
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<SwitchError>,
    },
}

impl SwitchError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a factory error with the given context
    pub fn factory_error(context: impl Into<String>) -> Self {
        Self::FactoryError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Aggregate multiple user errors into a `MultipleErrors` variant
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard_core::SwitchError;
    /// use std::io;
    ///
    /// let errors = vec![io::Error::other("first"), io::Error::other("second")];
    ///
    /// let result = SwitchError::from_user_errors(errors);
    /// assert!(matches!(result, SwitchError::MultipleErrors { count: 2, .. }));
    /// ```
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors
            .into_iter()
            .map(|e| Self::UserError(Box::new(e)))
            .collect();

        Self::MultipleErrors { count, errors }
    }
}

/// Specialized Result type for switchyard operations
pub type Result<T> = std::result::Result<T, SwitchError>;

impl Clone for SwitchError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed source can't be cloned, keep its rendering instead
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {}", e),
            },
            Self::FactoryError { context } => Self::FactoryError {
                context: context.clone(),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
        }
    }
}
