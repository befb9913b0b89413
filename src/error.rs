//! Error types surfaced by event dispatch.
//!
//! A single enum, [`DispatchError`], covers every failure the engine can
//! return:
//!
//! - [`DispatchError::Failed`] — a subscriber reported an ordinary failure.
//! - [`DispatchError::Panicked`] — a fan-out member panicked; the panic is
//!   contained and reported as a value.
//! - [`DispatchError::Canceled`] — the caller's cancellation token fired
//!   before a bounded subscriber could acquire a permit.
//!
//! No failure is ever escalated: errors are plain values, and a failing
//! subscriber never prevents its siblings from running. The engine does not
//! retry; retry policy belongs to individual subscribers or the caller.

use thiserror::Error;

/// # Errors produced by event dispatch.
///
/// Combinators pass a delegate's error through unchanged; aggregating
/// combinators pick one error according to their documented policy
/// (last-wins for sequential/buffered delivery, first-observed for
/// concurrent fan-out).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A subscriber failed while handling an event.
    #[error("subscriber failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// A subscriber panicked while handling an event.
    ///
    /// Only concurrent fan-out produces this variant; the panic is caught
    /// on the member's own task and never unwinds into the caller.
    #[error("subscriber panicked: {reason}")]
    Panicked {
        /// Panic payload rendered as text.
        reason: String,
    },

    /// The caller's cancellation token fired before dispatch could proceed.
    #[error("dispatch canceled")]
    Canceled,
}

impl DispatchError {
    /// Creates a [`DispatchError::Failed`] from any displayable message.
    pub fn failed(error: impl Into<String>) -> Self {
        DispatchError::Failed { error: error.into() }
    }

    /// Creates a [`DispatchError::Panicked`] from a rendered panic payload.
    pub fn panicked(reason: impl Into<String>) -> Self {
        DispatchError::Panicked { reason: reason.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventry::DispatchError;
    ///
    /// let err = DispatchError::failed("boom");
    /// assert_eq!(err.as_label(), "dispatch_failed");
    /// assert_eq!(DispatchError::Canceled.as_label(), "dispatch_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Failed { .. } => "dispatch_failed",
            DispatchError::Panicked { .. } => "subscriber_panicked",
            DispatchError::Canceled => "dispatch_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Failed { error } => format!("error: {error}"),
            DispatchError::Panicked { reason } => format!("panic: {reason}"),
            DispatchError::Canceled => "canceled".to_string(),
        }
    }

    /// True when the error is [`DispatchError::Canceled`].
    ///
    /// # Example
    /// ```
    /// use eventry::DispatchError;
    ///
    /// assert!(DispatchError::Canceled.is_canceled());
    /// assert!(!DispatchError::failed("boom").is_canceled());
    /// ```
    pub fn is_canceled(&self) -> bool {
        matches!(self, DispatchError::Canceled)
    }
}
