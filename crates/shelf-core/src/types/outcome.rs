//! Result of a multi-step operation that may partially succeed.

use crate::error::{AppError, ErrorKind};

/// Outcome of an operation made of several independent writes.
///
/// `Partial` means the primary step took effect (and `value` reflects it)
/// while a follow-up step failed. Callers that only care about success can
/// use [`Outcome::into_result`]; callers that want to retry just the failed
/// step keep the value from the `Partial` arm.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// Every step succeeded.
    Complete(T),
    /// The primary step succeeded, a follow-up step failed.
    Partial {
        /// The value produced by the steps that succeeded.
        value: T,
        /// Why the remaining step failed. Always of kind `PartialFailure`.
        error: AppError,
    },
}

impl<T> Outcome<T> {
    /// Build a partial outcome, re-labelling `cause` as a `PartialFailure`.
    pub fn partial(value: T, step: &str, cause: AppError) -> Self {
        Self::Partial {
            value,
            error: cause.rekind(ErrorKind::PartialFailure, format!("{step} failed")),
        }
    }

    /// Whether every step succeeded.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Borrow the produced value regardless of completeness.
    pub fn value(&self) -> &T {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => value,
        }
    }

    /// Take the produced value regardless of completeness.
    pub fn into_value(self) -> T {
        match self {
            Self::Complete(value) | Self::Partial { value, .. } => value,
        }
    }

    /// Convert to a plain result, treating a partial outcome as an error.
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            Self::Complete(value) => Ok(value),
            Self::Partial { error, .. } => Err(error),
        }
    }

    /// Map the produced value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Complete(value) => Outcome::Complete(f(value)),
            Self::Partial { value, error } => Outcome::Partial {
                value: f(value),
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_is_relabelled() {
        let outcome = Outcome::partial(7, "kind write", AppError::store_unavailable("down"));
        assert!(!outcome.is_complete());
        assert_eq!(*outcome.value(), 7);
        let err = outcome.into_result().unwrap_err();
        assert_eq!(err.kind, ErrorKind::PartialFailure);
        assert!(err.message.starts_with("kind write failed"));
    }

    #[test]
    fn test_complete_into_result() {
        let outcome = Outcome::Complete("ok").map(str::len);
        assert_eq!(outcome.into_result().unwrap(), 2);
    }
}
