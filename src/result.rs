//! Execution result produced by the gate's pre-execution check
use crate::GateError;

/// Outcome of a gate-mediated execution step.
///
/// `NoResult` is the proceed-signal: the gate has made no decision against the
/// operation and the pipeline should keep going. It is distinct from `Success`
/// so "not yet failed" never reads as "succeeded."
#[derive(Debug, Clone)]
pub enum ExecutionResult<T, E> {
    /// The wrapped operation completed with a value.
    Success(T),
    /// No decision yet; execution should proceed.
    NoResult,
    /// A classified failure, either manufactured by the gate or propagated
    /// from the wrapped operation.
    Failure(GateError<E>),
}

impl<T, E> ExecutionResult<T, E> {
    /// Check if this result carries a success value.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
    /// Check if this result is the proceed-signal.
    pub fn is_no_result(&self) -> bool {
        matches!(self, Self::NoResult)
    }
    /// Check if this result carries a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
    /// Borrow the success value if present.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }
    /// Borrow the failure if present.
    pub fn failure(&self) -> Option<&GateError<E>> {
        match self {
            Self::Failure(e) => Some(e),
            _ => None,
        }
    }
    /// Consume the result, extracting the success value.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }
    /// Consume the result, extracting the failure.
    pub fn into_failure(self) -> Option<GateError<E>> {
        match self {
            Self::Failure(e) => Some(e),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, GateError<E>>> for ExecutionResult<T, E> {
    fn from(result: Result<T, GateError<E>>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_are_mutually_exclusive() {
        let success: ExecutionResult<u32, std::io::Error> = ExecutionResult::Success(7);
        assert!(success.is_success());
        assert!(!success.is_no_result());
        assert!(!success.is_failure());

        let proceed: ExecutionResult<u32, std::io::Error> = ExecutionResult::NoResult;
        assert!(proceed.is_no_result());
        assert!(!proceed.is_success());
        assert!(!proceed.is_failure());

        let failure: ExecutionResult<u32, std::io::Error> =
            ExecutionResult::Failure(GateError::Interrupted);
        assert!(failure.is_failure());
        assert!(!failure.is_success());
        assert!(!failure.is_no_result());
    }

    #[test]
    fn accessors_extract_values() {
        let success: ExecutionResult<u32, std::io::Error> = ExecutionResult::Success(7);
        assert_eq!(success.success(), Some(&7));
        assert!(success.failure().is_none());
        assert_eq!(success.into_success(), Some(7));

        let failure: ExecutionResult<u32, std::io::Error> =
            ExecutionResult::Failure(GateError::Interrupted);
        assert!(failure.success().is_none());
        assert!(failure.failure().unwrap().is_interrupted());
        assert!(failure.into_failure().unwrap().is_interrupted());

        let proceed: ExecutionResult<u32, std::io::Error> = ExecutionResult::NoResult;
        assert!(proceed.into_success().is_none());
    }

    #[test]
    fn from_result_maps_both_arms() {
        let ok: ExecutionResult<u32, std::io::Error> = Ok(3).into();
        assert!(ok.is_success());
        let err: ExecutionResult<u32, std::io::Error> = Err(GateError::Interrupted).into();
        assert!(err.is_failure());
    }
}
