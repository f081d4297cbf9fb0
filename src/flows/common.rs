//! Shared helpers for gateway operations.

// self
use crate::{
	_prelude::*,
	obs::{self, Operation, OperationOutcome, OperationSpan},
};

/// Runs `fut` inside an operation span and records attempt plus outcome metrics.
pub(crate) async fn observe<T, Fut>(
	operation: Operation,
	stage: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(operation, stage);

	obs::record_outcome(operation, OperationOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => obs::record_outcome(operation, OperationOutcome::Success),
		Err(_) => obs::record_outcome(operation, OperationOutcome::Failure),
	}

	result
}
