//! Optional observability helpers for gateway operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `oidc_gateway.operation` with the
//!   `operation` and `stage` fields, plus warning events for swallowed logout failures.
//! - Enable `metrics` to increment the `oidc_gateway_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gateway operations observed by spans, metrics, and failure classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Password grant (the token half of a login).
	Login,
	/// Refresh token grant.
	Refresh,
	/// End-session call.
	Logout,
	/// Userinfo lookup.
	UserInfo,
	/// Token introspection.
	Introspect,
	/// Client credentials grant for the gateway's own service account.
	ServiceAccount,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Login => "login",
			Operation::Refresh => "refresh",
			Operation::Logout => "logout",
			Operation::UserInfo => "user_info",
			Operation::Introspect => "introspect",
			Operation::ServiceAccount => "service_account",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a gateway operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller (or swallowed, for logout).
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
