//! Classification of provider responses into the gateway error taxonomy.
//!
//! Every failed provider call is described by a [`FailureContext`] and turned into an
//! [`Error`] by [`classify`]. The rules are per operation and live in one place so each
//! mapping can be read and tested on its own.

// self
use crate::{_prelude::*, obs::Operation};

/// Primitive facts about a failed provider response.
///
/// The context keeps only status codes and OAuth error fields so classification stays
/// independent of the HTTP client in use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureContext {
	/// Operation that issued the failing request.
	pub operation: Operation,
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
}
impl FailureContext {
	/// Creates a new context scoped to the provided operation.
	pub fn new(operation: Operation) -> Self {
		Self { operation, http_status: None, oauth_error: None, error_description: None }
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds an optional HTTP status code.
	pub fn with_optional_status(mut self, status: Option<u16>) -> Self {
		self.http_status = status;

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Reads `error`/`error_description` out of a JSON error body, ignoring anything else.
	pub fn with_error_body(mut self, body: &[u8]) -> Self {
		if let Ok(parsed) = serde_json::from_slice::<OAuthErrorBody>(body) {
			self.oauth_error = parsed.error.or(self.oauth_error);
			self.error_description = parsed.error_description.or(self.error_description);
		}

		self
	}

	fn description(&self) -> Option<&str> {
		self.error_description.as_deref().filter(|text| !text.trim().is_empty())
	}
}

#[derive(Deserialize)]
struct OAuthErrorBody {
	error: Option<String>,
	error_description: Option<String>,
}

/// Maps a failed provider response onto the gateway taxonomy.
///
/// | Operation | Status | Kind |
/// |---|---|---|
/// | login | 401 | [`ErrorKind::InvalidCredentials`] |
/// | refresh | 400 | [`ErrorKind::TokenExpired`] (rendered as 401) |
/// | user info | 401 | [`ErrorKind::TokenInvalid`] |
/// | anything else | any | [`ErrorKind::ProviderError`] |
pub fn classify(ctx: &FailureContext) -> Error {
	let kind = match (ctx.operation, ctx.http_status) {
		(Operation::Login, Some(401)) => ErrorKind::InvalidCredentials,
		(Operation::Refresh, Some(400)) => ErrorKind::TokenExpired,
		(Operation::UserInfo, Some(401)) => ErrorKind::TokenInvalid,
		_ => ErrorKind::ProviderError,
	};
	let message = match ctx.description() {
		Some(description) => description.to_owned(),
		None => fallback_message(kind, ctx.operation).to_owned(),
	};

	Error::new(kind, message)
}

fn fallback_message(kind: ErrorKind, operation: Operation) -> &'static str {
	match (kind, operation) {
		(ErrorKind::InvalidCredentials, _) => "Invalid username or password",
		(ErrorKind::TokenExpired, _) => "Refresh token expired or invalid",
		(ErrorKind::TokenInvalid, _) => "Invalid or expired access token",
		(_, Operation::Login) => "Failed to authenticate with the provider",
		(_, Operation::Refresh) => "Failed to refresh token",
		(_, Operation::Logout) => "Failed to end the provider session",
		(_, Operation::UserInfo) => "Failed to get user info",
		(_, Operation::Introspect) => "Failed to introspect token",
		(_, Operation::ServiceAccount) => "Failed to get service account token",
	}
}
