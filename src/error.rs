//! Gateway error taxonomy shared by every outward-facing operation.
//!
//! [`Error`] is the single error shape callers observe. Local detail enums
//! ([`ConfigError`], [`TransportError`]) exist only to be folded into it through
//! their `From` impls; provider responses are folded in by
//! [`crate::provider::classify`].

// self
use crate::{_prelude::*, config::GrantType};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed set of failure kinds surfaced by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Provider rejected the username/password pair.
	InvalidCredentials,
	/// Refresh token is expired or otherwise no longer accepted.
	TokenExpired,
	/// Access token is invalid or expired.
	TokenInvalid,
	/// Requested user does not exist.
	UserNotFound,
	/// Catch-all upstream failure.
	ProviderError,
	/// Local configuration is missing or malformed.
	ConfigurationError,
	/// The provider could not be reached.
	NetworkError,
}
impl ErrorKind {
	/// Returns the stable label rendered in response bodies.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
			ErrorKind::TokenExpired => "TOKEN_EXPIRED",
			ErrorKind::TokenInvalid => "TOKEN_INVALID",
			ErrorKind::UserNotFound => "USER_NOT_FOUND",
			ErrorKind::ProviderError => "PROVIDER_ERROR",
			ErrorKind::ConfigurationError => "CONFIGURATION_ERROR",
			ErrorKind::NetworkError => "NETWORK_ERROR",
		}
	}

	/// HTTP status used when a transport layer renders this kind.
	pub const fn default_status(self) -> u16 {
		match self {
			ErrorKind::InvalidCredentials | ErrorKind::TokenExpired | ErrorKind::TokenInvalid =>
				401,
			ErrorKind::UserNotFound => 404,
			ErrorKind::ProviderError | ErrorKind::ConfigurationError => 500,
			ErrorKind::NetworkError => 503,
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical gateway error: one kind, one message, one transport status code.
///
/// Values are built once at a failure boundary and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{kind}: {message}")]
pub struct Error {
	kind: ErrorKind,
	message: String,
	status_code: u16,
}
impl Error {
	/// Creates an error carrying the kind's default status code.
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), status_code: kind.default_status() }
	}

	/// Shorthand for [`ErrorKind::InvalidCredentials`].
	pub fn invalid_credentials(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InvalidCredentials, message)
	}

	/// Shorthand for [`ErrorKind::TokenExpired`].
	pub fn token_expired(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::TokenExpired, message)
	}

	/// Shorthand for [`ErrorKind::TokenInvalid`].
	pub fn token_invalid(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::TokenInvalid, message)
	}

	/// Shorthand for [`ErrorKind::ProviderError`].
	pub fn provider(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::ProviderError, message)
	}

	/// Shorthand for [`ErrorKind::NetworkError`].
	pub fn network(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::NetworkError, message)
	}

	/// Failure kind.
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	/// Human-readable message (upstream description when one was available).
	pub fn message(&self) -> &str {
		&self.message
	}

	/// HTTP status the transport layer should respond with.
	pub fn status_code(&self) -> u16 {
		self.status_code
	}

	/// Renders the `{error, message}` body the transport layer returns.
	pub fn body(&self) -> ErrorBody {
		ErrorBody { error: self.kind, message: self.message.clone() }
	}
}
impl From<ConfigError> for Error {
	fn from(e: ConfigError) -> Self {
		Self::new(ErrorKind::ConfigurationError, e.to_string())
	}
}
impl From<TransportError> for Error {
	fn from(e: TransportError) -> Self {
		Self::new(ErrorKind::NetworkError, e.to_string())
	}
}

/// Serializable error body: `{"error": "<KIND>", "message": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Failure kind label.
	pub error: ErrorKind,
	/// Human-readable message.
	pub message: String,
}

/// Response envelope for callers that wrap every payload uniformly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	/// Whether the operation succeeded.
	pub success: bool,
	/// Success payload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	/// Failure kind label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorKind>,
	/// Failure message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}
impl<T> From<Result<T>> for ApiResponse<T> {
	fn from(result: Result<T>) -> Self {
		match result {
			Ok(data) => Self { success: true, data: Some(data), error: None, message: None },
			Err(err) => Self {
				success: false,
				data: None,
				error: Some(err.kind),
				message: Some(err.message),
			},
		}
	}
}

/// Local configuration failures; always fatal to the operation and raised before any
/// network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration field is empty.
	#[error("Missing required provider configuration: {field}.")]
	MissingField {
		/// Name of the empty field.
		field: &'static str,
	},
	/// Endpoint name is not one of the known provider endpoints.
	#[error("Unknown provider endpoint: {name}.")]
	UnknownEndpoint {
		/// Name that failed to resolve.
		name: String,
	},
	/// Server URL or a resolved endpoint URL cannot be parsed.
	#[error("Provider URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Grant is not enabled for the configured client.
	#[error("Grant `{grant}` is not enabled for this client.")]
	UnsupportedGrant {
		/// Grant that was requested.
		grant: GrantType,
	},
	/// Numeric setting cannot be parsed.
	#[error("Configuration value `{key}` must be a non-negative integer.")]
	InvalidNumber {
		/// Setting name.
		key: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The provider did not answer within the request timeout.
	#[error("Request timed out while calling the provider.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn kinds_carry_default_status() {
		assert_eq!(Error::invalid_credentials("bad").status_code(), 401);
		assert_eq!(Error::token_expired("old").status_code(), 401);
		assert_eq!(Error::new(ErrorKind::UserNotFound, "gone").status_code(), 404);
		assert_eq!(Error::provider("boom").status_code(), 500);
		assert_eq!(Error::network("down").status_code(), 503);
	}

	#[test]
	fn config_errors_fold_into_configuration_kind() {
		let err = Error::from(ConfigError::MissingField { field: "client_secret" });

		assert_eq!(err.kind(), ErrorKind::ConfigurationError);
		assert_eq!(err.message(), "Missing required provider configuration: client_secret.");
	}

	#[test]
	fn body_renders_kind_label() {
		let body = Error::invalid_credentials("Invalid user credentials").body();
		let json = serde_json::to_value(&body).expect("Error body should serialize.");

		assert_eq!(
			json,
			serde_json::json!({ "error": "INVALID_CREDENTIALS", "message": "Invalid user credentials" })
		);
	}

	#[test]
	fn api_response_wraps_failures() {
		let response: ApiResponse<()> = Err(Error::token_invalid("expired")).into();

		assert!(!response.success);
		assert_eq!(response.error, Some(ErrorKind::TokenInvalid));
		assert_eq!(response.message.as_deref(), Some("expired"));

		let json = serde_json::to_string(&response).expect("Envelope should serialize.");

		assert_eq!(json, "{\"success\":false,\"error\":\"TOKEN_INVALID\",\"message\":\"expired\"}");
	}
}
