//! Token sets issued by successful grant exchanges.

// self
use crate::{_prelude::*, auth::Secret, config::secs_to_duration};

/// Tokens returned by the provider's token endpoint.
///
/// A `TokenSet` only ever comes out of a successful grant exchange; the gateway treats
/// every token as an opaque string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
	/// Access token presented as a bearer credential.
	pub access_token: Secret,
	/// Refresh token, when the grant issued one.
	pub refresh_token: Option<Secret>,
	/// Access token lifetime in seconds, counted from `issued_at`.
	pub expires_in: u64,
	/// Refresh token lifetime in seconds, when reported.
	pub refresh_expires_in: Option<u64>,
	/// Token type reported by the provider (usually `Bearer`).
	pub token_type: String,
	/// Space-delimited granted scopes; empty when the provider omitted them.
	pub scope: String,
	/// OpenID Connect ID token, when issued.
	pub id_token: Option<Secret>,
	/// Provider session identifier, when issued.
	pub session_state: Option<String>,
	/// Instant the gateway received the response.
	pub issued_at: OffsetDateTime,
}
impl TokenSet {
	/// Absolute access token expiry.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(secs_to_duration(self.expires_in))
	}

	/// Returns `true` once the access token has expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}

	/// Absolute refresh token expiry, when the provider reported a lifetime.
	pub fn refresh_expires_at(&self) -> Option<OffsetDateTime> {
		self.refresh_expires_in.map(|secs| self.issued_at.saturating_add(secs_to_duration(secs)))
	}

	/// Iterates over the granted scopes.
	pub fn scopes(&self) -> impl Iterator<Item = &str> {
		self.scope.split_whitespace()
	}
}
