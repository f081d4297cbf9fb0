//! Token introspection payloads and the validation summary built on top of them.

// self
use crate::{_prelude::*, auth::UserSummary};

/// Introspection response, passed through from the provider.
///
/// `active` is lifted out for convenience; every other member stays in `claims`
/// untouched, so re-serializing yields the provider's object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Introspection {
	/// Whether the provider considers the token active.
	#[serde(default)]
	pub active: bool,
	/// Remaining provider-defined members.
	#[serde(flatten)]
	pub claims: serde_json::Map<String, serde_json::Value>,
}
impl Introspection {
	/// Returns a string claim, if present.
	pub fn claim_str(&self, name: &str) -> Option<&str> {
		self.claims.get(name).and_then(serde_json::Value::as_str)
	}

	/// Builds a user summary from the standard introspection claims.
	///
	/// Returns `None` for inactive tokens or when `sub` is missing.
	pub fn user(&self) -> Option<UserSummary> {
		if !self.active {
			return None;
		}

		let id = self.claim_str("sub")?.to_owned();
		let text = |name: &str| self.claim_str(name).unwrap_or_default().to_owned();

		Some(UserSummary {
			id,
			username: text("preferred_username"),
			email: text("email"),
			name: text("name"),
			roles: Vec::new(),
		})
	}
}

/// Yes/no answer to "is this token usable right now".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenValidation {
	/// Whether the token is active.
	pub valid: bool,
	/// User the token was issued to, when active.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<UserSummary>,
	/// Reason the token is not valid.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}
impl TokenValidation {
	/// Validation result for an active token.
	pub fn valid(user: Option<UserSummary>) -> Self {
		Self { valid: true, user, error: None }
	}

	/// Validation result for a rejected token.
	pub fn invalid(reason: impl Into<String>) -> Self {
		Self { valid: false, user: None, error: Some(reason.into()) }
	}
}
impl From<Introspection> for TokenValidation {
	fn from(introspection: Introspection) -> Self {
		if introspection.active {
			Self::valid(introspection.user())
		} else {
			Self::invalid("Token is not active.")
		}
	}
}
