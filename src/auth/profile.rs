//! User profile claims and the composed login result.

// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenSet},
};

/// Profile claims returned by the provider's userinfo endpoint.
///
/// Roles are not part of the profile; they live in token claims decoded elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Subject identifier.
	pub sub: String,
	/// Preferred username.
	#[serde(default)]
	pub preferred_username: String,
	/// Email address.
	#[serde(default)]
	pub email: String,
	/// Whether the provider verified the email address.
	#[serde(default)]
	pub email_verified: bool,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Given name.
	#[serde(default)]
	pub given_name: String,
	/// Family name.
	#[serde(default)]
	pub family_name: String,
}

/// User summary embedded in a [`LoginResult`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
	/// Subject identifier.
	pub id: String,
	/// Preferred username.
	pub username: String,
	/// Email address.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Role names; always empty here.
	pub roles: Vec<String>,
}
impl From<UserProfile> for UserSummary {
	fn from(profile: UserProfile) -> Self {
		Self {
			id: profile.sub,
			username: profile.preferred_username,
			email: profile.email,
			name: profile.name,
			roles: Vec::new(),
		}
	}
}

/// Outcome of a successful login: tokens from the password grant plus the profile summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
	/// Access token from the password grant.
	pub access_token: Secret,
	/// Refresh token from the password grant.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<Secret>,
	/// Access token lifetime in seconds.
	pub expires_in: u64,
	/// Summary of the authenticated user.
	pub user: UserSummary,
}
impl LoginResult {
	/// Combines a token set with the profile fetched using its access token.
	pub fn new(tokens: TokenSet, profile: UserProfile) -> Self {
		Self {
			access_token: tokens.access_token,
			refresh_token: tokens.refresh_token,
			expires_in: tokens.expires_in,
			user: profile.into(),
		}
	}
}
