//! Realm-scoped provider endpoint resolution.

// self
use crate::{_prelude::*, config::ProviderConfig, error::ConfigError};

const REALM_PLACEHOLDER: &str = "{realm}";

/// Provider endpoints the gateway knows how to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Token endpoint serving every grant exchange.
	Token,
	/// OpenID Connect userinfo endpoint.
	UserInfo,
	/// End-session endpoint.
	Logout,
	/// JSON Web Key Set endpoint.
	Certs,
	/// Token introspection endpoint.
	Introspect,
}
impl Endpoint {
	/// Every known endpoint.
	pub const ALL: [Endpoint; 5] =
		[Endpoint::Token, Endpoint::UserInfo, Endpoint::Logout, Endpoint::Certs, Endpoint::Introspect];

	/// Logical name accepted by [`FromStr`].
	pub const fn name(self) -> &'static str {
		match self {
			Endpoint::Token => "token",
			Endpoint::UserInfo => "userInfo",
			Endpoint::Logout => "logout",
			Endpoint::Certs => "certs",
			Endpoint::Introspect => "introspect",
		}
	}

	/// Path template with a `{realm}` placeholder.
	pub const fn path_template(self) -> &'static str {
		match self {
			Endpoint::Token => "/realms/{realm}/protocol/openid-connect/token",
			Endpoint::UserInfo => "/realms/{realm}/protocol/openid-connect/userinfo",
			Endpoint::Logout => "/realms/{realm}/protocol/openid-connect/logout",
			Endpoint::Certs => "/realms/{realm}/protocol/openid-connect/certs",
			Endpoint::Introspect => "/realms/{realm}/protocol/openid-connect/token/introspect",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.name())
	}
}
impl FromStr for Endpoint {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|endpoint| endpoint.name() == s)
			.ok_or_else(|| ConfigError::UnknownEndpoint { name: s.to_owned() })
	}
}

/// Builds the absolute URL of `endpoint` for the configured server and realm.
///
/// The realm is pushed as a single path segment, so `/`, `?`, or `#` inside it are
/// percent-encoded instead of changing the URL shape. A path prefix on the server URL
/// (e.g. `https://sso.example.com/auth`) is kept.
pub fn resolve(endpoint: Endpoint, config: &ProviderConfig) -> Result<Url, ConfigError> {
	let invalid = |source| ConfigError::InvalidUrl { url: config.server_url.clone(), source };
	let mut url = Url::parse(&config.server_url).map_err(invalid)?;

	{
		let mut segments = url
			.path_segments_mut()
			.map_err(|_| invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;

		segments.pop_if_empty();

		for segment in endpoint.path_template().split('/').filter(|segment| !segment.is_empty()) {
			segments.push(match segment {
				REALM_PLACEHOLDER => config.realm.as_str(),
				literal => literal,
			});
		}
	}

	Ok(url)
}

/// Resolves an endpoint by its logical name (`token`, `userInfo`, `logout`, `certs`,
/// `introspect`).
pub fn resolve_named(name: &str, config: &ProviderConfig) -> Result<Url, ConfigError> {
	resolve(name.parse()?, config)
}
