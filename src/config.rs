//! Provider configuration snapshots and the loaders that produce them.
//!
//! Every gateway operation asks its [`ConfigLoader`] for exactly one
//! [`ProviderConfig`] snapshot and uses it for the whole exchange, so a reconfiguration
//! in the middle of a call can never mix old and new values.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// OAuth 2.0 grant types issued by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Resource Owner Password Credentials grant used for logins.
	Password,
	/// Refresh Token grant.
	RefreshToken,
	/// Client Credentials grant used for service-account tokens.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::Password => "password",
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Token lifetimes configured on the provider, mirrored locally for callers that need
/// them (cookie max-age, cache TTLs).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenLifespans {
	/// Access token lifetime.
	pub access: Duration,
	/// Refresh token lifetime.
	pub refresh: Duration,
}
impl Default for TokenLifespans {
	fn default() -> Self {
		Self { access: Duration::minutes(15), refresh: Duration::days(30) }
	}
}

/// Immutable provider configuration snapshot.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
	/// Provider base URL without a trailing slash (e.g. `http://localhost:8080`).
	pub server_url: String,
	/// Realm name substituted into endpoint paths.
	pub realm: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret, posted in form bodies.
	pub client_secret: Secret,
	/// Grants this client may perform.
	pub grant_types: Vec<GrantType>,
	/// Token lifetimes configured on the provider.
	pub lifespans: TokenLifespans,
	/// Timeout applied to every outbound request.
	pub request_timeout: StdDuration,
}
impl ProviderConfig {
	/// Default provider base URL.
	pub const DEFAULT_SERVER_URL: &'static str = "http://localhost:8080";
	/// Default realm name.
	pub const DEFAULT_REALM: &'static str = "ecommerce";
	/// Default client identifier.
	pub const DEFAULT_CLIENT_ID: &'static str = "ecommerce-auth";
	/// Default outbound request timeout.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Grants enabled when none are configured explicitly.
	pub const DEFAULT_GRANT_TYPES: [GrantType; 3] =
		[GrantType::Password, GrantType::RefreshToken, GrantType::ClientCredentials];

	/// Creates a new builder for the provided server URL and realm.
	pub fn builder(server_url: impl Into<String>, realm: impl Into<String>) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(server_url, realm)
	}

	/// Reads a configuration snapshot through `lookup` (keys as in [`EnvConfigLoader`]),
	/// falling back to defaults for absent keys.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
		let seconds = |key: &'static str| -> Result<Option<u64>, ConfigError> {
			lookup(key)
				.map(|raw| raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber { key }))
				.transpose()
		};
		let defaults = TokenLifespans::default();
		let lifespans = TokenLifespans {
			access: seconds(EnvConfigLoader::ACCESS_TOKEN_LIFESPAN)?
				.map_or(defaults.access, secs_to_duration),
			refresh: seconds(EnvConfigLoader::REFRESH_TOKEN_LIFESPAN)?
				.map_or(defaults.refresh, secs_to_duration),
		};
		let request_timeout = seconds(EnvConfigLoader::REQUEST_TIMEOUT)?
			.map_or(Self::DEFAULT_REQUEST_TIMEOUT, StdDuration::from_secs);

		Ok(Self {
			server_url: normalize_server_url(text(
				EnvConfigLoader::SERVER_URL,
				Self::DEFAULT_SERVER_URL,
			)),
			realm: text(EnvConfigLoader::REALM, Self::DEFAULT_REALM),
			client_id: text(EnvConfigLoader::CLIENT_ID, Self::DEFAULT_CLIENT_ID),
			client_secret: Secret::new(text(EnvConfigLoader::CLIENT_SECRET, "")),
			grant_types: Self::DEFAULT_GRANT_TYPES.to_vec(),
			lifespans,
			request_timeout,
		})
	}

	/// Returns `true` when `grant` is enabled for this client.
	pub fn supports(&self, grant: GrantType) -> bool {
		self.grant_types.contains(&grant)
	}

	/// Checks that every field needed to build a request is present and well-formed.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let required = [
			("server_url", self.server_url.as_str()),
			("realm", self.realm.as_str()),
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.expose()),
		];

		for (field, value) in required {
			if value.trim().is_empty() {
				return Err(ConfigError::MissingField { field });
			}
		}

		Url::parse(&self.server_url)
			.map_err(|source| ConfigError::InvalidUrl { url: self.server_url.clone(), source })?;

		Ok(())
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("server_url", &self.server_url)
			.field("realm", &self.realm)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("grant_types", &self.grant_types)
			.field("lifespans", &self.lifespans)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	server_url: String,
	realm: String,
	client_id: String,
	client_secret: Secret,
	grant_types: Vec<GrantType>,
	lifespans: TokenLifespans,
	request_timeout: StdDuration,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the server URL and realm.
	pub fn new(server_url: impl Into<String>, realm: impl Into<String>) -> Self {
		Self {
			server_url: server_url.into(),
			realm: realm.into(),
			client_id: ProviderConfig::DEFAULT_CLIENT_ID.into(),
			client_secret: Secret::default(),
			grant_types: ProviderConfig::DEFAULT_GRANT_TYPES.to_vec(),
			lifespans: TokenLifespans::default(),
			request_timeout: ProviderConfig::DEFAULT_REQUEST_TIMEOUT,
		}
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.client_secret = secret.into();

		self
	}

	/// Replaces the enabled grants.
	pub fn grant_types(mut self, grants: impl IntoIterator<Item = GrantType>) -> Self {
		self.grant_types = grants.into_iter().collect();

		self
	}

	/// Overrides the mirrored token lifetimes.
	pub fn lifespans(mut self, lifespans: TokenLifespans) -> Self {
		self.lifespans = lifespans;

		self
	}

	/// Overrides the outbound request timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let config = ProviderConfig {
			server_url: normalize_server_url(self.server_url),
			realm: self.realm,
			client_id: self.client_id,
			client_secret: self.client_secret,
			grant_types: self.grant_types,
			lifespans: self.lifespans,
			request_timeout: self.request_timeout,
		};

		config.validate()?;

		Ok(config)
	}
}

/// Source of configuration snapshots, consulted once per gateway operation.
pub trait ConfigLoader: Send + Sync {
	/// Produces the snapshot the current operation must use throughout.
	fn load(&self) -> Result<Arc<ProviderConfig>>;
}

/// Loader that always hands out the same snapshot.
#[derive(Clone, Debug)]
pub struct StaticConfig(Arc<ProviderConfig>);
impl StaticConfig {
	/// Wraps a fixed snapshot.
	pub fn new(config: ProviderConfig) -> Self {
		Self(Arc::new(config))
	}
}
impl ConfigLoader for StaticConfig {
	fn load(&self) -> Result<Arc<ProviderConfig>> {
		Ok(self.0.clone())
	}
}
impl From<ProviderConfig> for StaticConfig {
	fn from(config: ProviderConfig) -> Self {
		Self::new(config)
	}
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Loader that re-reads environment variables on every call.
///
/// A `.env` file in the working directory is imported once, when the loader is created.
pub struct EnvConfigLoader {
	lookup: Arc<Lookup>,
}
impl EnvConfigLoader {
	/// Provider base URL.
	pub const SERVER_URL: &'static str = "KEYCLOAK_URL";
	/// Realm name.
	pub const REALM: &'static str = "KEYCLOAK_REALM";
	/// Client identifier.
	pub const CLIENT_ID: &'static str = "KEYCLOAK_CLIENT_ID";
	/// Client secret.
	pub const CLIENT_SECRET: &'static str = "KEYCLOAK_CLIENT_SECRET";
	/// Outbound request timeout in seconds.
	pub const REQUEST_TIMEOUT: &'static str = "KEYCLOAK_REQUEST_TIMEOUT_SECS";
	/// Access token lifetime in seconds.
	pub const ACCESS_TOKEN_LIFESPAN: &'static str = "KEYCLOAK_ACCESS_TOKEN_LIFESPAN";
	/// Refresh token lifetime in seconds.
	pub const REFRESH_TOKEN_LIFESPAN: &'static str = "KEYCLOAK_REFRESH_TOKEN_LIFESPAN";

	/// Creates a loader over the process environment.
	pub fn new() -> Self {
		let _ = dotenvy::dotenv();

		Self::with_lookup(|key| std::env::var(key).ok())
	}

	/// Creates a loader over a custom key lookup.
	pub fn with_lookup<F>(lookup: F) -> Self
	where
		F: 'static + Fn(&str) -> Option<String> + Send + Sync,
	{
		Self { lookup: Arc::new(lookup) }
	}
}
impl Default for EnvConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for EnvConfigLoader {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("EnvConfigLoader(..)")
	}
}
impl ConfigLoader for EnvConfigLoader {
	fn load(&self) -> Result<Arc<ProviderConfig>> {
		let lookup = self.lookup.clone();

		Ok(Arc::new(ProviderConfig::from_lookup(move |key| lookup(key))?))
	}
}

fn normalize_server_url(raw: String) -> String {
	raw.trim().trim_end_matches('/').to_owned()
}

pub(crate) fn secs_to_duration(secs: u64) -> Duration {
	Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
		let map: HashMap<String, String> =
			pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();

		move |key| map.get(key).cloned()
	}

	#[test]
	fn builder_trims_trailing_slash_and_validates() {
		let config = ProviderConfig::builder("https://sso.example.com/", "ecommerce")
			.client_secret("s3cr3t")
			.build()
			.expect("Complete configuration should build.");

		assert_eq!(config.server_url, "https://sso.example.com");
		assert_eq!(config.client_id, "ecommerce-auth");
		assert_eq!(config.request_timeout, StdDuration::from_secs(10));
		assert_eq!(config.lifespans.access, Duration::seconds(900));
		assert_eq!(config.lifespans.refresh, Duration::seconds(2_592_000));
	}

	#[test]
	fn builder_rejects_missing_fields() {
		let err = ProviderConfig::builder("https://sso.example.com", "ecommerce")
			.build()
			.expect_err("Missing client secret should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "client_secret" }));

		let err = ProviderConfig::builder("https://sso.example.com", " ")
			.client_secret("s3cr3t")
			.build()
			.expect_err("Blank realm should be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "realm" }));

		let err = ProviderConfig::builder("not a url", "ecommerce")
			.client_secret("s3cr3t")
			.build()
			.expect_err("Unparsable server URL should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { .. }));
	}

	#[test]
	fn lookup_applies_defaults_and_overrides() {
		let config = ProviderConfig::from_lookup(lookup(&[
			(EnvConfigLoader::REALM, "ecommerce_master"),
			(EnvConfigLoader::CLIENT_SECRET, "test-client-secret"),
			(EnvConfigLoader::REQUEST_TIMEOUT, "3"),
		]))
		.expect("Lookup configuration should parse.");

		assert_eq!(config.server_url, "http://localhost:8080");
		assert_eq!(config.realm, "ecommerce_master");
		assert_eq!(config.client_id, "ecommerce-auth");
		assert_eq!(config.client_secret.expose(), "test-client-secret");
		assert_eq!(config.request_timeout, StdDuration::from_secs(3));
		config.validate().expect("Lookup configuration should validate.");
	}

	#[test]
	fn lookup_rejects_malformed_numbers() {
		let err = ProviderConfig::from_lookup(lookup(&[(
			EnvConfigLoader::ACCESS_TOKEN_LIFESPAN,
			"fifteen",
		)]))
		.expect_err("Non-numeric lifespan should be rejected.");

		assert!(matches!(err, ConfigError::InvalidNumber { key: "KEYCLOAK_ACCESS_TOKEN_LIFESPAN" }));
	}

	#[test]
	fn env_loader_reads_a_fresh_snapshot_per_load() {
		let secret = Arc::new(Mutex::new(String::from("first")));
		let shared = secret.clone();
		let loader = EnvConfigLoader::with_lookup(move |key| {
			(key == EnvConfigLoader::CLIENT_SECRET).then(|| shared.lock().clone())
		});
		let before = loader.load().expect("First snapshot should load.");

		*secret.lock() = "second".into();

		let after = loader.load().expect("Second snapshot should load.");

		assert_eq!(before.client_secret.expose(), "first");
		assert_eq!(after.client_secret.expose(), "second");
	}

	#[test]
	fn debug_hides_client_secret() {
		let config = ProviderConfig::builder("https://sso.example.com", "ecommerce")
			.client_secret("s3cr3t")
			.build()
			.expect("Complete configuration should build.");

		assert!(!format!("{config:?}").contains("s3cr3t"));
	}

	#[test]
	fn grants_default_to_all_and_can_be_narrowed() {
		let config = ProviderConfig::builder("https://sso.example.com", "ecommerce")
			.client_secret("s3cr3t")
			.build()
			.expect("Complete configuration should build.");

		assert!(ProviderConfig::DEFAULT_GRANT_TYPES.iter().all(|grant| config.supports(*grant)));

		let config = ProviderConfig::builder("https://sso.example.com", "ecommerce")
			.client_secret("s3cr3t")
			.grant_types([GrantType::ClientCredentials])
			.build()
			.expect("Complete configuration should build.");

		assert!(config.supports(GrantType::ClientCredentials));
		assert!(!config.supports(GrantType::Password));
		assert_eq!(GrantType::RefreshToken.to_string(), "refresh_token");
	}
}
