//! Shared fixtures for reqwest-backed integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
// self
use oidc_gateway::{
	ConfigLoader, Gateway, ProviderConfig, ReqwestGateway, StaticConfig, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
};

pub const REALM: &str = "ecommerce";
pub const CLIENT_ID: &str = "ecommerce-auth";
pub const CLIENT_SECRET: &str = "test-client-secret";

/// Path of a realm-scoped OpenID Connect endpoint on the mock server.
pub fn oidc_path(suffix: &str) -> String {
	format!("/realms/{REALM}/protocol/openid-connect/{suffix}")
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests, keeping the gateway's no-redirect policy.
pub fn test_http_client() -> ReqwestHttpClient {
	let client = ReqwestHttpClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn config_for(server_url: &str) -> ProviderConfig {
	ProviderConfig::builder(server_url, REALM)
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.build()
		.expect("Test provider configuration should build.")
}

/// Gateway over `loader` using the test HTTP client.
pub fn gateway_with(loader: impl 'static + ConfigLoader) -> ReqwestGateway {
	Gateway::with_http_client(Arc::new(loader), test_http_client(), ReqwestTransportErrorMapper)
}

pub fn gateway_for(server_url: &str) -> ReqwestGateway {
	gateway_with(StaticConfig::new(config_for(server_url)))
}

pub fn gateway(server: &MockServer) -> ReqwestGateway {
	gateway_for(&server.base_url())
}

/// Loader that hands out `first` on the first load and `second` afterwards.
///
/// Clones share one load counter.
#[derive(Clone)]
pub struct SwitchingConfig {
	first: ProviderConfig,
	second: ProviderConfig,
	loads: Arc<Mutex<usize>>,
}
impl SwitchingConfig {
	pub fn new(first: ProviderConfig, second: ProviderConfig) -> Self {
		Self { first, second, loads: Default::default() }
	}

	pub fn loads(&self) -> usize {
		*self.loads.lock()
	}
}
impl ConfigLoader for SwitchingConfig {
	fn load(&self) -> oidc_gateway::Result<Arc<ProviderConfig>> {
		let mut loads = self.loads.lock();

		*loads += 1;

		Ok(Arc::new(if *loads == 1 { self.first.clone() } else { self.second.clone() }))
	}
}

/// Token endpoint body shaped like a realm's password-grant response.
pub fn token_body(access: &str, refresh: &str, expires_in: u64) -> String {
	format!(
		"{{\"access_token\":\"{access}\",\"refresh_token\":\"{refresh}\",\"expires_in\":{expires_in},\
		\"refresh_expires_in\":1800,\"token_type\":\"Bearer\",\"scope\":\"openid profile email\",\
		\"session_state\":\"session-1\"}}"
	)
}
