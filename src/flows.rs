//! Gateway operations powered by the provider facade.

mod client_credentials;
mod common;
mod login;
mod password;
mod refresh;
mod session;
mod user_info;

// self
use crate::{
	_prelude::*,
	config::ConfigLoader,
	http::TokenHttpClient,
	oauth::{ProviderFacade, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{
	config::EnvConfigLoader, http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper,
};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport stack.
pub type ReqwestGateway = Gateway<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticates users and services against a single OpenID Connect realm.
///
/// The gateway owns the HTTP client, the transport error mapper, and the configuration
/// source. Every operation loads one configuration snapshot up front and uses it for
/// each request it sends, so a configuration change never splits an operation across
/// two realms. Nothing is cached between operations; concurrent calls share only the
/// HTTP client.
#[derive(Clone)]
pub struct Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Source of the configuration snapshot each operation runs against.
	pub config: Arc<dyn ConfigLoader>,
}
impl<C, M> Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a gateway that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: Arc<dyn ConfigLoader>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config }
	}

	/// Loads and validates the snapshot for one operation.
	pub(crate) fn facade(&self) -> Result<ProviderFacade<C, M>> {
		let config = self.config.load()?;

		ProviderFacade::from_config(config, self.http_client.clone(), self.transport_mapper.clone())
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a gateway with its own reqwest-backed transport.
	///
	/// Fails only when the HTTP client cannot be constructed. Configuration problems
	/// surface later, from the first operation that loads a snapshot.
	pub fn new(config: impl 'static + ConfigLoader) -> Result<Self> {
		Ok(Self::with_http_client(
			Arc::new(config),
			ReqwestHttpClient::new()?,
			ReqwestTransportErrorMapper,
		))
	}

	/// Creates a gateway configured from `KEYCLOAK_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::new(EnvConfigLoader::new())
	}
}
impl<C, M> Debug for Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").finish_non_exhaustive()
	}
}
