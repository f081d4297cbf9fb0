//! Provider facade: grant exchanges, profile lookup, session termination, and
//! introspection against one configuration snapshot.
//!
//! Grant exchanges run through the `oauth2` crate with the client secret posted in the
//! form body. The remaining calls are plain requests sent through the same
//! [`TokenHttpClient`] handle. Every failure is folded into [`Error`] exactly once, by
//! [`classify`] for provider responses or by a [`TransportErrorMapper`] for transport
//! failures.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, AuthType, Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	ExtraTokenFields, HttpClientError, HttpRequest, HttpResponse, RefreshToken, RequestTokenError,
	ResourceOwnerPassword, ResourceOwnerUsername, StandardRevocableToken, StandardTokenResponse,
	TokenResponse, TokenType, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse,
	},
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Introspection, Secret, TokenSet, UserProfile},
	config::{GrantType, ProviderConfig},
	endpoint::{self, Endpoint},
	error::{ConfigError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	obs::Operation,
	provider::{FailureContext, classify},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

type ProviderTokenResponse = StandardTokenResponse<ProviderTokenFields, ProviderTokenType>;
type ConfiguredClient = Client<
	BasicErrorResponse,
	ProviderTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;

/// Token response members beyond RFC 6749 that OpenID Connect providers return.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProviderTokenFields {
	/// Refresh token lifetime in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_expires_in: Option<u64>,
	/// OpenID Connect ID token.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id_token: Option<String>,
	/// Provider session identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_state: Option<String>,
}
impl ExtraTokenFields for ProviderTokenFields {}

/// Token type as parsed from the token response; the parser may lowercase it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderTokenType(pub String);
impl TokenType for ProviderTokenType {}

/// Maps HTTP transport failures into gateway [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a gateway error.
	fn map_transport_error(
		&self,
		operation: Operation,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(operation, meta, message),
			_ => map_generic_transport_error(operation, meta, "unknown transport failure"),
		}
	}
}

/// Facade over one configuration snapshot.
///
/// Built once per gateway operation, so every request the operation sends uses the
/// same server URL, realm, and client credentials.
pub(crate) struct ProviderFacade<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: Arc<ProviderConfig>,
	oauth_client: ConfiguredClient,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> ProviderFacade<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Validates `config` and prepares the grant client; no request is sent here.
	pub(crate) fn from_config(
		config: Arc<ProviderConfig>,
		http_client: Arc<C>,
		error_mapper: Arc<M>,
	) -> Result<Self> {
		config.validate()?;

		let token_endpoint = endpoint::resolve(Endpoint::Token, &config)?;
		let token_url = TokenUrl::new(token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidUrl { url: token_endpoint.to_string(), source })?;
		let oauth_client = Client::new(ClientId::new(config.client_id.clone()))
			.set_client_secret(ClientSecret::new(config.client_secret.expose().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self { config, oauth_client, http_client, error_mapper })
	}

	/// `grant_type=password` exchange.
	pub(crate) async fn exchange_password(&self, credentials: &Credentials) -> Result<TokenSet> {
		const OPERATION: Operation = Operation::Login;

		self.ensure_grant(GrantType::Password)?;

		let meta = ResponseMetadataSlot::default();
		let handle = self.handle(meta.clone());
		let username = ResourceOwnerUsername::new(credentials.username.clone());
		let password = ResourceOwnerPassword::new(credentials.password.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_password(&username, &password)
			.request_async(&handle)
			.await
			.map_err(|err| self.map_request_error(OPERATION, meta.take(), err))?;

		map_token_response(OPERATION, response)
	}

	/// `grant_type=refresh_token` exchange.
	pub(crate) async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenSet> {
		const OPERATION: Operation = Operation::Refresh;

		self.ensure_grant(GrantType::RefreshToken)?;

		let meta = ResponseMetadataSlot::default();
		let handle = self.handle(meta.clone());
		let refresh_secret = RefreshToken::new(refresh_token.to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&refresh_secret)
			.request_async(&handle)
			.await
			.map_err(|err| self.map_request_error(OPERATION, meta.take(), err))?;

		map_token_response(OPERATION, response)
	}

	/// `grant_type=client_credentials` exchange.
	pub(crate) async fn exchange_client_credentials(&self) -> Result<TokenSet> {
		const OPERATION: Operation = Operation::ServiceAccount;

		self.ensure_grant(GrantType::ClientCredentials)?;

		let meta = ResponseMetadataSlot::default();
		let handle = self.handle(meta.clone());
		let response = self
			.oauth_client
			.exchange_client_credentials()
			.request_async(&handle)
			.await
			.map_err(|err| self.map_request_error(OPERATION, meta.take(), err))?;

		map_token_response(OPERATION, response)
	}

	/// `GET userinfo` with a bearer access token.
	pub(crate) async fn fetch_user_info(&self, access_token: &str) -> Result<UserProfile> {
		const OPERATION: Operation = Operation::UserInfo;

		let url = endpoint::resolve(Endpoint::UserInfo, &self.config)?;
		let request = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, format!("Bearer {access_token}"))
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let response = self.send(OPERATION, request).await?;

		parse_json(OPERATION, response.body())
	}

	/// `POST logout` terminating the session bound to `refresh_token`.
	pub(crate) async fn end_session(&self, refresh_token: &str) -> Result<()> {
		const OPERATION: Operation = Operation::Logout;

		let url = endpoint::resolve(Endpoint::Logout, &self.config)?;
		let request = self.form_request(&url, &[("refresh_token", refresh_token)])?;

		self.send(OPERATION, request).await?;

		Ok(())
	}

	/// `POST token/introspect` for an opaque token.
	pub(crate) async fn introspect(&self, token: &str) -> Result<Introspection> {
		const OPERATION: Operation = Operation::Introspect;

		let url = endpoint::resolve(Endpoint::Introspect, &self.config)?;
		let request = self.form_request(&url, &[("token", token)])?;
		let response = self.send(OPERATION, request).await?;

		parse_json(OPERATION, response.body())
	}

	fn ensure_grant(&self, grant: GrantType) -> Result<()> {
		if self.config.supports(grant) {
			Ok(())
		} else {
			Err(ConfigError::UnsupportedGrant { grant }.into())
		}
	}

	fn handle(&self, slot: ResponseMetadataSlot) -> C::Handle {
		self.http_client.handle(slot, self.config.request_timeout)
	}

	/// Builds a form POST carrying the client credentials plus `params`.
	fn form_request(&self, url: &Url, params: &[(&str, &str)]) -> Result<HttpRequest> {
		let body = url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(params.iter().copied())
			.append_pair("client_id", &self.config.client_id)
			.append_pair("client_secret", self.config.client_secret.expose())
			.finish();
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.body(body.into_bytes())
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	/// Sends `request` and rejects every non-2xx response.
	async fn send(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.handle(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.error_mapper.map_transport_error(operation, meta.take().as_ref(), err)
		})?;
		let status = response.status();

		if !status.is_success() {
			return Err(classify(
				&FailureContext::new(operation)
					.with_http_status(status.as_u16())
					.with_error_body(response.body()),
			));
		}

		Ok(response)
	}

	fn map_request_error(
		&self,
		operation: Operation,
		meta: Option<ResponseMetadata>,
		err: BasicRequestTokenError<HttpClientError<C::TransportError>>,
	) -> Error {
		let status = meta.as_ref().and_then(|value| value.status);

		match err {
			RequestTokenError::ServerResponse(response) => {
				let mut ctx = FailureContext::new(operation)
					.with_optional_status(status)
					.with_oauth_error(response.error().as_ref().to_string());

				if let Some(description) = response.error_description() {
					ctx = ctx.with_error_description(description.clone());
				}

				classify(&ctx)
			},
			RequestTokenError::Request(error) =>
				self.error_mapper.map_transport_error(operation, meta.as_ref(), error),
			RequestTokenError::Parse(_, body) => classify(
				&FailureContext::new(operation).with_optional_status(status).with_error_body(&body),
			),
			RequestTokenError::Other(_) =>
				classify(&FailureContext::new(operation).with_optional_status(status)),
		}
	}
}

fn map_token_response(operation: Operation, response: ProviderTokenResponse) -> Result<TokenSet> {
	let expires_in = response.expires_in().map(|lifetime| lifetime.as_secs()).ok_or_else(|| {
		Error::provider(format!("Token endpoint response for {operation} is missing expires_in."))
	})?;
	let scope = response
		.scopes()
		.map(|scopes| scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" "))
		.unwrap_or_default();
	let extra = response.extra_fields();

	Ok(TokenSet {
		access_token: Secret::new(response.access_token().secret().to_owned()),
		refresh_token: response.refresh_token().map(|token| Secret::new(token.secret().to_owned())),
		expires_in,
		refresh_expires_in: extra.refresh_expires_in,
		token_type: canonical_token_type(&response.token_type().0),
		scope,
		id_token: extra.id_token.clone().map(Secret::new),
		session_state: extra.session_state.clone(),
		issued_at: OffsetDateTime::now_utc(),
	})
}

fn canonical_token_type(raw: &str) -> String {
	if raw.eq_ignore_ascii_case("bearer") { "Bearer".to_owned() } else { raw.to_owned() }
}

fn parse_json<T>(operation: Operation, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
		Error::provider(format!(
			"Provider returned malformed JSON for {operation} at `{}`: {}",
			err.path(),
			err.inner()
		))
	})
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::Timeout.into();
	}

	TransportError::from(err).into()
}

#[cfg(feature = "reqwest")]
fn map_generic_transport_error(
	operation: Operation,
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> Error {
	match meta.and_then(|value| value.status) {
		Some(status) => Error::network(format!(
			"HTTP client error after {operation} returned status {status}: {message}."
		)),
		None => Error::network(format!("HTTP client error during {operation}: {message}.")),
	}
}
