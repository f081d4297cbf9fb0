// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::Arc,
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
// self
use oidc_gateway::{
	Credentials, Error, ErrorKind, Gateway, ProviderConfig, StaticConfig,
	error::{ConfigError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	oauth::{
		TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	obs::Operation,
};

#[derive(Debug)]
enum FakeTransportError {
	Reset,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Reset => write!(f, "Connection reset by fake transport."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Default)]
struct FakeHttpClient {
	requests: Arc<Mutex<Vec<(String, Duration)>>>,
}
impl FakeHttpClient {
	fn recorded_requests(&self) -> Vec<(String, Duration)> {
		self.requests.lock().clone()
	}
}
impl TokenHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self, slot: ResponseMetadataSlot, timeout: Duration) -> Self::Handle {
		FakeHttpHandle { slot, timeout, requests: self.requests.clone() }
	}
}

struct FakeHttpHandle {
	slot: ResponseMetadataSlot,
	timeout: Duration,
	requests: Arc<Mutex<Vec<(String, Duration)>>>,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let slot = self.slot.clone();

		self.requests.lock().push((request.uri().path().to_owned(), self.timeout));

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);
			slot.store(ResponseMetadata { status: Some(502) });

			Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Reset)))
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	seen: Arc<Mutex<Vec<(Operation, Option<u16>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(Operation, Option<u16>)> {
		self.seen.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: Operation,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.seen.lock().push((operation, meta.and_then(|value| value.status)));

		match err {
			HttpClientError::Reqwest(inner) => Error::network(format!("Fake transport error: {inner}")),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			other => Error::network(format!("Unhandled HTTP client error: {other:?}")),
		}
	}
}

fn build_gateway(
	http_client: FakeHttpClient,
	mapper: RecordingTransportErrorMapper,
) -> Gateway<FakeHttpClient, RecordingTransportErrorMapper> {
	let config = ProviderConfig::builder("https://sso.example.com", "ecommerce")
		.client_id("fake-client")
		.client_secret("fake-secret")
		.request_timeout(Duration::from_secs(4))
		.build()
		.expect("Fake provider configuration should build.");

	Gateway::with_http_client(Arc::new(StaticConfig::new(config)), http_client, mapper)
}

#[tokio::test]
async fn fake_transport_failures_surface_as_network_errors() {
	let http_client = FakeHttpClient::default();
	let gateway = build_gateway(http_client.clone(), RecordingTransportErrorMapper::default());
	let err = gateway
		.password_grant(&Credentials::new("alice", "correct"))
		.await
		.expect_err("Transport failure must fail the grant.");

	assert_eq!(err.kind(), ErrorKind::NetworkError);
	assert_eq!(err.status_code(), 503);
	assert_eq!(err.message(), "Fake transport error: Connection reset by fake transport.");
	assert_eq!(
		http_client.recorded_requests(),
		[(
			"/realms/ecommerce/protocol/openid-connect/token".to_owned(),
			Duration::from_secs(4)
		)]
	);
}

#[tokio::test]
async fn fake_mapper_sees_operation_and_status() {
	let mapper = RecordingTransportErrorMapper::default();
	let gateway = build_gateway(FakeHttpClient::default(), mapper.clone());

	let _ = gateway.refresh("R1").await.expect_err("Transport failure must fail the refresh.");
	let _ = gateway.user_info("T1").await.expect_err("Transport failure must fail userinfo.");
	let _ = gateway.introspect("T1").await.expect_err("Transport failure must fail introspection.");

	gateway.logout("R1").await;

	assert_eq!(
		mapper.recorded(),
		[
			(Operation::Refresh, Some(502)),
			(Operation::UserInfo, Some(502)),
			(Operation::Introspect, Some(502)),
			(Operation::Logout, Some(502)),
		]
	);
}
