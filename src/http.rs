//! HTTP transport seam for provider calls.
//!
//! Every request the gateway sends goes through a [`TokenHttpClient`] handle, whether
//! it is a grant exchange driven by `oauth2` or a plain userinfo/logout/introspection
//! call. Each handle shares a [`ResponseMetadataSlot`] with the caller; the handle
//! records the HTTP status there as soon as one is known, so failures can be
//! classified by status even when the response body is not a valid OAuth error.

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::{ClientBuilder, redirect::Policy};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Pluggable HTTP transport.
///
/// One transport serves every concurrent operation, hence `Send + Sync + 'static`.
/// Handles own their state so request futures can be `Send` without borrowing the
/// transport.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Per-request [`AsyncHttpClient`] bound to one [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle that reports into `slot` and abandons requests after `timeout`.
	///
	/// The handle must clear `slot` before sending and store the status once a response
	/// (successful or not) arrives.
	fn handle(&self, slot: ResponseMetadataSlot, timeout: StdDuration) -> Self::Handle;
}

/// Facts about the last HTTP response a handle received.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code, when a response arrived at all.
	pub status: Option<u16>,
}

/// Shared cell carrying [`ResponseMetadata`] from a handle back to the gateway.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Replaces the stored metadata.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Removes and returns the stored metadata.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Default transport backed by [`ReqwestClient`].
///
/// Provider endpoints answer directly, so clients built here never follow redirects.
/// Start from [`ReqwestHttpClient::builder`] to tune proxies or TLS roots without
/// losing that policy, then wrap the result with [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client that never follows redirects.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(Self::builder().build()?))
	}

	/// Client builder preset with redirect following disabled.
	pub fn builder() -> ClientBuilder {
		ReqwestClient::builder().redirect(Policy::none())
	}

	/// Uses a preconfigured reqwest client as is.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self, slot: ResponseMetadataSlot, timeout: StdDuration) -> Self::Handle {
		ReqwestHandle { client: self.0.clone(), slot, timeout }
	}
}

/// Handle produced by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
	timeout: StdDuration,
}
#[cfg(feature = "reqwest")]
impl ReqwestHandle {
	async fn execute(
		self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<ReqwestError>> {
		self.slot.take();

		let mut outbound = reqwest::Request::try_from(request).map_err(Box::new)?;

		*outbound.timeout_mut() = Some(self.timeout);

		let inbound = self.client.execute(outbound).await.map_err(Box::new)?;
		let status = inbound.status();

		self.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

		let headers = inbound.headers().clone();
		let body = inbound.bytes().await.map_err(Box::new)?;
		let mut response = HttpResponse::new(body.to_vec());

		*response.status_mut() = status;
		*response.headers_mut() = headers;

		Ok(response)
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(self.clone().execute(request))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn slot_take_clears_metadata() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(401) });

		assert_eq!(slot.take(), Some(ResponseMetadata { status: Some(401) }));
		assert!(slot.take().is_none());
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn connection_failures_leave_the_slot_empty() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(200) });

		let handle = ReqwestHttpClient::new()
			.expect("Reqwest client should build.")
			.handle(slot.clone(), StdDuration::from_secs(2));
		let request = oauth2::http::Request::builder()
			.uri("http://127.0.0.1:1/unreachable")
			.body(Vec::new())
			.expect("Request should build.");
		let err = handle.call(request).await.expect_err("Closed port must fail.");

		assert!(matches!(err, HttpClientError::Reqwest(_)));
		assert!(slot.take().is_none(), "Stale metadata must be cleared before sending.");
	}
}
