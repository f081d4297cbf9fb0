#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::{CLIENT_ID, CLIENT_SECRET};
use oidc_gateway::ErrorKind;

#[tokio::test]
async fn service_account_token_exchanges_client_credentials() {
	let server = MockServer::start_async().await;
	let gateway = common::gateway(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(common::oidc_path("token"))
				.form_urlencoded_tuple("grant_type", "client_credentials")
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"svc-1\",\"expires_in\":300,\"token_type\":\"Bearer\",\"scope\":\"profile email\"}",
			);
		})
		.await;
	let tokens = gateway.service_account_token().await.expect("Service account grant should succeed.");

	mock.assert_async().await;

	assert_eq!(tokens.access_token.expose(), "svc-1");
	assert!(tokens.refresh_token.is_none());
	assert_eq!(tokens.expires_in, 300);
	assert_eq!(tokens.scope, "profile email");
}

#[tokio::test]
async fn service_account_tokens_are_not_cached() {
	let server = MockServer::start_async().await;
	let gateway = common::gateway(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(common::oidc_path("token"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"svc-2\",\"expires_in\":300,\"token_type\":\"Bearer\"}",
			);
		})
		.await;

	for _ in 0..2 {
		gateway.service_account_token().await.expect("Service account grant should succeed.");
	}

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_client_is_provider_error() {
	let server = MockServer::start_async().await;
	let gateway = common::gateway(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(common::oidc_path("token"));
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"unauthorized_client\",\"error_description\":\"Invalid client secret\"}",
			);
		})
		.await;
	let err = gateway.service_account_token().await.expect_err("Rejected client must fail.");

	assert_eq!(err.kind(), ErrorKind::ProviderError);
	assert_eq!(err.status_code(), 500);
	assert_eq!(err.message(), "Invalid client secret");
}

#[tokio::test]
async fn token_response_without_expiry_is_provider_error() {
	let server = MockServer::start_async().await;
	let gateway = common::gateway(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(common::oidc_path("token"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"svc-3\",\"token_type\":\"Bearer\"}");
		})
		.await;
	let err = gateway.service_account_token().await.expect_err("Missing expiry must fail.");

	assert_eq!(err.kind(), ErrorKind::ProviderError);
}
