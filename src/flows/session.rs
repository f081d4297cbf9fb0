//! Session termination and token introspection.

// self
use crate::{
	_prelude::*,
	auth::{Introspection, TokenValidation},
	flows::{Gateway, common},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{self, Operation},
};

impl<C, M> Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Ends the provider session bound to `refresh_token`.
	///
	/// Logout is best effort and never fails: provider, network, and configuration errors
	/// are logged and dropped so callers can always clear their local session.
	pub async fn logout(&self, refresh_token: &str) {
		let result = common::observe(Operation::Logout, "logout", async move {
			self.facade()?.end_session(refresh_token).await
		})
		.await;

		if let Err(err) = result {
			obs::record_swallowed_failure(Operation::Logout, &err);
		}
	}

	/// Asks the provider whether `token` is active and returns its answer unchanged.
	///
	/// An inactive token is a successful answer (`active: false`), not an error.
	pub async fn introspect(&self, token: &str) -> Result<Introspection> {
		common::observe(Operation::Introspect, "introspect", async move {
			self.facade()?.introspect(token).await
		})
		.await
	}

	/// Reduces introspection to a valid/invalid verdict.
	///
	/// Failures to reach or understand the provider are reported as an invalid token
	/// with the failure message instead of an error.
	pub async fn validate_token(&self, token: &str) -> TokenValidation {
		match self.introspect(token).await {
			Ok(introspection) => introspection.into(),
			Err(err) => TokenValidation::invalid(err.message()),
		}
	}
}
