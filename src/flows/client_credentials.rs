//! Client credentials grant for the gateway's own service account.

// self
use crate::{
	_prelude::*,
	auth::TokenSet,
	flows::{Gateway, common},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::Operation,
};

impl<C, M> Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Obtains a token for the configured client itself.
	///
	/// Tokens are not cached; every call performs a fresh exchange.
	pub async fn service_account_token(&self) -> Result<TokenSet> {
		common::observe(Operation::ServiceAccount, "client_credentials", async move {
			self.facade()?.exchange_client_credentials().await
		})
		.await
	}
}
