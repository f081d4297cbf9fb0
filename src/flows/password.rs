//! Resource owner password grant.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSet},
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
	/// Exchanges a username and password for a token set.
	///
	/// A 401 from the token endpoint becomes [`ErrorKind::InvalidCredentials`]; every
	/// other provider failure becomes [`ErrorKind::ProviderError`].
	pub async fn password_grant(&self, credentials: &Credentials) -> Result<TokenSet> {
		common::observe(Operation::Login, "password_grant", async move {
			self.facade()?.exchange_password(credentials).await
		})
		.await
	}
}
