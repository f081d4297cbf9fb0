//! Refresh token grant.

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
	/// Exchanges a refresh token for a new token set.
	///
	/// The provider answers an expired, revoked, or unknown refresh token with 400,
	/// which surfaces as [`ErrorKind::TokenExpired`] carrying status 401. Whether the
	/// returned set holds a new refresh token depends on the realm's rotation policy.
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
		common::observe(Operation::Refresh, "refresh", async move {
			self.facade()?.exchange_refresh_token(refresh_token).await
		})
		.await
	}
}
