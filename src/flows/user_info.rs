//! Userinfo lookup.

// self
use crate::{
	_prelude::*,
	auth::UserProfile,
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
	/// Fetches the profile of the user an access token was issued to.
	///
	/// A 401 from the userinfo endpoint becomes [`ErrorKind::TokenInvalid`].
	pub async fn user_info(&self, access_token: &str) -> Result<UserProfile> {
		common::observe(Operation::UserInfo, "user_info", async move {
			self.facade()?.fetch_user_info(access_token).await
		})
		.await
	}
}
