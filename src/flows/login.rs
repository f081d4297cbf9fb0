//! Login orchestration: password grant followed by a profile lookup.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, LoginResult},
	flows::{Gateway, common},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
	obs::{Operation, OperationSpan},
};

impl<C, M> Gateway<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Authenticates a user and returns their tokens plus a profile summary.
	///
	/// Both requests run against the same configuration snapshot. The userinfo call
	/// uses the access token the grant just returned. A failure in either step is
	/// returned as is and no partial result is produced.
	pub async fn login(&self, credentials: &Credentials) -> Result<LoginResult> {
		let span = OperationSpan::new(Operation::Login, "login");

		span.instrument(async move {
			let facade = self.facade()?;
			let tokens = common::observe(
				Operation::Login,
				"password_grant",
				facade.exchange_password(credentials),
			)
			.await?;
			let profile = common::observe(
				Operation::UserInfo,
				"user_info",
				facade.fetch_user_info(tokens.access_token.expose()),
			)
			.await?;

			Ok(LoginResult::new(tokens, profile))
		})
		.await
	}
}
