//! OpenID Connect token-exchange gateway for a realm-scoped provider.
//!
//! [`Gateway`] performs password, refresh, and client-credentials grants, looks up user
//! profiles, introspects tokens, and ends sessions. Every upstream failure is folded into
//! one closed [`ErrorKind`] taxonomy with a fixed HTTP status per kind.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, ErrorKind, Result};
}

pub use auth::{Credentials, Introspection, LoginResult, TokenSet, TokenValidation, UserProfile};
pub use config::{ConfigLoader, EnvConfigLoader, ProviderConfig, StaticConfig};
pub use error::{ApiResponse, Error, ErrorKind, Result};
#[cfg(feature = "reqwest")] pub use flows::ReqwestGateway;
pub use flows::Gateway;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
