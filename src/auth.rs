//! Auth-domain data: credentials, token sets, user profiles, and introspection payloads.

pub mod introspection;
pub mod profile;
pub mod secret;
pub mod token;

pub use introspection::*;
pub use profile::*;
pub use secret::*;
pub use token::*;
