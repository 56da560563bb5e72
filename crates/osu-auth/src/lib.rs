//! OAuth2 credential handling for the osu! API v2
//!
//! Provides the two credential holders used by the API client:
//! - `GuestCredential`: app-only `client_credentials` tokens (scope `public`)
//! - `UserCredential`: delegated tokens with a refresh token, renewed through
//!   the authorization-code flow when nothing usable is stored
//!
//! Both decode the unverified JWT claims of their access token to learn the
//! expiry and granted scopes, serialize refreshes behind a lock so at most one
//! token request is in flight per holder, and optionally persist tokens to a
//! plain-text token file after every change.

pub mod authorize;
pub mod claims;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod scope;
pub mod settings;
pub mod token;
pub mod token_file;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::TokenClaims;
pub use constants::*;
pub use credentials::{
    BoxFuture, CredentialHolder, CredentialKind, GuestCredential, UserCredential,
};
pub use error::{Error, Result};
pub use scope::Scope;
pub use settings::OAuthSettings;
pub use token::TokenResponse;
