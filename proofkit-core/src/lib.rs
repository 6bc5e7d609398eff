//! Client library for the `ProofKit` identity service.
//!
//! The service stores, on the user's behalf, an append-only chain of signed
//! statements (key additions, authentication assertions, external-service
//! bindings). This crate implements the protocol side of that relationship:
//! salted challenge/response login, local password stretching, chain
//! sequencing, canonical statement construction and the two-phase
//! sign-then-post submission flow. Signature generation itself is delegated
//! to an injected [`Signer`].
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
use strum::EnumString;

/// Deployment of the identity service a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// The staging deployment. Chains created here are disposable.
    Staging,
    /// The production deployment.
    Production,
}

mod client;
pub use client::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

/// Password stretching and login authenticator derivation.
pub mod kdf;

mod proof;
pub use proof::*;

mod request;
pub use request::RemoteStatus;

mod salt;
pub use salt::*;

mod session;
pub use session::*;

mod sigchain;
pub use sigchain::*;

mod signer;
pub use signer::*;

mod statement;
pub use statement::*;

mod user;
pub use user::*;

mod workflow;
pub use workflow::*;

// private modules
mod keys;

#[cfg(test)]
pub(crate) mod testutil;
