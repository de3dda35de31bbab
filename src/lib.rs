//! Poly1305 one-time authenticator.
//!
//! The engine lives in [`crypto::poly1305`]; [`compute`] and [`verify`] are
//! the one-shot entry points built on it.

pub mod crypto;
pub mod utils;

pub use crypto::poly1305::{compute, verify, Poly1305, Poly1305Error};
pub use poly1305_macros::*;
