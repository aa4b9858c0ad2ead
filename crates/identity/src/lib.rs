//! # OpsDesk Identity
//!
//! Email/password sign-in and session state. User profiles are ordinary
//! documents in the `users` collection, keyed by the session's `uid`.

mod local_provider;
mod types;

pub use local_provider::LocalIdentityProvider;
pub use types::*;
