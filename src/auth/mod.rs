//! Authentication module for credential inspection and session persistence.
//!
//! This module provides:
//! - `token`: decoding of the claims payload (`name`, `exp`) carried by the
//!   credential the API issues, with a conservative expiry check
//! - `Session`: the persisted credential entry, loaded at bootstrap and at
//!   most once per guarded navigation
//! - `CredentialStore`: OS-level password storage via keyring

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData};
