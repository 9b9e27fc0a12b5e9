//! REST API client module for the file-scanning service.
//!
//! This module provides the `ApiClient` for communicating with the
//! files/users/auth endpoints, and the `ApiError` taxonomy the dispatcher
//! converts into user-facing alerts.
//!
//! The API uses JWT bearer credential authentication obtained through
//! the `/auth/login` endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
