//! Route table and navigation guard.
//!
//! `routes` holds the static route table with per-route metadata;
//! `guard` resolves each navigation attempt to an allow or a redirect,
//! consulting the session store and, once per attempt, the persisted
//! credential.

pub mod guard;
pub mod routes;

pub use guard::{resolve, NavigationOutcome};
pub use routes::{match_path, Layout, RouteId, RouteSpec};
