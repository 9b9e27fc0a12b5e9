//! Pre-navigation guard.
//!
//! Every navigation attempt resolves to exactly one of two outcomes:
//! allowed, or redirected. The guard never fails; a credential that cannot
//! be read simply means "not logged in".

use tracing::debug;

use crate::actions;
use crate::auth::Session;
use crate::router::routes::RouteId;
use crate::store::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Allow,
    Redirect {
        to: RouteId,
        /// Originally intended path, carried so login can return there
        next_url: Option<String>,
    },
}

/// Resolve a navigation attempt against the session state.
///
/// When the in-memory flag is unset, the persisted credential is reloaded
/// at most once, synchronously, and run through the expiry-aware login
/// check before the decision is made.
pub fn resolve(
    store: &mut SessionStore,
    session: &mut Session,
    to: RouteId,
    param: Option<&str>,
) -> NavigationOutcome {
    let spec = to.spec();
    let logged_in = store.logged_in() || reload_credential(store, session);

    if spec.requires_auth && !logged_in {
        let next_url = to.full_path(param);
        debug!(route = spec.name, next_url = %next_url, "Redirecting to login");
        return NavigationOutcome::Redirect {
            to: RouteId::Login,
            next_url: Some(next_url),
        };
    }

    if spec.guest_only && logged_in {
        debug!(route = spec.name, "Guest-only route, redirecting home");
        return NavigationOutcome::Redirect {
            to: RouteId::Home,
            next_url: None,
        };
    }

    NavigationOutcome::Allow
}

/// One-shot reload of the persisted credential.
///
/// Returns the resulting logged-in state. Not retried: a missing, expired
/// or unreadable entry means the navigation proceeds as a guest.
fn reload_credential(store: &mut SessionStore, session: &mut Session) -> bool {
    match session.load() {
        Ok(true) => {
            if let Some(credential) = session.credential() {
                let credential = credential.to_string();
                actions::update_logged_in(store, &credential);
            }
            store.logged_in()
        }
        Ok(false) => false,
        Err(e) => {
            debug!(error = %e, "Credential reload failed, treating as guest");
            false
        }
    }
}
