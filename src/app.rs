//! Application context wiring.
//!
//! `App` owns the config, the persisted session, the API client, the disk
//! cache and the in-memory session store, and routes every view change
//! through the navigation guard. It is the explicit context handed to
//! command handlers; nothing here is process-global.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::actions;
use crate::api::ApiClient;
use crate::auth::{token, CredentialStore, Session, SessionData};
use crate::cache::CacheManager;
use crate::config::Config;
use crate::router::{self, NavigationOutcome, RouteId};
use crate::store::SessionStore;

pub struct App {
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    pub cache: CacheManager,
    pub store: SessionStore,
    pub current_route: RouteId,
}

impl App {
    /// Create the application context, loading config and any persisted
    /// credential from disk.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config
            .cache_dir()
            .context("Could not determine cache directory")?;

        let mut session = Session::new(cache_dir.clone());
        match session.load() {
            Ok(found) => debug!(found, "Session bootstrap"),
            Err(e) => warn!(error = %e, "Failed to load persisted credential"),
        }

        let mut api = ApiClient::new(config.backend_host())?;
        let mut store = SessionStore::new();

        // Derive login state from the persisted credential, if any
        if let Some(credential) = session.credential() {
            let credential = credential.to_string();
            api.set_token(credential.clone());
            actions::update_logged_in(&mut store, &credential);
        }

        let cache = CacheManager::new(cache_dir)?;

        Ok(Self {
            config,
            session,
            api,
            cache,
            store,
            current_route: RouteId::Home,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to a route through the guard. On allow, the current route
    /// (and, for report views, the active hash) is committed.
    pub fn navigate(&mut self, to: RouteId, param: Option<&str>) -> NavigationOutcome {
        let outcome = router::resolve(&mut self.store, &mut self.session, to, param);
        if outcome == NavigationOutcome::Allow {
            self.current_route = to;
            if let Some(param) = param {
                if matches!(
                    to,
                    RouteId::Antivirus | RouteId::Summary | RouteId::Comments | RouteId::Strings
                ) {
                    self.store.set_current_hash(param);
                }
            }
        }
        outcome
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticate, persist the issued credential, and update login state
    pub async fn login(&mut self, username: &str, password: &str, remember: bool) -> Result<()> {
        let credential = self.api.login(username, password).await?;

        let subject = token::subject_name(&credential).or_else(|| Some(username.to_string()));
        self.session
            .update(SessionData::new(credential.clone(), subject));
        self.session
            .save()
            .context("Failed to persist credential")?;

        self.api.set_token(credential.clone());
        actions::update_logged_in(&mut self.store, &credential);

        self.config.last_username = Some(username.to_string());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        if remember {
            if let Err(e) = CredentialStore::store(username, password) {
                warn!(error = %e, "Failed to store password in keychain");
            }
        }

        info!(username, "Logged in");
        Ok(())
    }

    /// Log out: clear the persisted credential and all in-memory state
    pub fn log_out(&mut self) {
        actions::log_out(&mut self.store, &mut self.session);
        self.api.clear_token();
        info!("Logged out");
    }

    // =========================================================================
    // Data fetching (cache-first)
    // =========================================================================

    /// Show a file report: load any cached copy first, then refresh from
    /// the API and re-cache on success.
    pub async fn fetch_report(&mut self, sha256: &str, fields: Option<&[&str]>) {
        match self.cache.load_report(sha256) {
            Ok(Some(cached)) => {
                info!(sha256, age = %cached.age_display(), "Loaded cached report");
                self.store.set_file_data(cached.data);
                self.store.set_current_hash(sha256);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read report cache"),
        }

        actions::update_file(&mut self.store, &self.api, sha256, fields).await;

        // The hash survives only when the refresh succeeded
        if self.store.current_hash() == Some(sha256) {
            if let Some(record) = self.store.file_data() {
                if let Err(e) = self.cache.save_report(sha256, record) {
                    warn!(error = %e, "Failed to cache report");
                }
            }
        }
    }

    /// Show a user profile: cached copy first, then refresh and re-cache.
    pub async fn fetch_profile(&mut self, username: &str) {
        match self.cache.load_profile(username) {
            Ok(Some(cached)) => {
                info!(username, age = %cached.age_display(), "Loaded cached profile");
                self.store.set_user_data(cached.data);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read profile cache"),
        }

        actions::update_user_data(&mut self.store, &self.api, username).await;

        let fetched = self
            .store
            .user_data()
            .map(|u| u.username.as_deref() == Some(username))
            .unwrap_or(false);
        if fetched {
            if let Some(profile) = self.store.user_data() {
                if let Err(e) = self.cache.save_profile(username, profile) {
                    warn!(error = %e, "Failed to cache profile");
                }
            }
        }
    }
}
