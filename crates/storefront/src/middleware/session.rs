//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions over a moka cache. Each
//! entry is evicted once its session expires, and the cache is bounded by
//! `STOREFRONT_SESSION_CAPACITY`. Carts live only as long as the session and
//! the server process.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "toolshop_session";

/// Session expiry time in seconds (2 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Create the in-memory session store holding at most `capacity` sessions.
#[must_use]
pub fn session_store(capacity: u64) -> MokaStore {
    MokaStore::new(Some(capacity))
}

/// Create the session layer with a bounded in-memory store.
///
/// # Arguments
///
/// * `config` - Storefront configuration (store capacity and the cookie
///   `Secure` flag)
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    let store = session_store(config.session_capacity);

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
