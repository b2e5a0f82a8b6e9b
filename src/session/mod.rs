//! Session establishment
//!
//! A harvest needs an authenticated browsing context. It is obtained by
//! replaying stored session cookies, falling back to a form login when the
//! cookies cannot be used. If both fail the run is over: the error is
//! returned to the caller and nothing is crawled.

mod cookies;
mod http;

pub use cookies::{load_into_jar, read_cookie_file, StoredCookie};
pub use http::HttpSessionProvider;

use crate::browser::BrowsingContext;
use crate::config::SessionConfig;
use crate::{SessionError, SessionResult};
use std::fmt;
use std::path::Path;

/// Account credentials for form login
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Reads the username from the config and the password from its environment variable
    pub fn from_config(config: &SessionConfig) -> SessionResult<Self> {
        let username = config
            .username
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| SessionError::MissingCredentials("no username configured".to_string()))?;

        let password = std::env::var(&config.password_env).map_err(|_| {
            SessionError::MissingCredentials(format!(
                "environment variable {} is not set",
                config.password_env
            ))
        })?;

        Ok(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies authenticated browsing contexts
#[allow(async_fn_in_trait)]
pub trait SessionProvider {
    type Context: BrowsingContext;

    /// Builds a context from a file of stored session cookies
    async fn load_session(&self, cookie_file: &Path) -> SessionResult<Self::Context>;

    /// Builds a context by signing in with `credentials`
    async fn login(&self, credentials: &Credentials) -> SessionResult<Self::Context>;
}

/// Obtains an authenticated context: stored cookies first, then login
///
/// # Returns
///
/// * `Ok(Context)` - Cookie replay or login succeeded
/// * `Err(SessionError)` - Neither worked; the run must stop
pub async fn establish_session<P: SessionProvider>(
    provider: &P,
    config: &SessionConfig,
) -> SessionResult<P::Context> {
    if let Some(cookie_file) = config.cookies_file.as_deref() {
        match provider.load_session(Path::new(cookie_file)).await {
            Ok(context) => {
                tracing::info!("Cookies loaded from {}. Login skipped.", cookie_file);
                return Ok(context);
            }
            Err(e) => {
                tracing::warn!("Failed to load cookies: {}. Proceeding with login.", e);
            }
        }
    }

    let credentials = Credentials::from_config(config)?;

    match provider.login(&credentials).await {
        Ok(context) => {
            tracing::info!("Login successful.");
            Ok(context)
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            Err(e)
        }
    }
}
