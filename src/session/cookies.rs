//! Stored session cookies
//!
//! Cookie files are JSON arrays as exported by browser tooling. Only the
//! fields a cookie jar understands are read; keys such as `sameSite` or
//! `expiry` are ignored.

use crate::{SessionError, SessionResult};
use reqwest::cookie::Jar;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// One exported browser cookie
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,
}

impl StoredCookie {
    /// Renders the cookie as a `Set-Cookie` header value
    pub fn to_set_cookie(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(domain) = &self.domain {
            header.push_str(&format!("; Domain={}", domain));
        }
        header.push_str(&format!("; Path={}", self.path.as_deref().unwrap_or("/")));
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header
    }
}

/// Reads a cookie file
///
/// # Returns
///
/// * `Ok(Vec<StoredCookie>)` - At least one cookie was read
/// * `Err(SessionError)` - The file is missing, malformed, or empty
pub fn read_cookie_file(path: &Path) -> SessionResult<Vec<StoredCookie>> {
    let content = std::fs::read_to_string(path).map_err(|source| SessionError::CookieFile {
        path: path.display().to_string(),
        source,
    })?;

    let cookies: Vec<StoredCookie> = serde_json::from_str(&content)?;
    if cookies.is_empty() {
        return Err(SessionError::Authentication(format!(
            "cookie file {} contains no cookies",
            path.display()
        )));
    }

    Ok(cookies)
}

/// Adds `cookies` to `jar` as if they had been set by `site`
pub fn load_into_jar(jar: &Jar, cookies: &[StoredCookie], site: &Url) {
    for cookie in cookies {
        jar.add_cookie_str(&cookie.to_set_cookie(), site);
    }
    tracing::debug!("Loaded {} cookies for {}", cookies.len(), site);
}
