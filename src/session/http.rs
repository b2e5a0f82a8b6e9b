//! HTTP session provider
//!
//! Builds [`HttpContext`]s whose client shares a cookie jar with the
//! provider. Cookie replay loads the jar and opens the site root; login
//! submits the sign-in form, keeping its hidden inputs, and checks the
//! response for the signed-in marker.

use crate::browser::{build_http_client, BrowserError, BrowsingContext, HttpContext, RenderedPage};
use crate::config::SessionConfig;
use crate::session::cookies::{load_into_jar, read_cookie_file};
use crate::session::{Credentials, SessionProvider};
use crate::url::resolve_link;
use crate::{ConfigError, SessionError, SessionResult};
use reqwest::cookie::Jar;
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Session provider backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpSessionProvider {
    base_url: Url,
    login_url: Url,
    user_agent: String,
    wait_timeout: Duration,
    logged_in_marker: Selector,
    login_form: Selector,
    email_field: String,
    password_field: String,
}

/// A sign-in form ready to be submitted
struct LoginForm {
    action: Url,
    fields: Vec<(String, String)>,
    submits_password: bool,
}

/// Sign-in may ask for the email and the password on separate pages
const MAX_SIGN_IN_STEPS: usize = 2;

impl HttpSessionProvider {
    /// Creates a provider from the session configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Session configuration
    /// * `wait_timeout` - Bounded wait for every session request
    pub fn new(config: &SessionConfig, wait_timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", &config.base_url)?,
            login_url: parse_url("login_url", &config.login_url)?,
            user_agent: config.user_agent.clone(),
            wait_timeout,
            logged_in_marker: parse_selector("logged_in_marker", &config.logged_in_marker)?,
            login_form: parse_selector("login_form", &config.login_form)?,
            email_field: config.email_field.clone(),
            password_field: config.password_field.clone(),
        })
    }

    fn new_context(&self) -> SessionResult<(HttpContext, Arc<Jar>)> {
        let jar = Arc::new(Jar::default());
        let client = build_http_client(&self.user_agent, self.wait_timeout, jar.clone())?;
        Ok((HttpContext::new(client), jar))
    }

    fn is_signed_in(&self, html: &str) -> bool {
        Html::parse_document(html)
            .select(&self.logged_in_marker)
            .next()
            .is_some()
    }

    /// Locates the sign-in form and fills in the credentials it asks for
    ///
    /// Hidden inputs are carried over. The email and password are only sent
    /// when the form has an input of that name, so a form that asks for the
    /// email alone is submitted without the password.
    fn fill_login_form(&self, page: &RenderedPage, credentials: &Credentials) -> SessionResult<LoginForm> {
        let document = Html::parse_document(&page.html);
        let form = document.select(&self.login_form).next().ok_or_else(|| {
            SessionError::Authentication(format!("sign-in form not found on {}", page.url))
        })?;

        let action = form
            .value()
            .attr("action")
            .and_then(|href| resolve_link(href, &page.url))
            .unwrap_or_else(|| page.url.clone());

        let mut fields = Vec::new();
        let mut asks_email = false;
        let mut asks_password = false;

        if let Ok(inputs) = Selector::parse("input[name]") {
            for input in form.select(&inputs) {
                let name = input.value().attr("name").unwrap_or_default();
                if name == self.email_field {
                    asks_email = true;
                } else if name == self.password_field {
                    asks_password = true;
                } else if input.value().attr("type") == Some("hidden") {
                    let value = input.value().attr("value").unwrap_or_default();
                    fields.push((name.to_string(), value.to_string()));
                }
            }
        }

        if !asks_email && !asks_password {
            return Err(SessionError::Authentication(format!(
                "sign-in form on {} has no '{}' or '{}' input",
                page.url, self.email_field, self.password_field
            )));
        }

        if asks_email {
            fields.push((self.email_field.clone(), credentials.username.clone()));
        }
        if asks_password {
            fields.push((self.password_field.clone(), credentials.password.clone()));
        }

        Ok(LoginForm {
            action,
            fields,
            submits_password: asks_password,
        })
    }

    /// Posts a filled-in form and returns the page it leads to
    async fn submit(&self, context: &HttpContext, form: &LoginForm) -> SessionResult<RenderedPage> {
        tracing::debug!("Submitting sign-in form to {}", form.action);
        let response = context
            .client()
            .post(form.action.clone())
            .form(&form.fields)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SessionError::Browser(BrowserError::Timeout {
                        url: form.action.to_string(),
                    })
                } else {
                    SessionError::Http(e)
                }
            })?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(SessionError::Browser(BrowserError::Status {
                url: final_url.to_string(),
                status: status.as_u16(),
            }));
        }

        let html = response.text().await?;
        Ok(RenderedPage::new(final_url, html))
    }
}

impl SessionProvider for HttpSessionProvider {
    type Context = HttpContext;

    async fn load_session(&self, cookie_file: &Path) -> SessionResult<HttpContext> {
        let cookies = read_cookie_file(cookie_file)?;
        let (mut context, jar) = self.new_context()?;

        load_into_jar(&jar, &cookies, &self.base_url);
        context.navigate(&self.base_url).await?;

        Ok(context)
    }

    async fn login(&self, credentials: &Credentials) -> SessionResult<HttpContext> {
        let (mut context, _jar) = self.new_context()?;

        context.navigate(&self.login_url).await?;
        let mut page = context.snapshot().await?;

        for _ in 0..MAX_SIGN_IN_STEPS {
            let form = self.fill_login_form(&page, credentials)?;
            page = self.submit(&context, &form).await?;

            if self.is_signed_in(&page.html) {
                context.set_current(page);
                return Ok(context);
            }
            if form.submits_password {
                break;
            }
            tracing::debug!("Sign-in continues on {}", page.url);
        }

        Err(SessionError::Authentication(
            "sign-in did not reach a signed-in page; check credentials or 2FA requirements"
                .to_string(),
        ))
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))
}

fn parse_selector(field: &str, value: &str) -> Result<Selector, ConfigError> {
    Selector::parse(value)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, value, e)))
}
