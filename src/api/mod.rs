//! JSON-over-HTTP access to the portal backend.

pub mod csrf;
pub mod envelope;
pub mod transport;

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;

use crate::errors::{ClientError, Result};
use transport::{ApiRequest, Transport};

pub use envelope::records_from;
pub use transport::{HttpTransport, RawResponse};

// Paths relative to the API root.
pub const AUTH_ME: &str = "/auth/me/";
pub const AUTH_LOGOUT: &str = "/auth/logout/";
pub const ADMIN_STATS: &str = "/analytics/dashboard-stats/";
pub const ADMIN_ACTIVITY: &str = "/analytics/user-activity-logs/";
pub const STUDENT_STATS: &str = "/student/dashboard-stats/";
pub const TUTORIALS: &str = "/tutorials/";
pub const TUTORIAL_REGISTRATIONS: &str = "/tutorials/registrations/";
pub const POSTS: &str = "/posts/";
pub const EXECUTIVE_STATS: &str = "/executive/dashboard/";
pub const EXECUTIVE_POSTS: &str = "/executive/posts/";
pub const EXECUTIVE_RESOURCES: &str = "/executive/resources/";
pub const EXECUTIVE_TUTORIALS: &str = "/executive/tutorials/";

// Paths relative to the site root.
pub const LOGIN_SUBMIT: &str = "/login/submit/";
pub const REGISTER_SUBMIT: &str = "/register/submit/";

/// Per-call overrides. The default is a bodiless GET.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl CallOptions {
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Default::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Thin client over a [`Transport`], rooted at the portal site and its API prefix.
///
/// Cloning is cheap; all clones share one transport (and so one cookie jar).
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    site_url: String,
    api_prefix: String,
    csrf_cookie: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        site_url: &str,
        api_prefix: &str,
        csrf_cookie: &str,
    ) -> Self {
        Self {
            transport,
            site_url: site_url.trim_end_matches('/').to_string(),
            api_prefix: api_prefix.to_string(),
            csrf_cookie: csrf_cookie.to_string(),
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &crate::config::Config) -> Self {
        Self::new(transport, &config.site_url, &config.api_prefix, &config.csrf_cookie)
    }

    /// Call an endpoint under the API root.
    pub async fn call(&self, endpoint: &str, options: CallOptions) -> Result<Value> {
        let url = format!("{}{}{}", self.site_url, self.api_prefix, endpoint);
        self.execute(url, options).await
    }

    /// Call a path under the site root (form submission endpoints live outside the API).
    pub async fn call_site(&self, path: &str, options: CallOptions) -> Result<Value> {
        let url = format!("{}{}", self.site_url, path);
        self.execute(url, options).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.call(endpoint, CallOptions::default()).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value> {
        self.call(endpoint, CallOptions::post(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.call(endpoint, CallOptions::delete()).await
    }

    async fn execute(&self, url: String, options: CallOptions) -> Result<Value> {
        let request = self.build_request(url, options)?;
        let method = request.method.clone();
        let url = request.url.clone();

        let response = match self.transport.send(request).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("API call error: {method} {url}: {e}");
                return Err(e);
            }
        };

        if !(200..300).contains(&response.status) {
            log::error!(
                "API call failed: {method} {url}: {} {}",
                response.status,
                response.status_text
            );
            return Err(ClientError::Request {
                status: response.status,
                status_text: response.status_text,
                body: serde_json::from_str(&response.body).ok(),
            });
        }

        log::debug!("{method} {url} -> {}", response.status);
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    fn build_request(&self, url: String, options: CallOptions) -> Result<ApiRequest> {
        let CallOptions { method, body, mut headers } = options;

        let has_content_type = headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            headers.insert(0, ("Content-Type".to_string(), "application/json".to_string()));
        }

        if !csrf::is_safe_method(&method) {
            match self.transport.cookie(&self.csrf_cookie) {
                Some(token) => headers.push((csrf::CSRF_HEADER.to_string(), token)),
                None => log::warn!("No '{}' cookie found for {method} {url}", self.csrf_cookie),
            }
        }

        let body = body.map(|b| serde_json::to_string(&b)).transpose()?;
        Ok(ApiRequest { method, url, headers, body })
    }
}
