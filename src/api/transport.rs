use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, Url};

use crate::errors::{ClientError, Result};

/// A fully resolved outgoing request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back over the wire, before any status interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// The HTTP seam. Production code uses [`HttpTransport`]; tests plug in scripted fakes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request. Only transport-level failures are errors; any status is a response.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;

    /// Read a cookie previously stored for the portal site.
    fn cookie(&self, name: &str) -> Option<String>;
}

/// `reqwest`-backed transport with a persistent cookie jar.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    site: Url,
}

impl HttpTransport {
    pub fn new(site_url: &str, timeout: Duration) -> Result<Self> {
        let site = Url::parse(site_url)
            .map_err(|e| ClientError::Network(format!("invalid site url '{site_url}': {e}")))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, jar, site })
    }

    /// Seed the cookie jar, e.g. with a `csrftoken=...` obtained out of band.
    pub fn add_cookie(&self, cookie: &str) {
        self.jar.add_cookie_str(cookie, &self.site);
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.site)?;
        let header = header.to_str().ok()?;
        super::csrf::cookie_value(header, name)
    }
}
