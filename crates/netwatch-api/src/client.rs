// Backend HTTP client
//
// Wraps `reqwest::Client` with `/api/...` URL construction and uniform
// status handling. Endpoint groups (alerts, network, system) are inherent
// methods in sibling modules so this file stays about transport mechanics.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the netwatch backend.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally, so
/// concurrent fetches can each hold their own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://127.0.0.1:5000`); a
    /// path prefix such as `https://host/ids` is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
        }
    }

    /// Parse `base` and wrap a pre-built `reqwest::Client`.
    pub fn from_reqwest(base: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Url::parse(base)?))
    }

    /// The backend base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}api/{path}` with the given query pairs appended in order.
    pub(crate) fn api_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = self.base_url.join("api/")?.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        decode(resp).await
    }

    /// Send a PUT request, optionally with a JSON body. The response body
    /// is ignored: only success or failure matters to callers.
    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), Error> {
        debug!("PUT {}", url);
        let mut req = self.http.request(Method::PUT, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await?;
        Ok(())
    }

    /// Send with a JSON content type and reject non-2xx statuses.
    ///
    /// The content type is only filled in when neither the body nor the
    /// caller set one, so a request never carries it twice.
    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let mut req = req.build().map_err(Error::Transport)?;
        req.headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));

        let resp = self.http.execute(req).await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }
        Ok(resp)
    }
}

/// Decode a JSON body, keeping the raw text around for diagnostics.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// `Url::join` drops the last path segment unless it ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
