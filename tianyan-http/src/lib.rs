//! Minimal HTTP client with safe logging for the portal's two calls.
//!
//! - `GET` JSON (the quote endpoint) and `POST` multipart forms that answer
//!   with JSON (the search backend)
//! - Request options: headers, query params, timeout, absolute URLs
//! - Requests are sent exactly once; there is no retry loop
//! - Optional *raw* request/response logging via `TIANYAN_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), tianyan_http::HttpError> {
//! let client = tianyan_http::HttpClient::new("http://127.0.0.1:1314")?;
//! let got: serde_json::Value = client
//!     .post_form_json("search/", &[("q", "rust")], tianyan_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`).

use reqwest::header::HeaderMap;
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "TIANYAN_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: &RequestBody<'_>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    if let RequestBody::Form(fields) = body {
        for (k, v) in fields.iter() {
            let v = truncate_chars(v, RAW_MAX_BODY);
            parts.push(format!("-F '{}={}'", k, v.replace('\'', r"'\''")));
        }
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let mut val = v.to_str().unwrap_or("").to_string();
            if key.eq_ignore_ascii_case("authorization") || key.eq_ignore_ascii_case("cookie") {
                val = "<redacted>".into();
            }
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use tianyan_http::RequestOpts;
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("c", Cow::Borrowed("d"))]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.allow_absolute == false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

enum RequestBody<'a> {
    Empty,
    Form(&'a [(&'a str, &'a str)]),
}

impl RequestBody<'_> {
    fn kind(&self) -> &'static str {
        match self {
            RequestBody::Empty => "none",
            RequestBody::Form(_) => "multipart",
        }
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    /// Applied when a request does not set its own; `None` waits forever.
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// A base without a trailing slash is treated as a directory so that
    /// relative paths append to it instead of replacing its last segment.
    ///
    /// ```no_run
    /// use tianyan_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("http://127.0.0.1:1314")?;
    /// assert!(client.default_timeout.is_none());
    /// assert_eq!(client.base().as_str(), "http://127.0.0.1:1314/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let mut base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: None,
        })
    }

    /// Set a timeout applied to every request that does not carry its own.
    ///
    /// ```no_run
    /// use tianyan_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://v1.hitokoto.cn")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json_internal(Method::GET, path, RequestBody::Empty, opts)
            .await
    }

    /// POST a `multipart/form-data` body built from `fields` and decode a JSON reply.
    pub async fn post_form_json<T>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json_internal(Method::POST, path, RequestBody::Form(fields), opts)
            .await
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_json_internal<T>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody<'_>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = if opts.allow_absolute {
            match Url::parse(path) {
                Ok(abs) => abs,
                Err(_) => self.resolve(path)?,
            }
        } else {
            self.resolve(path)?
        };

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        if let RequestBody::Form(fields) = &body {
            let form = fields.iter().fold(Form::new(), |form, (k, v)| {
                form.text(k.to_string(), v.to_string())
            });
            rb = rb.multipart(form);
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        // ----- Safe request logging (pre-send) -----
        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let query: Vec<(String, String)> = opts
            .query
            .as_ref()
            .map(|q| {
                q.iter()
                    .map(|(k, v)| ((*k).to_string(), v.as_ref().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?query,
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            body_kind=body.kind(),
            "http.request.start"
        );

        if raw_enabled() {
            let merged = opts.headers.clone().unwrap_or_default();
            let curl = make_curl(&method, &url, &merged, &body);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(
                req_id=%req_id,
                timed_out=err.is_timeout(),
                message=%message,
                "http.network_error.send"
            );
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let server_req_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%server_req_id,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        // ----- Success path -----
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e.to_string(),
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        // ----- Final error -----
        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            x_request_id=%server_req_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: server_req_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // FastAPI: {"detail":"..."} or {"detail":[{"msg":"...", "loc":[...]}]}
    #[derive(Deserialize)]
    struct Detail {
        detail: DetailKind,
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DetailKind {
        Text(String),
        Items(Vec<DetailItem>),
    }
    #[derive(Deserialize)]
    struct DetailItem {
        #[serde(default)]
        msg: String,
    }

    // Generic: {"message":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(d) = serde_json::from_slice::<Detail>(body) {
        match d.detail {
            DetailKind::Text(s) if !s.is_empty() => return s,
            DetailKind::Items(items) => {
                let joined = items
                    .into_iter()
                    .map(|i| i.msg)
                    .filter(|m| !m.is_empty())
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return joined;
                }
            }
            _ => {}
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn truncate_chars(s: &str, max: usize) -> Cow<'_, str> {
    if s.len() <= max {
        return Cow::Borrowed(s);
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}...", &s[..end]))
}

fn snip_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    truncate_chars(&text, SNIPPET_MAX).into_owned()
}
