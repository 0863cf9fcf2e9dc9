//! One search round trip: POST the query, extract, store, navigate.

use crate::error::PortalError;
use crate::extract::LenientExtractor;
use crate::session::{SessionState, SessionStorage};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tianyan_http::{HttpClient, RequestOpts};
use url::Url;

/// Envelope status for a successful search.
pub const STATUS_OK: i64 = 1;

/// `{status, response}` as returned by `POST /search/`.
///
/// On success `response` holds the pseudo-JSON result list; otherwise it
/// carries a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchEnvelope {
    pub status: i64,
    #[serde(default)]
    pub response: String,
}

impl SearchEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchEnvelope, PortalError>;
}

/// Backend reached over HTTP with a multipart form carrying `q`.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    http: HttpClient,
    search_path: String,
}

impl HttpSearchBackend {
    pub fn new(http: HttpClient, search_path: impl Into<String>) -> Self {
        Self {
            http,
            search_path: search_path.into(),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, query: &str) -> Result<SearchEnvelope, PortalError> {
        let envelope = self
            .http
            .post_form_json(&self.search_path, &[("q", query)], RequestOpts::default())
            .await?;
        Ok(envelope)
    }
}

/// Where the caller should go after a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: Url,
}

#[derive(Debug, Clone)]
pub struct Submitted {
    pub state: SessionState,
    pub navigation: Navigation,
}

pub struct SearchSubmitter {
    backend: Arc<dyn SearchBackend>,
    extractor: LenientExtractor,
    storage: Arc<dyn SessionStorage>,
    results_url: Url,
}

impl SearchSubmitter {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        extractor: LenientExtractor,
        storage: Arc<dyn SessionStorage>,
        results_url: Url,
    ) -> Self {
        Self {
            backend,
            extractor,
            storage,
            results_url,
        }
    }

    /// Build the results URL from a backend base and a relative path.
    pub fn results_url(base_url: &str, results_path: &str) -> Result<Url, PortalError> {
        let mut base = Url::parse(base_url).map_err(|e| PortalError::Url(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(results_path)
            .map_err(|e| PortalError::Url(e.to_string()))
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Send `query` as-is. Storage is only written once the backend said ok.
    pub async fn submit(&self, query: &str) -> Result<Submitted, PortalError> {
        let started = Instant::now();
        tracing::info!(target: "portal.search", query_chars = query.chars().count(), "portal.search.start");

        let envelope = match self.backend.search(query).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(
                    target: "portal.search",
                    error = %e,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "portal.search.failed"
                );
                return Err(e);
            }
        };

        if !envelope.is_ok() {
            tracing::warn!(
                target: "portal.search",
                status = envelope.status,
                message = %envelope.response,
                "portal.search.rejected"
            );
            return Err(PortalError::Rejected {
                status: envelope.status,
                message: envelope.response,
            });
        }

        let results = self.extractor.extract(&envelope.response);
        let state = SessionState::new(query, results);
        state.save(self.storage.as_ref())?;

        tracing::info!(
            target: "portal.search",
            records = state.results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "portal.search.success"
        );
        Ok(Submitted {
            state,
            navigation: Navigation {
                target: self.results_url.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStorage;
    use std::sync::Mutex;

    struct Canned {
        reply: Mutex<Option<Result<SearchEnvelope, PortalError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(reply: Result<SearchEnvelope, PortalError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for Canned {
        async fn search(&self, query: &str) -> Result<SearchEnvelope, PortalError> {
            self.seen.lock().unwrap().push(query.to_string());
            self.reply.lock().unwrap().take().unwrap()
        }
    }

    fn submitter(backend: Arc<Canned>, storage: MemorySessionStorage) -> SearchSubmitter {
        SearchSubmitter::new(
            backend,
            LenientExtractor::default(),
            Arc::new(storage),
            SearchSubmitter::results_url("http://127.0.0.1:1314", "show/").unwrap(),
        )
    }

    #[tokio::test]
    async fn success_stores_state_and_navigates() {
        let backend = Canned::new(Ok(SearchEnvelope {
            status: 1,
            response: "[{'title': 'A', 'href': 'http://a', 'keywords': 'k'}]".into(),
        }));
        let storage = MemorySessionStorage::new();
        let out = submitter(backend.clone(), storage.clone())
            .submit("rust")
            .await
            .unwrap();

        assert_eq!(out.navigation.target.as_str(), "http://127.0.0.1:1314/show/");
        assert_eq!(out.state.results.len(), 1);
        assert_eq!(SessionState::load(&storage).unwrap(), out.state);
        assert_eq!(backend.seen.lock().unwrap().as_slice(), ["rust"]);
    }

    #[tokio::test]
    async fn empty_query_is_sent_unchanged() {
        let backend = Canned::new(Ok(SearchEnvelope {
            status: 2,
            response: "未输入内容".into(),
        }));
        let err = submitter(backend.clone(), MemorySessionStorage::new())
            .submit("")
            .await
            .unwrap_err();
        assert_eq!(backend.seen.lock().unwrap().as_slice(), [""]);
        assert!(matches!(err, PortalError::Rejected { status: 2, .. }));
    }

    #[tokio::test]
    async fn rejection_keeps_previous_session() {
        let storage = MemorySessionStorage::new();
        SessionState::new("before", Default::default())
            .save(&storage)
            .unwrap();
        let backend = Canned::new(Ok(SearchEnvelope {
            status: 3,
            response: String::new(),
        }));
        assert!(submitter(backend, storage.clone()).submit("after").await.is_err());
        assert_eq!(SessionState::load(&storage).unwrap().query, "before");
    }

    #[test]
    fn results_url_appends_to_base_path() {
        let url = SearchSubmitter::results_url("http://host:1314/portal", "show/").unwrap();
        assert_eq!(url.as_str(), "http://host:1314/portal/show/");
        assert!(SearchSubmitter::results_url("not a url", "show/").is_err());
    }
}
