use crate::error::PortalError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tianyan_http::{HttpClient, RequestOpts};

/// The part of a hitokoto reply the home view shows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    pub hitokoto: String,
    #[serde(default)]
    pub from: Option<String>,
}

impl Quote {
    /// `text` or `text ——from`.
    pub fn display(&self) -> String {
        match self.from.as_deref().map(str::trim) {
            Some(from) if !from.is_empty() => format!("{} ——{}", self.hitokoto, from),
            _ => self.hitokoto.clone(),
        }
    }
}

#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> Result<Quote, PortalError>;
}

/// `GET` against the hitokoto endpoint.
#[derive(Debug, Clone)]
pub struct HitokotoClient {
    http: HttpClient,
}

impl HitokotoClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl QuoteSource for HitokotoClient {
    async fn fetch(&self) -> Result<Quote, PortalError> {
        Ok(self.http.get_json("", RequestOpts::default()).await?)
    }
}

/// Fetches one quote per start; a failure leaves the region empty.
#[derive(Clone)]
pub struct QuoteWidget {
    source: Option<Arc<dyn QuoteSource>>,
}

impl QuoteWidget {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub fn disabled() -> Self {
        Self { source: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    pub async fn load(&self) -> Option<String> {
        let source = self.source.as_ref()?;
        match source.fetch().await {
            Ok(quote) => {
                tracing::debug!(target: "portal.quote", chars = quote.hitokoto.chars().count(), "quote.loaded");
                Some(quote.display())
            }
            Err(e) => {
                tracing::warn!(target: "portal.quote", error = %e, "quote.failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<Quote>);

    #[async_trait]
    impl QuoteSource for Fixed {
        async fn fetch(&self) -> Result<Quote, PortalError> {
            self.0.clone().ok_or(PortalError::Rejected {
                status: 0,
                message: "down".into(),
            })
        }
    }

    #[test]
    fn display_appends_source_when_present() {
        let q = Quote {
            hitokoto: "知行合一".into(),
            from: Some("传习录".into()),
        };
        assert_eq!(q.display(), "知行合一 ——传习录");
        let bare = Quote {
            hitokoto: "x".into(),
            from: Some("  ".into()),
        };
        assert_eq!(bare.display(), "x");
    }

    #[tokio::test]
    async fn failure_yields_nothing() {
        assert_eq!(QuoteWidget::new(Arc::new(Fixed(None))).load().await, None);
        assert_eq!(QuoteWidget::disabled().load().await, None);
    }

    #[tokio::test]
    async fn success_yields_display_text() {
        let widget = QuoteWidget::new(Arc::new(Fixed(Some(Quote {
            hitokoto: "hello".into(),
            from: None,
        }))));
        assert_eq!(widget.load().await.as_deref(), Some("hello"));
    }
}
