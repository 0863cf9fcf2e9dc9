//! `--query` mode: one search, one page of plain text, then exit.

use crate::tether::Services;
use anyhow::{Context as _, Result};
use std::io::Write;
use tianyan_portal::{PageControl, ResultCard, ResultRenderer, ResultSurface};

#[derive(Debug, Default)]
struct TextSurface {
    title: String,
    cards: Vec<ResultCard>,
    controls: Vec<PageControl>,
    active: Option<usize>,
}

impl ResultSurface for TextSurface {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn clear_cards(&mut self) {
        self.cards.clear();
    }

    fn push_card(&mut self, card: ResultCard) {
        self.cards.push(card);
    }

    fn set_controls(&mut self, controls: &[PageControl]) {
        self.controls = controls.to_vec();
    }

    fn set_active_control(&mut self, index: usize) {
        self.active = Some(index);
    }
}

impl TextSurface {
    fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.title)?;
        writeln!(out)?;
        if self.cards.is_empty() {
            writeln!(out, "  (no results)")?;
        }
        for (i, card) in self.cards.iter().enumerate() {
            writeln!(out, "{:>3}. {}", i + 1, card.title)?;
            writeln!(out, "     {}", card.href)?;
            if !card.keywords.is_empty() {
                writeln!(out, "     {}", card.keywords)?;
            }
        }
        if !self.controls.is_empty() {
            let pages: Vec<String> = self
                .controls
                .iter()
                .map(|c| {
                    if Some(c.index) == self.active {
                        format!("[{}]", c.label)
                    } else {
                        c.label.clone()
                    }
                })
                .collect();
            writeln!(out)?;
            writeln!(out, "pages: {}", pages.join(" "))?;
        }
        Ok(())
    }
}

/// Submit `query` and print page `page` (1-based). Errors mean the search failed.
pub async fn run(services: &Services, query: &str, page: usize, out: &mut impl Write) -> Result<()> {
    let submitted = services
        .submitter
        .submit(query)
        .await
        .context("search failed")?;
    tracing::info!(
        target: "tianyan.app",
        target_url = %submitted.navigation.target,
        "oneshot.navigate"
    );

    let renderer = ResultRenderer::from_storage(
        services.storage.as_ref(),
        services.pager,
        services.title_suffix.clone(),
    )?;
    let mut surface = TextSurface::default();
    renderer.init(&mut surface);

    let index = page.max(1) - 1;
    if index > 0 && renderer.goto_page(&mut surface, index).is_none() {
        // Only pages with a control are reachable.
        tracing::debug!(
            target: "tianyan.app",
            page,
            controls = renderer.control_count(),
            "oneshot.page_out_of_range"
        );
        surface.clear_cards();
        surface.active = None;
    }

    surface.write_to(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tianyan_config::PortalConfigLoader;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn services_for(server: &MockServer) -> Services {
        let yaml = format!(
            "backend:\n  base_url: \"{}\"\nquote:\n  enabled: false\nui:\n  title_suffix: \" - test\"\n",
            server.uri()
        );
        let cfg = PortalConfigLoader::new().with_yaml_str(&yaml).load().unwrap();
        Services::from_config(&cfg).unwrap()
    }

    fn body(n: usize) -> String {
        let items: Vec<String> = (0..n)
            .map(|i| format!("{{'title': 'T{i}', 'href': 'http://h/{i}', 'keywords': 'k{i}'}}"))
            .collect();
        format!("[{}]", items.join(", "))
    }

    async fn mount(server: &MockServer, status: i64, response: String) {
        Mock::given(method("POST"))
            .and(path("/search/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": status, "response": response})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn prints_requested_page() {
        let server = MockServer::start().await;
        mount(&server, 1, body(15)).await;
        let services = services_for(&server).await;

        let mut out = Vec::new();
        run(&services, "rust", 2, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("rust - test\n"));
        assert!(text.contains("  1. T10\n     http://h/10\n     k10\n"));
        assert!(!text.contains("T9\n"));
        assert!(text.ends_with("pages: 1 [2]\n"));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let server = MockServer::start().await;
        mount(&server, 1, body(3)).await;
        let services = services_for(&server).await;

        let mut out = Vec::new();
        run(&services, "rust", 5, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("(no results)"));
    }

    #[tokio::test]
    async fn pages_beyond_last_control_stay_empty() {
        let server = MockServer::start().await;
        mount(&server, 1, body(150)).await;
        let services = services_for(&server).await;

        let mut out = Vec::new();
        run(&services, "rust", 11, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("T100"));
        assert!(text.contains("(no results)"));
        assert!(text.ends_with("pages: 1 2 3 4 5 6 7 8 9 10\n"));

        let mut out = Vec::new();
        run(&services, "rust", 10, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  1. T90\n"));
        assert!(text.ends_with("pages: 1 2 3 4 5 6 7 8 9 [10]\n"));
    }

    #[tokio::test]
    async fn rejection_is_an_error() {
        let server = MockServer::start().await;
        mount(&server, 3, String::new()).await;
        let services = services_for(&server).await;

        let mut out = Vec::new();
        let err = run(&services, "zzz", 1, &mut out).await.unwrap_err();
        assert!(format!("{err:#}").contains("status 3"));
        assert!(out.is_empty());
    }
}
