use anyhow::{Context as _, Result};
use std::sync::Arc;
use std::time::Duration;
use tianyan_actors::{
    actor::Addr, builder::Builder, quote::QuoteActor, search::SearchActor,
};
use tianyan_config::{ConventionKind, PortalConfig};
use tianyan_http::HttpClient;
use tianyan_portal::{
    FieldConvention, HitokotoClient, HttpSearchBackend, LenientExtractor, MemorySessionStorage,
    Pager, QuoteWidget, SearchSubmitter, SessionStorage,
};
use tianyan_tui::{SystemOpener, TuiActor, TuiOptions, spawn_quote_fetch, spawn_tui_feeders};

const SEARCH_MAILBOX: usize = 64;
const QUOTE_MAILBOX: usize = 4;
const TUI_MAILBOX: usize = 256;

/// Everything both front ends need, built once from configuration.
pub struct Services {
    pub submitter: Arc<SearchSubmitter>,
    pub storage: Arc<dyn SessionStorage>,
    pub quote: QuoteWidget,
    pub pager: Pager,
    pub title_suffix: String,
}

fn convention(kind: ConventionKind) -> FieldConvention {
    match kind {
        ConventionKind::Keywords => FieldConvention::Keywords,
        ConventionKind::DescriptionWord => FieldConvention::DescriptionWord,
    }
}

fn http_client(base: &str, timeout_secs: Option<u64>) -> Result<HttpClient> {
    let client = HttpClient::new(base).with_context(|| format!("invalid base URL `{base}`"))?;
    Ok(match timeout_secs {
        Some(secs) => client.with_timeout(Duration::from_secs(secs)),
        None => client,
    })
}

impl Services {
    pub fn from_config(cfg: &PortalConfig) -> Result<Self> {
        let backend = &cfg.backend;
        let http = http_client(&backend.base_url, backend.timeout_secs)?;
        let results_url = SearchSubmitter::results_url(&backend.base_url, &backend.results_path)?;

        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        let submitter = SearchSubmitter::new(
            Arc::new(HttpSearchBackend::new(http, backend.search_path.clone())),
            LenientExtractor::new(
                convention(cfg.extractor.convention),
                cfg.extractor.max_results,
            ),
            storage.clone(),
            results_url,
        );

        let quote = if cfg.quote.enabled {
            let http = http_client(&cfg.quote.endpoint, backend.timeout_secs)?;
            QuoteWidget::new(Arc::new(HitokotoClient::new(http)))
        } else {
            QuoteWidget::disabled()
        };

        tracing::debug!(
            target: "tianyan.app",
            backend = %backend.base_url,
            convention = ?cfg.extractor.convention,
            quote = cfg.quote.enabled,
            "services.ready"
        );

        Ok(Self {
            submitter: Arc::new(submitter),
            storage,
            quote,
            pager: Pager::new(cfg.pager.page_size, cfg.pager.max_controls),
            title_suffix: cfg.ui.title_suffix.clone(),
        })
    }
}

pub struct Tether {
    builder: Builder,
}

impl Tether {
    pub fn new() -> Self {
        Self {
            builder: Builder::new(),
        }
    }

    pub fn builder_mut(&mut self) -> &mut Builder {
        &mut self.builder
    }

    pub async fn run(self) -> Result<()> {
        self.builder.run_until_shutdown().await
    }
}

/// Start the actors and the terminal UI. The UI is reserved first and started last.
pub fn build_tui(t: &mut Tether, services: Services) -> Result<()> {
    let b = t.builder_mut();
    let shutdown = b.shutdown_handle();

    let r_tui = b.reserve::<TuiActor>("tui:main", TUI_MAILBOX);

    let submitter = services.submitter.clone();
    b.spawn("search:main", SEARCH_MAILBOX, move || SearchActor::new(submitter));
    let quote = services.quote.clone();
    b.spawn("quote:main", QUOTE_MAILBOX, move || QuoteActor::new(quote));

    let search_addr: Addr<SearchActor> = b.addr("search:main").context("search actor missing")?;
    let quote_addr: Addr<QuoteActor> = b.addr("quote:main").context("quote actor missing")?;
    let tui_addr = r_tui.addr();

    let tui = TuiActor::new(
        search_addr,
        services.storage,
        Arc::new(SystemOpener),
        TuiOptions {
            pager: services.pager,
            title_suffix: services.title_suffix,
        },
        shutdown.clone(),
    )?;
    b.start_reserved(r_tui, tui);

    spawn_tui_feeders(tui_addr.clone(), shutdown);
    spawn_quote_fetch(quote_addr, tui_addr);
    Ok(())
}
