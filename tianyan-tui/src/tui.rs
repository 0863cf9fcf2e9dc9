use crate::{
    opener::LinkOpener,
    state::{Effect, UiState},
    view,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::{
    event::{Event as CtEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    sync::Arc,
    time::{Duration, Instant},
};
use tianyan_actors::{
    SearchMsg,
    actor::{Actor, Addr, Context},
    search::SearchActor,
    system::ShutdownHandle,
};
use tianyan_portal::{Pager, PortalError, SessionStorage, Submitted};

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Clock(String),
    QuoteLoaded(Option<String>),
    SearchDone(Result<Submitted, PortalError>),
    OpError(String),
    Shutdown,
}

/// Results-view settings taken from configuration.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub pager: Pager,
    pub title_suffix: String,
}

pub struct TuiActor {
    // deps
    search: Addr<SearchActor>,
    opener: Arc<dyn LinkOpener>,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    tick_rate: Duration,
    last_tick: Instant,
    dirty: bool,
    restored: bool,

    ui: UiState,

    shutdown: ShutdownHandle,
}

impl TuiActor {
    /// Enters raw mode and the alternate screen.
    pub fn new(
        search: Addr<SearchActor>,
        storage: Arc<dyn SessionStorage>,
        opener: Arc<dyn LinkOpener>,
        options: TuiOptions,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        Ok(Self {
            search,
            opener,
            term,
            tick_rate: Duration::from_millis(250),
            last_tick: Instant::now(),
            dirty: true,
            restored: false,
            ui: UiState::new(storage, options.pager, options.title_suffix),
            shutdown,
        })
    }

    fn draw(&mut self) -> Result<()> {
        let ui = &self.ui;
        self.term.draw(|frame| view::render(frame, ui))?;
        Ok(())
    }

    fn restore_terminal(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }

    fn submit(&mut self, query: String, me: Addr<TuiActor>) {
        self.ui.busy = true;
        let search = self.search.clone();
        tokio::spawn(async move {
            let msg = match search.ask(|reply| SearchMsg::Submit { query, reply }).await {
                Ok(outcome) => TuiMsg::SearchDone(outcome),
                Err(e) => TuiMsg::OpError(format!("search: {e}")),
            };
            let _ = me.send(msg).await;
        });
    }

    fn apply(&mut self, effect: Effect, ctx: &mut Context<Self>) {
        match effect {
            Effect::Submit(query) => self.submit(query, ctx.addr()),
            Effect::Open(href) => {
                if let Err(e) = self.opener.open(&href) {
                    tracing::warn!(target: "tianyan.tui", error = ?e, href, "link.open_failed");
                }
            }
            Effect::Shutdown => {
                let _ = ctx.addr().try_send(TuiMsg::Shutdown);
            }
        }
    }
}

impl Drop for TuiActor {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

#[async_trait]
impl Actor for TuiActor {
    type Msg = TuiMsg;

    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => {
                if let Some(effect) = self.ui.handle_key(k) {
                    self.apply(effect, ctx);
                }
                self.dirty = true;
            }
            TuiMsg::InputEvent(CtEvent::Resize(..)) => self.dirty = true,
            TuiMsg::InputEvent(_) => {}
            TuiMsg::SearchDone(outcome) => {
                self.ui.search_finished(outcome);
                self.dirty = true;
            }
            TuiMsg::Clock(now) => {
                if self.ui.clock != now {
                    self.ui.clock = now;
                    self.dirty = true;
                }
            }
            TuiMsg::QuoteLoaded(quote) => {
                self.ui.quote = quote;
                self.dirty = true;
            }
            TuiMsg::OpError(e) => {
                self.ui.busy = false;
                self.dirty = true;
                tracing::warn!(target: "tianyan.tui", error = %e, "tui.op_error");
            }
            TuiMsg::Tick => {
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            TuiMsg::Shutdown => {
                self.restore_terminal();
                self.shutdown.signal();
                ctx.stop();
            }
        }

        Ok(())
    }
}
