use crate::tui::{TuiActor, TuiMsg};
use crossterm::event::{self, Event as CtEvent};
use std::time::Duration;
use tianyan_actors::QuoteMsg;
use tianyan_actors::actor::Addr;
use tianyan_actors::quote::QuoteActor;
use tianyan_actors::system::ShutdownHandle;
use tianyan_portal::ClockWidget;
use tokio::{self, time};

const INPUT_POLL: Duration = Duration::from_millis(100);
const RENDER_TICK: Duration = Duration::from_millis(80);

/// Keyboard input, render ticks and the clock; all stop on shutdown.
pub fn spawn_tui_feeders(tui: Addr<TuiActor>, shutdown: ShutdownHandle) {
    let tui_in = tui.clone();
    let mut shutdown_input = shutdown.subscribe();
    tokio::spawn(async move {
        loop {
            // Poll with a timeout so the blocking thread returns and shutdown is not held up.
            let read = tokio::task::spawn_blocking(|| -> std::io::Result<Option<CtEvent>> {
                if event::poll(INPUT_POLL)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            });
            tokio::select! {
                _ = shutdown_input.recv() => break,
                ev = read => {
                    match ev {
                        Ok(Ok(Some(e))) => {
                            if tui_in.send(TuiMsg::InputEvent(e)).await.is_err() {
                                break;
                            }
                        }
                        Ok(Ok(None)) => {}
                        Ok(Err(e)) => {
                            let _ = tui_in.send(TuiMsg::OpError(format!("input: {e}"))).await;
                        }
                        Err(_) => break,
                    }
                }
            }
        }
    });

    let tui_tick = tui.clone();
    let mut shutdown_tick = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(RENDER_TICK);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    let _ = tui_tick.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    let tui_clock = tui;
    let mut shutdown_clock = shutdown.subscribe();
    tokio::spawn(async move {
        let mut interval = time::interval(ClockWidget::TICK);
        loop {
            tokio::select! {
                _ = shutdown_clock.recv() => break,
                _ = interval.tick() => {
                    let _ = tui_clock.try_send(TuiMsg::Clock(ClockWidget::now()));
                }
            }
        }
    });
}

/// Ask for the quote once and hand it to the home view.
pub fn spawn_quote_fetch(quote: Addr<QuoteActor>, tui: Addr<TuiActor>) {
    tokio::spawn(async move {
        let loaded = match quote.ask(|reply| QuoteMsg::Load { reply }).await {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!(target: "tianyan.tui", error = %e, "quote.unavailable");
                None
            }
        };
        let _ = tui.send(TuiMsg::QuoteLoaded(loaded)).await;
    });
}
