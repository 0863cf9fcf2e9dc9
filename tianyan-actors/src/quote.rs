use crate::QuoteMsg;
use crate::actor::{Actor, Context};
use anyhow::Result;
use tianyan_portal::QuoteWidget;

/// Fetches the home view's quote; asked once per start.
pub struct QuoteActor {
    widget: QuoteWidget,
}

impl QuoteActor {
    pub fn new(widget: QuoteWidget) -> Self {
        Self { widget }
    }
}

#[async_trait::async_trait]
impl Actor for QuoteActor {
    type Msg = QuoteMsg;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            QuoteMsg::Load { reply } => {
                let _ = reply.send(self.widget.load().await);
            }
        }
        Ok(())
    }
}
