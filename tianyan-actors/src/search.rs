//! Owns the submitter so searches run off the UI actor, one at a time.
//!
//! Serial handling keeps the submitter the only writer of session storage.
use crate::SearchMsg;
use crate::actor::{Actor, Context};
use anyhow::Result;
use std::sync::Arc;
use tianyan_portal::SearchSubmitter;

pub struct SearchActor {
    submitter: Arc<SearchSubmitter>,
}

impl SearchActor {
    pub fn new(submitter: Arc<SearchSubmitter>) -> Self {
        Self { submitter }
    }
}

#[async_trait::async_trait]
impl Actor for SearchActor {
    type Msg = SearchMsg;

    async fn handle(&mut self, msg: Self::Msg, _ctx: &mut Context<Self>) -> Result<()> {
        match msg {
            SearchMsg::Submit { query, reply } => {
                let outcome = self.submitter.submit(&query).await;
                if reply.send(outcome).is_err() {
                    tracing::debug!(target: "tianyan.actors", "search.reply_dropped");
                }
            }
        }
        Ok(())
    }
}
