//! Small tokio actor runtime and the portal's two network-facing actors.

pub mod actor;
pub mod builder;
pub mod quote;
pub mod registry;
pub mod search;
pub mod system;

use tianyan_portal::{PortalError, Submitted};
use tokio::sync::oneshot;

pub enum SearchMsg {
    Submit {
        query: String,
        reply: oneshot::Sender<Result<Submitted, PortalError>>,
    },
}

pub enum QuoteMsg {
    /// `None` when disabled or the fetch failed.
    Load { reply: oneshot::Sender<Option<String>> },
}
