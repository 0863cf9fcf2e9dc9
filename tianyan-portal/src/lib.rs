//! Search portal core: from a raw backend reply to rendered result pages.
//!
//! - [`extract`]: best-effort lenient extractor for the backend's
//!   single-quoted pseudo-JSON result list
//! - [`session`]: per-session key/value storage and the typed [`SessionState`]
//! - [`pager`] and [`render`]: client-side pagination onto an injected surface
//! - [`submit`]: one search round trip (POST, extract, store, navigate)
//! - [`quote`] and [`clock`]: the home view's two small widgets
//!
//! Nothing here touches a terminal; front ends implement [`ResultSurface`].

pub mod clock;
pub mod error;
pub mod extract;
pub mod pager;
pub mod quote;
pub mod record;
pub mod render;
pub mod session;
pub mod submit;

pub use clock::ClockWidget;
pub use error::PortalError;
pub use extract::{FieldConvention, LenientExtractor};
pub use pager::{PageControl, Pager};
pub use quote::{HitokotoClient, Quote, QuoteSource, QuoteWidget};
pub use record::{MAX_RESULTS, ResultSet, SearchResultRecord};
pub use render::{ResultCard, ResultRenderer, ResultSurface};
pub use session::{MemorySessionStorage, SessionState, SessionStorage};
pub use submit::{
    HttpSearchBackend, Navigation, SearchBackend, SearchEnvelope, SearchSubmitter, Submitted,
};
