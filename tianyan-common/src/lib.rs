//! Common types and utilities shared across Tianyan crates.
//!
//! This crate holds the pieces every other crate may depend on without
//! pulling in the HTTP or terminal stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`TianyanError`] and [`Result`]: failures of actor request/reply
//! - [`APP_NAME`] and [`DEFAULT_TITLE_SUFFIX`]: product naming used in logs and titles
//!
//! # Examples
//!
//! ```rust
//! use tianyan_common::{TianyanError, APP_NAME};
//!
//! let err = TianyanError::NoReply("search");
//! assert_eq!(APP_NAME, "tianyan");
//! assert_eq!(err.to_string(), "No reply from search");
//! ```

pub mod observability;

/// Logical application name; used for log file names and default directories.
pub const APP_NAME: &str = "tianyan";

/// Appended to the stored query to form the results page title.
pub const DEFAULT_TITLE_SUFFIX: &str = " - 天眼搜索";

/// Errors raised when talking to an actor.
#[derive(thiserror::Error, Debug)]
pub enum TianyanError {
    /// An actor mailbox was closed before the request could be delivered.
    #[error("Mailbox closed: {0}")]
    Mailbox(&'static str),

    /// An actor dropped its reply channel.
    #[error("No reply from {0}")]
    NoReply(&'static str),
}

/// Convenient alias for results that use [`TianyanError`].
pub type Result<T> = std::result::Result<T, TianyanError>;
