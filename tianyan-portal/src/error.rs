use tianyan_http::HttpError;

/// Failures of the portal pipeline.
///
/// The interactive front end logs these and otherwise carries on; only the
/// one-shot CLI turns them into an exit status.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The backend answered with a status other than "ok".
    #[error("backend rejected query (status {status}): {message}")]
    Rejected { status: i64, message: String },

    #[error("session state missing key `{0}`")]
    SessionMissing(&'static str),

    #[error("session state under `{key}` is not readable: {source}")]
    SessionCorrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode session state: {0}")]
    SessionEncode(#[source] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(String),
}
