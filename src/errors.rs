use thiserror::Error;

/// Errors that can end a collection run.
///
/// Missing review fields and challenge pages are not represented here: the former
/// resolve to `None` on the record, the latter are reported through the crawl
/// outcomes so the run can continue.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Navigation or page-source retrieval failed
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The WebDriver session could not be created or closed
    #[error("session error: {0}")]
    Session(String),

    /// The search results page itself was a bot-challenge page
    #[error("search page was challenged: {url}")]
    SearchChallenged { url: String },

    /// A review link did not have the expected path structure
    #[error("malformed review link: {0}")]
    MalformedLink(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type HarvestResult<T> = Result<T, HarvestError>;

impl From<fantoccini::error::CmdError> for HarvestError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        HarvestError::Fetch(err.to_string())
    }
}

impl From<fantoccini::error::NewSessionError> for HarvestError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        HarvestError::Session(err.to_string())
    }
}
