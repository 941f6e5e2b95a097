use std::time::Duration;

/// Failure taxonomy shared by the loaders and the element interaction layer.
///
/// Interaction operations return these typed errors instead of collapsing
/// everything into a boolean, so callers can branch on the failure kind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A locator name, document, fixture field or element did not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required configuration value was missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Substituting arguments into a dynamic locator template failed.
    #[error("locator format error: {0}")]
    Format(String),

    /// A locator document named a strategy this harness does not know.
    #[error("unsupported locator strategy: {0:?}")]
    UnsupportedStrategy(String),

    /// The underlying WebDriver command raised.
    #[error("webdriver command failed: {0}")]
    Interaction(#[from] fantoccini::error::CmdError),

    /// The WebDriver session could not be created.
    #[error("webdriver session could not be created: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// A bounded wait elapsed without the condition becoming true.
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
