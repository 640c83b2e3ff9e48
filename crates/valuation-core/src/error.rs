use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// The upstream page says the ticker does not exist.
    #[error("no stock found")]
    NotFound,

    #[error("upstream error: {0}")]
    Upstream(String),
}
