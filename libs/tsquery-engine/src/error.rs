use tsquery_api::{DecodeError, FetchError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("stopped after {0} pages with more results pending")]
    PageLimit(usize),
}
