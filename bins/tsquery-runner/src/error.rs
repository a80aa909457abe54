#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("config: {0}")]
    Config(String),

    #[error("client: {0}")]
    Client(#[from] tsquery_client::ClientError),

    #[error("{0}")]
    Query(#[from] tsquery_engine::QueryError),

    #[error("{0}")]
    Fetch(#[from] tsquery_api::FetchError),

    #[error("output: {0}")]
    Output(#[from] std::io::Error),

    #[error("metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("{failed} of {total} queries failed")]
    QueriesFailed { failed: usize, total: usize },

    #[error("service returned no query id")]
    MissingQueryId,
}
