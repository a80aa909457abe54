#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("config: {0}")]
    Config(String),

    #[error("build http client: {0}")]
    Build(#[from] reqwest::Error),
}
