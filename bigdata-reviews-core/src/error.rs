use thiserror::Error;

pub type Result<T> = std::result::Result<T, SentimentError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SentimentError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown word: {0}")]
    UnknownWord(String),

    #[error("corpus is empty: {0}")]
    EmptyCorpus(String),
}

impl SentimentError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
