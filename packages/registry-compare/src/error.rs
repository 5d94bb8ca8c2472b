use openai_client::OpenAIError;
use registry_common::ApiError;
use thiserror::Error;

/// Failure of a summary or research call.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Chat(#[from] OpenAIError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type SummarizeResult<T> = std::result::Result<T, SummarizeError>;
