use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Exception handler `{handler}` declares no exception kinds")]
    EmptyHandler { handler: String },

    #[error("Exception handler `{handler}` is registered more than once")]
    DuplicateHandler { handler: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },
}
