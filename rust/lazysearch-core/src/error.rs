use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("invalid search options: {0}")]
    Invalid(String),
    #[error("malformed search options: {0}")]
    Parse(#[from] serde_json::Error),
}
