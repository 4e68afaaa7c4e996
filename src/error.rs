use thiserror::Error;

#[derive(Error, Debug)]
pub enum SabacError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Corrupt stream: {0}")]
    Corrupt(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl SabacError {
    pub(crate) fn end_of_stream() -> Self {
        SabacError::Corrupt("unexpected end of stream".into())
    }
}

pub type SabacResult<T> = Result<T, SabacError>;
