use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("validation failed for {request}: {reason}")]
pub struct ValidationError {
    pub request: &'static str,
    pub reason: String,
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}
