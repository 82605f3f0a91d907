use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("max age window must be a number, got NaN")]
    InvalidWindow,

    #[error("candidate message {id} has an empty `{field}`")]
    InvalidCandidate { id: i64, field: &'static str },
}
