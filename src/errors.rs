//!
//! src/errors.rs
//!
//! Defines enums and methods of error conversion
//! for errors the sampler uses
//!

use thiserror::Error;

use crate::random::RandomError;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("random error: {0}")]
    Random(RandomError),
}

impl From<reqwest::Error> for SamplerError {
    fn from(e: reqwest::Error) -> Self { SamplerError::Http(e.to_string()) }
}

impl From<serde_json::Error> for SamplerError {
    fn from(e: serde_json::Error) -> Self { SamplerError::Parse(e.to_string()) }
}

impl From<RandomError> for SamplerError {
    fn from(e: RandomError) -> Self { SamplerError::Random(e) }
}
