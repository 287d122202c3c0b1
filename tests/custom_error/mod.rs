#![allow(dead_code)]

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("custom error occurred: {message}")]
pub struct CustomError {
    pub message: String,
}

impl CustomError {
    pub fn new(message: &str) -> Self {
        CustomError {
            message: message.to_string(),
        }
    }
}
