//! Error types
//!
//! Every failure of a submission is produced as a typed variant at the site
//! where it happens; the user-facing text is derived from the variant, never
//! from the error message.

use crate::service::config::{ConfigError, Messages};
use thiserror::Error;

pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no text or file provided")]
    NoInput,

    #[error("text has {actual} characters, minimum is {min}")]
    TextTooShort { min: usize, actual: usize },

    #[error("file has {actual} bytes, maximum is {max}")]
    FileTooLarge { max: u64, actual: u64 },
}

impl ValidationError {
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            ValidationError::NoInput => messages.no_input.clone(),
            ValidationError::TextTooShort { .. } => messages.text_too_short.clone(),
            ValidationError::FileTooLarge { .. } => messages.file_too_large.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP response (connect, timeout, transfer).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error {status}: {detail}")]
    ServerStatus { status: u16, detail: String },

    #[error("Client error {status}: {detail}")]
    ClientStatus { status: u16, detail: String },

    #[error("Incomplete response: missing field '{field}'")]
    IncompleteResponse { field: &'static str },

    #[error("{0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClassifierError {
    /// Localized text shown in the error banner.
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            ClassifierError::Validation(e) => e.user_message(messages),
            ClassifierError::Network(_) => messages.network_error.clone(),
            ClassifierError::ServerStatus { .. } => messages.server_error.clone(),
            ClassifierError::ClientStatus { detail, .. } => {
                format!("{} {}", messages.invalid_data, detail)
            }
            ClassifierError::IncompleteResponse { .. } => messages.incomplete_response.clone(),
            ClassifierError::InvalidResponse(msg) => pass_through(msg, messages),
            ClassifierError::Io(e) => pass_through(&e.to_string(), messages),
            ClassifierError::Config(e) => pass_through(&e.to_string(), messages),
        }
    }
}

fn pass_through(msg: &str, messages: &Messages) -> String {
    if msg.trim().is_empty() {
        messages.unknown.clone()
    } else {
        msg.to_string()
    }
}

impl From<reqwest::Error> for ClassifierError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClassifierError::InvalidResponse(error.to_string())
        } else {
            ClassifierError::Network(error.to_string())
        }
    }
}
