use crate::api::ApiError;
use crate::i18n::{Language, Message};
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally; no request was sent.
    #[error("{}", .0.text(Language::En))]
    Validation(Message),
    #[error("Not logged in")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// How a failure should be handled by whoever triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials rejected: session reset.
    Authentication,
    /// Local input problem, shown inline.
    Validation,
    /// Backend refused with a reason worth showing verbatim.
    Business,
    /// Network or anything unexpected: generic fallback message.
    Unexpected,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::NotAuthenticated | ClientError::Api(ApiError::Unauthorized { .. }) => {
                ErrorKind::Authentication
            }
            ClientError::Api(ApiError::ApiError { .. }) => ErrorKind::Business,
            ClientError::Api(ApiError::RequestError(_))
            | ClientError::Api(ApiError::DecodeError(_))
            | ClientError::Storage(_) => ErrorKind::Unexpected,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api(ApiError::Unauthorized { .. }))
    }

    /// Text to put in front of the user. Backend details are passed through untouched.
    pub fn user_message(&self, language: Language) -> String {
        match self {
            ClientError::Validation(message) => message.text(language).to_string(),
            ClientError::Api(api) => match api.detail() {
                Some(detail) => detail.to_string(),
                None if self.kind() == ErrorKind::Authentication => {
                    Message::SessionExpired.text(language).to_string()
                }
                None => Message::GenericError.text(language).to_string(),
            },
            ClientError::NotAuthenticated => Message::SessionExpired.text(language).to_string(),
            ClientError::Storage(_) => Message::GenericError.text(language).to_string(),
        }
    }

    /// Like [`user_message`](Self::user_message), but a backend failure without
    /// a detail falls back to `fallback` instead of the generic text.
    pub fn user_message_or(&self, language: Language, fallback: Message) -> String {
        match self {
            ClientError::Api(api) => api
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.text(language).to_string()),
            _ => self.user_message(language),
        }
    }
}
