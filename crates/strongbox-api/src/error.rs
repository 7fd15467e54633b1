//! Request-level error types.

use strongbox_core::error::StrongboxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is required")]
    MissingBody,

    #[error("unknown secret type: {0}")]
    InvalidType(String),

    #[error("required field is missing: {0}")]
    MissingCredential(&'static str),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("no character classes enabled")]
    NoCharacterClasses,

    #[error("password length {0} is out of range")]
    InvalidPasswordLength(usize),
}

impl From<ApiError> for StrongboxError {
    fn from(err: ApiError) -> Self {
        let code = match err {
            ApiError::MissingBody => "missing_body",
            ApiError::InvalidType(_) => "invalid_type",
            ApiError::MissingCredential(_) => "missing_credential",
            ApiError::MalformedBody(_) => "bad_request",
            ApiError::NoCharacterClasses => "no_character_classes",
            ApiError::InvalidPasswordLength(_) => "invalid_length",
        };
        StrongboxError::validation(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_client_validation_errors() {
        let err: StrongboxError = ApiError::InvalidType("ssh".into()).into();
        assert!(err.is_client_error());
        assert_eq!(err.code(), "error.invalid_type");

        let err: StrongboxError = ApiError::NoCharacterClasses.into();
        assert_eq!(err.code(), "error.no_character_classes");
    }
}
