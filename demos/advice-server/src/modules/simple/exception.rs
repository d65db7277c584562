use advisor::prelude::*;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Runtime type tags of the exceptions raised by [`super::SimpleController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum AppExceptionKind {
    Exception,
    NotFound,
    BadRequest,
}

impl ExceptionKind for AppExceptionKind {
    fn parent(self) -> Option<Self> {
        match self {
            AppExceptionKind::Exception => None,
            AppExceptionKind::NotFound | AppExceptionKind::BadRequest => {
                Some(AppExceptionKind::Exception)
            }
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AppException {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppException {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl Exception for AppException {
    type Kind = AppExceptionKind;

    fn kind(&self) -> AppExceptionKind {
        match self {
            AppException::NotFound(_) => AppExceptionKind::NotFound,
            AppException::BadRequest(_) => AppExceptionKind::BadRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_descends_from_exception() {
        for kind in AppExceptionKind::iter() {
            assert!(
                AppExceptionKind::Exception.is_assignable_from(kind),
                "{kind} is outside the hierarchy"
            );
        }
    }

    #[test]
    fn test_message_is_display_output() {
        let exception = AppException::not_found("Not Found Resources");
        assert_eq!(exception.kind(), AppExceptionKind::NotFound);
        assert_eq!(exception.to_string(), "Not Found Resources");
    }
}
