use super::exception::{AppException, AppExceptionKind};
use advisor::prelude::*;

/// Handlers answering the exceptions raised by the simple controller
pub struct SimpleExceptionAdvice;

#[controller_advice(exception = AppException)]
impl SimpleExceptionAdvice {
    #[exception_handler(AppExceptionKind::BadRequest)]
    fn handle_bad_request(&self, exception: &AppException) -> AdviceResponse {
        AdviceResponse::text(StatusCode::BAD_REQUEST, exception.to_string())
    }

    #[exception_handler(AppExceptionKind::NotFound)]
    fn handle_not_found(&self, exception: &AppException) -> AdviceResponse {
        AdviceResponse::text(StatusCode::BAD_REQUEST, exception.to_string())
    }
}
