use crate::common::AdviceResponse;
use crate::exception::{Exception, ExceptionFilter, HandlerRegistry};
use axum::response::{IntoResponse, Response};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

/// Resolves raised exceptions to their handlers.
///
/// Dispatch never fails: when no handler matches, or the matched handler
/// errors or panics, the fixed fallback response is returned instead.
///
/// # Example
/// ```
/// use advisor::common::AdviceResponse;
/// use advisor::exception::{Dispatcher, Exception, ExceptionKind, HandlerRegistry};
/// use axum::http::StatusCode;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Kind { BadRequest }
///
/// impl ExceptionKind for Kind {
///     fn parent(self) -> Option<Self> { None }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("Bad Request")]
/// struct BadRequest;
///
/// impl Exception for BadRequest {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { Kind::BadRequest }
/// }
///
/// let registry = HandlerRegistry::<BadRequest>::builder()
///     .handler("bad_request", [Kind::BadRequest], |e: &BadRequest| {
///         AdviceResponse::text(StatusCode::BAD_REQUEST, e.to_string())
///     })
///     .build()
///     .unwrap();
///
/// let dispatcher = Dispatcher::new(registry);
/// let response = dispatcher.dispatch(&BadRequest);
/// assert_eq!(response.status, StatusCode::BAD_REQUEST);
/// ```
pub struct Dispatcher<E: Exception> {
    registry: Arc<HandlerRegistry<E>>,
}

impl<E: Exception> Dispatcher<E> {
    pub fn new(registry: HandlerRegistry<E>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry<E> {
        &self.registry
    }

    /// Turn a raised exception into a response
    pub fn dispatch(&self, exception: &E) -> AdviceResponse {
        let kind = exception.kind();
        let incident = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %incident, ?kind);
        let _entered = span.enter();

        let Some(handler) = self.registry.resolve(exception) else {
            tracing::warn!(
                %incident,
                %exception,
                "no exception handler matched, answering with fallback"
            );
            return AdviceResponse::fallback();
        };

        match handler.invoke(exception) {
            Ok(response) => {
                tracing::debug!(
                    handler = handler.name(),
                    status = response.status.as_u16(),
                    "exception handled"
                );
                response
            }
            Err(error) => {
                tracing::error!(
                    %incident,
                    handler = handler.name(),
                    %exception,
                    %error,
                    "exception handler failed, answering with fallback"
                );
                AdviceResponse::fallback()
            }
        }
    }

    /// Run the boundary around an entry point's result
    ///
    /// Successful values pass through; a raised exception is dispatched.
    pub fn advise<T: IntoResponse>(&self, result: Result<T, E>) -> Response {
        match result {
            Ok(value) => value.into_response(),
            Err(exception) => self.dispatch(&exception).into_response(),
        }
    }
}

impl<E: Exception> Clone for Dispatcher<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: Exception> ExceptionFilter for Dispatcher<E> {
    fn catch(&self, error: Box<dyn Error + Send + Sync>) -> Response {
        match error.downcast::<E>() {
            Ok(exception) => self.dispatch(&exception).into_response(),
            Err(other) => {
                tracing::warn!(
                    incident = %Uuid::new_v4(),
                    error = %other,
                    "caught an error of a foreign type, answering with fallback"
                );
                AdviceResponse::fallback().into_response()
            }
        }
    }
}
