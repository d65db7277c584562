use crate::common::AdviceResponse;
use crate::exception::Exception;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Result of invoking a handler
pub type HandlerResult = Result<AdviceResponse, HandlerError>;

/// Failure while a handler was producing its response.
///
/// The dispatcher never forwards these to the client; they are logged and
/// replaced by the fallback response.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(#[from] anyhow::Error),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Failed(anyhow::Error::msg(message))
    }
}

/// Conversion from a handler's return value into a [`HandlerResult`].
///
/// Implemented for a bare [`AdviceResponse`] and for any
/// `Result<AdviceResponse, E>` whose error converts into [`HandlerError`].
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for AdviceResponse {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self)
    }
}

impl<Err> IntoHandlerResult for Result<AdviceResponse, Err>
where
    Err: Into<HandlerError>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

type HandlerFn<E> = dyn Fn(&E) -> HandlerResult + Send + Sync;

/// A registered handler: the kinds it declares and the function answering them.
pub struct ExceptionHandler<E: Exception> {
    name: String,
    catches: Vec<E::Kind>,
    callable: Arc<HandlerFn<E>>,
}

impl<E: Exception> ExceptionHandler<E> {
    pub fn new<F, R>(
        name: impl Into<String>,
        catches: impl IntoIterator<Item = E::Kind>,
        handler: F,
    ) -> Self
    where
        F: Fn(&E) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        Self {
            name: name.into(),
            catches: catches.into_iter().collect(),
            callable: Arc::new(move |exception: &E| handler(exception).into_handler_result()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exception kinds this handler was declared for, in declaration order
    pub fn catches(&self) -> &[E::Kind] {
        &self.catches
    }

    /// Run the handler, turning a panic into [`HandlerError::Panicked`]
    ///
    /// Unwinding is stopped here, but the process panic hook still runs first.
    /// With the default hook that prints a `thread ... panicked at` line to
    /// stderr; binaries that want panics in their logs should install a hook
    /// that forwards to `tracing` (see the advice-server demo).
    pub fn invoke(&self, exception: &E) -> HandlerResult {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.callable)(exception))) {
            Ok(result) => result,
            Err(payload) => Err(HandlerError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl<E: Exception> fmt::Debug for ExceptionHandler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionHandler")
            .field("name", &self.name)
            .field("catches", &self.catches)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
