use crate::common::AdviceResponse;
use crate::exception::Exception;
use axum::response::{IntoResponse, Response};
use std::fmt;
use std::sync::Arc;

pub mod layer;

pub use layer::{AdviceLayer, AdviceService};

/// # Raised
///
/// Error type for entry points guarded by an [`AdviceLayer`].
///
/// An entry point returns `Result<T, Raised<E>>`. `?` converts any `E` into
/// `Raised<E>`, so handlers read like ordinary fallible functions. When the
/// response leaves the handler, the exception is carried along in the
/// response extensions and the layer hands it to the dispatcher.
///
/// ### Example
///
/// ```rust
/// use advisor::aspect::Raised;
/// use advisor::exception::{Exception, ExceptionKind};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Kind { NotFound }
///
/// impl ExceptionKind for Kind {
///     fn parent(self) -> Option<Self> { None }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("Not Found Resources")]
/// struct NotFound;
///
/// impl Exception for NotFound {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { Kind::NotFound }
/// }
///
/// async fn find_resource() -> Result<String, Raised<NotFound>> {
///     Err(NotFound)?
/// }
/// ```
pub struct Raised<E: Exception>(pub E);

impl<E: Exception> Raised<E> {
    pub fn new(exception: E) -> Self {
        Self(exception)
    }

    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E: Exception> From<E> for Raised<E> {
    fn from(exception: E) -> Self {
        Self(exception)
    }
}

impl<E: Exception> fmt::Debug for Raised<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Raised").field(&self.0).finish()
    }
}

impl<E: Exception> IntoResponse for Raised<E> {
    /// Without an advice layer in front of the route, the client sees the
    /// fallback response.
    fn into_response(self) -> Response {
        let mut response = AdviceResponse::fallback().into_response();
        response
            .extensions_mut()
            .insert(RaisedException(Arc::new(self.0)));
        response
    }
}

/// Exception carried from the entry point to the layer inside response extensions
pub(crate) struct RaisedException<E>(pub(crate) Arc<E>);

impl<E> Clone for RaisedException<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
