use axum::response::Response;
use std::error::Error;
use std::fmt::Debug;

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use handler::{ExceptionHandler, HandlerError, HandlerResult, IntoHandlerResult};
pub use registry::{HandlerRegistry, HandlerRegistryBuilder, MatchPolicy};

/// Upper bound on parent links followed when testing assignability.
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Runtime type tag of an exception.
///
/// Kinds form a tree through [`ExceptionKind::parent`]. A handler declared for
/// a kind also catches every kind below it.
///
/// # Example
/// ```
/// use advisor::exception::ExceptionKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Kind {
///     Any,
///     NotFound,
/// }
///
/// impl ExceptionKind for Kind {
///     fn parent(self) -> Option<Self> {
///         match self {
///             Kind::Any => None,
///             Kind::NotFound => Some(Kind::Any),
///         }
///     }
/// }
///
/// assert!(Kind::Any.is_assignable_from(Kind::NotFound));
/// assert!(!Kind::NotFound.is_assignable_from(Kind::Any));
/// ```
pub trait ExceptionKind: Copy + Eq + Debug + Send + Sync + 'static {
    /// The kind this one specializes, `None` at the root
    fn parent(self) -> Option<Self>;

    /// Whether an exception of kind `other` can be treated as `self`
    fn is_assignable_from(self, other: Self) -> bool {
        let mut current = Some(other);
        for _ in 0..MAX_HIERARCHY_DEPTH {
            match current {
                Some(kind) if kind == self => return true,
                Some(kind) => current = kind.parent(),
                None => return false,
            }
        }
        false
    }
}

/// A typed error raised by an entry point.
///
/// The `Display` output is the human-readable message handlers usually echo.
pub trait Exception: Error + Send + Sync + 'static {
    type Kind: ExceptionKind;

    fn kind(&self) -> Self::Kind;
}

/// The ExceptionFilter trait
///
/// Filters handle type-erased errors thrown during request processing.
/// They must return a valid Response.
pub trait ExceptionFilter: Send + Sync + 'static {
    /// Catch an exception and return a response
    fn catch(&self, error: Box<dyn Error + Send + Sync>) -> Response;
}
