use crate::error::{AdvisorError, Result};
use crate::exception::{Exception, ExceptionHandler, ExceptionKind, IntoHandlerResult};
use std::collections::HashSet;

/// How a declared kind is compared against the kind of a raised exception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Declared kind equals the raised kind or is one of its ancestors
    #[default]
    Assignable,
    /// Declared kind equals the raised kind
    Exact,
}

impl MatchPolicy {
    pub fn matches<K: ExceptionKind>(self, declared: K, raised: K) -> bool {
        match self {
            MatchPolicy::Assignable => declared.is_assignable_from(raised),
            MatchPolicy::Exact => declared == raised,
        }
    }
}

/// Immutable set of exception handlers, searched in declaration order.
///
/// Build one with [`HandlerRegistry::builder`]; once built it never changes
/// and can be shared freely between requests.
///
/// # Example
/// ```
/// use advisor::common::AdviceResponse;
/// use advisor::exception::{Exception, ExceptionKind, HandlerRegistry};
/// use axum::http::StatusCode;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Kind { Missing }
///
/// impl ExceptionKind for Kind {
///     fn parent(self) -> Option<Self> { None }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("missing")]
/// struct Missing;
///
/// impl Exception for Missing {
///     type Kind = Kind;
///     fn kind(&self) -> Kind { Kind::Missing }
/// }
///
/// let registry = HandlerRegistry::<Missing>::builder()
///     .handler("missing", [Kind::Missing], |e: &Missing| {
///         AdviceResponse::text(StatusCode::NOT_FOUND, e.to_string())
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.resolve(&Missing).unwrap().name(), "missing");
/// ```
#[derive(Debug)]
pub struct HandlerRegistry<E: Exception> {
    handlers: Vec<ExceptionHandler<E>>,
    policy: MatchPolicy,
}

impl<E: Exception> HandlerRegistry<E> {
    pub fn builder() -> HandlerRegistryBuilder<E> {
        HandlerRegistryBuilder::new()
    }

    /// Find the first handler whose declared kinds match the exception.
    ///
    /// Handlers are tried in the order they were registered; the first match
    /// wins even when a later handler declares a more specific kind.
    pub fn resolve(&self, exception: &E) -> Option<&ExceptionHandler<E>> {
        self.resolve_kind(exception.kind())
    }

    pub fn resolve_kind(&self, kind: E::Kind) -> Option<&ExceptionHandler<E>> {
        self.handlers.iter().find(|handler| {
            handler
                .catches()
                .iter()
                .any(|declared| self.policy.matches(*declared, kind))
        })
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn handlers(&self) -> &[ExceptionHandler<E>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Builder for constructing a [`HandlerRegistry`]
///
/// Registration order is preserved and becomes the lookup order.
pub struct HandlerRegistryBuilder<E: Exception> {
    handlers: Vec<ExceptionHandler<E>>,
    policy: MatchPolicy,
}

impl<E: Exception> HandlerRegistryBuilder<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            policy: MatchPolicy::default(),
        }
    }

    /// Register a handler for one or more exception kinds
    pub fn handler<F, R>(
        self,
        name: impl Into<String>,
        catches: impl IntoIterator<Item = E::Kind>,
        handler: F,
    ) -> Self
    where
        F: Fn(&E) -> R + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        self.register(ExceptionHandler::new(name, catches, handler))
    }

    /// Register an already constructed handler
    pub fn register(mut self, handler: ExceptionHandler<E>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the registrations and freeze them
    pub fn build(self) -> Result<HandlerRegistry<E>> {
        let mut names = HashSet::new();
        for handler in &self.handlers {
            if handler.catches().is_empty() {
                return Err(AdvisorError::EmptyHandler {
                    handler: handler.name().to_string(),
                });
            }
            if !names.insert(handler.name()) {
                return Err(AdvisorError::DuplicateHandler {
                    handler: handler.name().to_string(),
                });
            }
        }

        for (index, handler) in self.handlers.iter().enumerate() {
            let earlier = &self.handlers[..index];
            let shadowed = handler.catches().iter().all(|kind| {
                earlier.iter().any(|previous| {
                    previous
                        .catches()
                        .iter()
                        .any(|declared| self.policy.matches(*declared, *kind))
                })
            });
            if shadowed {
                tracing::warn!(
                    handler = handler.name(),
                    catches = ?handler.catches(),
                    "exception handler is unreachable, earlier handlers already catch every kind it declares"
                );
            }
        }

        tracing::debug!(
            handlers = self.handlers.len(),
            policy = ?self.policy,
            "exception handler registry built"
        );

        Ok(HandlerRegistry {
            handlers: self.handlers,
            policy: self.policy,
        })
    }
}

impl<E: Exception> Default for HandlerRegistryBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
