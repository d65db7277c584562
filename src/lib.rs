//! # Advisor
//!
//! Controller advice for axum: entry points raise typed exceptions, and a
//! cross-cutting layer resolves each one to a registered handler.
//!
//! ## Features
//!
//! - **Typed exceptions**: exception kinds form a hierarchy, so a handler for a
//!   parent kind also catches its children
//! - **Ordered registry**: handlers are searched in declaration order; the first
//!   match answers
//! - **Never-failing dispatch**: no match, a failing handler, or a panicking
//!   handler all end in a fixed 500 response
//! - **Tower integration**: `AdviceLayer` wraps any set of routes
//! - **Macros**: `#[controller_advice]` collects handler methods at compile time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use advisor::prelude::*;
//! use axum::routing::get;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Exception,
//!     BadRequest,
//! }
//!
//! impl ExceptionKind for Kind {
//!     fn parent(self) -> Option<Self> {
//!         match self {
//!             Kind::Exception => None,
//!             Kind::BadRequest => Some(Kind::Exception),
//!         }
//!     }
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}")]
//! struct BadRequest(String);
//!
//! impl Exception for BadRequest {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind {
//!         Kind::BadRequest
//!     }
//! }
//!
//! async fn create() -> std::result::Result<&'static str, Raised<BadRequest>> {
//!     Err(BadRequest("Bad Request".into()))?
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = HandlerRegistry::<BadRequest>::builder()
//!         .handler("bad_request", [Kind::BadRequest], |e: &BadRequest| {
//!             AdviceResponse::text(StatusCode::BAD_REQUEST, e.to_string())
//!         })
//!         .build()
//!         .unwrap();
//!
//!     let app: Router = Router::new()
//!         .route("/create", get(create))
//!         .layer(AdviceLayer::new(Dispatcher::new(registry)));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod aspect;
pub mod common;
pub mod config;
pub mod error;
pub mod exception;

// Re-export core types
pub use aspect::{AdviceLayer, Raised};
pub use common::AdviceResponse;
pub use config::ConfigService;
pub use error::{AdvisorError, Result};
pub use exception::{Dispatcher, Exception, ExceptionFilter, ExceptionKind, HandlerRegistry};

// Re-export macros
pub use advisor_macro::{controller_advice, exception_handler};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use advisor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::aspect::{AdviceLayer, AdviceService, Raised};
    pub use crate::common::{AdviceResponse, FALLBACK_BODY, ResponseBody};
    pub use crate::config::ConfigService;
    pub use crate::error::{AdvisorError, Result};
    pub use crate::exception::{
        Dispatcher, Exception, ExceptionFilter, ExceptionHandler, ExceptionKind, HandlerError,
        HandlerRegistry, HandlerRegistryBuilder, HandlerResult, IntoHandlerResult, MatchPolicy,
    };
    pub use crate::{controller_advice, exception_handler};
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
