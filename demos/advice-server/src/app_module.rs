use crate::modules::simple::{SimpleController, SimpleExceptionAdvice};
use advisor::prelude::*;
use std::panic::PanicHookInfo;
use tower_http::trace::TraceLayer;

/// Root application router
///
/// Every route of the simple controller sits behind the advice layer, so
/// exceptions it raises are answered by [`SimpleExceptionAdvice`].
pub fn app_router() -> advisor::Result<Router> {
    let dispatcher = Arc::new(SimpleExceptionAdvice).dispatcher()?;

    let simple = SimpleController::router().layer(AdviceLayer::new(dispatcher));

    Ok(Router::new()
        .nest(SimpleController::base_path(), simple)
        .layer(TraceLayer::new_for_http()))
}

/// Panic hook forwarding to `tracing`
///
/// Handler panics are recovered by the dispatcher, but the hook fires before
/// unwinding starts; this keeps that report in the structured log.
pub fn log_panic(info: &PanicHookInfo<'_>) {
    tracing::error!(panic = %info, "panic during request processing");
}

/// Address the server listens on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_config(config: &ConfigService) -> advisor::Result<Self> {
        Ok(Self {
            host: config.get_or("HOST", "0.0.0.0"),
            port: config.get_parsed("PORT")?.unwrap_or(3000),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
