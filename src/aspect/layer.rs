use crate::aspect::RaisedException;
use crate::exception::{Dispatcher, Exception};
use axum::{body::Body, http::Request, response::IntoResponse, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer that routes exceptions raised by the wrapped routes to a [`Dispatcher`]
///
/// Apply it to the routes whose exceptions should be advised:
///
/// ```rust,ignore
/// let router = Router::new()
///     .route("/not-found", get(not_found))
///     .layer(AdviceLayer::new(dispatcher));
/// ```
pub struct AdviceLayer<E: Exception> {
    dispatcher: Dispatcher<E>,
}

impl<E: Exception> AdviceLayer<E> {
    pub fn new(dispatcher: Dispatcher<E>) -> Self {
        Self { dispatcher }
    }
}

impl<E: Exception> Clone for AdviceLayer<E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S, E: Exception> Layer<S> for AdviceLayer<E> {
    type Service = AdviceService<S, E>;

    fn layer(&self, inner: S) -> Self::Service {
        AdviceService {
            inner,
            dispatcher: self.dispatcher.clone(),
        }
    }
}

pub struct AdviceService<S, E: Exception> {
    inner: S,
    dispatcher: Dispatcher<E>,
}

impl<S: Clone, E: Exception> Clone for AdviceService<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S, E> Service<Request<Body>> for AdviceService<S, E>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    E: Exception,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let dispatcher = self.dispatcher.clone();

        // The clone may not be ready; keep the service that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let method = request.method().clone();
        let uri = request.uri().clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            match response.extensions_mut().remove::<RaisedException<E>>() {
                Some(RaisedException(exception)) => {
                    tracing::debug!(
                        %method,
                        %uri,
                        kind = ?exception.kind(),
                        "entry point raised an exception"
                    );
                    Ok(dispatcher.dispatch(&exception).into_response())
                }
                None => Ok(response),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Raised;
    use crate::common::{AdviceResponse, FALLBACK_BODY};
    use crate::exception::HandlerRegistry;
    use crate::exception::testing::{TestException, TestKind};
    use axum::{Router, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn dispatcher() -> Dispatcher<TestException> {
        let registry = HandlerRegistry::<TestException>::builder()
            .handler(
                "client",
                [TestKind::NotFound, TestKind::BadRequest],
                |e: &TestException| AdviceResponse::text(StatusCode::BAD_REQUEST, e.to_string()),
            )
            .build()
            .unwrap();
        Dispatcher::new(registry)
    }

    async fn ok() -> Result<&'static str, Raised<TestException>> {
        Ok("fine")
    }

    async fn missing() -> Result<&'static str, Raised<TestException>> {
        Err(TestException::NotFound("Not Found Resources".into()))?
    }

    async fn broken() -> Result<&'static str, Raised<TestException>> {
        Err(TestException::Server("disk full".into()))?
    }

    fn router() -> Router {
        let advised = Router::new()
            .route("/ok", get(ok))
            .route("/missing", get(missing))
            .route("/broken", get(broken))
            .layer(AdviceLayer::new(dispatcher()));

        Router::new()
            .merge(advised)
            .route("/unadvised", get(missing))
    }

    async fn request(uri: &str) -> (StatusCode, String) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_successful_response_passes_through() {
        assert_eq!(request("/ok").await, (StatusCode::OK, "fine".to_string()));
    }

    #[tokio::test]
    async fn test_raised_exception_is_dispatched() {
        assert_eq!(
            request("/missing").await,
            (StatusCode::BAD_REQUEST, "Not Found Resources".to_string())
        );
    }

    #[tokio::test]
    async fn test_unmatched_exception_gets_fallback() {
        assert_eq!(
            request("/broken").await,
            (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string())
        );
    }

    #[tokio::test]
    async fn test_unadvised_route_still_answers_fallback() {
        assert_eq!(
            request("/unadvised").await,
            (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_untouched() {
        let (status, _) = request("/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
