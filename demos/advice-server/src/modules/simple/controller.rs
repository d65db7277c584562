use super::exception::AppException;
use advisor::prelude::*;
use axum::routing::get;

pub struct SimpleController;

impl SimpleController {
    pub fn base_path() -> &'static str {
        "/api/test"
    }

    pub fn router() -> Router {
        Router::new()
            .route("/not-found", get(Self::not_found))
            .route("/bad-request", get(Self::bad_request))
    }

    async fn not_found() -> std::result::Result<String, Raised<AppException>> {
        Err(AppException::not_found("Not Found Resources"))?
    }

    async fn bad_request() -> std::result::Result<String, Raised<AppException>> {
        Err(AppException::bad_request("Bad Request"))?
    }
}
