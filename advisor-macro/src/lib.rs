use proc_macro::TokenStream;

mod advice;

/// Attribute macro turning an impl block into a set of exception handlers
///
/// Every method tagged with `#[exception_handler(...)]` is registered, in
/// declaration order, for the exception kinds listed in its attribute.
/// The macro generates `handler_registry(self: Arc<Self>)` and
/// `dispatcher(self: Arc<Self>)`.
///
/// # Example
/// ```rust,ignore
/// #[controller_advice(exception = AppException)]
/// impl ExceptionAdvice {
///     #[exception_handler(AppExceptionKind::BadRequest)]
///     fn handle_bad_request(&self, exception: &AppException) -> AdviceResponse {
///         AdviceResponse::text(StatusCode::BAD_REQUEST, exception.to_string())
///     }
/// }
///
/// let dispatcher = Arc::new(ExceptionAdvice).dispatcher()?;
/// ```
#[proc_macro_attribute]
pub fn controller_advice(attr: TokenStream, item: TokenStream) -> TokenStream {
    advice::controller_advice_attribute(attr, item)
}

/// Marks an exception handler method inside a `#[controller_advice]` impl block
///
/// # Example
/// ```rust,ignore
/// #[exception_handler(AppExceptionKind::NotFound, AppExceptionKind::Gone)]
/// fn handle_missing(&self, exception: &AppException) -> AdviceResponse { ... }
/// ```
#[proc_macro_attribute]
pub fn exception_handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    advice::exception_handler_attribute(attr, item)
}
