//! Tests for `#[controller_advice]` expansion
//!
//! Handler methods are collected in declaration order and wired into a
//! registry that dispatches like a hand-built one.

use advisor::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShopKind {
    Exception,
    Client,
    OutOfStock,
    InvalidCoupon,
    Unavailable,
}

impl ExceptionKind for ShopKind {
    fn parent(self) -> Option<Self> {
        match self {
            ShopKind::Exception => None,
            ShopKind::Client | ShopKind::Unavailable => Some(ShopKind::Exception),
            ShopKind::OutOfStock | ShopKind::InvalidCoupon => Some(ShopKind::Client),
        }
    }
}

#[derive(Debug, Error)]
enum ShopException {
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("coupon {0} is not valid")]
    InvalidCoupon(String),
    #[error("shop is closed")]
    Unavailable,
}

impl Exception for ShopException {
    type Kind = ShopKind;

    fn kind(&self) -> ShopKind {
        match self {
            ShopException::OutOfStock(_) => ShopKind::OutOfStock,
            ShopException::InvalidCoupon(_) => ShopKind::InvalidCoupon,
            ShopException::Unavailable => ShopKind::Unavailable,
        }
    }
}

struct ShopAdvice {
    support_email: &'static str,
}

#[controller_advice(exception = ShopException)]
impl ShopAdvice {
    #[exception_handler(ShopKind::OutOfStock)]
    fn handle_out_of_stock(&self, exception: &ShopException) -> AdviceResponse {
        AdviceResponse::text(
            StatusCode::CONFLICT,
            format!("{exception}, contact {}", self.support_email),
        )
    }

    #[exception_handler(ShopKind::Client)]
    fn handle_client(exception: &ShopException) -> AdviceResponse {
        AdviceResponse::text(StatusCode::BAD_REQUEST, exception.to_string())
    }

    #[exception_handler(ShopKind::Unavailable, ShopKind::Exception)]
    fn handle_unavailable(&self, _exception: &ShopException) -> anyhow::Result<AdviceResponse> {
        Err(anyhow::anyhow!("status page unreachable"))
    }

    fn not_a_handler(&self) -> &'static str {
        self.support_email
    }
}

fn advice() -> Arc<ShopAdvice> {
    Arc::new(ShopAdvice {
        support_email: "help@shop.test",
    })
}

#[test]
fn test_handlers_registered_in_declaration_order() {
    let registry = advice().handler_registry().unwrap();
    let names: Vec<_> = registry.handlers().iter().map(|h| h.name()).collect();
    assert_eq!(
        names,
        vec!["handle_out_of_stock", "handle_client", "handle_unavailable"]
    );
    assert_eq!(
        registry.handlers()[2].catches(),
        &[ShopKind::Unavailable, ShopKind::Exception]
    );
}

#[test]
fn test_method_handler_sees_advice_state() {
    let dispatcher = advice().dispatcher().unwrap();
    let response = dispatcher.dispatch(&ShopException::OutOfStock("lamp".into()));
    assert_eq!(
        response,
        AdviceResponse::text(
            StatusCode::CONFLICT,
            "lamp is out of stock, contact help@shop.test"
        )
    );
}

#[test]
fn test_associated_function_handler_catches_subtypes() {
    let dispatcher = advice().dispatcher().unwrap();
    let response = dispatcher.dispatch(&ShopException::InvalidCoupon("SPRING".into()));
    assert_eq!(
        response,
        AdviceResponse::text(StatusCode::BAD_REQUEST, "coupon SPRING is not valid")
    );
}

#[test]
fn test_failing_generated_handler_falls_back() {
    let dispatcher = advice().dispatcher().unwrap();
    let response = dispatcher.dispatch(&ShopException::Unavailable);
    assert!(response.is_fallback());
}

#[test]
fn test_plain_methods_are_left_alone() {
    assert_eq!(advice().not_a_handler(), "help@shop.test");
}
