pub mod advice;
pub mod controller;
pub mod exception;

pub use advice::SimpleExceptionAdvice;
pub use controller::SimpleController;
