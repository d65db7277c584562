pub mod response;

pub use response::{AdviceResponse, FALLBACK_BODY, ResponseBody};
