//! HTTP gateway to the cafe backend.
//!
//! - [`request`]: Transport-neutral request/response types and operation tags
//! - [`gateway`]: Request builders and response decoding

pub mod gateway;
pub mod request;

pub use gateway::{ApiGateway, ApiReply};
pub use request::{HttpMethod, HttpRequest, HttpResponse, Operation};
