//! Request and response envelopes

pub mod error;
pub mod json;
pub mod response;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
pub use response::{MessageData, SuccessResponse};
