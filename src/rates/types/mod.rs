pub mod request;
pub mod response;

pub use request::ConvertRequest;
pub use response::{ApiError, ConvertResponse};
