pub mod extractor;
pub mod password;
pub mod request_context;
pub mod time;
pub mod token;
pub mod validate;

pub use extractor::SafeIDI64;
pub use request_context::RequestContext;
