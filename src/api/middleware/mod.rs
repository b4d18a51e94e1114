pub mod cors;
pub mod rate_limit;
pub mod request_id;

pub use cors::{build_cors_middleware, validate_cors_config};
pub use rate_limit::RateLimitMiddleware;
pub use request_id::{RequestId, RequestIdMiddleware};
