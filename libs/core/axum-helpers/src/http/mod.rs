//! HTTP middleware: CORS policy and security headers.

pub mod cors;
pub mod security;

pub use cors::{CorsPolicy, create_cors_layer};
pub use security::security_headers;
