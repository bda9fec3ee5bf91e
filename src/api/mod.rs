//! HTTP surface
//!
//! Handlers only translate between HTTP and the service layer.

pub mod services;

pub use services::configure;
