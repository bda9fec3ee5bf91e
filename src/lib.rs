//! TinyLink - a small URL shortener
//!
//! Maps short alphanumeric codes to target URLs and serves redirects while
//! counting clicks.
//!
//! # Architecture
//! - `services`: code generation, the link registry and the redirect resolver
//! - `storage`: the `LinkStore` boundary and its SeaORM backend
//! - `api`: HTTP routes (actix-web)
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: server and CLI entry points
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
