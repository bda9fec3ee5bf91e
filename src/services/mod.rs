//! Service layer for business logic
//!
//! Registry and resolver logic shared by the HTTP API and the CLI.

pub mod code_generator;
mod link_service;
pub mod redirect;

pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use link_service::*;
pub use redirect::{
    CLICK_ACCOUNTING_TARGET, ClickAccounting, ClickAccountingSnapshot, RedirectResolver,
};
