//! Application lifecycle and execution modes

pub mod cli;
pub mod server;
pub mod startup;

pub use cli::run_cli;
pub use server::run_server;
