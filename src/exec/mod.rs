// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`backend`] defines the `TaskRunner` trait the runtime dispatches
//!   through, so tests can substitute a fake implementation.
//! - [`command`] implements it with real OS processes via
//!   `tokio::process::Command`.

pub mod backend;
pub mod command;

pub use backend::TaskRunner;
pub use command::CommandRunner;
