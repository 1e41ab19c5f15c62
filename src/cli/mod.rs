//! Command Line Interface (CLI) layer for rendr.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `render` and `still`
//! commands. It wires user-provided options to the argument resolver
//! exposed via `rendr::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
