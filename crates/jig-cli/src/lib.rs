//! Jig Shell
//!
//! Headless front end for parametric assemblies: loads parameters and
//! configuration, processes edits as queued actions, keeps the scene in step
//! and exports STL.

pub mod actions;
pub mod args;
pub mod error;
pub mod state;

pub use args::Cli;
pub use error::CliError;
pub use state::{AppAction, AppState};
