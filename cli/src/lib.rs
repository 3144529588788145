//! Operator front end for the giveaway engine.
//!
//! Each invocation loads the contest snapshot, runs one command, and saves the
//! snapshot back if the command changed anything. Administrative commands are
//! authorized here, against the configured admin identity; the engine itself
//! does not check callers.
//!
//! Referral codes are not part of the snapshot, so `link` issues a fresh code
//! in every process.

pub mod commands;
pub mod config;

pub use commands::{execute, format_winners, Command};
pub use config::Config;
