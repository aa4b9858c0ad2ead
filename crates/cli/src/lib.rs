//! # OpsDesk CLI
//!
//! One-shot subcommands over the dashboard plus an interactive shell.

pub mod commands;
pub mod context;
pub mod interactive;
pub mod render;
