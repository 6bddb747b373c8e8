//! Command implementations for the contentmeta CLI.
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod generate;
