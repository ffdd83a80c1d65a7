//! CLI command implementations.

pub mod inspect;
pub mod repl;
pub mod verify;
