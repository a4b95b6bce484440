pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
