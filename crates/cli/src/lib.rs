#![allow(missing_docs)]
pub mod args;
pub mod cmd;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod runtime;
