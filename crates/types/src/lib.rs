#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts)]
#![allow(missing_docs)]

pub mod aliases;
pub mod engine_api;
pub mod hash;
pub mod txpool;

pub use hash::{Hash, Tx};
