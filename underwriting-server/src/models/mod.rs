//! Request models

pub mod analysis;

pub use analysis::*;
