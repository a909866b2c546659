//! Logic Module - Business Logic & Engines
//!
//! Leaves first: features -> dataset -> model -> explain -> letter,
//! tied together by `pipeline`.

pub mod config;
pub mod features;
pub mod dataset;
pub mod model;
pub mod explain;
pub mod letter;
pub mod pipeline;
