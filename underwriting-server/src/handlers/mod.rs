//! HTTP handlers

pub mod health;
pub mod features;
pub mod analyze;
pub mod letters;
