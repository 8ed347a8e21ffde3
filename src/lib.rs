//! # Burn Fact Check
#![forbid(unsafe_code)]

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// HTTP server
pub mod server;

/// Inference backend selection
pub mod backend;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
