//! Streamcat - media catalog delivery service
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod policy;
pub mod server;
pub mod streaming;
