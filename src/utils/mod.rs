//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `courier` application.
//!
//! It centralizes the error types shared by the sender, the storage layer
//! and the web surface, plus the logging bootstrap.

pub mod error;
pub mod logging;
