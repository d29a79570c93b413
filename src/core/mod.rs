//! Core application module
//!
//! This module contains:
//! - The command line driver
//! - The host surface abstraction sessions render through

pub mod app;
pub mod host;
