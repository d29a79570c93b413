//! Clip session messages
//!
//! This module contains:
//! - Input messages from the pointer, the toolbar and the text field
//! - Events the session reports to its owner

pub mod messages;
