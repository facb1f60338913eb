//! Configuration module
//!
//! Settings file handling: data location, post board, startup selection
//! and display options.

pub mod config;
