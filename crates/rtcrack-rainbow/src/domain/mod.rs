//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod chain;
pub mod charset;
pub mod coverage;
pub mod digest;
pub mod reduction;
pub mod table;
pub mod table_format;
