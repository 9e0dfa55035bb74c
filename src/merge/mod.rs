//! Merge module - Recursive structural merge of values.
//!
//! This module provides the merge entry points, the pluggable array
//! strategies and the options that drive them.

mod array;
mod config;
mod error;
mod merger;
mod options;


pub use array::*;
pub use config::*;
pub use error::*;
pub use merger::*;
pub use options::*;
