//! Common utilities module
//!
//! This module contains shared utilities used across the view vector pipeline.

pub mod error;

pub use error::{Result, ViewVectorError};
