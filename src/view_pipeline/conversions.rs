//! Pipeline conversions module
//!
//! This module contains orchestration logic turning raw view vector files
//! into reconciled, boresight-corrected output.

mod reconcile;

#[cfg(test)]
mod tests;

pub use reconcile::ViewVectorPipeline;
