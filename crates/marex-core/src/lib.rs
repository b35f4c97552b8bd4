//! Core data types, filtering, and rollup calculations for the marine explorer
//!
//! Everything here is synchronous and side-effect free: a loaded
//! [`Dataset`] goes in, filtered views and aggregates come out.

pub mod filter;
pub mod pipeline;
pub mod rollups;
pub mod types;

pub use filter::*;
pub use pipeline::*;
pub use rollups::*;
pub use types::*;
