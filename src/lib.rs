//! Adaptive-width counter storage for histogram bins.
//!
//! A [`Store`](st::Store) keeps a fixed number of counters in the narrowest
//! integer width that holds them, widening on overflow and switching to
//! weighted `(sum of weights, sum of squared weights)` cells on the first
//! weighted fill.

extern crate base64;
extern crate byteorder;
extern crate bytes;
extern crate miniz_oxide;
extern crate num_traits as num;
extern crate tracing;

pub mod core;
pub use crate::core::errors::*;
pub use crate::core::{WeightedCell, Width};
pub mod st;
pub use crate::st::Store;
pub mod serialization;

#[cfg(test)]
pub mod tests;
