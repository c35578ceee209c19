//! Data types for grid layout: cell values, blocks, grids and options.

mod block;
mod cell;
mod options;

pub use block::*;
pub use cell::*;
pub use options::*;
