//! Loading and validation of rule configuration.

pub mod load;

pub use load::*;
