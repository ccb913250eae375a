//! Shared data types for Berth tooling.

pub mod requirements;

pub use requirements::{NumericRange, Requirements};
