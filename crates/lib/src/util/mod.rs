//! Shared utilities.
//!
//! Path normalization for toolchain arguments and test helpers.

pub mod path;

#[cfg(test)]
pub mod testutil;
