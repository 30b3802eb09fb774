//! Test utilities and helper functions for lit-air tests

pub mod fixtures;

pub use fixtures::*;
pub use generators::*;
pub use helpers::*;
pub use mocks::*;
