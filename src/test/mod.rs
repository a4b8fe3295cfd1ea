//! Shared scenario factories for unit tests.

pub mod factories;

pub use factories::resolution::*;
