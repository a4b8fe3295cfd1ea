//! Factory methods building type graphs for resolution tests.

pub mod resolution;
