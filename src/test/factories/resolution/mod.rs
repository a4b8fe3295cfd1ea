//! Scenario factories for override/hide resolution and interface mapping.

mod interfaces;
mod overrides;

pub use interfaces::*;
pub use overrides::*;
