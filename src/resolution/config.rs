//! Resolution configuration
//!
//! This module provides the options that tune override/hide resolution and interface mapping
//! for a [`crate::resolution::ResolutionContext`].

use crate::metadata::typesystem::DEFAULT_MAX_DEPTH;

/// Configuration for member resolution
///
/// The defaults match the behaviour of current language versions. Presets cover a strict mode
/// that refuses every fallback, and a legacy mode for language versions without covariant
/// return types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolutionConfig {
    /// Allow an overriding or implementing member to return a more derived reference type
    /// than the member it overrides or implements
    pub covariant_returns: bool,

    /// When no override candidate matches with identical custom modifiers, fall back to
    /// modifier-insensitive matching and pick the candidate with the fewest modifiers
    pub custom_modifier_tie_break: bool,

    /// Report methods implementing interface accessors (and the reverse) as mismatched
    /// implementations instead of leaving the slot unimplemented
    pub report_accessor_mismatches: bool,

    /// Describe the forwarding methods an emitter has to synthesize for interface slots
    pub synthesize_bridges: bool,

    /// Maximum number of types above any type in the hierarchy (default: 512)
    pub max_inheritance_depth: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            covariant_returns: true,
            custom_modifier_tie_break: true,
            report_accessor_mismatches: true,
            synthesize_bridges: true,
            max_inheritance_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolutionConfig {
    /// Creates a configuration that only accepts exact matches
    ///
    /// Custom modifiers must agree for an override, and accessor/method mismatches are
    /// left unimplemented instead of being reported.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            covariant_returns: true,
            custom_modifier_tie_break: false,
            report_accessor_mismatches: false,
            synthesize_bridges: true,
            max_inheritance_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates a configuration for language versions without covariant returns
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            covariant_returns: false,
            ..Self::default()
        }
    }
}
