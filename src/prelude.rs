//! # memberscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the memberscope library. Import this module to get quick access to the essential
//! types for building a type graph and resolving its members.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all memberscope operations
pub use crate::Error;

/// The result type used throughout memberscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Per-compilation member resolution
pub use crate::resolution::{ResolutionConfig, ResolutionContext};

/// The type graph and its builders
pub use crate::metadata::typesystem::{
    EventBuilder, MethodBuilder, PropertyBuilder, TypeBuilder, TypeGraph, TypeKind, TypeNode,
};

// ================================================================================================
// Symbols and Signatures
// ================================================================================================

/// Handles for types and members
pub use crate::metadata::token::Token;

/// Members and their classification
pub use crate::metadata::member::{Accessibility, AccessorKind, Member, MemberKind, SymbolOrigin};

/// Type and member signatures, and generic substitution
pub use crate::metadata::signatures::{
    CustomModifier, PassingMode, Signature, SignatureParameter, TypeMap, TypeSig,
};

// ================================================================================================
// Resolution Results
// ================================================================================================

/// Comparison of signatures and symbols
pub use crate::resolution::{
    ComparisonFlags, ComparisonMode, MemberMatch, MemberRef, SignatureComparer, SignatureMode,
    SymbolIdentity,
};

/// Override/hide and interface implementation results
pub use crate::resolution::{
    ForwardingMethod, ForwardingReason, HiddenAbstractMember, ImplementationResult,
    InterfaceImplementation, InterfaceImplementationMap, InterfaceSlot, NearMiss,
    OverrideHideResult, SignatureMismatchKind,
};

/// Accessibility rules for implicit interface implementations
pub use crate::resolution::{PublicMemberFilter, VisibilityFilter};
