//! Member resolution over a validated type graph.
//!
//! This module answers three questions about the members of a [`crate::metadata::typesystem::TypeGraph`]:
//! which base members a member overrides, which it hides, and which member provides the
//! implementation of each interface member a type is required to implement.
//!
//! # Key Components
//!
//! - [`ResolutionContext`] - Per-compilation entry point owning all memoization caches
//! - [`SignatureComparer`] - Structural signature matching under generic substitution
//! - [`SymbolIdentity`] - Identity and hashing of types and members in three strictness modes
//! - [`OverrideHideResult`] - Overridden and hidden base members of one member
//! - [`InterfaceImplementationMap`] - Implementations of every interface slot of one type
//! - [`ResolutionConfig`] - Behavioural switches and presets
//! - [`VisibilityFilter`] - Accessibility rule for implicit interface implementations
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::prelude::*;
//!
//! let graph = TypeGraph::new("Sample");
//! let disposable = TypeBuilder::new(&graph).interface("System", "IDisposable").build()?;
//! let dispose = MethodBuilder::new(&graph, disposable, "Dispose").abstract_().build()?;
//! let file = TypeBuilder::new(&graph)
//!     .class("App", "File")
//!     .implements_type(disposable)
//!     .build()?;
//! let close = MethodBuilder::new(&graph, file, "Dispose").build()?;
//!
//! let context = ResolutionContext::new(Arc::new(graph))?;
//! let found = context.find_implementation(file, dispose)?;
//! assert_eq!(found.and_then(|result| result.member()), Some(close));
//! # Ok::<(), memberscope::Error>(())
//! ```

mod comparer;
mod config;
mod context;
mod identity;
mod interfaces;
mod overrides;
mod visibility;

pub use comparer::{ComparisonFlags, MemberMatch, SignatureComparer, SignatureMode};
pub use config::ResolutionConfig;
pub use context::ResolutionContext;
pub use identity::{ComparisonMode, MemberRef, SymbolIdentity};
pub use interfaces::{
    ForwardingMethod, ForwardingReason, ImplementationResult, InterfaceImplementation,
    InterfaceImplementationMap, InterfaceSlot, NearMiss, SignatureMismatchKind,
};
pub use overrides::{HiddenAbstractMember, OverrideHideResult};
pub use visibility::{PublicMemberFilter, VisibilityFilter};
