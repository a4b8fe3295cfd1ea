//! Symbol model consumed by member resolution.
//!
//! This module contains the bound representation of a compilation's declarations: tokens,
//! type signatures with their generic substitution, members with their modifiers and accessor
//! associations, and the type graph tying them together.
//!
//! # Key Components
//!
//! - [`token`] - Handles naming types and members
//! - [`signatures`] - Type signatures, member signatures and the [`signatures::TypeMap`]
//!   substitution
//! - [`member`] - Methods, accessors, properties and events
//! - [`typesystem`] - The [`typesystem::TypeGraph`], its builders and hierarchy walks
//!
//! # Examples
//!
//! ```rust
//! use memberscope::metadata::{
//!     signatures::TypeSig,
//!     typesystem::{PropertyBuilder, TypeBuilder, TypeGraph},
//! };
//!
//! let graph = TypeGraph::new("Sample");
//! let widget = TypeBuilder::new(&graph).class("App", "Widget").build()?;
//! let title = PropertyBuilder::new(&graph, widget, "Title")
//!     .of_type(TypeSig::STRING)
//!     .getter()
//!     .setter()
//!     .build()?;
//!
//! let title = graph.get_member(title)?;
//! assert_eq!(title.accessors.count(), 2);
//! assert_eq!(graph.members_of(widget).len(), 3);
//! # Ok::<(), memberscope::Error>(())
//! ```

/// Implementation of members and their accessor associations
pub mod member;
/// Implementation of type and member signatures
pub mod signatures;
/// Implementation of the `Token` handle
pub mod token;
/// Implementation of the type graph
pub mod typesystem;
