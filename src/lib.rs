// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # memberscope
//!
//! Member resolution for statically typed, class and interface based languages. Given a bound
//! type graph, `memberscope` determines for every method, property, indexer, event and
//! accessor which base members it **overrides**, which it merely **hides**, and which member
//! provides the runtime **implementation** of each interface member a type is required to
//! implement.
//!
//! ## Features
//!
//! - **Signature matching under generic substitution** - positional type parameters, composed
//!   along base chains and interface closures
//! - **Covariant returns** - more derived reference return types for overrides and interface
//!   implementations
//! - **Partial accessor overriding** - properties overriding a single accessor, with the
//!   missing accessor inherited through the override chain
//! - **Association based accessors** - accessors are tied to their property or event through an
//!   explicit relation, never through their names
//! - **Explicit over implicit** - explicit interface implementations win at every level
//! - **Reportable mismatches** - methods implementing accessors (and the reverse) are returned
//!   with a mismatch tag instead of being dropped
//! - **Concurrent, compute-once caches** - results are memoized per member and per type and can
//!   be precomputed in parallel
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::prelude::*;
//!
//! let graph = TypeGraph::new("Sample");
//!
//! // interface IShape { double Area { get; } }
//! let shape = TypeBuilder::new(&graph).interface("App", "IShape").build()?;
//! let area = PropertyBuilder::new(&graph, shape, "Area")
//!     .of_type(TypeSig::I8)
//!     .getter()
//!     .abstract_()
//!     .build()?;
//!
//! // class Square : IShape { public virtual long Area { get; } }
//! let square = TypeBuilder::new(&graph).class("App", "Square").implements_type(shape).build()?;
//! let square_area = PropertyBuilder::new(&graph, square, "Area")
//!     .of_type(TypeSig::I8)
//!     .getter()
//!     .virtual_()
//!     .build()?;
//!
//! let context = ResolutionContext::new(Arc::new(graph))?;
//! let found = context.find_implementation(square, area)?;
//! assert_eq!(found.and_then(|result| result.member()), Some(square_area));
//! # Ok::<(), memberscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `memberscope` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Tokens, signatures, members and the type graph
//! - [`resolution`] - Signature comparison, symbol identity, override/hide resolution and
//!   interface implementation maps
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Building and validating a graph can fail; resolving a validated graph cannot. Queries only
//! return errors for tokens that are not part of the graph:
//!
//! ```rust
//! use std::sync::Arc;
//! use memberscope::{Error, prelude::*};
//!
//! let context = ResolutionContext::new(Arc::new(TypeGraph::new("Sample")))?;
//! match context.resolve_override_hide(Token::new(0x0600_0001)) {
//!     Err(Error::MemberNotFound(token)) => println!("unknown member {token}"),
//!     Err(e) => println!("other error: {e}"),
//!     Ok(result) => println!("{} hidden", result.hidden().len()),
//! }
//! # Ok::<(), memberscope::Error>(())
//! ```
//!
//! ## Logging
//!
//! Cache misses, walk decisions and tie-breaks are reported through [`tracing`]. The library
//! never installs a subscriber.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use memberscope::prelude::*;
///
/// let graph = TypeGraph::new("Sample");
/// let widget = TypeBuilder::new(&graph).class("App", "Widget").build()?;
/// assert_eq!(graph.get_type(widget)?.kind, TypeKind::Class);
/// # Ok::<(), memberscope::Error>(())
/// ```
pub mod prelude;

/// Symbols consumed by member resolution
///
/// This module holds the bound symbol model: [`metadata::token::Token`] handles,
/// [`metadata::signatures`] with generic substitution, [`metadata::member`] declarations and
/// the [`metadata::typesystem::TypeGraph`] with its builders and validation.
pub mod metadata;

/// Override/hide resolution and interface implementation maps
///
/// See [`resolution::ResolutionContext`] for the entry point.
pub mod resolution;

/// `memberscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `memberscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

pub use resolution::{ResolutionConfig, ResolutionContext};
