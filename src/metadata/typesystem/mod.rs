//! Type graph consumed by member resolution.
//!
//! This module provides the bound, cycle-free representation of a compilation's types: their
//! identities, generic parameters, base type and interface references (already expressed in the
//! declaring type's generic space) and declared members. It is populated once, validated, and
//! read concurrently afterwards.
//!
//! # Key Components
//!
//! - [`TypeNode`]: A class, struct or interface declaration
//! - [`TypeGraph`]: Arena of all types and members of a compilation
//! - [`TypeBuilder`], [`MethodBuilder`], [`PropertyBuilder`], [`EventBuilder`]: Fluent construction
//! - [`BaseChain`], [`InterfaceClosure`]: Iterative hierarchy walks with composed substitutions
//! - [`TypeSignatureHash`]: Order-sensitive hashing of type identities
//!
//! # Identity
//!
//! A type is identified logically by its [`TypeKey`] (assembly, namespace, name and arity). The
//! same logical type may be present twice in a graph, once declared in source and once loaded
//! from metadata; both share a key and are treated as the same type by the identity service.
//!
//! # Examples
//!
//! ```rust
//! use memberscope::metadata::typesystem::{TypeBuilder, TypeGraph};
//!
//! let graph = TypeGraph::new("Sample");
//! let base = TypeBuilder::new(&graph).class("App", "Base").build()?;
//! let derived = TypeBuilder::new(&graph)
//!     .class("App", "Derived")
//!     .extends_type(base)
//!     .build()?;
//!
//! let node = graph.get_type(derived)?;
//! assert_eq!(node.fullname(), "App.Derived");
//! assert_eq!(node.base().and_then(|base| base.def()), Some(base));
//! # Ok::<(), memberscope::Error>(())
//! ```

mod builder;
mod hash;
mod hierarchy;
mod registry;
mod validation;

use std::sync::{Arc, OnceLock};

use bitflags::bitflags;
use strum::Display;

pub use builder::{EventBuilder, MethodBuilder, PropertyBuilder, TypeBuilder};
pub use hash::TypeSignatureHash;
pub use hierarchy::{BaseChain, ChainLink, InterfaceClosure, DEFAULT_MAX_DEPTH};
pub use registry::TypeGraph;

use crate::{
    metadata::{member::MemberList, member::SymbolOrigin, signatures::TypeSig, token::Token},
    Result,
};

/// A reference to a `TypeNode`
pub type TypeNodeRc = Arc<TypeNode>;
/// A growable list of interface references
pub type InterfaceList = Arc<boxcar::Vec<TypeSig>>;

/// The category of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeKind {
    /// A reference type with single inheritance
    Class,
    /// A value type
    Struct,
    /// An interface
    Interface,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Declared type modifiers
    pub struct TypeModifiers: u32 {
        /// Cannot be instantiated
        const ABSTRACT = 0x0001;
        /// Cannot be derived from
        const SEALED = 0x0002;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Special constraints of a generic parameter
    pub struct GenericConstraints: u32 {
        /// `class` constraint, the argument is a reference type
        const REFERENCE_TYPE = 0x0004;
        /// `struct` constraint, the argument is a value type
        const VALUE_TYPE = 0x0008;
        /// `new()` constraint
        const DEFAULT_CONSTRUCTOR = 0x0010;
    }
}

/// A generic parameter of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    /// Declared name, informational only
    pub name: String,
    /// Special constraints
    pub constraints: GenericConstraints,
    /// Type constraints, in the declaring type's space
    pub bounds: Vec<TypeSig>,
}

/// Logical identity of a type, shared by source and metadata views of the same declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    /// Declaring assembly
    pub assembly: String,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Number of generic parameters
    pub arity: usize,
}

/// A class, struct or interface declaration
pub struct TypeNode {
    /// Token of this type
    pub token: Token,
    /// Declaration category
    pub kind: TypeKind,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Declaring assembly
    pub assembly: String,
    /// Whether the declaration comes from source or from metadata
    pub origin: SymbolOrigin,
    /// Declared modifiers
    pub flags: TypeModifiers,
    /// Ordered generic parameters
    pub generic_params: Vec<GenericParam>,
    base: OnceLock<TypeSig>,
    /// Directly implemented or extended interfaces, in this type's space
    pub interfaces: InterfaceList,
    /// Declared members, in declaration order
    pub members: MemberList,
}

impl TypeNode {
    /// Creates a new type without base, interfaces or members
    #[must_use]
    pub fn new(
        token: Token,
        kind: TypeKind,
        namespace: String,
        name: String,
        assembly: String,
        origin: SymbolOrigin,
    ) -> Self {
        TypeNode {
            token,
            kind,
            namespace,
            name,
            assembly,
            origin,
            flags: TypeModifiers::empty(),
            generic_params: Vec::new(),
            base: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            members: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the base type of this type, if it exists
    pub fn base(&self) -> Option<&TypeSig> {
        self.base.get()
    }

    /// Set the base type of this type.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if a different base was already assigned
    pub fn set_base(&self, base: TypeSig) -> Result<()> {
        match self.base.get() {
            Some(existing) if *existing == base => Ok(()),
            Some(_) => Err(crate::Error::TypeInsert(self.token)),
            None => self
                .base
                .set(base)
                .map_err(|_| crate::Error::TypeInsert(self.token)),
        }
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Logical identity of this type
    pub fn key(&self) -> TypeKey {
        TypeKey {
            assembly: self.assembly.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            arity: self.generic_params.len(),
        }
    }

    /// Number of generic parameters
    pub fn arity(&self) -> usize {
        self.generic_params.len()
    }

    /// The open instantiation of this type over its own parameters
    pub fn self_sig(&self) -> TypeSig {
        TypeSig::generic(
            self.token,
            (0..self.arity() as u32).map(TypeSig::TypeParam).collect(),
        )
    }

    /// Returns true for interfaces
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns true for classes and interfaces
    pub fn is_reference_type(&self) -> bool {
        self.kind != TypeKind::Struct
    }

    /// Returns true if declared `abstract`
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeModifiers::ABSTRACT)
    }
}

impl std::fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeNode")
            .field("token", &self.token)
            .field("kind", &self.kind)
            .field("fullname", &self.fullname())
            .field("assembly", &self.assembly)
            .field("origin", &self.origin)
            .field("base", &self.base.get())
            .finish_non_exhaustive()
    }
}
