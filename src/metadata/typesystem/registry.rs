//! Central arena of types and members for a compilation.
//!
//! This module provides the [`TypeGraph`], a thread-safe store for every type and member that
//! participates in member resolution. Types and members receive their tokens from atomic row
//! counters, are stored in lock-free skip lists keyed by token, and are indexed by full name and
//! by logical [`TypeKey`].
//!
//! # Thread Safety
//!
//! The graph is designed to be populated from several threads and read without locking:
//! - Lock-free primary storage (`SkipMap`)
//! - Concurrent hash maps for the name and key indices (`DashMap`)
//! - Atomic row allocation
//! - Append-only member and interface lists (`boxcar::Vec`)
//!
//! Once [`TypeGraph::validate`] succeeded the graph is treated as an immutable snapshot.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{
        member::{AccessorKind, Member, MemberKind, MemberRc, SymbolOrigin},
        signatures::TypeSig,
        token::{Token, TABLE_EVENT, TABLE_METHOD_DEF, TABLE_PROPERTY, TABLE_TYPE_DEF},
        typesystem::{TypeKey, TypeNode, TypeNodeRc},
    },
    Error::{MemberNotFound, TypeNotFound},
    Result,
};

/// Arena of all types and members of one compilation.
///
/// # Examples
///
/// ```rust
/// use memberscope::metadata::typesystem::{TypeBuilder, TypeGraph};
///
/// let graph = TypeGraph::new("Sample");
/// let widget = TypeBuilder::new(&graph).class("App", "Widget").build()?;
///
/// assert_eq!(graph.get_by_fullname("App.Widget").map(|node| node.token), Some(widget));
/// # Ok::<(), memberscope::Error>(())
/// ```
pub struct TypeGraph {
    /// Assembly that source declarations belong to
    assembly: String,
    /// Primary type storage indexed by token
    types: SkipMap<Token, TypeNodeRc>,
    /// Primary member storage indexed by token
    members: SkipMap<Token, MemberRc>,
    /// Row counter for type tokens
    next_type_row: AtomicU32,
    /// Row counter shared by every member table
    next_member_row: AtomicU32,
    /// Secondary index: types by full name (namespace.name)
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Secondary index: types by logical identity, first registered first
    types_by_key: DashMap<TypeKey, Vec<Token>>,
}

impl TypeGraph {
    /// Create an empty graph for the assembly named `assembly`
    #[must_use]
    pub fn new(assembly: &str) -> Self {
        TypeGraph {
            assembly: assembly.to_string(),
            types: SkipMap::new(),
            members: SkipMap::new(),
            next_type_row: AtomicU32::new(1),
            next_member_row: AtomicU32::new(1),
            types_by_fullname: DashMap::new(),
            types_by_key: DashMap::new(),
        }
    }

    /// Name of the assembly that source declarations belong to
    #[must_use]
    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    /// Allocate the token for a new type
    pub fn next_type_token(&self) -> Token {
        Token::from_parts(
            TABLE_TYPE_DEF,
            self.next_type_row.fetch_add(1, Ordering::Relaxed),
        )
    }

    /// Allocate the token for a new member of kind `kind`
    pub fn next_member_token(&self, kind: MemberKind) -> Token {
        let table = match kind {
            MemberKind::Method | MemberKind::Accessor(_) => TABLE_METHOD_DEF,
            MemberKind::Property => TABLE_PROPERTY,
            MemberKind::Event => TABLE_EVENT,
        };
        Token::from_parts(table, self.next_member_row.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a type and index it by full name and logical key
    pub fn insert_type(&self, node: TypeNode) -> TypeNodeRc {
        let node = Arc::new(node);
        let token = node.token;

        self.types_by_fullname
            .entry(node.fullname())
            .or_default()
            .push(token);
        self.types_by_key.entry(node.key()).or_default().push(token);
        self.types.insert(token, node.clone());

        node
    }

    /// Register a member and append it to its declaring type's member list
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the declaring type is not part of the graph
    pub fn insert_member(&self, member: Member) -> Result<MemberRc> {
        let owner = self.get_type(member.declaring_type)?;
        let member = Arc::new(member);

        self.members.insert(member.token, member.clone());
        owner.members.push(member.token);

        Ok(member)
    }

    /// Get a type by token
    #[must_use]
    pub fn type_node(&self, token: Token) -> Option<TypeNodeRc> {
        self.types.get(&token).map(|entry| entry.value().clone())
    }

    /// Get a type by token
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `token` is not a type of the graph
    pub fn get_type(&self, token: Token) -> Result<TypeNodeRc> {
        self.type_node(token).ok_or(TypeNotFound(token))
    }

    /// Get a member by token
    #[must_use]
    pub fn member(&self, token: Token) -> Option<MemberRc> {
        self.members.get(&token).map(|entry| entry.value().clone())
    }

    /// Get a member by token
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if `token` is not a member of the graph
    pub fn get_member(&self, token: Token) -> Result<MemberRc> {
        self.member(token).ok_or(MemberNotFound(token))
    }

    /// The type referenced by a named signature, annotations ignored
    #[must_use]
    pub fn resolve(&self, sig: &TypeSig) -> Option<TypeNodeRc> {
        sig.def().and_then(|def| self.type_node(def))
    }

    /// Declared members of `type_token`, in declaration order
    pub fn members_of(&self, type_token: Token) -> Vec<MemberRc> {
        match self.type_node(type_token) {
            Some(node) => node
                .members
                .iter()
                .filter_map(|(_, token)| self.member(*token))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Declared members of `type_token` named `name`, in declaration order
    pub fn members_named(&self, type_token: Token, name: &str) -> Vec<MemberRc> {
        self.members_of(type_token)
            .into_iter()
            .filter(|member| member.name == name)
            .collect()
    }

    /// The accessor of kind `kind` owned by the property or event `owner`
    pub fn accessor(&self, owner: &Member, kind: AccessorKind) -> Option<MemberRc> {
        owner
            .accessors
            .iter()
            .filter_map(|(_, token)| self.member(*token))
            .find(|accessor| accessor.kind == MemberKind::Accessor(kind))
    }

    /// The property or event owning the accessor `accessor`
    pub fn owner_of(&self, accessor: &Member) -> Option<MemberRc> {
        accessor
            .associated_member()
            .and_then(|owner| self.member(owner))
    }

    /// Whether the declaring type of `member` comes from source
    pub fn member_origin(&self, member: &Member) -> SymbolOrigin {
        self.type_node(member.declaring_type)
            .map_or(SymbolOrigin::Source, |node| node.origin)
    }

    /// The first registered type sharing `token`'s logical identity.
    ///
    /// Source and metadata views of one declaration share a key; this returns the same token
    /// for both, or `token` itself for unknown tokens.
    pub fn canonical(&self, token: Token) -> Token {
        let Some(node) = self.type_node(token) else {
            return token;
        };

        self.types_by_key
            .get(&node.key())
            .and_then(|tokens| tokens.first().copied())
            .unwrap_or(token)
    }

    /// `sig` with every definition replaced by its canonical token and annotations removed.
    ///
    /// Two instantiations denote the same type exactly when their canonical signatures are
    /// equal, which makes the result usable as a map key.
    pub fn canonical_sig(&self, sig: &TypeSig) -> TypeSig {
        match sig {
            TypeSig::Named { def, args } => TypeSig::Named {
                def: self.canonical(*def),
                args: args.iter().map(|arg| self.canonical_sig(arg)).collect(),
            },
            TypeSig::Nullable(inner) => self.canonical_sig(inner),
            TypeSig::SzArray(base) => TypeSig::SzArray(Box::new(self.canonical_sig(base))),
            TypeSig::Array { base, rank } => TypeSig::Array {
                base: Box::new(self.canonical_sig(base)),
                rank: *rank,
            },
            TypeSig::Ptr(base) => TypeSig::Ptr(Box::new(self.canonical_sig(base))),
            TypeSig::Primitive(_) | TypeSig::TypeParam(_) | TypeSig::MethodParam(_) => {
                sig.clone()
            }
        }
    }

    /// Look up the first type registered under the full name `fullname`
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeNodeRc> {
        self.types_by_fullname
            .get(fullname)
            .and_then(|tokens| tokens.first().copied())
            .and_then(|token| self.type_node(token))
    }

    /// Look up every type registered under the full name `fullname`
    pub fn get_by_fullname_list(&self, fullname: &str) -> Vec<TypeNodeRc> {
        self.types_by_fullname
            .get(fullname)
            .map(|tokens| {
                tokens
                    .iter()
                    .filter_map(|token| self.type_node(*token))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns all types, ordered by token
    pub fn all_types(&self) -> Vec<TypeNodeRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Returns all members, ordered by token
    pub fn all_members(&self) -> Vec<MemberRc> {
        self.members
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of types in the graph
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the graph has no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for TypeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeGraph")
            .field("assembly", &self.assembly)
            .field("types", &self.types.len())
            .field("members", &self.members.len())
            .finish()
    }
}
