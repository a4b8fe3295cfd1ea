//! Per-compilation resolution context.
//!
//! [`ResolutionContext`] owns the memoization caches of override/hide results and interface
//! maps for one validated [`TypeGraph`]. Every query is computed at most once per key: the
//! concurrent map only hands out the per-key cell, and the computation itself runs inside the
//! cell's initializer, so no map lock is held while resolving other keys.
//!
//! # Thread Safety
//!
//! The context is `Send + Sync`. Queries may be issued from any number of threads; callers
//! asking for the same key concurrently observe one computation and receive the same `Arc`.
//!
//! An initializer queries other keys while its own cell is being initialized. Those queries
//! only point upward: an accessor depends on its owning property or event, a member on members
//! of its base types and of the interfaces it extends, and an interface map on override
//! results. Nothing depends on an interface map. [`TypeGraph::validate`] rejects inheritance
//! cycles, so the dependencies of a key never lead back to it and no initializer waits on a
//! cell it holds.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    metadata::{
        member::{AccessorKind, MemberRc},
        signatures::TypeSig,
        token::Token,
        typesystem::{TypeGraph, TypeNodeRc},
    },
    resolution::{
        comparer::{ComparisonFlags, SignatureComparer},
        config::ResolutionConfig,
        identity::SymbolIdentity,
        interfaces::{ImplementationResult, InterfaceImplementationMap, InterfaceSlot},
        overrides::{HiddenAbstractMember, OverrideHideResult},
        visibility::{PublicMemberFilter, VisibilityFilter},
    },
    Result,
};

/// A write-once cell per key
type Cache<T> = DashMap<Token, Arc<OnceLock<Arc<T>>>>;

/// Member resolution over one validated type graph.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use memberscope::prelude::*;
///
/// let graph = TypeGraph::new("Sample");
/// let base = TypeBuilder::new(&graph).class("App", "Base").build()?;
/// let base_run = MethodBuilder::new(&graph, base, "Run").virtual_().build()?;
/// let derived = TypeBuilder::new(&graph).class("App", "Derived").extends_type(base).build()?;
/// let run = MethodBuilder::new(&graph, derived, "Run").override_().build()?;
///
/// let context = ResolutionContext::new(Arc::new(graph))?;
/// assert_eq!(context.overridden_member(run)?, Some(base_run));
/// # Ok::<(), memberscope::Error>(())
/// ```
pub struct ResolutionContext {
    graph: Arc<TypeGraph>,
    config: ResolutionConfig,
    filter: Arc<dyn VisibilityFilter>,
    overrides: Cache<OverrideHideResult>,
    interface_maps: Cache<InterfaceImplementationMap>,
    empty: Arc<OverrideHideResult>,
}

impl ResolutionContext {
    /// Create a context with the default configuration.
    ///
    /// # Errors
    /// Returns an error if the graph fails [`TypeGraph::validate`]
    pub fn new(graph: Arc<TypeGraph>) -> Result<Self> {
        Self::with_config(graph, ResolutionConfig::default())
    }

    /// Create a context with `config`.
    ///
    /// # Errors
    /// Returns an error if the graph fails [`TypeGraph::validate`] with the configured depth
    pub fn with_config(graph: Arc<TypeGraph>, config: ResolutionConfig) -> Result<Self> {
        graph.validate(config.max_inheritance_depth)?;
        debug!(assembly = graph.assembly(), types = graph.len(), "created resolution context");

        Ok(ResolutionContext {
            graph,
            config,
            filter: Arc::new(PublicMemberFilter),
            overrides: DashMap::new(),
            interface_maps: DashMap::new(),
            empty: Arc::new(OverrideHideResult::default()),
        })
    }

    /// Replace the accessibility rule for implicit interface implementations.
    ///
    /// Cached interface maps are discarded.
    #[must_use]
    pub fn with_filter(mut self, filter: impl VisibilityFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self.interface_maps.clear();
        self
    }

    /// The graph being resolved
    #[must_use]
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub(crate) fn filter(&self) -> &dyn VisibilityFilter {
        self.filter.as_ref()
    }

    /// The symbol identity service of the graph
    #[must_use]
    pub fn identity(&self) -> SymbolIdentity<'_> {
        SymbolIdentity::new(&self.graph)
    }

    /// A signature comparer honouring this context's configuration
    #[must_use]
    pub fn comparer(&self, flags: ComparisonFlags) -> SignatureComparer<'_> {
        SignatureComparer::with_config(&self.graph, flags, self.config)
    }

    fn cell<T>(cache: &Cache<T>, key: Token) -> Arc<OnceLock<Arc<T>>> {
        cache.entry(key).or_default().clone()
    }

    /// The base members `member` overrides and hides.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if `member` is not part of the graph
    pub fn resolve_override_hide(&self, member: Token) -> Result<Arc<OverrideHideResult>> {
        let member = self.graph.get_member(member)?;
        Ok(self.override_hide_of(&member))
    }

    pub(crate) fn override_hide_of(&self, member: &MemberRc) -> Arc<OverrideHideResult> {
        let cell = Self::cell(&self.overrides, member.token);
        // Only reaches cells of owners and base members, see the module docs.
        cell.get_or_init(|| {
            trace!(member = %member.token, "override/hide cache miss");
            let result = self.compute_override_hide(member);
            if result.is_empty() {
                self.empty.clone()
            } else {
                Arc::new(result)
            }
        })
        .clone()
    }

    /// The member `member` overrides, if any.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if `member` is not part of the graph
    pub fn overridden_member(&self, member: Token) -> Result<Option<Token>> {
        Ok(self.resolve_override_hide(member)?.overridden_member())
    }

    /// `member` followed by every member it transitively overrides, nearest first.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if `member` is not part of the graph
    pub fn override_chain(&self, member: Token) -> Result<Vec<Token>> {
        let member = self.graph.get_member(member)?;
        Ok(self.override_chain_of(&member))
    }

    /// The accessor of `kind` declared by the property or event `owner`, or inherited through
    /// the members it overrides.
    ///
    /// # Errors
    /// Returns [`crate::Error::MemberNotFound`] if `owner` is not part of the graph
    pub fn own_or_inherited_accessor(&self, owner: Token, kind: AccessorKind) -> Result<Option<Token>> {
        let owner = self.graph.get_member(owner)?;
        Ok(self
            .inherited_accessor(&owner, kind)
            .map(|accessor| accessor.token))
    }

    /// Abstract base members hidden by a member of `type_token` or its bases without being
    /// overridden anywhere in its base chain.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `type_token` is not part of the graph
    pub fn hidden_abstract_members(&self, type_token: Token) -> Result<Vec<HiddenAbstractMember>> {
        let node = self.graph.get_type(type_token)?;
        Ok(self.collect_hidden_abstract(&node))
    }

    /// The interface implementation map of `type_token`.
    ///
    /// Interfaces have an empty map.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `type_token` is not part of the graph
    pub fn build_interface_map(&self, type_token: Token) -> Result<Arc<InterfaceImplementationMap>> {
        let node = self.graph.get_type(type_token)?;
        Ok(self.interface_map_of(&node))
    }

    fn interface_map_of(&self, node: &TypeNodeRc) -> Arc<InterfaceImplementationMap> {
        let cell = Self::cell(&self.interface_maps, node.token);
        cell.get_or_init(|| {
            trace!(implementing_type = %node.token, "interface map cache miss");
            Arc::new(self.compute_interface_map(node))
        })
        .clone()
    }

    /// The implementation of `interface_member` in `type_token`, through the first interface
    /// instantiation requiring it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `type_token` is not part of the graph
    pub fn find_implementation(
        &self,
        type_token: Token,
        interface_member: Token,
    ) -> Result<Option<ImplementationResult>> {
        let map = self.build_interface_map(type_token)?;
        Ok(map.find_member(interface_member).cloned())
    }

    /// The implementation of `interface_member` required through `interface`, an
    /// instantiation in the space of `type_token`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if `type_token` is not part of the graph
    pub fn find_implementation_in(
        &self,
        type_token: Token,
        interface: &TypeSig,
        interface_member: Token,
    ) -> Result<Option<ImplementationResult>> {
        let map = self.build_interface_map(type_token)?;
        let slot = InterfaceSlot {
            interface: self.graph.canonical_sig(interface),
            member: interface_member,
        };
        Ok(map.get(&slot).cloned())
    }

    /// Resolve every member and build every interface map in parallel.
    ///
    /// Later queries are served from the caches and return the same results lazy evaluation
    /// would have produced.
    pub fn warm_up(&self) {
        let members = self.graph.all_members();
        let types = self.graph.all_types();

        members.par_iter().for_each(|member| {
            self.override_hide_of(member);
        });
        types.par_iter().for_each(|node| {
            self.interface_map_of(node);
        });

        debug!(
            members = members.len(),
            types = types.len(),
            "warmed up resolution caches"
        );
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("graph", &self.graph)
            .field("config", &self.config)
            .field("cached_members", &self.overrides.len())
            .field("cached_types", &self.interface_maps.len())
            .finish_non_exhaustive()
    }
}
