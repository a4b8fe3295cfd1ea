//! Iterative walks over the base-type chain and the interface closure of a type.
//!
//! Both walks carry a [`TypeMap`] expressing the visited type's generic parameters in terms of
//! the type the walk started from, so member signatures found along the way can be compared
//! directly against signatures of the starting type.

use std::collections::HashSet;

use crate::metadata::{
    signatures::{TypeMap, TypeSig},
    typesystem::{TypeGraph, TypeNodeRc},
};

/// Default bound for hierarchy walks
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// One step of a [`BaseChain`]
#[derive(Debug, Clone)]
pub struct ChainLink {
    /// The visited type
    pub node: TypeNodeRc,
    /// The visited type's instantiation, in the starting type's space
    pub sig: TypeSig,
    /// Substitution from the visited type's space into the starting type's space
    pub map: TypeMap,
}

/// Iterator over a type's base chain, nearest base first.
///
/// The walk is iterative and bounded; a chain exceeding the bound indicates a graph that did
/// not pass [`TypeGraph::validate`] and is cut short.
pub struct BaseChain<'a> {
    graph: &'a TypeGraph,
    next: Option<ChainLink>,
    remaining: usize,
}

impl<'a> BaseChain<'a> {
    /// Walk the bases of `start`, excluding `start` itself
    #[must_use]
    pub fn new(graph: &'a TypeGraph, start: &TypeNodeRc) -> Self {
        let mut chain = Self::including_self(graph, start);
        chain.next();
        chain
    }

    /// Walk `start` followed by its bases
    #[must_use]
    pub fn including_self(graph: &'a TypeGraph, start: &TypeNodeRc) -> Self {
        BaseChain {
            graph,
            next: Some(ChainLink {
                node: start.clone(),
                sig: start.self_sig(),
                map: TypeMap::identity(start.arity()),
            }),
            remaining: DEFAULT_MAX_DEPTH + 1,
        }
    }

    /// Bound the walk to `limit` base types beyond the starting type
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.remaining = limit.saturating_add(1);
        self
    }
}

impl Iterator for BaseChain<'_> {
    type Item = ChainLink;

    fn next(&mut self) -> Option<ChainLink> {
        let current = self.next.take()?;

        if self.remaining == 0 {
            debug_assert!(false, "base chain of {} exceeds limit", current.node.fullname());
            return None;
        }
        self.remaining -= 1;

        self.next = current.node.base().and_then(|base| {
            let node = self.graph.resolve(base)?;
            let sig = current.map.apply(base);
            let map = TypeMap::for_instance(base).compose(&current.map);
            Some(ChainLink { node, sig, map })
        });

        Some(current)
    }
}

/// The transitive set of interfaces of a type, in topological order.
///
/// Every interface appears before the interfaces it extends. Instantiations are expressed in
/// the space of the type the closure was computed for and deduplicated by identity, ignoring
/// nullability annotations and source/metadata duplication.
#[derive(Debug, Clone, Default)]
pub struct InterfaceClosure {
    interfaces: Vec<TypeSig>,
    keys: HashSet<TypeSig>,
}

impl InterfaceClosure {
    /// Interfaces listed by `node` itself, plus the interfaces they extend
    #[must_use]
    pub fn declared(graph: &TypeGraph, node: &TypeNodeRc) -> Self {
        let mut closure = InterfaceClosure::default();
        closure.extend_from(graph, node, &TypeMap::identity(node.arity()));
        closure
    }

    /// Interfaces of `node` and of every type in its base chain
    #[must_use]
    pub fn all(graph: &TypeGraph, node: &TypeNodeRc) -> Self {
        let mut closure = InterfaceClosure::default();
        for link in BaseChain::including_self(graph, node) {
            closure.extend_from(graph, &link.node, &link.map);
        }
        closure
    }

    /// Add the declared interfaces of `node`, viewed through `map`, in reverse postorder
    fn extend_from(&mut self, graph: &TypeGraph, node: &TypeNodeRc, map: &TypeMap) {
        let mut postorder = Vec::new();
        let mut stack: Vec<(TypeSig, bool)> = node
            .interfaces
            .iter()
            .map(|(_, interface)| (map.apply(interface), false))
            .collect();

        while let Some((interface, expanded)) = stack.pop() {
            if expanded {
                postorder.push(interface);
                continue;
            }

            let key = graph.canonical_sig(&interface);
            if !self.keys.insert(key) {
                continue;
            }

            let bases: Vec<TypeSig> = match graph.resolve(&interface) {
                Some(definition) => {
                    let instance = TypeMap::for_instance(&interface);
                    definition
                        .interfaces
                        .iter()
                        .map(|(_, base)| instance.apply(base))
                        .collect()
                }
                None => Vec::new(),
            };

            stack.push((interface, true));
            stack.extend(bases.into_iter().map(|base| (base, false)));
        }

        self.interfaces.extend(postorder.into_iter().rev());
    }

    /// Returns true if the closure contains an instantiation identical to `interface`
    #[must_use]
    pub fn contains(&self, graph: &TypeGraph, interface: &TypeSig) -> bool {
        self.keys.contains(&graph.canonical_sig(interface))
    }

    /// Iterate the interfaces in topological order
    pub fn iter(&self) -> std::slice::Iter<'_, TypeSig> {
        self.interfaces.iter()
    }

    /// Number of interfaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Returns true if there are no interfaces
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

impl<'a> IntoIterator for &'a InterfaceClosure {
    type Item = &'a TypeSig;
    type IntoIter = std::slice::Iter<'a, TypeSig>;

    fn into_iter(self) -> Self::IntoIter {
        self.interfaces.iter()
    }
}
