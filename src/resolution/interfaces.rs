//! Interface implementation maps.
//!
//! For a class or struct `T`, every member of every interface `T` implements (directly, through
//! base interfaces, or through its base types) is assigned the member that provides its runtime
//! implementation. The search walks `T` and then its bases; at each level an explicit
//! implementation wins, and implicit candidates are only considered once a type declaring the
//! interface has been passed.
//!
//! Accessors of interface properties and events are anchored to the implementation of their
//! owner: the accessor is taken from the implementing property or event (or what it overrides)
//! through the accessor association, never by matching accessor names.
//!
//! Static interface members are implemented by static members only. When the class and its
//! bases provide nothing, an interface member with a body implements itself unless a derived
//! interface supplies a more specific body through an explicit implementation.

use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::{
    metadata::{
        member::{Accessibility, ExplicitTarget, Member, MemberModifiers, MemberRc},
        signatures::{TypeMap, TypeSig},
        token::Token,
        typesystem::{BaseChain, ChainLink, InterfaceClosure, TypeNodeRc},
    },
    resolution::{
        comparer::{ComparisonFlags, MemberMatch, SignatureComparer, SignatureMode},
        context::ResolutionContext,
        identity::ComparisonMode,
    },
};

/// An interface member, qualified by the interface instantiation it is required through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceSlot {
    /// The interface instantiation, in the implementing type's space, annotations removed
    pub interface: TypeSig,
    /// The member of the interface definition
    pub member: Token,
}

/// Why a candidate is not a regular implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureMismatchKind {
    /// The candidate matches but is not accessible as an implementation
    Hidden,
    /// An ordinary method matched against an interface accessor
    MethodAccessorMismatch,
    /// An accessor matched against an ordinary interface method
    AccessorMethodMismatch,
}

/// Why a forwarding method has to be synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardingReason {
    /// The implementing accessor is named differently from the interface accessor
    AccessorName,
    /// The implementation is a non-virtual member inherited from a base type
    NonVirtualBaseMember,
}

/// A method an emitter has to synthesize so that an interface slot reaches its implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingMethod {
    /// Name of the interface member the forwarder implements
    pub name: String,
    /// The interface member
    pub interface_member: Token,
    /// The member the forwarder calls
    pub target: Token,
    /// Why the forwarder is needed
    pub reason: ForwardingReason,
}

/// The member implementing an interface slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceImplementation {
    /// The implementing member
    pub member: Token,
    /// Whether `member` explicitly implements the slot
    pub is_explicit: bool,
    /// Set when `member` is an erroneous but reportable implementation
    pub mismatch: Option<SignatureMismatchKind>,
    /// Forwarding method required to reach `member`
    pub bridge: Option<ForwardingMethod>,
}

/// Outcome of the implementation search for one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplementationResult {
    /// A single implementation was found
    Implemented(InterfaceImplementation),
    /// Several members of one type explicitly implement the slot, or several unrelated
    /// interfaces provide a most specific body
    Ambiguous(Vec<Token>),
}

impl ImplementationResult {
    /// The implementation, unless ambiguous
    #[must_use]
    pub fn implementation(&self) -> Option<&InterfaceImplementation> {
        match self {
            ImplementationResult::Implemented(implementation) => Some(implementation),
            ImplementationResult::Ambiguous(_) => None,
        }
    }

    /// The implementing member, unless ambiguous
    #[must_use]
    pub fn member(&self) -> Option<Token> {
        self.implementation().map(|implementation| implementation.member)
    }

    /// The mismatch tag of the implementation, if any
    #[must_use]
    pub fn mismatch(&self) -> Option<SignatureMismatchKind> {
        self.implementation()
            .and_then(|implementation| implementation.mismatch)
    }

    /// Returns true for explicit implementations
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.implementation()
            .is_some_and(|implementation| implementation.is_explicit)
    }
}

/// A rejected candidate worth pointing at when a slot stays unimplemented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearMiss {
    /// The rejected member
    pub candidate: Token,
    /// Why it was rejected
    pub kind: SignatureMismatchKind,
}

/// The implementation of every interface slot of one type.
///
/// Slots appear in interface closure order, interface members in declaration order with
/// accessors after properties and events. A missing slot means no implementation exists.
#[derive(Debug, Clone)]
pub struct InterfaceImplementationMap {
    implementing_type: Token,
    entries: IndexMap<InterfaceSlot, ImplementationResult>,
    near_misses: IndexMap<InterfaceSlot, NearMiss>,
}

impl InterfaceImplementationMap {
    fn new(implementing_type: Token) -> Self {
        InterfaceImplementationMap {
            implementing_type,
            entries: IndexMap::new(),
            near_misses: IndexMap::new(),
        }
    }

    /// The type this map belongs to
    #[must_use]
    pub fn implementing_type(&self) -> Token {
        self.implementing_type
    }

    /// The implementation of `slot`
    #[must_use]
    pub fn get(&self, slot: &InterfaceSlot) -> Option<&ImplementationResult> {
        self.entries.get(slot)
    }

    /// The implementation of `member` through the first interface instantiation requiring it
    #[must_use]
    pub fn find_member(&self, member: Token) -> Option<&ImplementationResult> {
        self.entries
            .iter()
            .find(|(slot, _)| slot.member == member)
            .map(|(_, result)| result)
    }

    /// The near miss recorded for an unimplemented `slot`
    #[must_use]
    pub fn near_miss(&self, slot: &InterfaceSlot) -> Option<&NearMiss> {
        self.near_misses.get(slot)
    }

    /// All recorded near misses
    pub fn near_misses(&self) -> impl Iterator<Item = (&InterfaceSlot, &NearMiss)> {
        self.near_misses.iter()
    }

    /// Every forwarding method the type requires
    pub fn bridges(&self) -> impl Iterator<Item = &ForwardingMethod> {
        self.entries
            .values()
            .filter_map(|result| result.implementation())
            .filter_map(|implementation| implementation.bridge.as_ref())
    }

    /// Iterate slots and their implementations
    pub fn iter(&self) -> indexmap::map::Iter<'_, InterfaceSlot, ImplementationResult> {
        self.entries.iter()
    }

    /// Number of implemented slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no slot is implemented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a InterfaceImplementationMap {
    type Item = (&'a InterfaceSlot, &'a ImplementationResult);
    type IntoIter = indexmap::map::Iter<'a, InterfaceSlot, ImplementationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Per-type state shared by the searches for all slots
struct MapBuilder<'a> {
    context: &'a ResolutionContext,
    comparer: SignatureComparer<'a>,
    node: &'a TypeNodeRc,
    chain: Vec<ChainLink>,
    /// Canonical interfaces declared by each level of `chain`, in `node`'s space
    declares: Vec<HashSet<TypeSig>>,
    /// Interfaces of `node` and its bases, in closure order
    interfaces: Vec<TypeSig>,
}

/// Where an accessor search is anchored
struct Anchor {
    level: Token,
    accessor: Option<MemberRc>,
}

enum SlotOutcome {
    Found(ImplementationResult),
    Missing(Option<NearMiss>),
}

impl<'a> MapBuilder<'a> {
    fn new(context: &'a ResolutionContext, node: &'a TypeNodeRc) -> Self {
        let graph = context.graph();
        let chain: Vec<ChainLink> = BaseChain::including_self(graph, node)
            .with_limit(context.config().max_inheritance_depth)
            .collect();
        let declares = chain
            .iter()
            .map(|link| {
                InterfaceClosure::declared(graph, &link.node)
                    .iter()
                    .map(|interface| graph.canonical_sig(&link.map.apply(interface)))
                    .collect::<HashSet<_>>()
            })
            .collect();
        let interfaces = InterfaceClosure::all(graph, node).iter().cloned().collect();

        MapBuilder {
            context,
            comparer: context.comparer(ComparisonFlags::all()),
            node,
            chain,
            declares,
            interfaces,
        }
    }

    fn build(&self) -> InterfaceImplementationMap {
        let graph = self.context.graph();
        let mut map = InterfaceImplementationMap::new(self.node.token);

        for interface in &self.interfaces {
            let Some(definition) = graph.resolve(interface) else {
                continue;
            };
            let key = graph.canonical_sig(interface);
            let interface_map = TypeMap::for_instance(interface);

            let (accessors, owners): (Vec<MemberRc>, Vec<MemberRc>) = graph
                .members_of(definition.token)
                .into_iter()
                .filter(|member| is_slot(member))
                .partition(|member| member.is_accessor());

            for target in owners.iter().chain(&accessors) {
                let slot = InterfaceSlot {
                    interface: key.clone(),
                    member: target.token,
                };

                match self.find(&key, &interface_map, target, &map) {
                    SlotOutcome::Found(result) => {
                        trace!(slot = %target.token, result = ?result, "interface slot implemented");
                        map.entries.insert(slot, result);
                    }
                    SlotOutcome::Missing(Some(near_miss)) => {
                        map.near_misses.insert(slot, near_miss);
                    }
                    SlotOutcome::Missing(None) => {}
                }
            }
        }

        debug!(
            implementing_type = %self.node.token,
            slots = map.entries.len(),
            near_misses = map.near_misses.len(),
            "built interface map"
        );
        map
    }

    fn find(
        &self,
        key: &TypeSig,
        interface_map: &TypeMap,
        target: &MemberRc,
        map: &InterfaceImplementationMap,
    ) -> SlotOutcome {
        let graph = self.context.graph();
        let mut anchor = self.anchor(key, target, map);
        let mut seen = false;
        let mut near_miss = None;

        for (level, link) in self.chain.iter().enumerate() {
            let explicit = self.explicit_candidates(link, key, interface_map, target);
            match explicit.as_slice() {
                [] => {}
                [single] => {
                    return SlotOutcome::Found(ImplementationResult::Implemented(
                        InterfaceImplementation {
                            member: *single,
                            is_explicit: true,
                            mismatch: None,
                            bridge: None,
                        },
                    ))
                }
                _ => {
                    debug!(slot = %target.token, candidates = explicit.len(), "ambiguous explicit implementation");
                    return SlotOutcome::Found(ImplementationResult::Ambiguous(explicit));
                }
            }

            seen = seen || self.declares[level].contains(key);
            if !seen {
                continue;
            }

            if let Some(pending) = anchor.take() {
                if link.node.token != pending.level {
                    anchor = Some(pending);
                    continue;
                }
                if let Some(accessor) = pending.accessor {
                    if self.context.filter().is_candidate(graph, self.node, &accessor) {
                        return SlotOutcome::Found(self.implicit(key, &accessor, target, None));
                    }
                    debug!(slot = %target.token, accessor = %accessor.token, "anchored accessor is not accessible");
                    near_miss = Some(NearMiss {
                        candidate: accessor.token,
                        kind: SignatureMismatchKind::Hidden,
                    });
                    break;
                }
                trace!(slot = %target.token, "owner lacks accessor, resuming search");
                continue;
            }

            if let Some(found) = self.implicit_at(link, key, interface_map, target, &mut near_miss) {
                return SlotOutcome::Found(found);
            }
        }

        match self.default_implementation(key, interface_map, target) {
            Some(found) => SlotOutcome::Found(found),
            None => SlotOutcome::Missing(near_miss),
        }
    }

    /// The most specific body for `target` among the interfaces of the type.
    ///
    /// Candidates are `target` itself when it has a body, and members of other interfaces
    /// explicitly implementing it. A candidate is discarded when another candidate's interface
    /// extends its interface. A single abstract survivor re-abstracts the slot.
    fn default_implementation(
        &self,
        key: &TypeSig,
        interface_map: &TypeMap,
        target: &MemberRc,
    ) -> Option<ImplementationResult> {
        let graph = self.context.graph();
        let mut candidates: Vec<(&TypeSig, MemberRc)> = Vec::new();

        for interface in &self.interfaces {
            if graph.canonical_sig(interface) == *key {
                if !target.is_abstract() {
                    candidates.push((interface, target.clone()));
                }
                continue;
            }

            let Some(definition) = graph.resolve(interface) else {
                continue;
            };
            let map = TypeMap::for_instance(interface);
            for member in graph.members_of(definition.token) {
                let implements = member.is_static() == target.is_static()
                    && member
                        .explicit_impls
                        .iter()
                        .any(|explicit| self.names_slot(explicit, &map, key, target))
                    && self.comparer.match_members(
                        &member,
                        &map,
                        target,
                        interface_map,
                        SignatureMode::ForInterfaceMap,
                        Some(self.node.as_ref()),
                    ) == MemberMatch::Matched;
                if implements {
                    candidates.push((interface, member));
                }
            }
        }

        let extended: Vec<HashSet<TypeSig>> = candidates
            .iter()
            .map(|(interface, _)| self.extended_by(interface))
            .collect();
        let most_specific: Vec<&MemberRc> = candidates
            .iter()
            .enumerate()
            .filter(|(index, (interface, _))| {
                let canonical = graph.canonical_sig(interface);
                !extended
                    .iter()
                    .enumerate()
                    .any(|(other, bases)| other != *index && bases.contains(&canonical))
            })
            .map(|(_, (_, member))| member)
            .collect();

        match most_specific.as_slice() {
            [] => None,
            [single] if single.is_abstract() => {
                trace!(slot = %target.token, member = %single.token, "slot re-abstracted");
                None
            }
            [single] => {
                trace!(slot = %target.token, member = %single.token, "default implementation");
                Some(ImplementationResult::Implemented(InterfaceImplementation {
                    member: single.token,
                    is_explicit: single.token != target.token,
                    mismatch: None,
                    bridge: None,
                }))
            }
            several => {
                debug!(slot = %target.token, candidates = several.len(), "no most specific default implementation");
                Some(ImplementationResult::Ambiguous(
                    several.iter().map(|member| member.token).collect(),
                ))
            }
        }
    }

    /// Canonical interfaces `interface` extends, in `node`'s space
    fn extended_by(&self, interface: &TypeSig) -> HashSet<TypeSig> {
        let graph = self.context.graph();
        let Some(definition) = graph.resolve(interface) else {
            return HashSet::new();
        };

        let map = TypeMap::for_instance(interface);
        InterfaceClosure::declared(graph, &definition)
            .iter()
            .map(|base| graph.canonical_sig(&map.apply(base)))
            .collect()
    }

    /// For an interface accessor, the level and accessor of the owner's implementation
    fn anchor(&self, key: &TypeSig, target: &Member, map: &InterfaceImplementationMap) -> Option<Anchor> {
        let graph = self.context.graph();
        let kind = target.kind.accessor_kind()?;
        let owner = target.associated_member()?;

        let slot = InterfaceSlot {
            interface: key.clone(),
            member: owner,
        };
        let implementation = map.get(&slot)?.implementation()?;
        let owner_impl = graph.member(implementation.member)?;
        if !owner_impl.kind.has_accessors() {
            return None;
        }
        if graph
            .type_node(owner_impl.declaring_type)
            .is_some_and(|declaring| declaring.is_interface())
        {
            // Bodies supplied by interfaces are found after the class chain.
            return Some(Anchor {
                level: owner_impl.declaring_type,
                accessor: None,
            });
        }
        if implementation.is_explicit || implementation.mismatch.is_some() {
            return None;
        }

        Some(Anchor {
            level: owner_impl.declaring_type,
            accessor: self.context.inherited_accessor(&owner_impl, kind),
        })
    }

    fn explicit_candidates(
        &self,
        link: &ChainLink,
        key: &TypeSig,
        interface_map: &TypeMap,
        target: &Member,
    ) -> Vec<Token> {
        self.context
            .graph()
            .members_of(link.node.token)
            .into_iter()
            .filter(|candidate| {
                candidate.is_static() == target.is_static()
                    && candidate
                        .explicit_impls
                        .iter()
                        .any(|explicit| self.names_slot(explicit, &link.map, key, target))
                    && self.comparer.match_members(
                        candidate,
                        &link.map,
                        target,
                        interface_map,
                        SignatureMode::ForInterfaceMap,
                        Some(self.node.as_ref()),
                    ) == MemberMatch::Matched
            })
            .map(|candidate| candidate.token)
            .collect()
    }

    /// Whether `explicit`, viewed through `map`, names the slot `target` of `key`
    fn names_slot(&self, explicit: &ExplicitTarget, map: &TypeMap, key: &TypeSig, target: &Member) -> bool {
        let graph = self.context.graph();
        if graph.canonical_sig(&map.apply(&explicit.interface)) != *key {
            return false;
        }

        explicit.member == target.token
            || graph.member(explicit.member).is_some_and(|named| {
                self.context
                    .identity()
                    .are_same_definition(&named, target, ComparisonMode::Default)
            })
    }

    fn implicit_at(
        &self,
        link: &ChainLink,
        key: &TypeSig,
        interface_map: &TypeMap,
        target: &Member,
        near_miss: &mut Option<NearMiss>,
    ) -> Option<ImplementationResult> {
        let graph = self.context.graph();
        let mut matched = None;
        let mut mismatched = None;

        for candidate in graph.members_named(link.node.token, &target.name) {
            if candidate.is_explicit_impl() {
                continue;
            }

            let outcome = self.comparer.match_members(
                &candidate,
                &link.map,
                target,
                interface_map,
                SignatureMode::ForInterfaceMap,
                Some(self.node.as_ref()),
            );
            let kind = match outcome {
                MemberMatch::NoMatch => continue,
                MemberMatch::Matched => None,
                MemberMatch::MethodAccessorMismatch => Some(SignatureMismatchKind::MethodAccessorMismatch),
                MemberMatch::AccessorMethodMismatch => Some(SignatureMismatchKind::AccessorMethodMismatch),
            };

            if candidate.is_static() != target.is_static()
                || !self.context.filter().is_candidate(graph, self.node, &candidate)
            {
                if near_miss.is_none() && kind.is_none() {
                    *near_miss = Some(NearMiss {
                        candidate: candidate.token,
                        kind: SignatureMismatchKind::Hidden,
                    });
                }
                continue;
            }

            match kind {
                None if matched.is_none() => matched = Some(candidate),
                Some(kind) if mismatched.is_none() => mismatched = Some((candidate, kind)),
                _ => {}
            }
        }

        if let Some(candidate) = matched {
            return Some(self.implicit(key, &candidate, target, None));
        }

        mismatched.map(|(candidate, kind)| {
            debug!(slot = %target.token, candidate = %candidate.token, ?kind, "mismatched implementation");
            self.implicit(key, &candidate, target, Some(kind))
        })
    }

    fn implicit(
        &self,
        key: &TypeSig,
        implementation: &Member,
        target: &Member,
        mismatch: Option<SignatureMismatchKind>,
    ) -> ImplementationResult {
        let bridge = if self.context.config().synthesize_bridges && mismatch.is_none() {
            self.forwarding_method(key, implementation, target)
        } else {
            None
        };

        ImplementationResult::Implemented(InterfaceImplementation {
            member: implementation.token,
            is_explicit: false,
            mismatch,
            bridge,
        })
    }

    fn forwarding_method(&self, key: &TypeSig, implementation: &Member, target: &Member) -> Option<ForwardingMethod> {
        if !implementation.kind.is_method_like() {
            return None;
        }

        let graph = self.context.graph();
        let inherited = graph.canonical(implementation.declaring_type) != graph.canonical(self.node.token);
        let reason = if implementation.is_accessor() && target.is_accessor() && implementation.name != target.name {
            ForwardingReason::AccessorName
        } else if inherited
            && !implementation.is_virtual()
            && !implementation.is_static()
            && self.declares[0].contains(key)
        {
            ForwardingReason::NonVirtualBaseMember
        } else {
            return None;
        };

        Some(ForwardingMethod {
            name: target.name.clone(),
            interface_member: target.token,
            target: implementation.token,
            reason,
        })
    }
}

/// Returns true if the interface member `member` is a slot implementations are searched for.
///
/// Instance members are virtual unless sealed or private. Static members are only when declared
/// abstract or virtual. Explicit implementations of base interface members are never slots.
fn is_slot(member: &Member) -> bool {
    if member.is_explicit_impl() {
        return false;
    }
    if member.is_abstract() {
        return true;
    }

    if member.is_static() {
        member.modifiers.contains(MemberModifiers::VIRTUAL)
    } else {
        !member.modifiers.contains(MemberModifiers::SEALED)
            && member.accessibility != Accessibility::Private
    }
}

impl ResolutionContext {
    /// Compute the interface map of `node` without consulting its cache entry
    pub(crate) fn compute_interface_map(&self, node: &TypeNodeRc) -> InterfaceImplementationMap {
        if node.is_interface() {
            return InterfaceImplementationMap::new(node.token);
        }

        MapBuilder::new(self, node).build()
    }
}
