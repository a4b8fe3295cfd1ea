//! Override/hide resolution.
//!
//! For every member this module determines which base members it overrides and which it hides.
//! Class members walk the base chain and stop at the nearest base type declaring a related
//! member; interface members walk their transitive base interfaces, derived before base.
//! Accessors are never resolved on their own: they follow the result of their owning property
//! or event, which is what makes partial overriding of a single accessor possible.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    metadata::{
        member::{AccessorKind, Member, MemberKind, MemberRc},
        signatures::TypeMap,
        token::Token,
        typesystem::{BaseChain, InterfaceClosure, TypeNode, TypeNodeRc},
    },
    resolution::{
        comparer::{ComparisonFlags, SignatureComparer, SignatureMode},
        context::ResolutionContext,
    },
};

/// Base members a member overrides or hides.
///
/// A single base member appears in at most one of the two lists. Results are computed once per
/// member and shared through [`ResolutionContext::resolve_override_hide`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideHideResult {
    overridden: Vec<Token>,
    hidden: Vec<Token>,
}

impl OverrideHideResult {
    /// Overridden base members, nearest first
    #[must_use]
    pub fn overridden(&self) -> &[Token] {
        &self.overridden
    }

    /// Hidden base members, in walk order
    #[must_use]
    pub fn hidden(&self) -> &[Token] {
        &self.hidden
    }

    /// The single member overridden by a class member, if any
    #[must_use]
    pub fn overridden_member(&self) -> Option<Token> {
        self.overridden.first().copied()
    }

    /// Returns true if nothing is overridden or hidden
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overridden.is_empty() && self.hidden.is_empty()
    }
}

/// An abstract base member hidden without ever being overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HiddenAbstractMember {
    /// The abstract member
    pub hidden: Token,
    /// The member hiding it
    pub hider: Token,
}

fn push_unique(list: &mut Vec<Token>, token: Token) {
    if !list.contains(&token) {
        list.push(token);
    }
}

impl ResolutionContext {
    /// Compute the override/hide result of `member` without consulting its cache entry
    pub(crate) fn compute_override_hide(&self, member: &Member) -> OverrideHideResult {
        let Some(declaring) = self.graph().type_node(member.declaring_type) else {
            return OverrideHideResult::default();
        };

        let result = match member.kind {
            MemberKind::Accessor(kind) => self.resolve_accessor(member, kind),
            _ if declaring.is_interface() => self.resolve_interface_member(&declaring, member),
            _ => self.resolve_class_member(&declaring, member),
        };

        debug!(
            member = %member.token,
            name = %member.name,
            overridden = result.overridden.len(),
            hidden = result.hidden.len(),
            "resolved override/hide"
        );
        result
    }

    fn resolve_accessor(&self, accessor: &Member, kind: AccessorKind) -> OverrideHideResult {
        let Some(owner) = self.graph().owner_of(accessor) else {
            return OverrideHideResult::default();
        };
        let owner_result = self.override_hide_of(&owner);

        let mut result = OverrideHideResult::default();
        for base in owner_result.overridden() {
            if let Some(found) = self.inherited_accessor_of(*base, kind) {
                push_unique(&mut result.overridden, found.token);
            }
        }
        for base in owner_result.hidden() {
            if let Some(found) = self.inherited_accessor_of(*base, kind) {
                push_unique(&mut result.hidden, found.token);
            }
        }

        result
    }

    fn inherited_accessor_of(&self, owner: Token, kind: AccessorKind) -> Option<MemberRc> {
        let owner = self.graph().member(owner)?;
        self.inherited_accessor(&owner, kind)
    }

    /// The accessor of `kind` on `owner`, or on the member `owner` overrides, recursively
    pub(crate) fn inherited_accessor(&self, owner: &MemberRc, kind: AccessorKind) -> Option<MemberRc> {
        let mut current = owner.clone();

        for _ in 0..=self.config().max_inheritance_depth {
            if let Some(accessor) = self.graph().accessor(&current, kind) {
                return Some(accessor);
            }

            let next = self.override_hide_of(&current).overridden_member()?;
            current = self.graph().member(next)?;
        }

        debug_assert!(false, "override chain of {} exceeds limit", owner.token);
        None
    }

    /// `member` followed by every member it transitively overrides
    pub(crate) fn override_chain_of(&self, member: &MemberRc) -> Vec<Token> {
        let mut chain = vec![member.token];
        let mut current = member.clone();

        while let Some(next) = self.override_hide_of(&current).overridden_member() {
            if chain.contains(&next) || chain.len() > self.config().max_inheritance_depth {
                debug_assert!(false, "override chain of {} does not terminate", member.token);
                break;
            }
            chain.push(next);

            match self.graph().member(next) {
                Some(member) => current = member,
                None => break,
            }
        }

        chain
    }

    fn resolve_class_member(&self, declaring: &TypeNodeRc, member: &Member) -> OverrideHideResult {
        let graph = self.graph();
        let relaxed = self.comparer(ComparisonFlags::all());
        let is_override = member.is_override() && !member.is_static();

        let chain = BaseChain::new(graph, declaring).with_limit(self.config().max_inheritance_depth);
        for link in chain {
            let same_assembly = link.node.assembly == declaring.assembly;
            let related: Vec<MemberRc> = graph
                .members_named(link.node.token, &member.name)
                .into_iter()
                .filter(|candidate| {
                    !candidate.is_accessor()
                        && candidate.accessibility.is_visible_to_derived(same_assembly)
                        && hides(&relaxed, member, candidate, &link.map, declaring)
                })
                .collect();

            if related.is_empty() {
                trace!(member = %member.token, level = %link.node.token, "no related member");
                continue;
            }

            let mut result = OverrideHideResult::default();
            let winner = if is_override {
                self.override_winner(member, &related, &link.map, declaring)
            } else {
                None
            };

            for candidate in &related {
                if Some(candidate.token) == winner {
                    result.overridden.push(candidate.token);
                } else if winner.is_some()
                    && candidate.kind == member.kind
                    && relaxed.signatures_match_in(
                        &member.signature,
                        &candidate.signature,
                        &link.map,
                        SignatureMode::ForOverride,
                        Some(declaring.as_ref()),
                    )
                {
                    trace!(member = %member.token, loser = %candidate.token, "override tie-break loser");
                } else {
                    result.hidden.push(candidate.token);
                }
            }

            return result;
        }

        OverrideHideResult::default()
    }

    /// Pick the overridden member among the related members of one base type.
    ///
    /// Exact custom modifier matches win; otherwise, if enabled, the modifier-insensitive match
    /// with the fewest custom modifiers, then the first declared.
    fn override_winner(
        &self,
        member: &Member,
        related: &[MemberRc],
        map: &TypeMap,
        declaring: &TypeNode,
    ) -> Option<Token> {
        let matches = |comparer: SignatureComparer<'_>, candidate: &MemberRc| {
            candidate.kind == member.kind
                && comparer.signatures_match_in(
                    &member.signature,
                    &candidate.signature,
                    map,
                    SignatureMode::ForOverride,
                    Some(declaring),
                )
        };

        let strict = self.comparer(ComparisonFlags::IGNORE_VARIANCE);
        if let Some(exact) = related.iter().find(|candidate| matches(strict, *candidate)) {
            return Some(exact.token);
        }

        if !self.config().custom_modifier_tie_break {
            return None;
        }

        let relaxed = self.comparer(ComparisonFlags::all());
        let winner = related
            .iter()
            .filter(|candidate| matches(relaxed, *candidate))
            .min_by_key(|candidate| candidate.signature.custom_modifier_count())?;

        debug!(member = %member.token, winner = %winner.token, "override chosen by modifier tie-break");
        Some(winner.token)
    }

    fn resolve_interface_member(&self, declaring: &TypeNodeRc, member: &Member) -> OverrideHideResult {
        let graph = self.graph();
        let relaxed = self.comparer(ComparisonFlags::all());
        let mut covered = HashSet::new();
        let mut result = OverrideHideResult::default();

        for interface in &InterfaceClosure::declared(graph, declaring) {
            if covered.contains(&graph.canonical_sig(interface)) {
                continue;
            }
            let Some(node) = graph.resolve(interface) else {
                continue;
            };

            let map = TypeMap::for_instance(interface);
            let same_assembly = node.assembly == declaring.assembly;
            let related: Vec<Token> = graph
                .members_named(node.token, &member.name)
                .into_iter()
                .filter(|candidate| {
                    !candidate.is_accessor()
                        && candidate.accessibility.is_visible_to_derived(same_assembly)
                        && hides(&relaxed, member, candidate, &map, declaring)
                })
                .map(|candidate| candidate.token)
                .collect();

            if related.is_empty() {
                continue;
            }

            for token in related {
                push_unique(&mut result.hidden, token);
            }
            for base in &InterfaceClosure::declared(graph, &node) {
                covered.insert(graph.canonical_sig(&map.apply(base)));
            }
        }

        result
    }

    /// Abstract base members hidden by a member of `node` or its bases and never overridden
    pub(crate) fn collect_hidden_abstract(&self, node: &TypeNodeRc) -> Vec<HiddenAbstractMember> {
        let graph = self.graph();
        if node.is_interface() {
            return Vec::new();
        }

        let members: Vec<MemberRc> = BaseChain::including_self(graph, node)
            .with_limit(self.config().max_inheritance_depth)
            .flat_map(|link| graph.members_of(link.node.token))
            .filter(|member| !member.is_accessor())
            .collect();

        let overridden: HashSet<Token> = members
            .iter()
            .flat_map(|member| self.override_chain_of(member).into_iter().skip(1))
            .collect();

        let mut reported: Vec<HiddenAbstractMember> = Vec::new();
        for member in &members {
            for hidden in self.override_hide_of(member).hidden() {
                let is_abstract = graph.member(*hidden).is_some_and(|base| base.is_abstract());
                if is_abstract
                    && !overridden.contains(hidden)
                    && !reported.iter().any(|entry| entry.hidden == *hidden)
                {
                    debug!(hidden = %hidden, hider = %member.token, "abstract member hidden");
                    reported.push(HiddenAbstractMember {
                        hidden: *hidden,
                        hider: member.token,
                    });
                }
            }
        }

        reported
    }
}

/// Returns true if `member` hides or overrides `candidate` under the class hiding rules.
///
/// A method relates to base methods with the same generic arity and parameters and to every
/// non-method member; an indexer relates to indexers with the same parameters; any other
/// property or event relates to every member of the same name.
fn hides(
    comparer: &SignatureComparer<'_>,
    member: &Member,
    candidate: &Member,
    map: &TypeMap,
    declaring: &TypeNode,
) -> bool {
    let same_parameters = || {
        comparer.signatures_match_in(
            &member.signature,
            &candidate.signature,
            map,
            SignatureMode::ForHiding,
            Some(declaring),
        )
    };

    match member.kind {
        MemberKind::Method => !candidate.is_method() || same_parameters(),
        MemberKind::Property if member.is_indexer() => candidate.is_indexer() && same_parameters(),
        _ => true,
    }
}
