//! Structural validation of a populated [`TypeGraph`].
//!
//! Member resolution assumes a graph without inheritance cycles and with consistent accessor
//! associations. [`TypeGraph::validate`] establishes these preconditions once, so the resolver
//! itself only has to walk.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    metadata::{
        member::{AccessorKind, Member, MemberKind},
        signatures::TypeSig,
        token::Token,
        typesystem::{TypeGraph, TypeKind, TypeNode, TypeNodeRc},
    },
    Error::{GraphError, RecursionLimit, TypeNotFound},
    Result,
};

impl TypeGraph {
    /// Checks the graph for the preconditions of member resolution.
    ///
    /// Verified properties:
    /// - base types reference existing classes or structs, interface lists existing interfaces
    /// - no type reaches itself through base types or interfaces
    /// - no inheritance chain is deeper than `max_depth`
    /// - every accessor belongs to exactly one property or event of its declaring type, and
    ///   every property or event owns only accessors associated with it
    /// - explicit implementations target members of the named interface
    ///
    /// ## Arguments
    /// * `max_depth` - Maximum number of base types or base interfaces above any type
    ///
    /// # Errors
    /// Returns [`crate::Error::GraphError`] for cycles and invalid inheritance edges,
    /// [`crate::Error::RecursionLimit`] for excessive depth, [`crate::Error::TypeNotFound`] for
    /// dangling references, and [`crate::Error::Malformed`] for broken member declarations.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        let types = self.all_types();

        for node in &types {
            self.validate_edges(node)?;
        }

        let mut heights = HashMap::new();
        for node in &types {
            if self.inheritance_height(node, &mut heights, max_depth)? > max_depth {
                return Err(RecursionLimit(max_depth));
            }
        }

        let members = self.all_members();
        for member in &members {
            self.validate_member(member)?;
        }

        debug!(
            types = types.len(),
            members = members.len(),
            "type graph validated"
        );
        Ok(())
    }

    fn validate_edges(&self, node: &TypeNode) -> Result<()> {
        if let Some(base) = node.base() {
            let base_node = self.resolve_edge(node, base)?;
            if base_node.kind == TypeKind::Interface {
                return Err(GraphError(format!(
                    "Type '{}' uses interface '{}' as base type",
                    node.fullname(),
                    base_node.fullname()
                )));
            }
        }

        for (_, interface) in node.interfaces.iter() {
            let interface_node = self.resolve_edge(node, interface)?;
            if interface_node.kind != TypeKind::Interface {
                return Err(GraphError(format!(
                    "Type '{}' lists '{}' as interface",
                    node.fullname(),
                    interface_node.fullname()
                )));
            }
        }

        Ok(())
    }

    fn resolve_edge(&self, node: &TypeNode, sig: &TypeSig) -> Result<std::sync::Arc<TypeNode>> {
        let Some(def) = sig.def() else {
            return Err(GraphError(format!(
                "Type '{}' inherits from a non-named type",
                node.fullname()
            )));
        };

        let target = self.type_node(def).ok_or(TypeNotFound(def))?;
        if target.arity() != sig.args().len() {
            return Err(malformed_error!(
                "Type '{}' instantiates '{}' with {} arguments, expected {}",
                node.fullname(),
                target.fullname(),
                sig.args().len(),
                target.arity()
            ));
        }

        Ok(target)
    }

    /// Length of the longest inheritance path above `node`.
    ///
    /// Iterative depth-first search over base and interface edges. A type is entered once and
    /// left once all of its parents have a height; `visiting` holds the types entered but not
    /// yet left, which is the current path.
    fn inheritance_height(
        &self,
        node: &TypeNodeRc,
        heights: &mut HashMap<Token, usize>,
        max_depth: usize,
    ) -> Result<usize> {
        let mut visiting = HashSet::new();
        let mut stack = vec![(node.clone(), false)];

        while let Some((current, leaving)) = stack.pop() {
            if leaving {
                let height = self
                    .parents(&current)
                    .filter_map(|parent| heights.get(&parent.token))
                    .map(|height| height.saturating_add(1))
                    .max()
                    .unwrap_or(0);
                visiting.remove(&current.token);
                heights.insert(current.token, height);
                continue;
            }

            if heights.contains_key(&current.token) {
                continue;
            }
            if visiting.contains(&current.token) {
                return Err(GraphError(format!(
                    "Circular inheritance dependency detected involving type '{}'",
                    current.fullname()
                )));
            }
            if visiting.len() > max_depth {
                return Err(RecursionLimit(max_depth));
            }

            visiting.insert(current.token);
            stack.push((current.clone(), true));
            stack.extend(self.parents(&current).map(|parent| (parent, false)));
        }

        Ok(heights.get(&node.token).copied().unwrap_or(0))
    }

    /// Resolved base type and interfaces of `node`
    fn parents<'a>(&'a self, node: &'a TypeNode) -> impl Iterator<Item = TypeNodeRc> + 'a {
        node.base()
            .into_iter()
            .chain(node.interfaces.iter().map(|(_, interface)| interface))
            .filter_map(|parent| self.resolve(parent))
    }

    fn validate_member(&self, member: &Member) -> Result<()> {
        match member.kind {
            MemberKind::Accessor(kind) => self.validate_accessor(member, kind)?,
            MemberKind::Property | MemberKind::Event => self.validate_owner(member)?,
            MemberKind::Method => {}
        }

        for target in &member.explicit_impls {
            let interface = target
                .interface
                .def()
                .and_then(|def| self.type_node(def))
                .filter(|node| node.kind == TypeKind::Interface)
                .ok_or_else(|| {
                    malformed_error!(
                        "Member '{}' explicitly implements a member of a non-interface type",
                        member.name
                    )
                })?;

            let implemented = self.get_member(target.member)?;
            if self.canonical(implemented.declaring_type) != self.canonical(interface.token) {
                return Err(malformed_error!(
                    "Member '{}' explicitly implements '{}', which is not declared by '{}'",
                    member.name,
                    implemented.name,
                    interface.fullname()
                ));
            }
        }

        Ok(())
    }

    fn validate_accessor(&self, accessor: &Member, kind: AccessorKind) -> Result<()> {
        let owner = self.owner_of(accessor).ok_or_else(|| {
            malformed_error!("Accessor '{}' has no owning property or event", accessor.name)
        })?;

        let expected = if kind.is_property_accessor() {
            MemberKind::Property
        } else {
            MemberKind::Event
        };
        if owner.kind != expected {
            return Err(malformed_error!(
                "Accessor '{}' of kind {} is owned by '{}', which is not a {:?}",
                accessor.name,
                kind,
                owner.name,
                expected
            ));
        }

        if owner.declaring_type != accessor.declaring_type
            || !owner
                .accessors
                .iter()
                .any(|(_, token)| *token == accessor.token)
        {
            return Err(malformed_error!(
                "Accessor '{}' is not listed by its owner '{}'",
                accessor.name,
                owner.name
            ));
        }

        Ok(())
    }

    fn validate_owner(&self, owner: &Member) -> Result<()> {
        let mut kinds = HashSet::new();

        for (_, token) in owner.accessors.iter() {
            let accessor = self.get_member(*token)?;
            let Some(kind) = accessor.kind.accessor_kind() else {
                return Err(malformed_error!(
                    "'{}' lists non-accessor '{}' as accessor",
                    owner.name,
                    accessor.name
                ));
            };

            if accessor.associated_member() != Some(owner.token) {
                return Err(malformed_error!(
                    "Accessor '{}' of '{}' is associated with a different member",
                    accessor.name,
                    owner.name
                ));
            }

            if !kinds.insert(kind) {
                return Err(malformed_error!(
                    "'{}' declares more than one {} accessor",
                    owner.name,
                    kind
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::{
            member::{Accessibility, Member, MemberKind, MemberModifiers},
            signatures::{Signature, TypeSig},
            typesystem::{MethodBuilder, PropertyBuilder, TypeBuilder, TypeGraph},
        },
        Error,
    };

    #[test]
    fn test_valid_graph() {
        let graph = TypeGraph::new("Sample");
        let named = TypeBuilder::new(&graph).interface("App", "INamed").build().unwrap();
        let base = TypeBuilder::new(&graph)
            .class("App", "Base")
            .implements_type(named)
            .build()
            .unwrap();
        PropertyBuilder::new(&graph, base, "Name")
            .getter()
            .setter()
            .build()
            .unwrap();
        MethodBuilder::new(&graph, base, "Run").build().unwrap();

        assert!(graph.validate(512).is_ok());
    }

    #[test]
    fn test_base_cycle_rejected() {
        let graph = TypeGraph::new("Sample");
        let first = graph.next_type_token();
        let second = TypeBuilder::new(&graph)
            .class("App", "Second")
            .extends_type(first)
            .build()
            .unwrap();
        TypeBuilder::new(&graph)
            .with_token_init(first)
            .class("App", "First")
            .extends_type(second)
            .build()
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::GraphError(_))));
    }

    #[test]
    fn test_interface_cycle_rejected() {
        let graph = TypeGraph::new("Sample");
        let first = graph.next_type_token();
        let second = TypeBuilder::new(&graph)
            .interface("App", "ISecond")
            .implements_type(first)
            .build()
            .unwrap();
        TypeBuilder::new(&graph)
            .with_token_init(first)
            .interface("App", "IFirst")
            .implements_type(second)
            .build()
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::GraphError(_))));
    }

    #[test]
    fn test_depth_limit() {
        let graph = TypeGraph::new("Sample");
        let mut current = TypeBuilder::new(&graph).class("App", "Level0").build().unwrap();
        for level in 1..=10 {
            current = TypeBuilder::new(&graph)
                .class("App", &format!("Level{level}"))
                .extends_type(current)
                .build()
                .unwrap();
        }

        assert!(graph.validate(10).is_ok());
        assert!(matches!(graph.validate(9), Err(Error::RecursionLimit(9))));
    }

    #[test]
    fn test_deep_chain_unbounded() {
        let graph = TypeGraph::new("Sample");
        let mut current = TypeBuilder::new(&graph).class("App", "Level0").build().unwrap();
        for level in 1..=20_000 {
            current = TypeBuilder::new(&graph)
                .class("App", &format!("Level{level}"))
                .extends_type(current)
                .build()
                .unwrap();
        }

        assert!(graph.validate(usize::MAX).is_ok());
        assert!(matches!(
            graph.validate(19_999),
            Err(Error::RecursionLimit(19_999))
        ));
    }

    #[test]
    fn test_shared_interfaces_accepted() {
        let graph = TypeGraph::new("Sample");
        let root = TypeBuilder::new(&graph).interface("App", "IRoot").build().unwrap();
        let left = TypeBuilder::new(&graph)
            .interface("App", "ILeft")
            .implements_type(root)
            .build()
            .unwrap();
        let right = TypeBuilder::new(&graph)
            .interface("App", "IRight")
            .implements_type(root)
            .build()
            .unwrap();
        TypeBuilder::new(&graph)
            .class("App", "Both")
            .implements_type(left)
            .implements_type(right)
            .implements_type(root)
            .build()
            .unwrap();

        assert!(graph.validate(2).is_ok());
        assert!(matches!(graph.validate(1), Err(Error::RecursionLimit(1))));
    }

    #[test]
    fn test_interface_as_base_rejected() {
        let graph = TypeGraph::new("Sample");
        let named = TypeBuilder::new(&graph).interface("App", "INamed").build().unwrap();
        let class = TypeBuilder::new(&graph).class("App", "Widget").build().unwrap();
        graph
            .get_type(class)
            .unwrap()
            .set_base(TypeSig::named(named))
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::GraphError(_))));
    }

    #[test]
    fn test_dangling_base_rejected() {
        let graph = TypeGraph::new("Sample");
        let missing = graph.next_type_token();
        TypeBuilder::new(&graph)
            .class("App", "Orphan")
            .extends_type(missing)
            .build()
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::TypeNotFound(_))));
    }

    #[test]
    fn test_accessor_without_owner_rejected() {
        let graph = TypeGraph::new("Sample");
        let widget = TypeBuilder::new(&graph).class("App", "Widget").build().unwrap();
        let token = graph.next_member_token(MemberKind::Method);
        graph
            .insert_member(Member::new(
                token,
                widget,
                "get_Orphan".to_string(),
                MemberKind::Accessor(crate::metadata::member::AccessorKind::Get),
                Signature::new(TypeSig::I4),
                MemberModifiers::empty(),
                Accessibility::Public,
            ))
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_explicit_impl_of_foreign_member_rejected() {
        let graph = TypeGraph::new("Sample");
        let first = TypeBuilder::new(&graph).interface("App", "IFirst").build().unwrap();
        let second = TypeBuilder::new(&graph).interface("App", "ISecond").build().unwrap();
        let run = MethodBuilder::new(&graph, first, "Run").abstract_().build().unwrap();
        let widget = TypeBuilder::new(&graph)
            .class("App", "Widget")
            .implements_type(second)
            .build()
            .unwrap();
        MethodBuilder::new(&graph, widget, "ISecond.Run")
            .private()
            .explicit_impl(TypeSig::named(second), run)
            .build()
            .unwrap();

        assert!(matches!(graph.validate(512), Err(Error::Malformed { .. })));
    }
}
