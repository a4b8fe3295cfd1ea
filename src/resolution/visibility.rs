//! Accessibility predicate for implicit interface implementations.
//!
//! Only members accessible through the implementing type can implicitly implement an interface
//! member. The rule is supplied by the surrounding compiler through [`VisibilityFilter`];
//! [`PublicMemberFilter`] implements the ordinary language rule. Static interface members are
//! matched against static members and instance members against instance members before the
//! filter is asked.

use crate::metadata::{
    member::{Accessibility, Member},
    typesystem::{TypeGraph, TypeNode},
};

/// Decides whether a member may implicitly implement interface members of a type
pub trait VisibilityFilter: Send + Sync {
    /// Returns true if `member` is an eligible implicit implementation for `implementing_type`.
    ///
    /// ## Arguments
    /// * `graph` - The type graph both belong to
    /// * `implementing_type` - The type whose interface map is being built
    /// * `member` - A member of `implementing_type` or one of its bases
    fn is_candidate(&self, graph: &TypeGraph, implementing_type: &TypeNode, member: &Member) -> bool;
}

/// Accepts public members
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMemberFilter;

impl VisibilityFilter for PublicMemberFilter {
    fn is_candidate(&self, _graph: &TypeGraph, _implementing_type: &TypeNode, member: &Member) -> bool {
        member.accessibility == Accessibility::Public
    }
}

impl<F> VisibilityFilter for F
where
    F: Fn(&TypeGraph, &TypeNode, &Member) -> bool + Send + Sync,
{
    fn is_candidate(&self, graph: &TypeGraph, implementing_type: &TypeNode, member: &Member) -> bool {
        self(graph, implementing_type, member)
    }
}
