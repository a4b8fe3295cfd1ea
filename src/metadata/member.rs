//! Members declared by types of the graph: methods, properties, events and their accessors.
//!
//! Properties and events own an ordered list of accessors, and every accessor points back at
//! its owner through [`Member::associated`]. The relation is explicit and never inferred from
//! accessor names, which metadata is free to choose.

use std::sync::{Arc, OnceLock};

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::metadata::{
    signatures::{Signature, TypeSig},
    token::Token,
};

/// A reference to a `Member`
pub type MemberRc = Arc<Member>;
/// A growable list of member tokens
pub type MemberList = Arc<boxcar::Vec<Token>>;

/// The accessor flavours of properties and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum AccessorKind {
    /// Property getter
    Get,
    /// Property setter
    Set,
    /// Event subscription
    Add,
    /// Event unsubscription
    Remove,
}

impl AccessorKind {
    /// Returns true for `Get` and `Set`
    #[must_use]
    pub fn is_property_accessor(&self) -> bool {
        matches!(self, AccessorKind::Get | AccessorKind::Set)
    }

    /// The conventional name prefix of this accessor kind
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get_",
            AccessorKind::Set => "set_",
            AccessorKind::Add => "add_",
            AccessorKind::Remove => "remove_",
        }
    }
}

/// What a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// An ordinary method
    Method,
    /// A property or event accessor
    Accessor(AccessorKind),
    /// A property or indexer
    Property,
    /// An event
    Event,
}

impl MemberKind {
    /// Returns true for the kinds that are invoked like methods (ordinary methods and accessors)
    #[must_use]
    pub fn is_method_like(&self) -> bool {
        matches!(self, MemberKind::Method | MemberKind::Accessor(_))
    }

    /// Returns true for properties and events
    #[must_use]
    pub fn has_accessors(&self) -> bool {
        matches!(self, MemberKind::Property | MemberKind::Event)
    }

    /// The accessor kind, if this is an accessor
    #[must_use]
    pub fn accessor_kind(&self) -> Option<AccessorKind> {
        match self {
            MemberKind::Accessor(kind) => Some(*kind),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Declared member modifiers relevant to override and hide resolution
    pub struct MemberModifiers: u32 {
        /// Introduces a new virtual slot
        const VIRTUAL = 0x0001;
        /// Overrides an inherited virtual member
        const OVERRIDE = 0x0002;
        /// Explicitly hides an inherited member
        const NEW = 0x0004;
        /// Has no implementation
        const ABSTRACT = 0x0008;
        /// Cannot be overridden further
        const SEALED = 0x0010;
        /// Belongs to the type rather than to instances
        const STATIC = 0x0020;
    }
}

/// Declared accessibility of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Accessibility {
    /// Accessible only by the declaring type
    #[default]
    Private,
    /// Accessible by derived types in the declaring assembly
    PrivateProtected,
    /// Accessible by the declaring type and derived types
    Protected,
    /// Accessible by anyone in the declaring assembly
    Internal,
    /// Accessible by derived types anywhere, plus anyone in the declaring assembly
    ProtectedInternal,
    /// Accessible by anyone
    Public,
}

impl Accessibility {
    /// Returns true if a derived type can see the member.
    ///
    /// ## Arguments
    /// * `same_assembly` - Whether the derived type lives in the member's assembly
    #[must_use]
    pub fn is_visible_to_derived(&self, same_assembly: bool) -> bool {
        match self {
            Accessibility::Private => false,
            Accessibility::PrivateProtected | Accessibility::Internal => same_assembly,
            Accessibility::Protected | Accessibility::ProtectedInternal | Accessibility::Public => {
                true
            }
        }
    }
}

/// Where a declaration was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SymbolOrigin {
    /// Declared in source being compiled
    #[default]
    Source,
    /// Loaded from a compiled assembly
    Metadata,
}

/// The interface member an explicit implementation names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExplicitTarget {
    /// The implemented interface, instantiated in the implementing type's space
    pub interface: TypeSig,
    /// The implemented member of the interface definition
    pub member: Token,
}

/// A member declared by a type of the graph
pub struct Member {
    /// Token of this member
    pub token: Token,
    /// Token of the declaring type
    pub declaring_type: Token,
    /// Declared name; accessors of metadata types may carry any name
    pub name: String,
    /// What kind of member this is
    pub kind: MemberKind,
    /// Declared signature, in the declaring type's space
    pub signature: Signature,
    /// Declared modifiers
    pub modifiers: MemberModifiers,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Owned accessors of a property or event, in association order
    pub accessors: MemberList,
    /// Owning property or event of an accessor
    pub associated: OnceLock<Token>,
    /// Interface members this member explicitly implements
    pub explicit_impls: Vec<ExplicitTarget>,
}

impl Member {
    /// Creates a new member without accessors or explicit implementations
    #[must_use]
    pub fn new(
        token: Token,
        declaring_type: Token,
        name: String,
        kind: MemberKind,
        signature: Signature,
        modifiers: MemberModifiers,
        accessibility: Accessibility,
    ) -> Self {
        Member {
            token,
            declaring_type,
            name,
            kind,
            signature,
            modifiers,
            accessibility,
            accessors: Arc::new(boxcar::Vec::new()),
            associated: OnceLock::new(),
            explicit_impls: Vec::new(),
        }
    }

    /// Returns true for ordinary methods
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    /// Returns true for property and event accessors
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, MemberKind::Accessor(_))
    }

    /// Returns true for properties declaring parameters
    #[must_use]
    pub fn is_indexer(&self) -> bool {
        self.kind == MemberKind::Property && !self.signature.params.is_empty()
    }

    /// Returns true if declared `override`
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.modifiers.contains(MemberModifiers::OVERRIDE)
    }

    /// Returns true if declared `virtual`, `override` or `abstract`
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.modifiers
            .intersects(MemberModifiers::VIRTUAL | MemberModifiers::OVERRIDE | MemberModifiers::ABSTRACT)
    }

    /// Returns true if declared `abstract`
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(MemberModifiers::ABSTRACT)
    }

    /// Returns true if declared `static`
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MemberModifiers::STATIC)
    }

    /// Returns true if this member explicitly implements some interface member
    #[must_use]
    pub fn is_explicit_impl(&self) -> bool {
        !self.explicit_impls.is_empty()
    }

    /// The owning property or event of an accessor
    #[must_use]
    pub fn associated_member(&self) -> Option<Token> {
        self.associated.get().copied()
    }
}

impl std::fmt::Debug for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("token", &self.token)
            .field("declaring_type", &self.declaring_type)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("modifiers", &self.modifiers)
            .field("accessibility", &self.accessibility)
            .field("associated", &self.associated.get())
            .finish_non_exhaustive()
    }
}
