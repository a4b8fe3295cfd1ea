//! Builders for types and members of a [`TypeGraph`].
//!
//! This module provides fluent construction of the declarations consumed by member resolution:
//! [`TypeBuilder`] for classes, structs and interfaces, [`MethodBuilder`] for ordinary methods,
//! and [`PropertyBuilder`]/[`EventBuilder`] which create the owning member together with its
//! accessors and wire up the accessor association in both directions.
//!
//! # Example
//!
//! ```rust
//! use memberscope::metadata::{
//!     signatures::TypeSig,
//!     typesystem::{MethodBuilder, PropertyBuilder, TypeBuilder, TypeGraph},
//! };
//!
//! let graph = TypeGraph::new("Sample");
//! let shape = TypeBuilder::new(&graph).class("App", "Shape").abstract_().build()?;
//!
//! MethodBuilder::new(&graph, shape, "Area")
//!     .abstract_()
//!     .returns(TypeSig::I8)
//!     .build()?;
//!
//! PropertyBuilder::new(&graph, shape, "Name")
//!     .virtual_()
//!     .of_type(TypeSig::STRING)
//!     .getter()
//!     .setter()
//!     .build()?;
//! # Ok::<(), memberscope::Error>(())
//! ```

use crate::{
    metadata::{
        member::{
            Accessibility, AccessorKind, ExplicitTarget, Member, MemberKind, MemberModifiers,
            SymbolOrigin,
        },
        signatures::{Signature, SignatureParameter, TypeSig},
        token::Token,
        typesystem::{
            GenericConstraints, GenericParam, TypeGraph, TypeKind, TypeModifiers, TypeNode,
        },
    },
    Result,
};

/// Provides a fluent API for declaring types
pub struct TypeBuilder<'a> {
    /// Type graph receiving the type
    graph: &'a TypeGraph,
    /// Token for the type (if reserved in advance)
    token_init: Option<Token>,
    kind: TypeKind,
    namespace: String,
    name: String,
    assembly: Option<String>,
    origin: SymbolOrigin,
    flags: TypeModifiers,
    generic_params: Vec<GenericParam>,
    base: Option<TypeSig>,
    interfaces: Vec<TypeSig>,
}

impl<'a> TypeBuilder<'a> {
    /// Create a new builder for the given graph
    ///
    /// ## Arguments
    /// * 'graph' - The type graph to register the type in
    #[must_use]
    pub fn new(graph: &'a TypeGraph) -> Self {
        TypeBuilder {
            graph,
            token_init: None,
            kind: TypeKind::Class,
            namespace: String::new(),
            name: String::new(),
            assembly: None,
            origin: SymbolOrigin::Source,
            flags: TypeModifiers::empty(),
            generic_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
        }
    }

    /// Use a token reserved through [`TypeGraph::next_type_token`].
    ///
    /// Reserving the token first allows a type to mention itself in its base or interface list,
    /// as in `class Node : IComparable<Node>`.
    #[must_use]
    pub fn with_token_init(mut self, token: Token) -> Self {
        self.token_init = Some(token);
        self
    }

    fn declare(mut self, kind: TypeKind, namespace: &str, name: &str) -> Self {
        self.kind = kind;
        self.namespace = namespace.to_string();
        self.name = name.to_string();
        self
    }

    /// Start building a class with the given name
    #[must_use]
    pub fn class(self, namespace: &str, name: &str) -> Self {
        self.declare(TypeKind::Class, namespace, name)
    }

    /// Start building a value type with the given name
    #[must_use]
    pub fn structure(self, namespace: &str, name: &str) -> Self {
        self.declare(TypeKind::Struct, namespace, name)
    }

    /// Start building an interface with the given name
    #[must_use]
    pub fn interface(self, namespace: &str, name: &str) -> Self {
        self.declare(TypeKind::Interface, namespace, name)
    }

    /// Mark the type as loaded from the metadata of `assembly`
    #[must_use]
    pub fn from_metadata(mut self, assembly: &str) -> Self {
        self.origin = SymbolOrigin::Metadata;
        self.assembly = Some(assembly.to_string());
        self
    }

    /// Declare the type in `assembly` instead of the graph's own assembly
    #[must_use]
    pub fn in_assembly(mut self, assembly: &str) -> Self {
        self.assembly = Some(assembly.to_string());
        self
    }

    /// Append an unconstrained generic parameter
    #[must_use]
    pub fn generic_param(self, name: &str) -> Self {
        self.generic_param_constrained(name, GenericConstraints::empty())
    }

    /// Append a generic parameter with special constraints
    #[must_use]
    pub fn generic_param_constrained(mut self, name: &str, constraints: GenericConstraints) -> Self {
        self.generic_params.push(GenericParam {
            name: name.to_string(),
            constraints,
            bounds: Vec::new(),
        });
        self
    }

    /// Set the base type, in this type's space
    #[must_use]
    pub fn extends(mut self, base: TypeSig) -> Self {
        self.base = Some(base);
        self
    }

    /// Set a non-generic base type
    #[must_use]
    pub fn extends_type(self, base: Token) -> Self {
        self.extends(TypeSig::named(base))
    }

    /// Append an implemented (or, for interfaces, extended) interface, in this type's space
    #[must_use]
    pub fn implements(mut self, interface: TypeSig) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Append a non-generic implemented interface
    #[must_use]
    pub fn implements_type(self, interface: Token) -> Self {
        self.implements(TypeSig::named(interface))
    }

    /// Mark the type `abstract`
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.flags |= TypeModifiers::ABSTRACT;
        self
    }

    /// Mark the type `sealed`
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.flags |= TypeModifiers::SEALED;
        self
    }

    /// Register the type and return its token
    ///
    /// # Errors
    /// Returns an error if the type has no name or an interface declares a base type.
    pub fn build(self) -> Result<Token> {
        if self.name.is_empty() {
            return Err(malformed_error!("Type declared without a name"));
        }
        if self.kind == TypeKind::Interface && self.base.is_some() {
            return Err(malformed_error!(
                "Interface {} cannot declare a base type",
                self.name
            ));
        }

        let token = self
            .token_init
            .unwrap_or_else(|| self.graph.next_type_token());
        let mut node = TypeNode::new(
            token,
            self.kind,
            self.namespace,
            self.name,
            self.assembly
                .unwrap_or_else(|| self.graph.assembly().to_string()),
            self.origin,
        );
        node.flags = self.flags;
        node.generic_params = self.generic_params;

        let node = self.graph.insert_type(node);
        if let Some(base) = self.base {
            node.set_base(base)?;
        }
        for interface in self.interfaces {
            node.interfaces.push(interface);
        }

        Ok(token)
    }
}

/// Generates the modifier and accessibility setters shared by the member builders
macro_rules! member_modifiers {
    ($builder:ident) => {
        impl $builder<'_> {
            /// Set the declared accessibility (defaults to public)
            #[must_use]
            pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
                self.accessibility = accessibility;
                self
            }

            /// Declare the member `protected`
            #[must_use]
            pub fn protected(self) -> Self {
                self.accessibility(Accessibility::Protected)
            }

            /// Declare the member `internal`
            #[must_use]
            pub fn internal(self) -> Self {
                self.accessibility(Accessibility::Internal)
            }

            /// Declare the member `private`
            #[must_use]
            pub fn private(self) -> Self {
                self.accessibility(Accessibility::Private)
            }

            /// Add `virtual`
            #[must_use]
            pub fn virtual_(mut self) -> Self {
                self.modifiers |= MemberModifiers::VIRTUAL;
                self
            }

            /// Add `override`
            #[must_use]
            pub fn override_(mut self) -> Self {
                self.modifiers |= MemberModifiers::OVERRIDE;
                self
            }

            /// Add `new`
            #[must_use]
            pub fn new_(mut self) -> Self {
                self.modifiers |= MemberModifiers::NEW;
                self
            }

            /// Add `abstract`
            #[must_use]
            pub fn abstract_(mut self) -> Self {
                self.modifiers |= MemberModifiers::ABSTRACT;
                self
            }

            /// Add `sealed`
            #[must_use]
            pub fn sealed(mut self) -> Self {
                self.modifiers |= MemberModifiers::SEALED;
                self
            }

            /// Add `static`
            #[must_use]
            pub fn static_(mut self) -> Self {
                self.modifiers |= MemberModifiers::STATIC;
                self
            }
        }
    };
}

/// Provides a fluent API for declaring ordinary methods
pub struct MethodBuilder<'a> {
    graph: &'a TypeGraph,
    declaring_type: Token,
    name: String,
    signature: Signature,
    modifiers: MemberModifiers,
    accessibility: Accessibility,
    explicit_impls: Vec<ExplicitTarget>,
}

member_modifiers!(MethodBuilder);

impl<'a> MethodBuilder<'a> {
    /// Start declaring `void name()` in `declaring_type`
    #[must_use]
    pub fn new(graph: &'a TypeGraph, declaring_type: Token, name: &str) -> Self {
        MethodBuilder {
            graph,
            declaring_type,
            name: name.to_string(),
            signature: Signature::void(),
            modifiers: MemberModifiers::empty(),
            accessibility: Accessibility::Public,
            explicit_impls: Vec::new(),
        }
    }

    /// Set the number of method generic parameters
    #[must_use]
    pub fn generic_arity(mut self, arity: u32) -> Self {
        self.signature.generic_arity = arity;
        self
    }

    /// Append a by-value parameter
    #[must_use]
    pub fn param(self, sig: TypeSig) -> Self {
        self.param_with(SignatureParameter::new(sig))
    }

    /// Append a fully described parameter
    #[must_use]
    pub fn param_with(mut self, param: SignatureParameter) -> Self {
        self.signature.params.push(param);
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(self, sig: TypeSig) -> Self {
        self.returns_with(SignatureParameter::new(sig))
    }

    /// Set the return value, including passing mode and custom modifiers
    #[must_use]
    pub fn returns_with(mut self, return_type: SignatureParameter) -> Self {
        self.signature.return_type = return_type;
        self
    }

    /// Replace the whole signature
    #[must_use]
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Declare the method as explicit implementation of `member` of `interface`
    #[must_use]
    pub fn explicit_impl(mut self, interface: TypeSig, member: Token) -> Self {
        self.explicit_impls.push(ExplicitTarget { interface, member });
        self
    }

    /// Register the method and return its token
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the declaring type is not part of the graph
    pub fn build(self) -> Result<Token> {
        let token = self.graph.next_member_token(MemberKind::Method);
        let mut member = Member::new(
            token,
            self.declaring_type,
            self.name,
            MemberKind::Method,
            self.signature,
            self.modifiers,
            self.accessibility,
        );
        member.explicit_impls = self.explicit_impls;

        self.graph.insert_member(member)?;
        Ok(token)
    }
}

/// An accessor requested on a property or event builder
struct AccessorSpec {
    kind: AccessorKind,
    name: Option<String>,
    accessibility: Option<Accessibility>,
}

/// Shared construction of a property or event with its accessors
struct OwnerSpec {
    declaring_type: Token,
    name: String,
    kind: MemberKind,
    value: TypeSig,
    params: Vec<SignatureParameter>,
    modifiers: MemberModifiers,
    accessibility: Accessibility,
    accessors: Vec<AccessorSpec>,
    explicit: Option<(TypeSig, Token)>,
}

impl OwnerSpec {
    fn accessor_signature(&self, kind: AccessorKind) -> Signature {
        let mut params = self.params.clone();
        let return_type = match kind {
            AccessorKind::Get => SignatureParameter::new(self.value.clone()),
            AccessorKind::Set | AccessorKind::Add | AccessorKind::Remove => {
                params.push(SignatureParameter::new(self.value.clone()));
                SignatureParameter::new(TypeSig::VOID)
            }
        };

        Signature {
            generic_arity: 0,
            params,
            return_type,
        }
    }

    fn build(self, graph: &TypeGraph) -> Result<Token> {
        let interface_owner = match &self.explicit {
            Some((_, target)) => Some(graph.get_member(*target)?),
            None => None,
        };

        let token = graph.next_member_token(self.kind);
        let mut owner = Member::new(
            token,
            self.declaring_type,
            self.name.clone(),
            self.kind,
            Signature {
                generic_arity: 0,
                params: self.params.clone(),
                return_type: SignatureParameter::new(self.value.clone()),
            },
            self.modifiers,
            self.accessibility,
        );
        if let Some((interface, member)) = &self.explicit {
            owner.explicit_impls.push(ExplicitTarget {
                interface: interface.clone(),
                member: *member,
            });
        }
        let owner = graph.insert_member(owner)?;

        for spec in &self.accessors {
            let accessor_token = graph.next_member_token(MemberKind::Accessor(spec.kind));
            let name = spec
                .name
                .clone()
                .unwrap_or_else(|| format!("{}{}", spec.kind.prefix(), self.name));

            let mut accessor = Member::new(
                accessor_token,
                self.declaring_type,
                name,
                MemberKind::Accessor(spec.kind),
                self.accessor_signature(spec.kind),
                self.modifiers,
                spec.accessibility.unwrap_or(self.accessibility),
            );
            if let (Some((interface, _)), Some(interface_owner)) =
                (&self.explicit, &interface_owner)
            {
                if let Some(target) = graph.accessor(interface_owner, spec.kind) {
                    accessor.explicit_impls.push(ExplicitTarget {
                        interface: interface.clone(),
                        member: target.token,
                    });
                }
            }
            accessor
                .associated
                .set(token)
                .map_err(|_| malformed_error!("Accessor {} already associated", accessor_token))?;

            graph.insert_member(accessor)?;
            owner.accessors.push(accessor_token);
        }

        Ok(token)
    }
}

/// Provides a fluent API for declaring properties and indexers together with their accessors.
///
/// Accessors are associated with the property in the order they are requested. Their names
/// default to `get_<Name>`/`set_<Name>` but can be chosen freely, as metadata allows.
pub struct PropertyBuilder<'a> {
    graph: &'a TypeGraph,
    declaring_type: Token,
    name: String,
    value: TypeSig,
    params: Vec<SignatureParameter>,
    modifiers: MemberModifiers,
    accessibility: Accessibility,
    accessors: Vec<AccessorSpec>,
    explicit: Option<(TypeSig, Token)>,
}

member_modifiers!(PropertyBuilder);

impl<'a> PropertyBuilder<'a> {
    /// Start declaring an `object` property `name` in `declaring_type`
    #[must_use]
    pub fn new(graph: &'a TypeGraph, declaring_type: Token, name: &str) -> Self {
        PropertyBuilder {
            graph,
            declaring_type,
            name: name.to_string(),
            value: TypeSig::OBJECT,
            params: Vec::new(),
            modifiers: MemberModifiers::empty(),
            accessibility: Accessibility::Public,
            accessors: Vec::new(),
            explicit: None,
        }
    }

    /// Set the property type
    #[must_use]
    pub fn of_type(mut self, value: TypeSig) -> Self {
        self.value = value;
        self
    }

    /// Append an indexer parameter
    #[must_use]
    pub fn param(mut self, sig: TypeSig) -> Self {
        self.params.push(SignatureParameter::new(sig));
        self
    }

    fn accessor(mut self, kind: AccessorKind, name: Option<&str>) -> Self {
        self.accessors.push(AccessorSpec {
            kind,
            name: name.map(ToString::to_string),
            accessibility: None,
        });
        self
    }

    /// Add a conventionally named getter
    #[must_use]
    pub fn getter(self) -> Self {
        self.accessor(AccessorKind::Get, None)
    }

    /// Add a getter with an arbitrary name
    #[must_use]
    pub fn getter_named(self, name: &str) -> Self {
        self.accessor(AccessorKind::Get, Some(name))
    }

    /// Add a conventionally named setter
    #[must_use]
    pub fn setter(self) -> Self {
        self.accessor(AccessorKind::Set, None)
    }

    /// Add a setter with an arbitrary name
    #[must_use]
    pub fn setter_named(self, name: &str) -> Self {
        self.accessor(AccessorKind::Set, Some(name))
    }

    /// Restrict the accessibility of the most recently added accessor
    #[must_use]
    pub fn accessor_accessibility(mut self, accessibility: Accessibility) -> Self {
        if let Some(last) = self.accessors.last_mut() {
            last.accessibility = Some(accessibility);
        }
        self
    }

    /// Declare the property as explicit implementation of `member` of `interface`.
    ///
    /// Each accessor explicitly implements the same-kind accessor of the interface property.
    #[must_use]
    pub fn explicit_impl(mut self, interface: TypeSig, member: Token) -> Self {
        self.explicit = Some((interface, member));
        self
    }

    /// Register the property and its accessors, returning the property token
    ///
    /// # Errors
    /// Returns an error if the declaring type or the explicitly implemented member is unknown
    pub fn build(self) -> Result<Token> {
        OwnerSpec {
            declaring_type: self.declaring_type,
            name: self.name,
            kind: MemberKind::Property,
            value: self.value,
            params: self.params,
            modifiers: self.modifiers,
            accessibility: self.accessibility,
            accessors: self.accessors,
            explicit: self.explicit,
        }
        .build(self.graph)
    }
}

/// Provides a fluent API for declaring events with their `add` and `remove` accessors
pub struct EventBuilder<'a> {
    graph: &'a TypeGraph,
    declaring_type: Token,
    name: String,
    handler: TypeSig,
    modifiers: MemberModifiers,
    accessibility: Accessibility,
    adder: Option<String>,
    remover: Option<String>,
    explicit: Option<(TypeSig, Token)>,
}

member_modifiers!(EventBuilder);

impl<'a> EventBuilder<'a> {
    /// Start declaring an event `name` in `declaring_type`
    #[must_use]
    pub fn new(graph: &'a TypeGraph, declaring_type: Token, name: &str) -> Self {
        EventBuilder {
            graph,
            declaring_type,
            name: name.to_string(),
            handler: TypeSig::OBJECT,
            modifiers: MemberModifiers::empty(),
            accessibility: Accessibility::Public,
            adder: None,
            remover: None,
            explicit: None,
        }
    }

    /// Set the handler type
    #[must_use]
    pub fn handler(mut self, handler: TypeSig) -> Self {
        self.handler = handler;
        self
    }

    /// Name the `add` accessor
    #[must_use]
    pub fn adder_named(mut self, name: &str) -> Self {
        self.adder = Some(name.to_string());
        self
    }

    /// Name the `remove` accessor
    #[must_use]
    pub fn remover_named(mut self, name: &str) -> Self {
        self.remover = Some(name.to_string());
        self
    }

    /// Declare the event as explicit implementation of `member` of `interface`
    #[must_use]
    pub fn explicit_impl(mut self, interface: TypeSig, member: Token) -> Self {
        self.explicit = Some((interface, member));
        self
    }

    /// Register the event and its accessors, returning the event token
    ///
    /// # Errors
    /// Returns an error if the declaring type or the explicitly implemented member is unknown
    pub fn build(self) -> Result<Token> {
        OwnerSpec {
            declaring_type: self.declaring_type,
            name: self.name,
            kind: MemberKind::Event,
            value: self.handler,
            params: Vec::new(),
            modifiers: self.modifiers,
            accessibility: self.accessibility,
            accessors: vec![
                AccessorSpec {
                    kind: AccessorKind::Add,
                    name: self.adder,
                    accessibility: None,
                },
                AccessorSpec {
                    kind: AccessorKind::Remove,
                    name: self.remover,
                    accessibility: None,
                },
            ],
            explicit: self.explicit,
        }
        .build(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::member::AccessorKind, Error};

    #[test]
    fn test_build_class_with_base_and_interfaces() {
        let graph = TypeGraph::new("Sample");
        let disposable = TypeBuilder::new(&graph)
            .interface("System", "IDisposable")
            .build()
            .unwrap();
        let base = TypeBuilder::new(&graph).class("App", "Base").build().unwrap();
        let derived = TypeBuilder::new(&graph)
            .class("App", "Derived")
            .extends_type(base)
            .implements_type(disposable)
            .sealed()
            .build()
            .unwrap();

        let node = graph.get_type(derived).unwrap();
        assert_eq!(node.base(), Some(&TypeSig::named(base)));
        assert_eq!(node.interfaces.count(), 1);
        assert!(node.flags.contains(TypeModifiers::SEALED));
        assert_eq!(node.assembly, "Sample");
        assert_eq!(node.origin, SymbolOrigin::Source);
    }

    #[test]
    fn test_build_rejects_interface_base() {
        let graph = TypeGraph::new("Sample");
        let base = TypeBuilder::new(&graph).class("App", "Base").build().unwrap();
        let result = TypeBuilder::new(&graph)
            .interface("App", "IBroken")
            .extends_type(base)
            .build();

        assert!(matches!(result, Err(Error::Malformed { .. })));
        assert!(TypeBuilder::new(&graph).build().is_err());
    }

    #[test]
    fn test_build_metadata_type() {
        let graph = TypeGraph::new("Sample");
        let token = TypeBuilder::new(&graph)
            .class("Lib", "Imported")
            .from_metadata("Lib")
            .build()
            .unwrap();

        let node = graph.get_type(token).unwrap();
        assert_eq!(node.origin, SymbolOrigin::Metadata);
        assert_eq!(node.assembly, "Lib");
    }

    #[test]
    fn test_self_referencing_type() {
        let graph = TypeGraph::new("Sample");
        let comparable = TypeBuilder::new(&graph)
            .interface("System", "IComparable")
            .generic_param("T")
            .build()
            .unwrap();
        let reserved = graph.next_type_token();
        let node = TypeBuilder::new(&graph)
            .with_token_init(reserved)
            .class("App", "Node")
            .implements(TypeSig::generic(comparable, vec![TypeSig::named(reserved)]))
            .build()
            .unwrap();

        assert_eq!(node, reserved);
        assert!(graph.type_node(reserved).is_some());
    }

    #[test]
    fn test_build_method() {
        let graph = TypeGraph::new("Sample");
        let widget = TypeBuilder::new(&graph).class("App", "Widget").build().unwrap();
        let method = MethodBuilder::new(&graph, widget, "Resize")
            .virtual_()
            .protected()
            .generic_arity(1)
            .param(TypeSig::I4)
            .param(TypeSig::MethodParam(0))
            .returns(TypeSig::BOOLEAN)
            .build()
            .unwrap();

        let member = graph.get_member(method).unwrap();
        assert_eq!(member.name, "Resize");
        assert_eq!(member.kind, MemberKind::Method);
        assert_eq!(member.signature.params.len(), 2);
        assert_eq!(member.signature.generic_arity, 1);
        assert_eq!(member.accessibility, Accessibility::Protected);
        assert!(member.is_virtual());
        assert_eq!(graph.members_of(widget).len(), 1);
    }

    #[test]
    fn test_build_property_with_accessors() {
        let graph = TypeGraph::new("Sample");
        let widget = TypeBuilder::new(&graph).class("App", "Widget").build().unwrap();
        let property = PropertyBuilder::new(&graph, widget, "Title")
            .of_type(TypeSig::STRING)
            .getter()
            .setter_named("SetTitleImpl")
            .virtual_()
            .build()
            .unwrap();

        let owner = graph.get_member(property).unwrap();
        assert_eq!(owner.accessors.count(), 2);

        let getter = graph.accessor(&owner, AccessorKind::Get).unwrap();
        assert_eq!(getter.name, "get_Title");
        assert_eq!(getter.associated_member(), Some(property));
        assert_eq!(getter.signature.return_type.base, TypeSig::STRING);
        assert!(getter.is_virtual());

        let setter = graph.accessor(&owner, AccessorKind::Set).unwrap();
        assert_eq!(setter.name, "SetTitleImpl");
        assert_eq!(setter.signature.params.len(), 1);
        assert_eq!(setter.signature.return_type.base, TypeSig::VOID);
    }

    #[test]
    fn test_build_indexer() {
        let graph = TypeGraph::new("Sample");
        let table = TypeBuilder::new(&graph).class("App", "Table").build().unwrap();
        let indexer = PropertyBuilder::new(&graph, table, "Item")
            .of_type(TypeSig::STRING)
            .param(TypeSig::I4)
            .getter()
            .setter()
            .build()
            .unwrap();

        let owner = graph.get_member(indexer).unwrap();
        assert!(owner.is_indexer());
        let setter = graph.accessor(&owner, AccessorKind::Set).unwrap();
        assert_eq!(
            setter
                .signature
                .params
                .iter()
                .map(|param| param.base.clone())
                .collect::<Vec<_>>(),
            vec![TypeSig::I4, TypeSig::STRING]
        );
    }

    #[test]
    fn test_build_explicit_property() {
        let graph = TypeGraph::new("Sample");
        let named = TypeBuilder::new(&graph).interface("App", "INamed").build().unwrap();
        let interface_property = PropertyBuilder::new(&graph, named, "Name")
            .abstract_()
            .of_type(TypeSig::STRING)
            .getter()
            .build()
            .unwrap();
        let widget = TypeBuilder::new(&graph)
            .class("App", "Widget")
            .implements_type(named)
            .build()
            .unwrap();
        let property = PropertyBuilder::new(&graph, widget, "App.INamed.Name")
            .private()
            .of_type(TypeSig::STRING)
            .getter()
            .explicit_impl(TypeSig::named(named), interface_property)
            .build()
            .unwrap();

        let interface_owner = graph.get_member(interface_property).unwrap();
        let interface_getter = graph.accessor(&interface_owner, AccessorKind::Get).unwrap();
        let owner = graph.get_member(property).unwrap();
        let getter = graph.accessor(&owner, AccessorKind::Get).unwrap();

        assert_eq!(owner.explicit_impls[0].member, interface_property);
        assert_eq!(getter.explicit_impls[0].member, interface_getter.token);
    }

    #[test]
    fn test_build_event() {
        let graph = TypeGraph::new("Sample");
        let button = TypeBuilder::new(&graph).class("App", "Button").build().unwrap();
        let event = EventBuilder::new(&graph, button, "Clicked")
            .adder_named("Subscribe")
            .build()
            .unwrap();

        let owner = graph.get_member(event).unwrap();
        assert_eq!(owner.kind, MemberKind::Event);
        assert_eq!(
            graph.accessor(&owner, AccessorKind::Add).unwrap().name,
            "Subscribe"
        );
        assert_eq!(
            graph.accessor(&owner, AccessorKind::Remove).unwrap().name,
            "remove_Clicked"
        );
    }

    #[test]
    fn test_explicit_impl_requires_known_member() {
        let graph = TypeGraph::new("Sample");
        let widget = TypeBuilder::new(&graph).class("App", "Widget").build().unwrap();
        let result = PropertyBuilder::new(&graph, widget, "Name")
            .getter()
            .explicit_impl(TypeSig::OBJECT, Token(0x1700_0099))
            .build();

        assert!(matches!(result, Err(Error::MemberNotFound(_))));
    }
}
