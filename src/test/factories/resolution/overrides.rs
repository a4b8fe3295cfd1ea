//! Factory methods for override/hide scenarios.

use std::sync::Arc;

use crate::{
    metadata::{
        member::AccessorKind,
        signatures::TypeSig,
        token::Token,
        typesystem::{MethodBuilder, PropertyBuilder, TypeBuilder, TypeGraph},
    },
    Result,
};

/// A linear class hierarchy where every level overrides `Run`
pub struct OverrideChain {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// Types, root first
    pub types: Vec<Token>,
    /// `Run` of each type, root first
    pub methods: Vec<Token>,
}

/// Creates `depth` classes `Level0 <- Level1 <- ...`, each declaring `Run(int)`.
///
/// The root declares it virtual, every other level overrides it. Every level but the root also
/// declares a non-virtual `Run(string)` overload, so deeper overloads hide shallower ones.
pub fn override_chain_factory(depth: usize) -> Result<OverrideChain> {
    let graph = TypeGraph::new("Sample");
    let mut types = Vec::with_capacity(depth);
    let mut methods = Vec::with_capacity(depth);

    for level in 0..depth {
        let mut builder = TypeBuilder::new(&graph).class("Chain", &format!("Level{level}"));
        if let Some(base) = types.last() {
            builder = builder.extends_type(*base);
        }
        let node = builder.build()?;

        let run = MethodBuilder::new(&graph, node, "Run").param(TypeSig::I4);
        let run = if level == 0 { run.virtual_() } else { run.override_() };
        methods.push(run.build()?);

        if level > 0 {
            MethodBuilder::new(&graph, node, "Run")
                .param(TypeSig::STRING)
                .build()?;
        }
        types.push(node);
    }

    Ok(OverrideChain {
        graph: Arc::new(graph),
        types,
        methods,
    })
}

/// A property overridden one accessor at a time
pub struct PartialAccessors {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// `interface IValue { int Value { get; set; } }`
    pub interface: Token,
    /// `IValue.Value`
    pub interface_value: Token,
    /// `class Base { virtual int Value { get; set; } }`
    pub base_value: Token,
    /// `class First : Base { override int Value { get; } }`
    pub first_value: Token,
    /// `class Second : First, IValue { override int Value { set; } }`
    pub second: Token,
    /// `Second.Value`
    pub second_value: Token,
}

impl PartialAccessors {
    /// The accessor of `kind` declared by `owner`
    pub fn accessor(&self, owner: Token, kind: AccessorKind) -> Option<Token> {
        let owner = self.graph.member(owner)?;
        self.graph.accessor(&owner, kind).map(|accessor| accessor.token)
    }
}

/// Creates the partial accessor overriding scenario
pub fn partial_accessor_factory() -> Result<PartialAccessors> {
    let graph = TypeGraph::new("Sample");

    let interface = TypeBuilder::new(&graph).interface("App", "IValue").build()?;
    let interface_value = PropertyBuilder::new(&graph, interface, "Value")
        .of_type(TypeSig::I4)
        .getter()
        .setter()
        .abstract_()
        .build()?;

    let base = TypeBuilder::new(&graph).class("App", "Base").build()?;
    let base_value = PropertyBuilder::new(&graph, base, "Value")
        .of_type(TypeSig::I4)
        .getter()
        .setter()
        .virtual_()
        .build()?;

    let first = TypeBuilder::new(&graph)
        .class("App", "First")
        .extends_type(base)
        .build()?;
    let first_value = PropertyBuilder::new(&graph, first, "Value")
        .of_type(TypeSig::I4)
        .getter()
        .override_()
        .build()?;

    let second = TypeBuilder::new(&graph)
        .class("App", "Second")
        .extends_type(first)
        .implements_type(interface)
        .build()?;
    let second_value = PropertyBuilder::new(&graph, second, "Value")
        .of_type(TypeSig::I4)
        .setter()
        .override_()
        .build()?;

    Ok(PartialAccessors {
        graph: Arc::new(graph),
        interface,
        interface_value,
        base_value,
        first_value,
        second,
        second_value,
    })
}
