//! Factory methods for interface mapping scenarios.

use std::sync::Arc;

use crate::{
    metadata::{
        signatures::TypeSig,
        token::Token,
        typesystem::{MethodBuilder, PropertyBuilder, TypeBuilder, TypeGraph},
    },
    Result,
};

/// Explicit and covariant implicit implementations of one slot
pub struct ExplicitOverImplicit {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// `interface IFactory { Animal Create(); }`
    pub create: Token,
    /// `class Shelter : IFactory`
    pub shelter: Token,
    /// `public Cat Create()`
    pub implicit: Token,
    /// `Animal IFactory.Create()`
    pub explicit: Token,
}

/// Creates a type implementing one interface method both explicitly and implicitly
pub fn explicit_over_implicit_factory() -> Result<ExplicitOverImplicit> {
    let graph = TypeGraph::new("Sample");
    let animal = TypeBuilder::new(&graph).class("Zoo", "Animal").build()?;
    let cat = TypeBuilder::new(&graph)
        .class("Zoo", "Cat")
        .extends_type(animal)
        .build()?;

    let factory = TypeBuilder::new(&graph).interface("Zoo", "IFactory").build()?;
    let create = MethodBuilder::new(&graph, factory, "Create")
        .returns(TypeSig::named(animal))
        .abstract_()
        .build()?;

    let shelter = TypeBuilder::new(&graph)
        .class("Zoo", "Shelter")
        .implements_type(factory)
        .build()?;
    let implicit = MethodBuilder::new(&graph, shelter, "Create")
        .returns(TypeSig::named(cat))
        .build()?;
    let explicit = MethodBuilder::new(&graph, shelter, "Zoo.IFactory.Create")
        .returns(TypeSig::named(animal))
        .private()
        .explicit_impl(TypeSig::named(factory), create)
        .build()?;

    Ok(ExplicitOverImplicit {
        graph: Arc::new(graph),
        create,
        shelter,
        implicit,
        explicit,
    })
}

/// Metadata type whose accessors are named after the other property
pub struct CrossedAccessors {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// `interface IPair { int First { get; } int Second { get; } }`
    pub interface: Token,
    /// `IPair.First`
    pub first: Token,
    /// `IPair.Second`
    pub second: Token,
    /// The implementing metadata type
    pub pair: Token,
    /// `Pair.First`, whose getter is named `get_Second`
    pub pair_first: Token,
    /// `Pair.Second`, whose getter is named `get_First`
    pub pair_second: Token,
}

/// Creates an implementation loaded from metadata with crossed accessor names
pub fn crossed_accessor_factory() -> Result<CrossedAccessors> {
    let graph = TypeGraph::new("Sample");
    let interface = TypeBuilder::new(&graph).interface("App", "IPair").build()?;
    let first = PropertyBuilder::new(&graph, interface, "First")
        .of_type(TypeSig::I4)
        .getter()
        .abstract_()
        .build()?;
    let second = PropertyBuilder::new(&graph, interface, "Second")
        .of_type(TypeSig::I4)
        .getter()
        .abstract_()
        .build()?;

    let pair = TypeBuilder::new(&graph)
        .class("Lib", "Pair")
        .from_metadata("Lib")
        .implements_type(interface)
        .build()?;
    let pair_first = PropertyBuilder::new(&graph, pair, "First")
        .of_type(TypeSig::I4)
        .getter_named("get_Second")
        .virtual_()
        .build()?;
    let pair_second = PropertyBuilder::new(&graph, pair, "Second")
        .of_type(TypeSig::I4)
        .getter_named("get_First")
        .virtual_()
        .build()?;

    Ok(CrossedAccessors {
        graph: Arc::new(graph),
        interface,
        first,
        second,
        pair,
        pair_first,
        pair_second,
    })
}

/// Implementations inherited from and hidden in a class hierarchy
pub struct InheritedImplementations {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// `interface IRun { void Run(); }`
    pub interface: Token,
    /// `IRun.Run`
    pub run: Token,
    /// `class Base : IRun { public void Run(); }`
    pub base_run: Token,
    /// `class Derived : Base { public new void Run(); }`
    pub derived: Token,
    /// `Derived.Run`
    pub derived_run: Token,
    /// `class Again : Derived, IRun`
    pub again: Token,
    /// `class Restated : Base, IRun`
    pub restated: Token,
}

/// Creates a hierarchy exercising the rule that implicit implementations are only looked for
/// from the first type declaring the interface
pub fn inherited_implementation_factory() -> Result<InheritedImplementations> {
    let graph = TypeGraph::new("Sample");
    let interface = TypeBuilder::new(&graph).interface("App", "IRun").build()?;
    let run = MethodBuilder::new(&graph, interface, "Run").abstract_().build()?;

    let base = TypeBuilder::new(&graph)
        .class("App", "Base")
        .implements_type(interface)
        .build()?;
    let base_run = MethodBuilder::new(&graph, base, "Run").build()?;

    let derived = TypeBuilder::new(&graph)
        .class("App", "Derived")
        .extends_type(base)
        .build()?;
    let derived_run = MethodBuilder::new(&graph, derived, "Run").new_().build()?;

    let again = TypeBuilder::new(&graph)
        .class("App", "Again")
        .extends_type(derived)
        .implements_type(interface)
        .build()?;
    let restated = TypeBuilder::new(&graph)
        .class("App", "Restated")
        .extends_type(base)
        .implements_type(interface)
        .build()?;

    Ok(InheritedImplementations {
        graph: Arc::new(graph),
        interface,
        run,
        base_run,
        derived,
        derived_run,
        again,
        restated,
    })
}

/// Interface bodies supplied at different levels of an interface hierarchy
pub struct DefaultBodies {
    /// The graph
    pub graph: Arc<TypeGraph>,
    /// `interface IBase { void Run() {} void Reset() {} void Stop(); }`
    pub base: Token,
    /// `IBase.Run`
    pub run: Token,
    /// `IBase.Reset`
    pub reset: Token,
    /// `IBase.Stop`
    pub stop: Token,
    /// `interface IDerived : IBase { void IBase.Run() {} abstract void IBase.Reset(); }`
    pub derived: Token,
    /// `IDerived`'s `IBase.Run`
    pub derived_run: Token,
    /// `interface IOther : IBase { void IBase.Run() {} }`
    pub other_run: Token,
    /// `class Plain : IBase {}`
    pub plain: Token,
    /// `class Specific : IDerived {}`
    pub specific: Token,
    /// `class Diamond : IDerived, IOther {}`
    pub diamond: Token,
    /// `class Overriding : IDerived { public void Run() {} }`
    pub overriding: Token,
    /// `Overriding.Run`
    pub overriding_run: Token,
}

/// Creates interfaces with bodies, a more specific body, a re-abstraction and a diamond
pub fn default_bodies_factory() -> Result<DefaultBodies> {
    let graph = TypeGraph::new("Sample");
    let base = TypeBuilder::new(&graph).interface("App", "IBase").build()?;
    let run = MethodBuilder::new(&graph, base, "Run").build()?;
    let reset = MethodBuilder::new(&graph, base, "Reset").build()?;
    let stop = MethodBuilder::new(&graph, base, "Stop").abstract_().build()?;

    let derived = TypeBuilder::new(&graph)
        .interface("App", "IDerived")
        .implements_type(base)
        .build()?;
    let derived_run = MethodBuilder::new(&graph, derived, "App.IBase.Run")
        .explicit_impl(TypeSig::named(base), run)
        .build()?;
    MethodBuilder::new(&graph, derived, "App.IBase.Reset")
        .abstract_()
        .explicit_impl(TypeSig::named(base), reset)
        .build()?;

    let other = TypeBuilder::new(&graph)
        .interface("App", "IOther")
        .implements_type(base)
        .build()?;
    let other_run = MethodBuilder::new(&graph, other, "App.IBase.Run")
        .explicit_impl(TypeSig::named(base), run)
        .build()?;

    let plain = TypeBuilder::new(&graph)
        .class("App", "Plain")
        .implements_type(base)
        .build()?;
    let specific = TypeBuilder::new(&graph)
        .class("App", "Specific")
        .implements_type(derived)
        .build()?;
    let diamond = TypeBuilder::new(&graph)
        .class("App", "Diamond")
        .implements_type(derived)
        .implements_type(other)
        .build()?;
    let overriding = TypeBuilder::new(&graph)
        .class("App", "Overriding")
        .implements_type(derived)
        .build()?;
    let overriding_run = MethodBuilder::new(&graph, overriding, "Run").build()?;

    Ok(DefaultBodies {
        graph: Arc::new(graph),
        base,
        run,
        reset,
        stop,
        derived,
        derived_run,
        other_run,
        plain,
        specific,
        diamond,
        overriding,
        overriding_run,
    })
}
