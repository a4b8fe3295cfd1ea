//! Signature comparer.
//!
//! Structural equality of member signatures under a generic substitution. The comparer knows
//! three modes:
//!
//! - [`SignatureMode::ForOverride`] compares parameters and the return value, allowing a more
//!   derived reference type as return type when covariant returns are enabled
//! - [`SignatureMode::ForHiding`] compares parameters only
//! - [`SignatureMode::ForInterfaceMap`] compares like `ForOverride` and additionally reports
//!   ordinary methods matched against accessors (and the reverse) as distinct mismatches
//!
//! In every mode the generic arity, the number of parameters and every parameter's passing mode
//! must agree exactly.

use bitflags::bitflags;

use crate::{
    metadata::{
        member::{Member, MemberKind, SymbolOrigin},
        signatures::{PassingMode, PrimitiveKind, Signature, SignatureParameter, TypeMap, TypeSig},
        typesystem::{
            BaseChain, GenericConstraints, InterfaceClosure, TypeGraph, TypeKind, TypeNode,
        },
    },
    resolution::{
        config::ResolutionConfig,
        identity::{ComparisonMode, SymbolIdentity},
    },
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Relaxations applied when comparing parameter and return types
    pub struct ComparisonFlags: u32 {
        /// Ignore `modopt`/`modreq` annotations
        const IGNORE_CUSTOM_MODIFIERS = 0x0001;
        /// Ignore nullability annotations at every nesting level
        const IGNORE_VARIANCE = 0x0002;
    }
}

/// What a signature comparison is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureMode {
    /// Candidate overrides a base member
    ForOverride,
    /// Candidate hides a base member
    ForHiding,
    /// Candidate implements an interface member
    ForInterfaceMap,
}

/// Outcome of comparing a candidate member against a target member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberMatch {
    /// Same kind and matching signature
    Matched,
    /// An ordinary method whose signature matches an accessor
    MethodAccessorMismatch,
    /// An accessor whose signature matches an ordinary method
    AccessorMethodMismatch,
    /// No match
    NoMatch,
}

impl MemberMatch {
    /// Returns true unless this is [`MemberMatch::NoMatch`]
    #[must_use]
    pub fn is_match(&self) -> bool {
        !matches!(self, MemberMatch::NoMatch)
    }
}

/// Compares member signatures of one type graph.
///
/// # Examples
///
/// ```rust
/// use memberscope::metadata::signatures::{Signature, SignatureParameter, TypeMap, TypeSig};
/// use memberscope::metadata::typesystem::TypeGraph;
/// use memberscope::resolution::{ComparisonFlags, SignatureComparer, SignatureMode};
///
/// let graph = TypeGraph::new("Sample");
/// let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());
///
/// // void Put(T) in Base<T>, compared with void Put(string) in Derived : Base<string>
/// let mut base = Signature::void();
/// base.params.push(SignatureParameter::new(TypeSig::TypeParam(0)));
/// let mut derived = Signature::void();
/// derived.params.push(SignatureParameter::new(TypeSig::STRING));
///
/// let substitution = TypeMap::new(vec![TypeSig::STRING]);
/// assert!(comparer.signatures_match(&derived, &base, &substitution, SignatureMode::ForOverride));
/// ```
#[derive(Clone, Copy)]
pub struct SignatureComparer<'a> {
    graph: &'a TypeGraph,
    identity: SymbolIdentity<'a>,
    flags: ComparisonFlags,
    config: ResolutionConfig,
}

impl<'a> SignatureComparer<'a> {
    /// Create a comparer with default configuration
    #[must_use]
    pub fn new(graph: &'a TypeGraph, flags: ComparisonFlags) -> Self {
        Self::with_config(graph, flags, ResolutionConfig::default())
    }

    /// Create a comparer honouring `config`
    #[must_use]
    pub fn with_config(graph: &'a TypeGraph, flags: ComparisonFlags, config: ResolutionConfig) -> Self {
        SignatureComparer {
            graph,
            identity: SymbolIdentity::new(graph),
            flags,
            config,
        }
    }

    /// The same comparer with different relaxations
    #[must_use]
    pub fn with_flags(mut self, flags: ComparisonFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The active relaxations
    #[must_use]
    pub fn flags(&self) -> ComparisonFlags {
        self.flags
    }

    fn type_mode(&self) -> ComparisonMode {
        if self.flags.contains(ComparisonFlags::IGNORE_VARIANCE) {
            ComparisonMode::Default
        } else {
            ComparisonMode::IncludeVariance
        }
    }

    /// Returns true if `a` matches `b` after applying `substitution` to `b`.
    ///
    /// `a` is the overriding, hiding or implementing signature; `b` the base or interface
    /// signature. Type parameters in return types are treated as possibly being value types.
    ///
    /// ## Arguments
    /// * `a` - Candidate signature, in the space of the comparison
    /// * `b` - Base or interface signature
    /// * `substitution` - Maps `b`'s type parameters into the space of the comparison
    /// * `mode` - What the comparison is used for
    #[must_use]
    pub fn signatures_match(
        &self,
        a: &Signature,
        b: &Signature,
        substitution: &TypeMap,
        mode: SignatureMode,
    ) -> bool {
        self.signatures_match_in(a, b, substitution, mode, None)
    }

    /// Like [`SignatureComparer::signatures_match`], with `context` declaring the generic
    /// parameters of the comparison space, so constrained parameters can take part in
    /// covariant return matching.
    #[must_use]
    pub fn signatures_match_in(
        &self,
        a: &Signature,
        b: &Signature,
        substitution: &TypeMap,
        mode: SignatureMode,
        context: Option<&TypeNode>,
    ) -> bool {
        if a.generic_arity != b.generic_arity || a.params.len() != b.params.len() {
            return false;
        }

        let params_match = a.params.iter().zip(&b.params).all(|(left, right)| {
            self.parameters_match(left, &substitution.apply_parameter(right))
        });
        if !params_match {
            return false;
        }

        match mode {
            SignatureMode::ForHiding => true,
            SignatureMode::ForOverride | SignatureMode::ForInterfaceMap => {
                let expected = substitution.apply_parameter(&b.return_type);
                self.returns_match(&a.return_type, &expected, context)
            }
        }
    }

    fn parameters_match(&self, a: &SignatureParameter, b: &SignatureParameter) -> bool {
        a.passing == b.passing
            && self.identity.are_identical_types(&a.base, &b.base, self.type_mode())
            && self.modifiers_match(a, b)
    }

    fn modifiers_match(&self, a: &SignatureParameter, b: &SignatureParameter) -> bool {
        self.flags.contains(ComparisonFlags::IGNORE_CUSTOM_MODIFIERS)
            || self.identity.are_identical_modifiers(a, b)
    }

    fn returns_match(
        &self,
        candidate: &SignatureParameter,
        expected: &SignatureParameter,
        context: Option<&TypeNode>,
    ) -> bool {
        if candidate.passing != expected.passing || !self.modifiers_match(candidate, expected) {
            return false;
        }

        if self
            .identity
            .are_identical_types(&candidate.base, &expected.base, self.type_mode())
        {
            return true;
        }

        self.config.covariant_returns
            && candidate.passing == PassingMode::Value
            && self.is_reference_conversion(&candidate.base, &expected.base, context)
    }

    /// Returns true if a value of type `sig` is always a reference
    #[must_use]
    pub fn is_reference_type(&self, sig: &TypeSig, context: Option<&TypeNode>) -> bool {
        match sig.unannotated() {
            TypeSig::Primitive(kind) => kind.is_reference(),
            TypeSig::Named { def, .. } => self
                .graph
                .type_node(*def)
                .is_some_and(|node| node.is_reference_type()),
            TypeSig::SzArray(_) | TypeSig::Array { .. } => true,
            TypeSig::TypeParam(ordinal) => context
                .and_then(|node| node.generic_params.get(*ordinal as usize))
                .is_some_and(|param| {
                    param.constraints.contains(GenericConstraints::REFERENCE_TYPE)
                        || param
                            .bounds
                            .iter()
                            .any(|bound| self.is_class_type(bound))
                }),
            TypeSig::MethodParam(_) | TypeSig::Ptr(_) | TypeSig::Nullable(_) => false,
        }
    }

    fn is_class_type(&self, sig: &TypeSig) -> bool {
        sig.def()
            .and_then(|def| self.graph.type_node(def))
            .is_some_and(|node| node.kind == TypeKind::Class)
    }

    /// Returns true if an implicit reference conversion exists from `from` to `to`.
    ///
    /// Covers conversions to `object`, to a base class, to an implemented interface, array
    /// covariance and conversions of reference-constrained type parameters through their
    /// bounds. Boxing conversions are not reference conversions.
    #[must_use]
    pub fn is_reference_conversion(&self, from: &TypeSig, to: &TypeSig, context: Option<&TypeNode>) -> bool {
        let from = self.graph.canonical_sig(from);
        let to = self.graph.canonical_sig(to);

        if !self.is_reference_type(&from, context) || !self.is_reference_type(&to, context) {
            return false;
        }
        if from == to || to == TypeSig::Primitive(PrimitiveKind::Object) {
            return true;
        }

        match (&from, &to) {
            (TypeSig::SzArray(from_element), TypeSig::SzArray(to_element)) => {
                self.is_reference_type(from_element, context)
                    && self.is_reference_conversion(from_element, to_element, context)
            }
            (
                TypeSig::Array {
                    base: from_element,
                    rank: from_rank,
                },
                TypeSig::Array {
                    base: to_element,
                    rank: to_rank,
                },
            ) => {
                from_rank == to_rank
                    && self.is_reference_type(from_element, context)
                    && self.is_reference_conversion(from_element, to_element, context)
            }
            (TypeSig::Named { def, .. }, _) => {
                let Some(node) = self.graph.type_node(*def) else {
                    return false;
                };
                let instance = TypeMap::for_instance(&from);

                let via_base = BaseChain::new(self.graph, &node)
                    .with_limit(self.config.max_inheritance_depth)
                    .any(|link| self.graph.canonical_sig(&instance.apply(&link.sig)) == to);

                via_base
                    || InterfaceClosure::all(self.graph, &node)
                        .iter()
                        .any(|interface| self.graph.canonical_sig(&instance.apply(interface)) == to)
            }
            (TypeSig::TypeParam(ordinal), _) => context
                .and_then(|node| node.generic_params.get(*ordinal as usize))
                .is_some_and(|param| {
                    param
                        .bounds
                        .iter()
                        .any(|bound| self.is_reference_conversion(bound, &to, context))
                }),
            _ => false,
        }
    }

    /// Compares two members, each viewed through its own substitution into a common space.
    ///
    /// Members of different kinds never match, except that in
    /// [`SignatureMode::ForInterfaceMap`] an ordinary method matched against an accessor (or the
    /// reverse) is reported as a mismatch when the candidate is declared in source and
    /// mismatch reporting is enabled.
    ///
    /// ## Arguments
    /// * `candidate` - The overriding, hiding or implementing member
    /// * `candidate_map` - Maps the candidate's declaring type into the common space
    /// * `target` - The base or interface member
    /// * `target_map` - Maps the target's declaring type into the common space
    /// * `mode` - What the comparison is used for
    /// * `context` - The type declaring the common space's generic parameters
    #[must_use]
    pub fn match_members(
        &self,
        candidate: &Member,
        candidate_map: &TypeMap,
        target: &Member,
        target_map: &TypeMap,
        mode: SignatureMode,
        context: Option<&TypeNode>,
    ) -> MemberMatch {
        let outcome = match (candidate.kind, target.kind) {
            (left, right) if left == right => MemberMatch::Matched,
            (MemberKind::Method, MemberKind::Accessor(_)) if mode == SignatureMode::ForInterfaceMap => {
                MemberMatch::MethodAccessorMismatch
            }
            (MemberKind::Accessor(_), MemberKind::Method) if mode == SignatureMode::ForInterfaceMap => {
                MemberMatch::AccessorMethodMismatch
            }
            _ => return MemberMatch::NoMatch,
        };

        if outcome != MemberMatch::Matched
            && (!self.config.report_accessor_mismatches
                || self.graph.member_origin(candidate) != SymbolOrigin::Source)
        {
            return MemberMatch::NoMatch;
        }

        let candidate_signature = candidate_map.apply_signature(&candidate.signature);
        if self.signatures_match_in(&candidate_signature, &target.signature, target_map, mode, context) {
            outcome
        } else {
            MemberMatch::NoMatch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        signatures::CustomModifier,
        typesystem::{MethodBuilder, PropertyBuilder, TypeBuilder},
    };

    fn signature(ret: TypeSig, params: &[TypeSig]) -> Signature {
        let mut signature = Signature::new(ret);
        signature
            .params
            .extend(params.iter().cloned().map(SignatureParameter::new));
        signature
    }

    #[test]
    fn test_arity_count_and_passing_must_match() {
        let graph = TypeGraph::new("Sample");
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let identity = TypeMap::default();
        let base = signature(TypeSig::VOID, &[TypeSig::I4]);

        for mode in [
            SignatureMode::ForOverride,
            SignatureMode::ForHiding,
            SignatureMode::ForInterfaceMap,
        ] {
            assert!(comparer.signatures_match(&base, &base, &identity, mode));

            let mut generic = base.clone();
            generic.generic_arity = 1;
            assert!(!comparer.signatures_match(&generic, &base, &identity, mode));

            let longer = signature(TypeSig::VOID, &[TypeSig::I4, TypeSig::I4]);
            assert!(!comparer.signatures_match(&longer, &base, &identity, mode));

            let mut by_ref = base.clone();
            by_ref.params[0].passing = PassingMode::Ref;
            assert!(!comparer.signatures_match(&by_ref, &base, &identity, mode));

            let mut out = base.clone();
            out.params[0].passing = PassingMode::Out;
            assert!(!comparer.signatures_match(&out, &by_ref, &identity, mode));
        }
    }

    #[test]
    fn test_hiding_ignores_return() {
        let graph = TypeGraph::new("Sample");
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let identity = TypeMap::default();

        let base = signature(TypeSig::I4, &[TypeSig::STRING]);
        let mut derived = signature(TypeSig::BOOLEAN, &[TypeSig::STRING]);
        derived.return_type.passing = PassingMode::Ref;

        assert!(comparer.signatures_match(&derived, &base, &identity, SignatureMode::ForHiding));
        assert!(!comparer.signatures_match(&derived, &base, &identity, SignatureMode::ForOverride));
    }

    #[test]
    fn test_substitution_applies_to_base() {
        let graph = TypeGraph::new("Sample");
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());

        let base = signature(TypeSig::TypeParam(0), &[TypeSig::sz_array(TypeSig::TypeParam(0))]);
        let derived = signature(TypeSig::STRING, &[TypeSig::sz_array(TypeSig::STRING)]);

        let to_string = TypeMap::new(vec![TypeSig::STRING]);
        let to_int = TypeMap::new(vec![TypeSig::I4]);
        assert!(comparer.signatures_match(&derived, &base, &to_string, SignatureMode::ForOverride));
        assert!(!comparer.signatures_match(&derived, &base, &to_int, SignatureMode::ForOverride));
    }

    #[test]
    fn test_covariant_returns() {
        let graph = TypeGraph::new("Sample");
        let animal = TypeBuilder::new(&graph).class("App", "Animal").build().unwrap();
        let cat = TypeBuilder::new(&graph)
            .class("App", "Cat")
            .extends_type(animal)
            .build()
            .unwrap();
        let point = TypeBuilder::new(&graph).structure("App", "Point").build().unwrap();
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let identity = TypeMap::default();

        let base = signature(TypeSig::named(animal), &[]);
        let derived = signature(TypeSig::named(cat), &[]);
        assert!(comparer.signatures_match(&derived, &base, &identity, SignatureMode::ForOverride));
        assert!(comparer.signatures_match(&derived, &base, &identity, SignatureMode::ForInterfaceMap));
        assert!(!comparer.signatures_match(&base, &derived, &identity, SignatureMode::ForOverride));

        let to_object = signature(TypeSig::OBJECT, &[]);
        assert!(comparer.signatures_match(&derived, &to_object, &identity, SignatureMode::ForOverride));
        let boxed = signature(TypeSig::named(point), &[]);
        assert!(!comparer.signatures_match(&boxed, &to_object, &identity, SignatureMode::ForOverride));

        let legacy = SignatureComparer::with_config(
            &graph,
            ComparisonFlags::empty(),
            ResolutionConfig::legacy(),
        );
        assert!(!legacy.signatures_match(&derived, &base, &identity, SignatureMode::ForOverride));
    }

    #[test]
    fn test_covariant_ref_return_rejected() {
        let graph = TypeGraph::new("Sample");
        let animal = TypeBuilder::new(&graph).class("App", "Animal").build().unwrap();
        let cat = TypeBuilder::new(&graph)
            .class("App", "Cat")
            .extends_type(animal)
            .build()
            .unwrap();
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());

        let mut base = signature(TypeSig::named(animal), &[]);
        base.return_type.passing = PassingMode::Ref;
        let mut derived = signature(TypeSig::named(cat), &[]);
        derived.return_type.passing = PassingMode::Ref;

        assert!(!comparer.signatures_match(&derived, &base, &TypeMap::default(), SignatureMode::ForOverride));
    }

    #[test]
    fn test_reference_conversions() {
        let graph = TypeGraph::new("Sample");
        let shape = TypeBuilder::new(&graph).interface("App", "IShape").build().unwrap();
        let sequence = TypeBuilder::new(&graph)
            .interface("App", "ISequence")
            .generic_param("T")
            .build()
            .unwrap();
        let circle = TypeBuilder::new(&graph)
            .class("App", "Circle")
            .implements_type(shape)
            .build()
            .unwrap();
        let ring = TypeBuilder::new(&graph)
            .class("App", "Ring")
            .generic_param("T")
            .implements(TypeSig::generic(sequence, vec![TypeSig::TypeParam(0)]))
            .build()
            .unwrap();
        let holder = TypeBuilder::new(&graph)
            .class("App", "Holder")
            .generic_param_constrained("T", GenericConstraints::REFERENCE_TYPE)
            .generic_param("U")
            .build()
            .unwrap();
        let comparer = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let holder = graph.get_type(holder).unwrap();

        let circle = TypeSig::named(circle);
        let shape = TypeSig::named(shape);
        assert!(comparer.is_reference_conversion(&circle, &shape, None));
        assert!(!comparer.is_reference_conversion(&shape, &circle, None));
        assert!(comparer.is_reference_conversion(
            &TypeSig::sz_array(circle.clone()),
            &TypeSig::sz_array(shape.clone()),
            None
        ));
        assert!(comparer.is_reference_conversion(
            &TypeSig::generic(ring, vec![TypeSig::STRING]),
            &TypeSig::generic(sequence, vec![TypeSig::STRING]),
            None
        ));
        assert!(!comparer.is_reference_conversion(
            &TypeSig::generic(ring, vec![TypeSig::STRING]),
            &TypeSig::generic(sequence, vec![TypeSig::I4]),
            None
        ));
        assert!(comparer.is_reference_conversion(&TypeSig::TypeParam(0), &TypeSig::OBJECT, Some(&*holder)));
        assert!(!comparer.is_reference_conversion(&TypeSig::TypeParam(1), &TypeSig::OBJECT, Some(&*holder)));
        assert!(!comparer.is_reference_conversion(
            &TypeSig::sz_array(TypeSig::I4),
            &TypeSig::sz_array(TypeSig::OBJECT),
            None
        ));
    }

    #[test]
    fn test_custom_modifier_flags() {
        let graph = TypeGraph::new("Sample");
        let strict = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let relaxed = strict.with_flags(ComparisonFlags::IGNORE_CUSTOM_MODIFIERS);
        let identity = TypeMap::default();

        let base = signature(TypeSig::VOID, &[TypeSig::I4]);
        let mut modified = base.clone();
        modified.params[0]
            .modifiers
            .push(CustomModifier::optional(TypeSig::I8));

        assert!(!strict.signatures_match(&modified, &base, &identity, SignatureMode::ForOverride));
        assert!(relaxed.signatures_match(&modified, &base, &identity, SignatureMode::ForOverride));
    }

    #[test]
    fn test_variance_flags() {
        let graph = TypeGraph::new("Sample");
        let list = TypeBuilder::new(&graph)
            .class("App", "List")
            .generic_param("T")
            .build()
            .unwrap();
        let strict = SignatureComparer::new(&graph, ComparisonFlags::empty());
        let relaxed = strict.with_flags(ComparisonFlags::IGNORE_VARIANCE);
        let identity = TypeMap::default();

        let base = signature(TypeSig::VOID, &[TypeSig::generic(list, vec![TypeSig::STRING])]);
        let annotated = signature(
            TypeSig::VOID,
            &[TypeSig::generic(list, vec![TypeSig::nullable(TypeSig::STRING)])],
        );

        assert!(!strict.signatures_match(&annotated, &base, &identity, SignatureMode::ForHiding));
        assert!(relaxed.signatures_match(&annotated, &base, &identity, SignatureMode::ForHiding));
    }

    #[test]
    fn test_match_members_categories() {
        let graph = TypeGraph::new("Sample");
        let named = TypeBuilder::new(&graph).interface("App", "INamed").build().unwrap();
        let property = PropertyBuilder::new(&graph, named, "Name")
            .abstract_()
            .of_type(TypeSig::STRING)
            .getter()
            .build()
            .unwrap();
        let source = TypeBuilder::new(&graph).class("App", "Source").build().unwrap();
        let method = MethodBuilder::new(&graph, source, "get_Name")
            .returns(TypeSig::STRING)
            .build()
            .unwrap();
        let imported = TypeBuilder::new(&graph)
            .class("Lib", "Imported")
            .from_metadata("Lib")
            .build()
            .unwrap();
        let imported_method = MethodBuilder::new(&graph, imported, "get_Name")
            .returns(TypeSig::STRING)
            .build()
            .unwrap();

        let owner = graph.get_member(property).unwrap();
        let getter = graph
            .accessor(&owner, crate::metadata::member::AccessorKind::Get)
            .unwrap();
        let method = graph.get_member(method).unwrap();
        let imported_method = graph.get_member(imported_method).unwrap();
        let identity = TypeMap::default();

        let comparer = SignatureComparer::new(&graph, ComparisonFlags::IGNORE_CUSTOM_MODIFIERS);
        let check = |candidate: &Member, mode| {
            comparer.match_members(candidate, &identity, &getter, &identity, mode, None)
        };

        assert_eq!(check(&method, SignatureMode::ForInterfaceMap), MemberMatch::MethodAccessorMismatch);
        assert_eq!(check(&method, SignatureMode::ForOverride), MemberMatch::NoMatch);
        assert_eq!(check(&imported_method, SignatureMode::ForInterfaceMap), MemberMatch::NoMatch);
        assert_eq!(check(&getter, SignatureMode::ForInterfaceMap), MemberMatch::Matched);

        let strict = SignatureComparer::with_config(
            &graph,
            ComparisonFlags::IGNORE_CUSTOM_MODIFIERS,
            ResolutionConfig::strict(),
        );
        assert_eq!(
            strict.match_members(&method, &identity, &getter, &identity, SignatureMode::ForInterfaceMap, None),
            MemberMatch::NoMatch
        );

        let reverse = comparer.match_members(
            &getter,
            &identity,
            &method,
            &identity,
            SignatureMode::ForInterfaceMap,
            None,
        );
        // the interface accessor is declared in source, so the reverse mismatch is reported
        assert_eq!(reverse, MemberMatch::AccessorMethodMismatch);
        assert!(!MemberMatch::NoMatch.is_match());
    }
}
