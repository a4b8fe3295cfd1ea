//! Symbol identity service.
//!
//! Canonicalizes type and member references into stable identities. Two references are the
//! same symbol when they name the same logical declaration, regardless of
//!
//! - which token the declaration carries (a type declared in source and the same type loaded
//!   back from metadata share a [`crate::metadata::typesystem::TypeKey`]),
//! - how a generic instantiation was reached (`List<T>` with `T := string` reached through a
//!   derived type's substitution equals a directly written `List<string>`),
//! - and, depending on [`ComparisonMode`], nullability annotations and custom modifiers.
//!
//! Every mode comes with a hash consistent with its equality, so identities can be used as map
//! keys by callers.

use crate::metadata::{
    member::{Member, MemberKind},
    signatures::{Signature, SignatureParameter, TypeSig},
    token::Token,
    typesystem::{TypeGraph, TypeNode, TypeSignatureHash},
};

/// How strictly two symbols are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonMode {
    /// Ignore nullability annotations and custom modifiers
    #[default]
    Default,
    /// Compare nullability annotations at every nesting level
    IncludeVariance,
    /// Compare nullability annotations and custom modifiers
    ConsiderEverything,
}

impl ComparisonMode {
    fn keeps_annotations(self) -> bool {
        !matches!(self, ComparisonMode::Default)
    }

    fn keeps_modifiers(self) -> bool {
        matches!(self, ComparisonMode::ConsiderEverything)
    }
}

/// A member viewed through a particular instantiation of its declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    /// The member definition
    pub member: Token,
    /// Instantiation of the declaring type through which the member is accessed
    pub containing: TypeSig,
    /// Method type arguments, empty for the uninstantiated definition
    pub method_args: Vec<TypeSig>,
}

impl MemberRef {
    /// Reference `member` through the instantiation `containing`
    #[must_use]
    pub fn new(member: Token, containing: TypeSig) -> Self {
        MemberRef {
            member,
            containing,
            method_args: Vec::new(),
        }
    }

    /// Reference the definition of `member`, as seen from inside `declaring`
    #[must_use]
    pub fn definition(member: Token, declaring: &TypeNode) -> Self {
        Self::new(member, declaring.self_sig())
    }

    /// Supply method type arguments
    #[must_use]
    pub fn with_method_args(mut self, method_args: Vec<TypeSig>) -> Self {
        self.method_args = method_args;
        self
    }
}

/// Identity comparisons and hashes over one type graph.
///
/// # Examples
///
/// ```rust
/// use memberscope::metadata::{signatures::TypeSig, typesystem::{TypeBuilder, TypeGraph}};
/// use memberscope::resolution::{ComparisonMode, SymbolIdentity};
///
/// let graph = TypeGraph::new("Sample");
/// let list = TypeBuilder::new(&graph).class("App", "List").generic_param("T").build()?;
///
/// let plain = TypeSig::generic(list, vec![TypeSig::STRING]);
/// let annotated = TypeSig::generic(list, vec![TypeSig::nullable(TypeSig::STRING)]);
///
/// let identity = SymbolIdentity::new(&graph);
/// assert!(identity.are_identical_types(&plain, &annotated, ComparisonMode::Default));
/// assert!(!identity.are_identical_types(&plain, &annotated, ComparisonMode::IncludeVariance));
/// # Ok::<(), memberscope::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct SymbolIdentity<'a> {
    graph: &'a TypeGraph,
}

impl<'a> SymbolIdentity<'a> {
    /// Create an identity service for `graph`
    #[must_use]
    pub fn new(graph: &'a TypeGraph) -> Self {
        SymbolIdentity { graph }
    }

    /// The canonical form of `sig` under `mode`.
    ///
    /// Definitions are replaced by their canonical token; annotations are dropped unless the
    /// mode compares them.
    #[must_use]
    pub fn canonicalize(&self, sig: &TypeSig, mode: ComparisonMode) -> TypeSig {
        if !mode.keeps_annotations() {
            return self.graph.canonical_sig(sig);
        }

        match sig {
            TypeSig::Named { def, args } => TypeSig::Named {
                def: self.graph.canonical(*def),
                args: args.iter().map(|arg| self.canonicalize(arg, mode)).collect(),
            },
            TypeSig::Nullable(inner) => TypeSig::nullable(self.canonicalize(inner, mode)),
            TypeSig::SzArray(base) => TypeSig::SzArray(Box::new(self.canonicalize(base, mode))),
            TypeSig::Array { base, rank } => TypeSig::Array {
                base: Box::new(self.canonicalize(base, mode)),
                rank: *rank,
            },
            TypeSig::Ptr(base) => TypeSig::Ptr(Box::new(self.canonicalize(base, mode))),
            TypeSig::Primitive(_) | TypeSig::TypeParam(_) | TypeSig::MethodParam(_) => sig.clone(),
        }
    }

    /// Returns true if `a` and `b` denote the same type under `mode`
    #[must_use]
    pub fn are_identical_types(&self, a: &TypeSig, b: &TypeSig, mode: ComparisonMode) -> bool {
        a == b || self.canonicalize(a, mode) == self.canonicalize(b, mode)
    }

    /// Hash of `sig`, equal for all types identical under `mode`
    #[must_use]
    pub fn type_hash(&self, sig: &TypeSig, mode: ComparisonMode) -> u64 {
        self.hash_type(TypeSignatureHash::new(), &self.canonicalize(sig, mode))
            .finalize()
    }

    fn hash_type(&self, hash: TypeSignatureHash, sig: &TypeSig) -> TypeSignatureHash {
        match sig {
            TypeSig::Named { def, args } => {
                let hash = match self.graph.type_node(*def) {
                    Some(node) => hash
                        .add_kind(&node.kind)
                        .add_fullname(&node.namespace, &node.name)
                        .add_assembly(&node.assembly),
                    None => hash.add_token(def),
                };
                args.iter()
                    .fold(hash.add_component(&args.len()), |hash, arg| {
                        self.hash_type(hash, arg)
                    })
            }
            TypeSig::Primitive(kind) => hash.add_component(&"primitive").add_component(kind),
            TypeSig::TypeParam(ordinal) => hash.add_component(&"!").add_component(ordinal),
            TypeSig::MethodParam(ordinal) => hash.add_component(&"!!").add_component(ordinal),
            TypeSig::SzArray(base) => self.hash_type(hash.add_component(&"[]"), base),
            TypeSig::Array { base, rank } => {
                self.hash_type(hash.add_component(&"[,]").add_component(rank), base)
            }
            TypeSig::Ptr(base) => self.hash_type(hash.add_component(&"*"), base),
            TypeSig::Nullable(base) => self.hash_type(hash.add_component(&"?"), base),
        }
    }

    /// Returns true if two parameters agree in passing mode and type, and in custom modifiers
    /// when the mode considers them
    #[must_use]
    pub fn are_identical_parameters(
        &self,
        a: &SignatureParameter,
        b: &SignatureParameter,
        mode: ComparisonMode,
    ) -> bool {
        a.passing == b.passing
            && self.are_identical_types(&a.base, &b.base, mode)
            && (!mode.keeps_modifiers() || self.are_identical_modifiers(a, b))
    }

    /// Returns true if both parameters carry the same custom modifiers, in the same order
    #[must_use]
    pub fn are_identical_modifiers(&self, a: &SignatureParameter, b: &SignatureParameter) -> bool {
        a.modifiers.len() == b.modifiers.len()
            && a.modifiers.iter().zip(&b.modifiers).all(|(left, right)| {
                left.required == right.required
                    && self.are_identical_types(
                        &left.modifier,
                        &right.modifier,
                        ComparisonMode::ConsiderEverything,
                    )
            })
    }

    /// Returns true if two signatures are identical under `mode`, return value included
    #[must_use]
    pub fn are_identical_signatures(&self, a: &Signature, b: &Signature, mode: ComparisonMode) -> bool {
        a.generic_arity == b.generic_arity
            && a.params.len() == b.params.len()
            && self.are_identical_parameters(&a.return_type, &b.return_type, mode)
            && a
                .params
                .iter()
                .zip(&b.params)
                .all(|(left, right)| self.are_identical_parameters(left, right, mode))
    }

    /// Returns true if `a` and `b` are the same logical declaration.
    ///
    /// Members declared by types sharing a logical identity are the same declaration when
    /// their kind, name and declared signature agree.
    #[must_use]
    pub fn are_same_definition(&self, a: &Member, b: &Member, mode: ComparisonMode) -> bool {
        if a.token == b.token {
            return true;
        }

        self.graph.canonical(a.declaring_type) == self.graph.canonical(b.declaring_type)
            && a.kind == b.kind
            && a.name == b.name
            && self.are_identical_signatures(&a.signature, &b.signature, mode)
    }

    /// Returns true if both references denote the same member of the same instantiation.
    ///
    /// Unknown member tokens are only identical to themselves.
    #[must_use]
    pub fn are_identical_members(&self, a: &MemberRef, b: &MemberRef, mode: ComparisonMode) -> bool {
        let same_definition = match (self.graph.member(a.member), self.graph.member(b.member)) {
            (Some(left), Some(right)) => self.are_same_definition(&left, &right, mode),
            _ => a.member == b.member,
        };

        same_definition
            && self.are_identical_types(&a.containing, &b.containing, mode)
            && a.method_args.len() == b.method_args.len()
            && a
                .method_args
                .iter()
                .zip(&b.method_args)
                .all(|(left, right)| self.are_identical_types(left, right, mode))
    }

    /// Hash of a member reference, equal for all references identical under `mode`
    #[must_use]
    pub fn member_hash(&self, reference: &MemberRef, mode: ComparisonMode) -> u64 {
        let mut hash = TypeSignatureHash::new();

        match self.graph.member(reference.member) {
            Some(member) => {
                let declaring = self.graph.canonical(member.declaring_type);
                hash = hash
                    .add_token(&declaring)
                    .add_component(&kind_tag(member.kind))
                    .add_component(member.name.as_str())
                    .add_component(&member.signature.generic_arity)
                    .add_component(&member.signature.params.len());
                for param in
                    std::iter::once(&member.signature.return_type).chain(&member.signature.params)
                {
                    hash = self.hash_parameter(hash, param, mode);
                }
            }
            None => hash = hash.add_token(&reference.member),
        }

        hash = self.hash_type(hash, &self.canonicalize(&reference.containing, mode));
        hash = hash.add_component(&reference.method_args.len());
        for arg in &reference.method_args {
            hash = self.hash_type(hash, &self.canonicalize(arg, mode));
        }

        hash.finalize()
    }

    fn hash_parameter(
        &self,
        hash: TypeSignatureHash,
        param: &SignatureParameter,
        mode: ComparisonMode,
    ) -> TypeSignatureHash {
        let mut hash = self.hash_type(
            hash.add_component(&param.passing),
            &self.canonicalize(&param.base, mode),
        );

        if mode.keeps_modifiers() {
            hash = hash.add_component(&param.modifiers.len());
            for modifier in &param.modifiers {
                hash = self.hash_type(
                    hash.add_component(&modifier.required),
                    &self.canonicalize(&modifier.modifier, ComparisonMode::ConsiderEverything),
                );
            }
        }

        hash
    }
}

fn kind_tag(kind: MemberKind) -> u8 {
    match kind {
        MemberKind::Method => 0,
        MemberKind::Accessor(accessor) => 1 + accessor as u8,
        MemberKind::Property => 8,
        MemberKind::Event => 9,
    }
}
