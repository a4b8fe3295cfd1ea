//! Generic substitution of signatures.
//!
//! Signatures are stored in the "space" of their declaring type: `TypeParam(0)` inside a
//! member of `List<T>` means `T`. When a member is viewed through an instantiation such as
//! `List<string>`, or from a derived type `Derived<U> : List<U[]>`, its signature has to be
//! re-expressed in the viewer's space. [`TypeMap`] performs that translation.

use crate::metadata::signatures::{CustomModifier, Signature, SignatureParameter, TypeSig};

/// A mapping from type-parameter ordinals to type arguments.
///
/// Ordinal `i` maps to `args[i]`. Type parameters outside the range of the map and method
/// generic parameters are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeMap {
    args: Vec<TypeSig>,
}

impl TypeMap {
    /// Creates a map substituting ordinal `i` with `args[i]`
    #[must_use]
    pub fn new(args: Vec<TypeSig>) -> Self {
        TypeMap { args }
    }

    /// The map that leaves the first `arity` type parameters unchanged
    #[must_use]
    pub fn identity(arity: usize) -> Self {
        TypeMap {
            args: (0..arity as u32).map(TypeSig::TypeParam).collect(),
        }
    }

    /// The map that instantiates the definition referenced by `sig` with its own arguments
    #[must_use]
    pub fn for_instance(sig: &TypeSig) -> Self {
        TypeMap {
            args: sig.args().to_vec(),
        }
    }

    /// The substituted arguments, indexed by type-parameter ordinal
    #[must_use]
    pub fn args(&self) -> &[TypeSig] {
        &self.args
    }

    /// Returns true if applying this map never changes a signature
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.args
            .iter()
            .enumerate()
            .all(|(ordinal, arg)| *arg == TypeSig::TypeParam(ordinal as u32))
    }

    /// Substitutes every type parameter of `sig`.
    ///
    /// Annotations introduced by the substitution merge with annotations already present,
    /// so `T?` with `T := string?` yields `string?` rather than a doubly annotated type.
    #[must_use]
    pub fn apply(&self, sig: &TypeSig) -> TypeSig {
        match sig {
            TypeSig::TypeParam(ordinal) => self
                .args
                .get(*ordinal as usize)
                .cloned()
                .unwrap_or_else(|| sig.clone()),
            TypeSig::Named { def, args } => TypeSig::Named {
                def: *def,
                args: args.iter().map(|arg| self.apply(arg)).collect(),
            },
            TypeSig::SzArray(base) => TypeSig::SzArray(Box::new(self.apply(base))),
            TypeSig::Array { base, rank } => TypeSig::Array {
                base: Box::new(self.apply(base)),
                rank: *rank,
            },
            TypeSig::Ptr(base) => TypeSig::Ptr(Box::new(self.apply(base))),
            TypeSig::Nullable(base) => TypeSig::nullable(self.apply(base)),
            TypeSig::Primitive(_) | TypeSig::MethodParam(_) => sig.clone(),
        }
    }

    /// Substitutes the type of a parameter, keeping its passing mode and modifiers
    #[must_use]
    pub fn apply_parameter(&self, param: &SignatureParameter) -> SignatureParameter {
        SignatureParameter {
            passing: param.passing,
            modifiers: param
                .modifiers
                .iter()
                .map(|modifier| CustomModifier {
                    required: modifier.required,
                    modifier: self.apply(&modifier.modifier),
                })
                .collect(),
            base: self.apply(&param.base),
        }
    }

    /// Substitutes every parameter and the return value of `signature`
    #[must_use]
    pub fn apply_signature(&self, signature: &Signature) -> Signature {
        if self.is_identity() {
            return signature.clone();
        }

        Signature {
            generic_arity: signature.generic_arity,
            params: signature
                .params
                .iter()
                .map(|param| self.apply_parameter(param))
                .collect(),
            return_type: self.apply_parameter(&signature.return_type),
        }
    }

    /// Returns the map equivalent to applying `self` first and `outer` afterwards.
    ///
    /// Walking up a hierarchy composes the per-level maps: if `self` expresses a base type's
    /// parameters in terms of its derived type, and `outer` expresses the derived type's
    /// parameters in terms of the type being analysed, the result expresses the base type's
    /// parameters directly in terms of the analysed type.
    #[must_use]
    pub fn compose(&self, outer: &TypeMap) -> TypeMap {
        TypeMap {
            args: self.args.iter().map(|arg| outer.apply(arg)).collect(),
        }
    }
}
