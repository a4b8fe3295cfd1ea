use strum::{Display, EnumIter};

use crate::metadata::token::Token;

/// Built-in types that need no declaration in the type graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PrimitiveKind {
    /// System.Void - represents no value
    #[strum(serialize = "System.Void")]
    Void,
    /// System.Boolean - true/false value
    #[strum(serialize = "System.Boolean")]
    Boolean,
    /// System.Char - Unicode 16-bit character
    #[strum(serialize = "System.Char")]
    Char,
    /// System.SByte - signed 8-bit integer
    #[strum(serialize = "System.SByte")]
    I1,
    /// System.Byte - unsigned 8-bit integer
    #[strum(serialize = "System.Byte")]
    U1,
    /// System.Int16 - signed 16-bit integer
    #[strum(serialize = "System.Int16")]
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    #[strum(serialize = "System.UInt16")]
    U2,
    /// System.Int32 - signed 32-bit integer
    #[strum(serialize = "System.Int32")]
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    #[strum(serialize = "System.UInt32")]
    U4,
    /// System.Int64 - signed 64-bit integer
    #[strum(serialize = "System.Int64")]
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    #[strum(serialize = "System.UInt64")]
    U8,
    /// System.Single - 32-bit floating point
    #[strum(serialize = "System.Single")]
    R4,
    /// System.Double - 64-bit floating point
    #[strum(serialize = "System.Double")]
    R8,
    /// System.IntPtr - native sized signed integer
    #[strum(serialize = "System.IntPtr")]
    I,
    /// System.UIntPtr - native sized unsigned integer
    #[strum(serialize = "System.UIntPtr")]
    U,
    /// System.Object - base class for all reference types
    #[strum(serialize = "System.Object")]
    Object,
    /// System.String - immutable string of Unicode characters
    #[strum(serialize = "System.String")]
    String,
}

impl PrimitiveKind {
    /// Returns true for the primitives with reference semantics
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, PrimitiveKind::Object | PrimitiveKind::String)
    }
}

/// A type as it appears in a member signature, a base-type reference or an interface list.
///
/// Generic parameters are positional: [`TypeSig::TypeParam`] refers to the type parameters of
/// the type whose "space" the signature is expressed in, [`TypeSig::MethodParam`] to the
/// generic parameters of the method itself. Use [`crate::metadata::signatures::TypeMap`] to
/// move a signature from one space to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSig {
    /// A built-in type
    Primitive(PrimitiveKind),
    /// A class, struct or interface, possibly instantiated with type arguments
    Named {
        /// The definition being instantiated
        def: Token,
        /// Type arguments, one per generic parameter of `def`
        args: Vec<TypeSig>,
    },
    /// Generic parameter of the enclosing type, by ordinal
    TypeParam(u32),
    /// Generic parameter of the enclosing method, by ordinal
    MethodParam(u32),
    /// Single-dim array with 0 lower bound
    SzArray(Box<TypeSig>),
    /// Multi-dimensional array
    Array {
        /// Element type
        base: Box<TypeSig>,
        /// Number of dimensions
        rank: u32,
    },
    /// Unmanaged pointer
    Ptr(Box<TypeSig>),
    /// Nullable-reference style annotation (`T?`) on the wrapped type
    Nullable(Box<TypeSig>),
}

#[allow(missing_docs)]
impl TypeSig {
    pub const VOID: TypeSig = TypeSig::Primitive(PrimitiveKind::Void);
    pub const BOOLEAN: TypeSig = TypeSig::Primitive(PrimitiveKind::Boolean);
    pub const I4: TypeSig = TypeSig::Primitive(PrimitiveKind::I4);
    pub const I8: TypeSig = TypeSig::Primitive(PrimitiveKind::I8);
    pub const OBJECT: TypeSig = TypeSig::Primitive(PrimitiveKind::Object);
    pub const STRING: TypeSig = TypeSig::Primitive(PrimitiveKind::String);
}

impl TypeSig {
    /// A non-generic reference to `def`
    #[must_use]
    pub fn named(def: Token) -> Self {
        TypeSig::Named {
            def,
            args: Vec::new(),
        }
    }

    /// An instantiation of `def` with `args`
    #[must_use]
    pub fn generic(def: Token, args: Vec<TypeSig>) -> Self {
        TypeSig::Named { def, args }
    }

    /// `element[]`
    #[must_use]
    pub fn sz_array(element: TypeSig) -> Self {
        TypeSig::SzArray(Box::new(element))
    }

    /// `inner?`, collapsing repeated annotations
    #[must_use]
    pub fn nullable(inner: TypeSig) -> Self {
        match inner {
            TypeSig::Nullable(_) => inner,
            other => TypeSig::Nullable(Box::new(other)),
        }
    }

    /// The definition token if this is a (possibly annotated) named type
    #[must_use]
    pub fn def(&self) -> Option<Token> {
        match self {
            TypeSig::Named { def, .. } => Some(*def),
            TypeSig::Nullable(inner) => inner.def(),
            _ => None,
        }
    }

    /// The type arguments if this is a (possibly annotated) named type
    #[must_use]
    pub fn args(&self) -> &[TypeSig] {
        match self {
            TypeSig::Named { args, .. } => args,
            TypeSig::Nullable(inner) => inner.args(),
            _ => &[],
        }
    }

    /// The type with a top-level annotation removed
    #[must_use]
    pub fn unannotated(&self) -> &TypeSig {
        match self {
            TypeSig::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Removes every annotation, at all nesting levels
    #[must_use]
    pub fn strip_annotations(&self) -> TypeSig {
        match self {
            TypeSig::Nullable(inner) => inner.strip_annotations(),
            TypeSig::Named { def, args } => TypeSig::Named {
                def: *def,
                args: args.iter().map(TypeSig::strip_annotations).collect(),
            },
            TypeSig::SzArray(base) => TypeSig::SzArray(Box::new(base.strip_annotations())),
            TypeSig::Array { base, rank } => TypeSig::Array {
                base: Box::new(base.strip_annotations()),
                rank: *rank,
            },
            TypeSig::Ptr(base) => TypeSig::Ptr(Box::new(base.strip_annotations())),
            other => other.clone(),
        }
    }

    /// Returns true if the signature mentions any type or method generic parameter
    #[must_use]
    pub fn is_open(&self) -> bool {
        match self {
            TypeSig::TypeParam(_) | TypeSig::MethodParam(_) => true,
            TypeSig::Named { args, .. } => args.iter().any(TypeSig::is_open),
            TypeSig::SzArray(base)
            | TypeSig::Array { base, .. }
            | TypeSig::Ptr(base)
            | TypeSig::Nullable(base) => base.is_open(),
            TypeSig::Primitive(_) => false,
        }
    }
}

/// How a parameter or return value is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum PassingMode {
    /// By value
    #[default]
    Value,
    /// `ref`
    Ref,
    /// `in` (read-only reference parameter)
    In,
    /// `out`
    Out,
    /// `ref readonly`
    RefReadOnly,
}

/// A `modopt`/`modreq` annotation attached to a parameter or return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomModifier {
    /// `modreq` if true, `modopt` otherwise
    pub required: bool,
    /// The modifier type
    pub modifier: TypeSig,
}

impl CustomModifier {
    /// An optional modifier (`modopt`)
    #[must_use]
    pub fn optional(modifier: TypeSig) -> Self {
        CustomModifier {
            required: false,
            modifier,
        }
    }

    /// A required modifier (`modreq`)
    #[must_use]
    pub fn required(modifier: TypeSig) -> Self {
        CustomModifier {
            required: true,
            modifier,
        }
    }
}

/// Parameter with optional custom modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureParameter {
    /// Passing convention of the parameter
    pub passing: PassingMode,
    /// Custom modifiers of the parameter
    pub modifiers: Vec<CustomModifier>,
    /// The type of the parameter
    pub base: TypeSig,
}

impl SignatureParameter {
    /// A by-value parameter of type `base`
    #[must_use]
    pub fn new(base: TypeSig) -> Self {
        SignatureParameter {
            passing: PassingMode::Value,
            modifiers: Vec::new(),
            base,
        }
    }

    /// A parameter of type `base` passed with `passing`
    #[must_use]
    pub fn with_passing(passing: PassingMode, base: TypeSig) -> Self {
        SignatureParameter {
            passing,
            modifiers: Vec::new(),
            base,
        }
    }
}

/// Shape of a member: generic arity, ordered parameters and return value.
///
/// Properties carry their type as the return value and their indexer parameters as
/// parameters; events carry the handler type as the return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Number of generic parameters declared by the method itself
    pub generic_arity: u32,
    /// The parameters, in declaration order
    pub params: Vec<SignatureParameter>,
    /// The return type (property or event type for non-methods)
    pub return_type: SignatureParameter,
}

impl Signature {
    /// A non-generic signature without parameters returning `return_type`
    #[must_use]
    pub fn new(return_type: TypeSig) -> Self {
        Signature {
            generic_arity: 0,
            params: Vec::new(),
            return_type: SignatureParameter::new(return_type),
        }
    }

    /// `void ()`
    #[must_use]
    pub fn void() -> Self {
        Self::new(TypeSig::VOID)
    }

    /// Total number of custom modifiers on the parameters and the return value
    #[must_use]
    pub fn custom_modifier_count(&self) -> usize {
        self.return_type.modifiers.len()
            + self
                .params
                .iter()
                .map(|param| param.modifiers.len())
                .sum::<usize>()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::void()
    }
}
