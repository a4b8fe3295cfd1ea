//! Member and type signatures.
//!
//! This module holds the structural description of member shapes consumed by the resolver:
//! the types appearing in signatures ([`TypeSig`]), parameters with their passing mode and
//! custom modifiers ([`SignatureParameter`]), complete member signatures ([`Signature`]),
//! and the generic substitution utility ([`TypeMap`]) that re-expresses a signature in the
//! type-parameter space of another type.
//!
//! # Generic Parameters
//!
//! Generic parameters are positional. `TypeParam(n)` names the n-th type parameter of the
//! type a signature belongs to, `MethodParam(n)` the n-th generic parameter of the method.
//! Two generic methods therefore have matching signatures if their parameters use the same
//! method-parameter ordinals, independent of the names chosen in the declarations.
//!
//! # Custom Modifiers
//!
//! Parameters and return values may carry `modopt`/`modreq` annotations. These are opaque to
//! the resolver: they only participate in strict comparison and in override tie-breaks.
//!
//! # Examples
//!
//! ```rust
//! use memberscope::metadata::signatures::{Signature, SignatureParameter, TypeMap, TypeSig};
//!
//! // T Get(int index) declared in Box<T>
//! let mut signature = Signature::new(TypeSig::TypeParam(0));
//! signature.params.push(SignatureParameter::new(TypeSig::I4));
//!
//! // viewed through Box<string>
//! let applied = TypeMap::new(vec![TypeSig::STRING]).apply_signature(&signature);
//! assert_eq!(applied.return_type.base, TypeSig::STRING);
//! ```

mod substitution;
mod types;

pub use substitution::TypeMap;
pub use types::*;
