//! Order-sensitive hashing of symbol identities.
//!
//! [`TypeSignatureHash`] folds the components that make up a type or member identity into a
//! single `u64`. The identity service feeds it canonicalized signatures, so two references
//! that compare equal under a [`crate::resolution::ComparisonMode`] always produce the same
//! value.
//!
//! A type contributes its kind, full name and assembly, never its token: the source and
//! metadata views of one declaration carry different tokens but the same hash.
//!
//! ```rust
//! use memberscope::metadata::typesystem::{TypeKind, TypeSignatureHash};
//!
//! let list = |arity: usize| {
//!     TypeSignatureHash::new()
//!         .add_kind(&TypeKind::Class)
//!         .add_fullname("System.Collections.Generic", "List")
//!         .add_assembly("System.Runtime")
//!         .add_component(&arity)
//!         .finalize()
//! };
//! assert_eq!(list(1), list(1));
//! assert_ne!(list(1), list(2));
//! ```

use crate::metadata::{token::Token, typesystem::TypeKind};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Incremental identity hash.
///
/// Components are mixed in sequence with an FNV-1a step followed by a multiply/xor-shift
/// finalizer, so the result depends on component order and repeated components do not cancel.
pub struct TypeSignatureHash {
    state: u64,
}

impl TypeSignatureHash {
    /// Start from the FNV-1a offset basis
    #[must_use]
    pub fn new() -> Self {
        TypeSignatureHash {
            state: 0xcbf2_9ce4_8422_2325_u64,
        }
    }

    fn mix(&mut self, value: u64) {
        self.state ^= value;
        self.state = self.state.wrapping_mul(0x0100_0000_01b3_u64);

        self.state ^= self.state >> 33;
        self.state = self.state.wrapping_mul(0xff51_afd7_ed55_8ccd_u64);
        self.state ^= self.state >> 33;
    }

    /// Mix in any hashable value.
    ///
    /// Structural markers (`"[]"`, `"?"`, ordinals, lengths) go through here as well, which
    /// keeps nested signatures like `T[]?` and `T?[]` apart.
    #[must_use]
    pub fn add_component<T: Hash + ?Sized>(mut self, component: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        component.hash(&mut hasher);
        self.mix(hasher.finish());
        self
    }

    /// Mix in whether the type is a class, struct or interface
    #[must_use]
    pub fn add_kind(self, kind: &TypeKind) -> Self {
        self.add_component(kind)
    }

    /// Mix in namespace and simple name as two components
    #[must_use]
    pub fn add_fullname(self, namespace: &str, name: &str) -> Self {
        self.add_component(namespace).add_component(name)
    }

    /// Mix in the declaring assembly
    #[must_use]
    pub fn add_assembly(self, assembly: &str) -> Self {
        self.add_component(assembly)
    }

    /// Mix in a raw token.
    ///
    /// Pass canonical tokens only (see [`crate::metadata::typesystem::TypeGraph::canonical`]);
    /// unknown definitions fall back to this.
    #[must_use]
    pub fn add_token(self, token: &Token) -> Self {
        self.add_component(&token.value())
    }

    /// The accumulated hash
    #[must_use]
    pub fn finalize(self) -> u64 {
        self.state
    }
}

impl Default for TypeSignatureHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_hash(kind: TypeKind, namespace: &str, name: &str, assembly: &str) -> u64 {
        TypeSignatureHash::new()
            .add_kind(&kind)
            .add_fullname(namespace, name)
            .add_assembly(assembly)
            .finalize()
    }

    #[test]
    fn test_same_identity_same_hash() {
        assert_eq!(
            type_hash(TypeKind::Class, "App", "Widget", "Sample"),
            type_hash(TypeKind::Class, "App", "Widget", "Sample")
        );
    }

    #[test]
    fn test_component_order_matters() {
        let forward = TypeSignatureHash::new()
            .add_component(&"[]")
            .add_component(&"?")
            .finalize();
        let backward = TypeSignatureHash::new()
            .add_component(&"?")
            .add_component(&"[]")
            .finalize();

        assert_ne!(forward, backward);
    }

    #[test]
    fn test_identity_parts_distinguish() {
        let widget = type_hash(TypeKind::Class, "App", "Widget", "Sample");

        assert_ne!(widget, type_hash(TypeKind::Interface, "App", "Widget", "Sample"));
        assert_ne!(widget, type_hash(TypeKind::Class, "App", "Widget", "Other"));
        assert_ne!(widget, type_hash(TypeKind::Class, "", "AppWidget", "Sample"));
        assert_ne!(widget, type_hash(TypeKind::Class, "App.Widget", "", "Sample"));
    }

    #[test]
    fn test_repeated_components_do_not_cancel() {
        let once = TypeSignatureHash::new().add_component(&7u32).finalize();
        let twice = TypeSignatureHash::new()
            .add_component(&7u32)
            .add_component(&7u32)
            .finalize();

        assert_ne!(once, twice);
        assert_ne!(twice, TypeSignatureHash::new().finalize());
    }

    #[test]
    fn test_token_fallback() {
        let first = TypeSignatureHash::new()
            .add_token(&Token::new(0x0200_0001))
            .finalize();
        let second = TypeSignatureHash::new()
            .add_token(&Token::new(0x0200_0002))
            .finalize();

        assert_ne!(first, second);
    }
}
