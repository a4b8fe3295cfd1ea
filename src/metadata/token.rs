//! Symbol handles for types and members of a [`crate::metadata::typesystem::TypeGraph`].
//!
//! Tokens follow the metadata convention of a 32-bit value whose high byte names the
//! table and whose low 24 bits carry the row. Types live in the `TypeDef` table; members
//! share one arena and are tagged with the table matching their kind, so the row alone
//! addresses a member regardless of the table byte.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Table identifier for type definitions
pub const TABLE_TYPE_DEF: u8 = 0x02;
/// Table identifier for methods and accessors
pub const TABLE_METHOD_DEF: u8 = 0x06;
/// Table identifier for events
pub const TABLE_EVENT: u8 = 0x14;
/// Table identifier for properties and indexers
pub const TABLE_PROPERTY: u8 = 0x17;

/// A handle naming one type or member of the type graph.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the 1-based row within the arena
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table identifier and a 1-based row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Zero-based arena slot addressed by this token, `None` for the null token
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.row().checked_sub(1).map(|row| row as usize)
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token names a type definition
    #[must_use]
    pub fn is_type(&self) -> bool {
        self.table() == TABLE_TYPE_DEF
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
