use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Plain message
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string and arguments
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure this library can report.
///
/// Member resolution itself never fails for a validated [`crate::metadata::typesystem::TypeGraph`]:
/// unusual outcomes such as "no implementation found" or "method implementing an accessor" are
/// returned as data. The variants below describe problems with the *input* - graph construction
/// errors and queries for tokens that do not belong to the graph.
///
/// # Error Categories
///
/// ## Graph Construction Errors
/// - [`Error::Malformed`] - Structurally invalid declarations (e.g. accessor without owner)
/// - [`Error::TypeInsert`] - Conflicting information while registering a type
/// - [`Error::GraphError`] - Cyclic base-type or interface inheritance
/// - [`Error::RecursionLimit`] - Hierarchy deeper than the configured limit
///
/// ## Lookup Errors
/// - [`Error::TypeNotFound`] - Token does not name a type of the graph
/// - [`Error::MemberNotFound`] - Token does not name a member of the graph
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, metadata::token::Token, prelude::*};
/// use std::sync::Arc;
///
/// let graph = Arc::new(TypeGraph::new("Sample"));
/// let context = ResolutionContext::new(graph)?;
///
/// match context.resolve_override_hide(Token::new(0x0600_0001)) {
///     Err(Error::MemberNotFound(token)) => println!("unknown member {token}"),
///     Err(e) => println!("other error: {e}"),
///     Ok(result) => println!("{} overridden", result.overridden().len()),
/// }
/// # Ok::<(), memberscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The type graph contains a structurally invalid declaration.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// What is wrong with the declaration
        message: String,
        /// Source file of the check that failed
        file: &'static str,
        /// Source line of the check that failed
        line: u32,
    },

    /// Failed to register information for a type in the `TypeGraph`.
    ///
    /// Raised when a write-once relation (such as the base type) is assigned twice.
    /// The associated [`Token`] identifies which type caused the failure.
    #[error("Failed to insert new type into TypeGraph - {0}")]
    TypeInsert(Token),

    /// Failed to find type in `TypeGraph`.
    ///
    /// The associated [`Token`] identifies which type was not found.
    #[error("Failed to find type in TypeGraph - {0}")]
    TypeNotFound(Token),

    /// Failed to find member in `TypeGraph`.
    ///
    /// The associated [`Token`] identifies which member was not found.
    #[error("Failed to find member in TypeGraph - {0}")]
    MemberNotFound(Token),

    /// Recursion limit reached.
    ///
    /// Hierarchy walks are bounded by
    /// [`crate::resolution::ResolutionConfig::max_inheritance_depth`]. This error
    /// indicates that a base chain exceeded it during validation.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// `TypeGraph` error.
    ///
    /// Errors related to the shape of the type graph, most notably circular
    /// base-type or interface inheritance.
    #[error("{0}")]
    GraphError(String),
}
