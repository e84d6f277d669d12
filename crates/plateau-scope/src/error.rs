#![forbid(unsafe_code)]

//! Scope errors.
//!
//! Lookup failures are returned to the caller and leave the scope unchanged.
//! [`ScopeError::HostNotFound`] is the one recoverable construction failure:
//! `set_root` logs it and carries on unrooted, `try_set_root` returns it.

/// A failed scope operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// No cell is registered under the name.
    #[error("no cell named `{0}`")]
    UnknownCell(String),
    /// No factory is registered under the name.
    #[error("no factory named `{0}`")]
    UnknownFactory(String),
    /// The name holds a cell or factory of another type.
    #[error("`{name}` holds {found}, not {expected}")]
    TypeMismatch {
        /// Name looked up.
        name: String,
        /// Type the caller asked for.
        expected: &'static str,
        /// Type actually registered.
        found: &'static str,
    },
    /// A tuple deal named the wrong number of sources.
    #[error("deal `{name}` combines {expected} sources, {found} were named")]
    Arity {
        /// Name of the cell being dealt.
        name: String,
        /// Sources the combine function takes.
        expected: usize,
        /// Sources named by the caller.
        found: usize,
    },
    /// `insert_cell` on a name that is already taken.
    #[error("a cell named `{0}` already exists")]
    Collision(String),
    /// A root identifier that the host could not resolve.
    #[error("host container `{0}` not found")]
    HostNotFound(String),
    /// The operation needs a host and the scope has none.
    #[error("scope has no host")]
    NoHost,
}
