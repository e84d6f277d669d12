#![forbid(unsafe_code)]

//! Resolution of named deal sources into typed cells.
//!
//! The combine function's argument type decides how names are resolved:
//!
//! | Argument | Names | Cells |
//! |----------|-------|-------|
//! | `(A,)` .. `(A, B, C, D, E, F)` | exactly as many as the tuple | one `Cell` per element, each of its own type |
//! | `[T; N]` | exactly `N` | `N` cells of `T` |
//! | `Vec<T>` | any number | cells of `T` |
//!
//! Every name is resolved before anything is built, so a failed resolution
//! leaves the scope untouched.

use plateau_bind::Node;
use plateau_core::{Cell, Sources};

use crate::error::ScopeError;
use crate::scope::Scope;

/// Values a deal's combine function receives, resolvable from source names.
pub trait DealValues: Sized + 'static {
    /// Cells the names resolve to.
    type Cells: Sources<Values = Self>;

    /// Look every name up in `scope`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownCell`], [`ScopeError::TypeMismatch`], or
    /// [`ScopeError::Arity`] (for fixed-size argument types) for the cell
    /// being dealt as `target`.
    fn resolve<N: Node>(scope: &Scope<N>, target: &str, names: &[&str])
    -> Result<Self::Cells, ScopeError>;
}

fn check_arity(target: &str, expected: usize, names: &[&str]) -> Result<(), ScopeError> {
    if names.len() == expected {
        Ok(())
    } else {
        Err(ScopeError::Arity {
            name: target.to_string(),
            expected,
            found: names.len(),
        })
    }
}

impl<T: Clone + 'static> DealValues for Vec<T> {
    type Cells = Vec<Cell<T>>;

    fn resolve<N: Node>(
        scope: &Scope<N>,
        _target: &str,
        names: &[&str],
    ) -> Result<Self::Cells, ScopeError> {
        names.iter().map(|name| scope.cell::<T>(name)).collect()
    }
}

impl<T: Clone + 'static, const LEN: usize> DealValues for [T; LEN] {
    type Cells = [Cell<T>; LEN];

    fn resolve<N: Node>(
        scope: &Scope<N>,
        target: &str,
        names: &[&str],
    ) -> Result<Self::Cells, ScopeError> {
        check_arity(target, LEN, names)?;
        let cells = names
            .iter()
            .map(|name| scope.cell::<T>(name))
            .collect::<Result<Vec<_>, _>>()?;
        cells.try_into().map_err(|cells: Vec<Cell<T>>| ScopeError::Arity {
            name: target.to_string(),
            expected: LEN,
            found: cells.len(),
        })
    }
}

macro_rules! impl_tuple_values {
    ($arity:expr; $($name:ident $idx:tt),+) => {
        impl<$($name: Clone + 'static),+> DealValues for ($($name,)+) {
            type Cells = ($(Cell<$name>,)+);

            fn resolve<N: Node>(
                scope: &Scope<N>,
                target: &str,
                names: &[&str],
            ) -> Result<Self::Cells, ScopeError> {
                check_arity(target, $arity, names)?;
                Ok(($(scope.cell::<$name>(names[$idx])?,)+))
            }
        }
    };
}

impl_tuple_values!(1; A 0);
impl_tuple_values!(2; A 0, B 1);
impl_tuple_values!(3; A 0, B 1, C 2);
impl_tuple_values!(4; A 0, B 1, C 2, D 3);
impl_tuple_values!(5; A 0, B 1, C 2, D 3, E 4);
impl_tuple_values!(6; A 0, B 1, C 2, D 3, E 4, F 5);
