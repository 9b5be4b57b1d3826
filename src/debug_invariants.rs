//! Invariant hooks run after every structural mutation of a
//! [`ModelArray`](crate::collection::ModelArray): no identity key shared by
//! two members, and the identity index agreeing with the sequence.

use crate::array_error::ModelArrayError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first violation as a
    /// [`ModelArrayError`] naming the offending key and position.
    fn validate_invariants(&self) -> Result<(), ModelArrayError>;
}

/// Runs a fallible check after a mutation and panics on error when
/// invariant checking is enabled (`debug_assertions`, or the
/// `check-invariants` / `strict-invariants` features).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
