//! Compile-time selection of how index validation failures are reported.
//!
//! Both policies perform the same check. [`Strict`] turns a failed check into
//! an `Err`; [`Lenient`] records a trace event and turns the operation into a
//! no-op.

use crate::error::{StorageError, StorageResult};

/// Range-check policy for the partitioned backends.
pub trait RangeCheck {
    /// Whether a failed check is returned as an error.
    const RAISE: bool;

    /// Returns `Ok(true)` if the operation should proceed, `Ok(false)` if a
    /// lenient policy swallowed the failure, and `Err` otherwise.
    #[inline]
    fn verify(valid: bool, error: impl FnOnce() -> StorageError) -> StorageResult<bool> {
        if valid {
            return Ok(true);
        }
        let error = error();
        if Self::RAISE {
            Err(error)
        } else {
            tracing::trace!(%error, "range check suppressed");
            Ok(false)
        }
    }
}

/// Failed checks are errors (the default).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strict;

/// Failed checks are silently ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lenient;

impl RangeCheck for Strict {
    const RAISE: bool = true;
}

impl RangeCheck for Lenient {
    const RAISE: bool = false;
}
