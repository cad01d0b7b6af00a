//! Process-wide solve cancellation.
//!
//! The solver callbacks have no context pointer, so cancellation is a single
//! process-wide flag: writing a non-zero value from any thread asks the
//! in-progress solve to abort at its next evaluation. The flag is cleared at
//! the start of every solve so a stale request cannot poison a later one.

use std::sync::atomic::{AtomicI32, Ordering};

static CANCELLATION_FLAG: AtomicI32 = AtomicI32::new(0);

/// The cancellation flag. Store a non-zero value to request that the current
/// solve stop; the abort is best-effort and at least one iteration may still
/// complete.
pub fn cancellation_flag() -> &'static AtomicI32 {
    &CANCELLATION_FLAG
}

pub(crate) fn clear() {
    CANCELLATION_FLAG.store(0, Ordering::SeqCst);
}

pub(crate) fn is_set() -> bool {
    CANCELLATION_FLAG.load(Ordering::Relaxed) != 0
}
