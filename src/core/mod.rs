pub mod config;
pub mod error;
pub mod types;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// A poisoned lock means a tick faulted mid-update; the simulation state is
/// still structurally valid and the next tick carries on from it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
