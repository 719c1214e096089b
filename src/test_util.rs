// Helpers shared by the unit tests.

use std::sync::{Mutex, MutexGuard};

static BACKEND_RNG: Mutex<()> = Mutex::new(());

/// Serialise tests that draw from the backend's process-wide RNG
/// (parameter init, dropout), so a seeded run sees only its own draws.
pub fn backend_lock() -> MutexGuard<'static, ()> {
    BACKEND_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
