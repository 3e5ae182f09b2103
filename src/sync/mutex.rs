//! Task-context mutex for per-channel read/write state.
//!
//! Interrupt handlers never take this lock; it only serializes tasks calling
//! `read`, `write` and `receive_size` on the same channel. The lock itself is
//! a [`lock_api::RawMutex`] chosen by the integrator:
//!
//! - Under an RTOS, the porting layer wraps the kernel mutex so a waiting
//!   task blocks and lets the holder run.
//! - [`SpinRawMutex`] busy-waits. It is only sound where contending tasks
//!   cannot preempt each other (bare-metal superloop, host tests).

use core::sync::atomic::{AtomicBool, Ordering};

pub use lock_api::RawMutex;

/// Mutex over `T` using the raw lock `M`
pub type TaskMutex<M, T> = lock_api::Mutex<M, T>;

/// RAII guard; the lock is released on drop.
pub type TaskMutexGuard<'a, M, T> = lock_api::MutexGuard<'a, M, T>;

/// Busy-waiting raw mutex.
///
/// A higher-priority task spinning here never yields to a lower-priority
/// holder, so do not use it with a preemptive scheduler.
#[derive(Debug)]
pub struct SpinRawMutex {
    locked: AtomicBool,
}

// SAFETY: `try_lock` succeeds for exactly one caller until `unlock` (acquire
// on lock, release on unlock).
unsafe impl RawMutex for SpinRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        locked: AtomicBool::new(false),
    };

    type GuardMarker = lock_api::GuardSend;

    fn lock(&self) {
        while !self.try_lock() {
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}
