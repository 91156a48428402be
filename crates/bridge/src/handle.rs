//! The native handle and its lifetime rules.
//!
//! Every wrapper in this crate stores a [`Handle`]: a native address plus the
//! metadata deciding who frees it. A handle is exactly one of
//!
//! - **owning** — carries the action that frees the native resource,
//! - **borrowed** — never frees anything,
//! - **counted** — the claimed action decrements an intrusive reference
//!   count instead of freeing directly.
//!
//! Release zeroes the address first and claims the action second, so a
//! concurrent reader can never observe a stale non-zero address for memory
//! that is already freed, and the action runs at most once no matter how many
//! threads race the release. Reading the address of a released handle is a
//! contract violation and panics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use abi::{RawHandle, NULL_HANDLE};

use crate::sweep;

pub(crate) type FreeFn = Box<dyn FnOnce(RawHandle) + Send>;

/// The part of a handle that survives the wrapper: the address and the
/// one-shot free action. The sweeper works on this alone, never on the
/// wrapper or its core, so a queued cleanup cannot extend the wrapper's
/// lifetime.
pub(crate) struct ReleaseState {
    addr: AtomicU64,
    free: Mutex<Option<FreeFn>>,
}

impl ReleaseState {
    fn new(addr: RawHandle, free: Option<FreeFn>) -> Self {
        Self {
            addr: AtomicU64::new(addr),
            free: Mutex::new(free),
        }
    }

    /// Claim-and-run. The address swap decides the single winner; everyone
    /// else sees the sentinel and no-ops.
    pub(crate) fn release(&self) {
        let addr = self.addr.swap(NULL_HANDLE, Ordering::SeqCst);
        if addr == NULL_HANDLE {
            return;
        }
        let free = self.free.lock().take();
        if let Some(free) = free {
            tracing::trace!(addr, "releasing native handle");
            free(addr);
        }
    }

    fn addr(&self) -> RawHandle {
        let addr = self.addr.load(Ordering::SeqCst);
        assert_ne!(addr, NULL_HANDLE, "use of released native handle");
        addr
    }

    fn is_released(&self) -> bool {
        self.addr.load(Ordering::SeqCst) == NULL_HANDLE
    }
}

pub(crate) struct HandleCore {
    state: Arc<ReleaseState>,
    // Keep-alive edge: the container's core cannot drop (and so cannot be
    // swept) while this core exists. Dropped after `state` is enqueued, which
    // keeps the queue in child-before-container order.
    _container: Option<Arc<HandleCore>>,
}

impl Drop for HandleCore {
    fn drop(&mut self) {
        // Unreachability path: the wrapper and every pin are gone. Hand the
        // detached state to the sweeper; an earlier explicit release makes
        // this a no-op.
        if !self.state.is_released() {
            sweep::enqueue(Arc::clone(&self.state));
        }
    }
}

/// A wrapper's record of one native object.
pub struct Handle {
    core: Arc<HandleCore>,
}

impl Handle {
    fn build(addr: RawHandle, free: Option<FreeFn>, container: Option<&Handle>) -> Self {
        assert_ne!(addr, NULL_HANDLE, "cannot acquire the null native address");
        Self {
            core: Arc::new(HandleCore {
                state: Arc::new(ReleaseState::new(addr, free)),
                _container: container.map(|c| Arc::clone(&c.core)),
            }),
        }
    }

    /// Acquire ownership of `addr`; `free` will run exactly once.
    ///
    /// # Panics
    ///
    /// Panics when `addr` is the null sentinel.
    pub fn owning(addr: RawHandle, free: impl FnOnce(RawHandle) + Send + 'static) -> Self {
        Self::build(addr, Some(Box::new(free)), None)
    }

    /// Owning, with a keep-alive edge to the container object.
    pub fn owning_with_container(
        addr: RawHandle,
        container: &Handle,
        free: impl FnOnce(RawHandle) + Send + 'static,
    ) -> Self {
        Self::build(addr, Some(Box::new(free)), Some(container))
    }

    /// Wrap `addr` without taking ownership; release never frees.
    pub fn borrowed(addr: RawHandle) -> Self {
        Self::build(addr, None, None)
    }

    /// Borrowed, pinned to the container that owns the memory.
    pub fn borrowed_with_container(addr: RawHandle, container: &Handle) -> Self {
        Self::build(addr, None, Some(container))
    }

    /// Wrap a reference-counted native object. `decrement` releases the one
    /// reference this handle holds; it must never free directly.
    pub fn counted(addr: RawHandle, decrement: impl FnOnce(RawHandle) + Send + 'static) -> Self {
        Self::build(addr, Some(Box::new(decrement)), None)
    }

    /// Current address.
    ///
    /// # Panics
    ///
    /// Panics when the handle has been released — continuing with a stale
    /// address would touch freed native memory.
    #[must_use]
    pub fn addr(&self) -> RawHandle {
        self.core.state.addr()
    }

    /// Whether release has already happened.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.core.state.is_released()
    }

    /// Run the free action now. Idempotent; safe to race from any number of
    /// threads, exactly one of which performs the actual free.
    pub fn release(&self) {
        self.core.state.release();
    }

    /// A keep-alive edge for child wrappers.
    #[must_use]
    pub fn pin(&self) -> Handle {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let addr = self.core.state.addr.load(Ordering::SeqCst);
        f.debug_struct("Handle").field("addr", &addr).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_free(counter: &Arc<AtomicUsize>) -> impl FnOnce(RawHandle) + Send + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn owning_release_runs_action_once() {
        let frees = Arc::new(AtomicUsize::new(0));
        let h = Handle::owning(0x1000, counter_free(&frees));
        assert_eq!(h.addr(), 0x1000);
        h.release();
        h.release();
        assert_eq!(frees.load(Ordering::SeqCst), 1);
        assert!(h.is_released());
    }

    #[test]
    #[should_panic(expected = "use of released native handle")]
    fn addr_after_release_panics() {
        let h = Handle::owning(0x2000, |_| {});
        h.release();
        let _ = h.addr();
    }

    #[test]
    #[should_panic(expected = "cannot acquire the null native address")]
    fn null_address_is_rejected() {
        let _ = Handle::borrowed(NULL_HANDLE);
    }

    #[test]
    fn borrowed_release_frees_nothing() {
        let h = Handle::borrowed(0x3000);
        h.release();
        assert!(h.is_released());
    }

    #[test]
    fn release_reports_original_address() {
        let seen = Arc::new(Mutex::new(None));
        let seen2 = Arc::clone(&seen);
        let h = Handle::owning(0xBEEF, move |addr| {
            *seen2.lock() = Some(addr);
        });
        h.release();
        assert_eq!(*seen.lock(), Some(0xBEEF));
    }

    #[test]
    fn concurrent_release_frees_exactly_once() {
        for _ in 0..64 {
            let frees = Arc::new(AtomicUsize::new(0));
            let h = Arc::new(Handle::owning(0x4000, counter_free(&frees)));
            let threads: Vec<_> = (0..8)
                .map(|_| {
                    let h = Arc::clone(&h);
                    std::thread::spawn(move || h.release())
                })
                .collect();
            for t in threads {
                t.join().unwrap();
            }
            assert_eq!(frees.load(Ordering::SeqCst), 1);
            assert!(h.is_released());
        }
    }
}
