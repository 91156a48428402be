//! Deferred finalization.
//!
//! Explicit release is the primary mechanism; this module is the safety net
//! for wrappers that go out of scope without one. When the last reference to
//! a handle's core drops, the core detaches its release state and queues it
//! here, and a background thread performs the free. The queue holds only the
//! detached state — nothing that could keep a wrapper reachable.
//!
//! Queue order follows drop order, so a child handle's free always runs
//! before the container it was pinning.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use parking_lot::{Condvar, Mutex};

use crate::handle::ReleaseState;

struct Inner {
    queue: VecDeque<Arc<ReleaseState>>,
    busy: bool,
    swept: u64,
}

struct Sweeper {
    inner: Mutex<Inner>,
    work: Condvar,
    drained: Condvar,
}

impl Sweeper {
    fn run(&self) {
        let mut inner = self.inner.lock();
        loop {
            if let Some(state) = inner.queue.pop_front() {
                inner.busy = true;
                drop(inner);
                // A free action that panics is a caller contract violation;
                // it must not take the process-wide sweeper down with it.
                let outcome =
                    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| state.release()));
                if outcome.is_err() {
                    tracing::error!("free action panicked during deferred release");
                }
                inner = self.inner.lock();
                inner.busy = false;
                inner.swept += 1;
            } else {
                self.drained.notify_all();
                self.work.wait(&mut inner);
            }
        }
    }
}

fn sweeper() -> &'static Sweeper {
    static SWEEPER: OnceLock<&'static Sweeper> = OnceLock::new();
    SWEEPER.get_or_init(|| {
        let sweeper: &'static Sweeper = Box::leak(Box::new(Sweeper {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                busy: false,
                swept: 0,
            }),
            work: Condvar::new(),
            drained: Condvar::new(),
        }));
        std::thread::Builder::new()
            .name("handle-sweeper".into())
            .spawn(move || sweeper.run())
            .expect("failed to spawn handle sweeper");
        tracing::debug!("handle sweeper started");
        sweeper
    })
}

pub(crate) fn enqueue(state: Arc<ReleaseState>) {
    let sweeper = sweeper();
    let mut inner = sweeper.inner.lock();
    inner.queue.push_back(state);
    sweeper.work.notify_one();
}

/// Block until every queued cleanup has run.
pub fn flush() {
    let sweeper = sweeper();
    let mut inner = sweeper.inner.lock();
    while !inner.queue.is_empty() || inner.busy {
        sweeper.drained.wait(&mut inner);
    }
}

/// Total number of handles freed by the sweeper so far.
#[must_use]
pub fn swept_count() -> u64 {
    sweeper().inner.lock().swept
}
