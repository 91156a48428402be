//! Lifetime rules of the native handle: exactly-once free, loud
//! use-after-free, borrowed handles, container pinning, idempotent release.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use bridge::{sweep, Handle};

#[test]
fn release_from_two_threads_frees_exactly_once() {
    // Acquire 0x1000 with a free action that records each call, release from
    // two threads simultaneously, and expect a single record and the
    // sentinel afterwards.
    let log = Arc::new(Mutex::new(Vec::new()));
    let log2 = Arc::clone(&log);
    let handle = Arc::new(Handle::owning(0x1000, move |addr| {
        log2.lock().push(addr);
    }));

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let threads: Vec<_> = (0..2)
        .map(|_| {
            let handle = Arc::clone(&handle);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                handle.release();
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(log.lock().as_slice(), &[0x1000]);
    assert!(handle.is_released());
}

#[test]
fn released_address_is_sentinel_never_the_original() {
    for addr in [0x1u64, 0x40, 0xDEAD_0000, u64::MAX] {
        let handle = Handle::owning(addr, |_| {});
        assert_eq!(handle.addr(), addr);
        handle.release();
        assert!(handle.is_released());
        let read = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handle.addr()));
        assert!(read.is_err(), "reading {addr:#x} after release must panic");
    }
}

#[test]
fn repeated_release_is_a_no_op() {
    let frees = Arc::new(AtomicUsize::new(0));
    let frees2 = Arc::clone(&frees);
    let handle = Handle::owning(0x77, move |_| {
        frees2.fetch_add(1, Ordering::SeqCst);
    });
    for _ in 0..5 {
        handle.release();
    }
    assert_eq!(frees.load(Ordering::SeqCst), 1);
}

#[test]
fn borrowed_handle_never_frees() {
    // Nothing to observe directly; a borrowed handle has no action to run.
    // Releasing must still flip the liveness state.
    let handle = Handle::borrowed(0x88);
    handle.release();
    assert!(handle.is_released());
}

#[test]
fn container_outlives_children() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let container = {
        let order = Arc::clone(&order);
        Handle::owning(0x100, move |_| order.lock().push("container"))
    };
    let child = {
        let order = Arc::clone(&order);
        Handle::owning_with_container(0x200, &container, move |_| {
            order.lock().push("child");
        })
    };

    // The container wrapper goes away first. The child's pin must keep the
    // container's free from running.
    drop(container);
    sweep::flush();
    assert!(order.lock().is_empty());

    drop(child);
    sweep::flush();
    assert_eq!(order.lock().as_slice(), &["child", "container"]);
}

#[test]
fn explicit_release_wins_over_sweep() {
    let frees = Arc::new(AtomicUsize::new(0));
    {
        let frees = Arc::clone(&frees);
        let handle = Handle::owning(0x300, move |_| {
            frees.fetch_add(1, Ordering::SeqCst);
        });
        handle.release();
        // Dropped after an explicit release; the sweep must see a no-op.
    }
    sweep::flush();
    assert_eq!(frees.load(Ordering::SeqCst), 1);
}

#[test]
fn dropped_handles_are_swept() {
    let frees = Arc::new(AtomicUsize::new(0));
    {
        let frees = Arc::clone(&frees);
        let _handle = Handle::owning(0x400, move |_| {
            frees.fetch_add(1, Ordering::SeqCst);
        });
        // No explicit release.
    }
    sweep::flush();
    assert_eq!(frees.load(Ordering::SeqCst), 1);
}

#[test]
fn sweep_counts_progress() {
    let before = sweep::swept_count();
    {
        let _handle = Handle::owning(0x500, |_| {});
    }
    sweep::flush();
    assert!(sweep::swept_count() > before);
}
