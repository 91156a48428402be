//! Buffer conventions shared by the serialization entry points.
//!
//! Every native save call follows the same protocol: it always reports the
//! required size through the out-parameter and only copies when the supplied
//! buffer is large enough. Saving is therefore a size probe followed by a
//! sized call.

/// Drive one save entry point through the probe-then-copy protocol.
/// Returns `None` when the native side reports failure.
pub(crate) fn save_buffer(mut call: impl FnMut(*mut u8, u64, *mut u64) -> i32) -> Option<Vec<u8>> {
    let mut size = 0u64;
    let probe = call(std::ptr::null_mut(), 0, &mut size);
    if probe == 0 && size == 0 {
        return None;
    }
    let mut buf = vec![0u8; usize::try_from(size).ok()?];
    if call(buf.as_mut_ptr(), size, &mut size) == 0 {
        return None;
    }
    Some(buf)
}
