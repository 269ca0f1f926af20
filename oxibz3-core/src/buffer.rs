//! Output buffer management around primitive calls.
//!
//! Block codecs write into plain slices and report how many bytes they
//! produced. The caller makes the slice big enough with [`grow`], hands
//! `&mut buf[start..]` to the codec, then shrinks the logical length back
//! to what was actually written with [`truncate`].
//!
//! ```
//! use oxibz3_core::buffer;
//!
//! let mut out = b"prefix".to_vec();
//! let start = out.len();
//! buffer::grow(&mut out, start + 32);
//! out[start..start + 3].copy_from_slice(b"abc");
//! buffer::truncate(&mut out, start + 3);
//! assert_eq!(out, b"prefixabc");
//! ```

/// Grow `buf` so its logical length is at least `target_len`.
///
/// Existing content is never touched. New bytes are zero filler. A target
/// at or below the current length is a no-op.
pub fn grow(buf: &mut Vec<u8>, target_len: usize) {
    if target_len > buf.len() {
        buf.resize(target_len, 0);
    }
}

/// Set the logical length of `buf` to `final_len`, keeping the allocation.
///
/// # Panics
///
/// Panics if `final_len` is larger than the current length. Callers only
/// truncate to a length a primitive reported for a region they grew first,
/// so a larger value is a bug in the caller.
pub fn truncate(buf: &mut Vec<u8>, final_len: usize) {
    assert!(
        final_len <= buf.len(),
        "truncate to {} past logical length {}",
        final_len,
        buf.len()
    );
    buf.truncate(final_len);
}

/// Make sure `buf` can hold `capacity` bytes in total without reallocating.
///
/// The logical length is unchanged.
pub fn reserve_total(buf: &mut Vec<u8>, capacity: usize) {
    if capacity > buf.capacity() {
        buf.reserve(capacity - buf.len());
    }
}
