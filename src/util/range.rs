//! Predicates over half-open `[start, start + len)` address ranges.
//!
//! Every function takes its ranges as `(start, len)` pairs. Ends are computed
//! in `u64`, so a range running up to the very top of the 32-bit address
//! space never wraps around.

#[inline]
fn end(start: u32, len: u32) -> u64 {
    start as u64 + len as u64
}

/// Returns `true` if `[a_start, a_start + a_len)` and `[b_start, b_start +
/// b_len)` share at least one address.
///
/// Ranges that merely touch (e.g: `[5, 10)` and `[10, 15)`) do not overlap,
/// and an empty range overlaps nothing.
pub fn overlaps(a_start: u32, a_len: u32, b_start: u32, b_len: u32) -> bool {
    !(end(a_start, a_len) <= b_start as u64 || a_start as u64 >= end(b_start, b_len))
}

/// Returns `true` if range B lies entirely within range A.
pub fn contains(a_start: u32, a_len: u32, b_start: u32, b_len: u32) -> bool {
    b_start >= a_start && end(b_start, b_len) <= end(a_start, a_len)
}

/// Returns `true` if range B straddles the start of range A.
pub fn overlaps_start(a_start: u32, _a_len: u32, b_start: u32, b_len: u32) -> bool {
    b_start < a_start && end(b_start, b_len) > a_start as u64
}

/// Returns `true` if range B straddles the end of range A.
pub fn overlaps_end(a_start: u32, a_len: u32, b_start: u32, b_len: u32) -> bool {
    let a_end = end(a_start, a_len);
    (b_start as u64) < a_end && end(b_start, b_len) > a_end
}

/// Overwrite the part of `buf` that overlaps `patch_data`.
///
/// `buf` mirrors target memory starting at `buf_addr`, and `patch_data`
/// describes memory starting at `patch_addr`. Only the intersection of the two
/// ranges is copied, whichever way round they overlap.
///
/// Returns the number of bytes that were patched.
pub fn patch(buf: &mut [u8], buf_addr: u32, patch_data: &[u8], patch_addr: u32) -> usize {
    let buf_start = buf_addr as u64;
    let patch_start = patch_addr as u64;

    let lo = buf_start.max(patch_start);
    let hi = (buf_start + buf.len() as u64).min(patch_start + patch_data.len() as u64);
    if lo >= hi {
        return 0;
    }

    let dst = (lo - buf_start) as usize..(hi - buf_start) as usize;
    let src = (lo - patch_start) as usize..(hi - patch_start) as usize;
    buf[dst].copy_from_slice(&patch_data[src]);

    (hi - lo) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (5, 5, 10, 5),
            (5, 6, 10, 5),
            (5, 10, 6, 8),
            (0, 0, 0, 4),
            (u32::MAX - 1, 2, u32::MAX, 1),
        ];
        for &(s1, l1, s2, l2) in cases.iter() {
            assert_eq!(overlaps(s1, l1, s2, l2), overlaps(s2, l2, s1, l1));
        }
    }

    #[test]
    fn overlap_with_self() {
        assert!(!overlaps(7, 0, 7, 0));
        assert!(overlaps(7, 1, 7, 1));
        assert!(overlaps(5, 10, 5, 10));
    }

    #[test]
    fn overlap_boundaries() {
        assert!(!overlaps(5, 1, 10, 1));
        assert!(!overlaps(5, 5, 10, 5));

        assert!(overlaps(5, 6, 10, 5));
        assert!(overlaps(5, 10, 10, 10));
        assert!(overlaps(5, 10, 6, 8));
    }

    #[test]
    fn overlap_top_of_address_space() {
        assert!(overlaps(0xffff_fff0, 0x10, 0xffff_ffff, 1));
        assert!(!overlaps(0xffff_fff0, 0x10, 0, 0x10));
    }

    #[test]
    fn contains_boundaries() {
        assert!(contains(5, 10, 6, 8));
        assert!(!contains(5, 10, 0, 4));
        for b in 5..=11 {
            assert!(contains(5, 10, b, 4), "start {}", b);
        }
        assert!(!contains(5, 10, 4, 4));
        assert!(!contains(5, 10, 12, 4));
    }

    #[test]
    fn overlaps_start_boundaries() {
        assert!(!overlaps_start(5, 10, 1, 4));
        for b in 2..=4 {
            assert!(overlaps_start(5, 10, b, 4), "start {}", b);
        }
        assert!(!overlaps_start(5, 10, 5, 4));
    }

    #[test]
    fn overlaps_end_boundaries() {
        assert!(!overlaps_end(5, 10, 11, 4));
        for b in 12..=14 {
            assert!(overlaps_end(5, 10, b, 4), "start {}", b);
        }
        assert!(!overlaps_end(5, 10, 15, 4));
    }

    #[test]
    fn patch_cases() {
        // enclosed
        let mut buf = [0u8; 8];
        assert_eq!(patch(&mut buf, 0x100, &[1, 2], 0x102), 2);
        assert_eq!(buf, [0, 0, 1, 2, 0, 0, 0, 0]);

        // straddles the left edge
        let mut buf = [0u8; 4];
        assert_eq!(patch(&mut buf, 0x100, &[1, 2, 3, 4], 0xfe), 2);
        assert_eq!(buf, [3, 4, 0, 0]);

        // straddles the right edge
        let mut buf = [0u8; 4];
        assert_eq!(patch(&mut buf, 0x100, &[1, 2, 3, 4], 0x103), 1);
        assert_eq!(buf, [0, 0, 0, 1]);

        // encloses the buffer
        let mut buf = [0u8; 2];
        assert_eq!(patch(&mut buf, 0x100, &[1, 2, 3, 4], 0xff), 2);
        assert_eq!(buf, [2, 3]);

        // disjoint
        let mut buf = [0u8; 2];
        assert_eq!(patch(&mut buf, 0x100, &[1, 2], 0x102), 0);
        assert_eq!(buf, [0, 0]);
    }
}
