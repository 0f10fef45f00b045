// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Load a u32 from the slice at the given offset
#[inline(always)]
pub(crate) fn load32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Load a u64 from the slice at the given offset
#[inline(always)]
pub(crate) fn load64(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
        data[offset + 4],
        data[offset + 5],
        data[offset + 6],
        data[offset + 7],
    ])
}

/// Returns how many leading bytes of `a` and `b` are equal.
///
/// Compares eight bytes at a time and locates the first difference from the
/// trailing zeros of the xor, then finishes the last few bytes one by one.
/// Never looks at more than `a.len()` bytes.
///
/// # Panics
///
/// Panics if `a` is longer than `b`.
#[inline]
pub fn match_len(a: &[u8], b: &[u8]) -> usize {
    assert!(
        a.len() <= b.len(),
        "s2: match_len requires len(a) <= len(b), got {} > {}",
        a.len(),
        b.len()
    );

    let mut matched = 0;
    let mut left = a.len();

    while left >= 8 {
        let diff = load64(a, matched) ^ load64(b, matched);
        if diff != 0 {
            return matched + (diff.trailing_zeros() / 8) as usize;
        }
        matched += 8;
        left -= 8;
    }

    while left > 0 {
        if a[matched] != b[matched] {
            break;
        }
        matched += 1;
        left -= 1;
    }

    matched
}
