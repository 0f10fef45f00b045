// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;

/// Copy `src` to the start of `dst` and return the number of bytes copied.
/// The two ranges never overlap.
#[inline]
pub(crate) fn copy_range(dst: &mut [u8], src: &[u8]) -> usize {
    dst[..src.len()].copy_from_slice(src);
    src.len()
}

/// Emit a literal chunk and return the number of bytes written.
///
/// # Panics
///
/// Panics if `dst` cannot hold the tag and the literal bytes, or if `lit` is
/// longer than the 32 bit length field can describe.
pub fn emit_literal(dst: &mut [u8], lit: &[u8]) -> usize {
    if lit.is_empty() {
        return 0;
    }

    let i = emit_literal_header(dst, lit.len() - 1);

    if i + lit.len() > dst.len() {
        panic!(
            "emit_literal: insufficient dst space: need {}, have {}",
            i + lit.len(),
            dst.len()
        );
    }

    i + copy_range(&mut dst[i..], lit)
}

/// Write the tag of a literal of `n + 1` bytes and return its size
pub(crate) fn emit_literal_header(dst: &mut [u8], n: usize) -> usize {
    assert!(
        n <= u32::MAX as usize,
        "s2: literal of {} bytes is too long",
        n as u64 + 1
    );

    match n {
        0..=59 => {
            dst[0] = ((n as u8) << 2) | TAG_LITERAL;
            1
        }
        60..=255 => {
            dst[0] = (60 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            2
        }
        256..=65535 => {
            dst[0] = (61 << 2) | TAG_LITERAL;
            dst[1..3].copy_from_slice(&(n as u16).to_le_bytes());
            3
        }
        65536..=16777215 => {
            dst[0] = (62 << 2) | TAG_LITERAL;
            dst[1] = n as u8;
            dst[2] = (n >> 8) as u8;
            dst[3] = (n >> 16) as u8;
            4
        }
        _ => {
            dst[0] = (63 << 2) | TAG_LITERAL;
            dst[1..5].copy_from_slice(&(n as u32).to_le_bytes());
            5
        }
    }
}

/// Emit a repeat (reuse of the last offset) and return the number of bytes
/// written.
///
/// Lengths of up to 8 bytes, and of up to 11 bytes when the offset fits in 11
/// bits, take 2 bytes. Longer runs take 3 to 5 bytes. Runs longer than a single
/// chunk can describe are split, each chunk leaving at least 4 bytes for the
/// next.
///
/// # Panics
///
/// Panics if `length < 4` or `offset == 0`.
pub fn emit_repeat(dst: &mut [u8], offset: usize, length: usize) -> usize {
    assert!(length >= 4, "s2: repeat length must be at least 4, got {}", length);
    assert!(offset > 0, "s2: repeat offset must be positive");

    let mut i = 0;
    let mut length = length;
    loop {
        let whole = length;
        length -= 4;

        if whole <= 8 {
            dst[i] = ((length << 2) | TAG_COPY1 as usize) as u8;
            dst[i + 1] = 0;
            return i + 2;
        }

        if whole < 12 && offset < 2048 {
            // Encode with offset
            dst[i] = (((offset >> 8) << 5) | (length << 2) | TAG_COPY1 as usize) as u8;
            dst[i + 1] = offset as u8;
            return i + 2;
        }

        if length < (1 << 8) + 4 {
            length -= 4;
            dst[i] = (5 << 2) | TAG_COPY1;
            dst[i + 1] = 0;
            dst[i + 2] = length as u8;
            return i + 3;
        }

        if length < (1 << 16) + (1 << 8) {
            length -= 1 << 8;
            dst[i] = (6 << 2) | TAG_COPY1;
            dst[i + 1] = 0;
            dst[i + 2..i + 4].copy_from_slice(&(length as u16).to_le_bytes());
            return i + 4;
        }

        if length < MAX_REPEAT {
            length -= 1 << 16;
            dst[i] = (7 << 2) | TAG_COPY1;
            dst[i + 1] = 0;
            dst[i + 2] = length as u8;
            dst[i + 3] = (length >> 8) as u8;
            dst[i + 4] = (length >> 16) as u8;
            return i + 5;
        }

        // More than 24 bits: emit a full chunk so that at least 4 bytes remain.
        length -= MAX_REPEAT - 4;
        dst[i..i + 5].copy_from_slice(&[(7 << 2) | TAG_COPY1, 0, 0xfb, 0xff, 0xff]);
        i += 5;
    }
}

/// Emit a copy chunk, continuing long copies as repeats, and return the
/// number of bytes written.
///
/// # Panics
///
/// Panics if `length < 4` or `offset` is outside `1..=u32::MAX`.
pub fn emit_copy(dst: &mut [u8], offset: usize, length: usize) -> usize {
    check_copy_args(offset, length);

    if offset >= 65536 {
        let mut i = 0;
        let mut remaining = length;

        if remaining > 64 {
            // Emit a length 64 copy, encoded as 5 bytes.
            emit_copy4(dst, offset, 64);
            remaining -= 64;
            i = 5;

            if remaining >= 4 {
                // Emit remaining as repeat
                return i + emit_repeat(&mut dst[i..], offset, remaining);
            }
        }

        if remaining == 0 {
            return i;
        }
        return i + emit_copy4(&mut dst[i..], offset, remaining);
    }

    // Offset no more than 2 bytes
    if length > 64 {
        // Emit a length 60 copy, encoded as 3 bytes, then at least 4 bytes
        // remain for the repeat.
        emit_copy2(dst, offset, 60);
        return 3 + emit_repeat(&mut dst[3..], offset, length - 60);
    }

    emit_copy_short(dst, offset, length)
}

/// Emit a copy chunk without repeat tags and return the number of bytes
/// written. The output is readable by plain Snappy decoders.
///
/// # Panics
///
/// Panics if `length < 4` or `offset` is outside `1..=u32::MAX`.
pub fn emit_copy_no_repeat(dst: &mut [u8], offset: usize, length: usize) -> usize {
    check_copy_args(offset, length);

    let mut i = 0;
    let mut remaining = length;

    if offset >= 65536 {
        while remaining > 64 {
            i += emit_copy4(&mut dst[i..], offset, 64);
            remaining -= 64;
            if remaining < 4 {
                break;
            }
        }

        if remaining == 0 {
            return i;
        }
        return i + emit_copy4(&mut dst[i..], offset, remaining);
    }

    while remaining > 64 {
        i += emit_copy2(&mut dst[i..], offset, 60);
        remaining -= 60;
    }

    i + emit_copy_short(&mut dst[i..], offset, remaining)
}

/// Upper bound of the bytes [`emit_copy`] or [`emit_copy_no_repeat`] write
/// for a copy of `length` bytes.
#[inline]
pub(crate) fn max_copy_len(length: usize, classic_format: bool) -> usize {
    if classic_format {
        5 * (length / 60 + 1)
    } else {
        5 + 5 * (length / MAX_REPEAT + 1)
    }
}

fn check_copy_args(offset: usize, length: usize) {
    assert!(length >= 4, "s2: copy length must be at least 4, got {}", length);
    assert!(
        offset > 0 && offset <= u32::MAX as usize,
        "s2: copy offset out of range: {}",
        offset
    );
}

/// Emit a copy of at most 64 bytes with an offset below 65536, using the 2
/// byte form when it fits.
#[inline]
fn emit_copy_short(dst: &mut [u8], offset: usize, length: usize) -> usize {
    if length >= 12 || offset >= 2048 {
        return emit_copy2(dst, offset, length);
    }
    emit_copy1(dst, offset, length)
}

/// Emit a COPY1 tag (11-bit offset, length 4..=11)
#[inline]
fn emit_copy1(dst: &mut [u8], offset: usize, length: usize) -> usize {
    dst[0] = (((offset >> 8) << 5) | ((length - 4) << 2) | TAG_COPY1 as usize) as u8;
    dst[1] = offset as u8;
    2
}

/// Emit a COPY2 tag (16-bit offset, length 1..=64)
#[inline]
fn emit_copy2(dst: &mut [u8], offset: usize, length: usize) -> usize {
    dst[0] = (((length - 1) << 2) | TAG_COPY2 as usize) as u8;
    dst[1..3].copy_from_slice(&(offset as u16).to_le_bytes());
    3
}

/// Emit a COPY4 tag (32-bit offset, length 1..=64)
#[inline]
fn emit_copy4(dst: &mut [u8], offset: usize, length: usize) -> usize {
    dst[0] = (((length - 1) << 2) | TAG_COPY4 as usize) as u8;
    dst[1..5].copy_from_slice(&(offset as u32).to_le_bytes());
    5
}
