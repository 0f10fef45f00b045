// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::config::BlockConfig;
use crate::constants::*;
use crate::emit::{emit_copy, emit_copy_no_repeat, emit_literal, emit_repeat, max_copy_len};
use crate::error::{Error, Result};
use crate::hash::{HashTable, Hasher};
use crate::matchlen::{load32, load64, match_len};

/// Reusable block encoder.
///
/// Owns the hash table so that encoding many blocks does not allocate one
/// per call. The table is zeroed at the start of every encode, no state
/// carries over from one block to the next.
#[derive(Debug, Clone)]
pub struct BlockEncoder {
    config: BlockConfig,
    hasher: Hasher,
    table: HashTable,
}

impl BlockEncoder {
    /// Create a new encoder using `config` for every block
    pub fn new(config: BlockConfig) -> Self {
        BlockEncoder {
            config,
            hasher: Hasher::new(config.hash_bytes(), config.table_bits()),
            table: HashTable::new(config.table_bits()),
        }
    }

    /// The configuration this encoder was created with
    pub fn config(&self) -> BlockConfig {
        self.config
    }

    /// Encode `src` into `dst` and return the number of bytes written.
    ///
    /// Returns 0 when the block does not compress to less than
    /// `len(src) - 5 - len(src)/32` bytes or does not fit in `dst`. Callers
    /// should then store the block as a literal. Nothing is written past
    /// `dst.len()`. The varint length prefix of the block format is not
    /// written, that is up to the caller.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than 8 bytes or longer than `i32::MAX`.
    pub fn encode(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        assert!(
            src.len() >= INPUT_MARGIN,
            "s2: block of {} bytes is too short to encode",
            src.len()
        );
        assert!(
            src.len() <= MAX_BLOCK_SIZE,
            "s2: block of {} bytes is too large to encode",
            src.len()
        );

        self.table.reset();
        debug_assert_eq!(self.table.len(), self.config.table_size());

        let hasher = self.hasher;
        let table = &mut self.table;
        let skip_log = self.config.skip_log() as u32;
        let classic = self.config.classic_format();

        // Bail if we can't compress to at least this.
        let dst_limit = (src.len() - 5 - src.len() / 32).min(dst.len());

        // Stop looking for matches this close to the end.
        let s_limit = src.len() - INPUT_MARGIN;

        let mut next_emit = 0;
        let mut s = 1;
        let mut d = 0;
        let mut repeat = 1;

        'search: loop {
            let next_s = s + ((s - next_emit) >> skip_log) + 4;
            if next_s > s_limit {
                break 'search;
            }

            let mut cv = load64(src, s);
            let hash0 = hasher.hash(cv);
            let hash1 = hasher.hash(cv >> 8);
            let mut candidate = table.get(hash0);
            let candidate2 = table.get(hash1);
            table.set(hash0, s);
            table.set(hash1, s + 1);
            let hash2 = hasher.hash(cv >> 16);

            // Check for a repeat of the last offset, one byte ahead.
            if (cv >> 8) as u32 == load32(src, s - repeat + 1) {
                let nothing_emitted = next_emit == 0;
                let mut base = s + 1;

                // Extend back
                let mut i = base - repeat;
                while i > 0 && base > next_emit && src[i - 1] == src[base - 1] {
                    base -= 1;
                    i -= 1;
                }

                if d + (base - next_emit) + LITERAL_MAX_OVERHEAD >= dst_limit {
                    return 0;
                }
                d += emit_literal(&mut dst[d..], &src[next_emit..base]);
                next_emit = base;

                // Extend forward, the 4 bytes after s+1 are known to match.
                s += 5;
                s += match_len(&src[s..], &src[s - repeat..]);

                let length = s - base;
                if d + max_copy_len(length, classic) > dst.len() {
                    return 0;
                }
                d += if classic {
                    emit_copy_no_repeat(&mut dst[d..], repeat, length)
                } else if nothing_emitted {
                    // The first match of a block is always a full copy.
                    emit_copy(&mut dst[d..], repeat, length)
                } else {
                    emit_repeat(&mut dst[d..], repeat, length)
                };
                next_emit = s;

                if s >= s_limit {
                    break 'search;
                }
                continue 'search;
            }

            if load32(src, candidate) != cv as u32 {
                cv >>= 8;
                let candidate3 = table.get(hash2);

                if load32(src, candidate2) == cv as u32 {
                    table.set(hash2, s + 2);
                    s += 1;
                    candidate = candidate2;
                } else {
                    table.set(hash2, s + 2);
                    cv >>= 8;
                    if load32(src, candidate3) != cv as u32 {
                        s = next_s;
                        continue 'search;
                    }
                    s += 2;
                    candidate = candidate3;
                }
            }

            // Extend backwards
            while candidate > 0 && s > next_emit && src[candidate - 1] == src[s - 1] {
                candidate -= 1;
                s -= 1;
            }

            // Bail if we exceed the maximum size.
            if d + (s - next_emit) + LITERAL_MAX_OVERHEAD >= dst_limit {
                return 0;
            }
            d += emit_literal(&mut dst[d..], &src[next_emit..s]);
            next_emit = s;

            // Emit matches back to back for as long as the position right
            // after a match also matches.
            loop {
                debug_assert!(candidate < s, "candidate {} not before {}", candidate, s);
                let base = s;
                repeat = base - candidate;

                // Extend the 4-byte match as long as possible.
                s += 4;
                s += match_len(&src[s..], &src[candidate + 4..]);

                let length = s - base;
                if d + max_copy_len(length, classic) > dst.len() {
                    return 0;
                }
                d += if classic {
                    emit_copy_no_repeat(&mut dst[d..], repeat, length)
                } else {
                    emit_copy(&mut dst[d..], repeat, length)
                };
                next_emit = s;

                if s >= s_limit {
                    break 'search;
                }
                if d >= dst_limit {
                    return 0;
                }

                // Index s-2 and s, and check s for an immediate match.
                let x = load64(src, s - 2);
                let hash0 = hasher.hash(x);
                let x = x >> 16;
                let hash1 = hasher.hash(x);
                candidate = table.get(hash1);
                table.set(hash0, s - 2);
                table.set(hash1, s);

                if load32(src, candidate) != x as u32 {
                    s += 1;
                    continue 'search;
                }
            }
        }

        // Emit remaining
        if d + (src.len() - next_emit) + LITERAL_MAX_OVERHEAD >= dst_limit {
            return 0;
        }
        d += emit_literal(&mut dst[d..], &src[next_emit..]);

        debug_assert!(d < src.len(), "encoded {} bytes from {}", d, src.len());
        d
    }

    /// Encode `src` into `dst`, storing it as a single literal when it is too
    /// short to search or does not compress. Returns the number of bytes
    /// written, which is 0 only for empty input.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than [`max_encoded_len`] of `src.len()`.
    pub fn encode_or_store(&mut self, dst: &mut [u8], src: &[u8]) -> usize {
        if src.is_empty() {
            return 0;
        }
        check_store_capacity(dst, src);

        if src.len() >= MIN_NON_LITERAL_BLOCK_SIZE {
            let n = self.encode(dst, src);
            if n > 0 {
                return n;
            }
        }

        // Not compressible
        emit_literal(dst, src)
    }
}

impl Default for BlockEncoder {
    fn default() -> Self {
        Self::new(BlockConfig::default())
    }
}

/// Encode a block with a freshly allocated hash table.
///
/// See [`BlockEncoder::encode`] for the meaning of the return value. Use a
/// [`BlockEncoder`] to reuse the table across blocks.
pub fn encode_block(dst: &mut [u8], src: &[u8], config: &BlockConfig) -> usize {
    BlockEncoder::new(*config).encode(dst, src)
}

/// Encode `src` with the preset suited to its size, falling back to a single
/// literal when the block is too short or does not compress.
///
/// Returns the number of bytes written, 0 only for empty input.
///
/// # Panics
///
/// Panics if `dst` is shorter than [`max_encoded_len`] of `src.len()`.
pub fn encode_or_store(dst: &mut [u8], src: &[u8], classic_format: bool) -> usize {
    if src.is_empty() {
        return 0;
    }
    let config = BlockConfig::for_input_len(src.len(), classic_format);
    BlockEncoder::new(config).encode_or_store(dst, src)
}

/// Returns the maximum number of bytes [`encode_or_store`] writes for a
/// block of `src_len` bytes.
pub fn max_encoded_len(src_len: usize) -> Result<usize> {
    if src_len > MAX_BLOCK_SIZE {
        return Err(Error::TooLarge);
    }

    Ok(src_len + literal_header_len(src_len))
}

/// Size of the tag of a literal of `n` bytes
fn literal_header_len(n: usize) -> usize {
    match n {
        0 => 0,
        1..=60 => 1,
        61..=256 => 2,
        257..=65536 => 3,
        65537..=16777216 => 4,
        _ => 5,
    }
}

fn check_store_capacity(dst: &[u8], src: &[u8]) {
    let needed = src.len() + literal_header_len(src.len());
    assert!(
        dst.len() >= needed,
        "s2: dst of {} bytes cannot hold a block of {} bytes, need {}",
        dst.len(),
        src.len(),
        needed
    );
}
