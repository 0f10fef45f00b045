// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

const PRIME_3_BYTES: u64 = 506832829;
const PRIME_4_BYTES: u64 = 2654435761;
const PRIME_5_BYTES: u64 = 889523592379;
const PRIME_6_BYTES: u64 = 227718039650203;
const PRIME_7_BYTES: u64 = 58295818150454627;
const PRIME_8_BYTES: u64 = 0xcf1bbcdcb7a56463;

/// Multiplicative hash over the lowest `bytes` bytes of a little-endian word.
///
/// The value is moved to the top of the register so the bytes above the
/// prefix drop out, multiplied by a per-width prime and the top `table_bits`
/// bits are kept.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    prime: u64,
    left: u32,
    right: u32,
}

impl Hasher {
    /// Create a hasher for `bytes` (3..=8) byte prefixes and a table of
    /// `1 << table_bits` entries.
    pub fn new(bytes: u8, table_bits: u8) -> Self {
        let prime = match bytes {
            3 => PRIME_3_BYTES,
            4 => PRIME_4_BYTES,
            5 => PRIME_5_BYTES,
            6 => PRIME_6_BYTES,
            7 => PRIME_7_BYTES,
            8 => PRIME_8_BYTES,
            _ => panic!("s2: invalid hash length {}", bytes),
        };
        assert!(
            (1..=32).contains(&table_bits),
            "s2: invalid table bits {}",
            table_bits
        );

        Hasher {
            prime,
            left: 64 - 8 * bytes as u32,
            right: 64 - table_bits as u32,
        }
    }

    /// Hash the low bytes of `u`
    #[inline(always)]
    pub fn hash(&self, u: u64) -> usize {
        ((u << self.left).wrapping_mul(self.prime) >> self.right) as usize
    }
}

/// Candidate positions indexed by hash.
///
/// A slot holds the most recent source offset whose prefix hashed there.
/// Zero doubles as "empty": the scan starts at 1 so position 0 is only ever
/// seen as a stale candidate, which the 4-byte verification filters out.
#[derive(Debug, Clone)]
pub(crate) struct HashTable {
    slots: Vec<u32>,
}

impl HashTable {
    /// Allocate a zeroed table with `1 << table_bits` slots
    pub fn new(table_bits: u8) -> Self {
        HashTable {
            slots: vec![0u32; 1 << table_bits],
        }
    }

    /// Zero every slot
    pub fn reset(&mut self) {
        self.slots.fill(0);
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub fn get(&self, h: usize) -> usize {
        debug_assert!(h < self.slots.len(), "hash {} out of table range", h);
        self.slots[h] as usize
    }

    #[inline(always)]
    pub fn set(&mut self, h: usize, pos: usize) {
        debug_assert!(h < self.slots.len(), "hash {} out of table range", h);
        self.slots[h] = pos as u32;
    }
}
