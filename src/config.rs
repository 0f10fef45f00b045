// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::constants::*;
use crate::error::{Error, Result};

/// Search parameters for the block encoder.
///
/// Larger tables remember more candidates and find more matches at the cost
/// of zeroing more memory per block. `skip_log` controls how fast the scan
/// accelerates through data that does not match: a smaller value gives up
/// sooner. `hash_bytes` is how many bytes of the input feed the hash.
///
/// With `classic_format` set, the encoder never emits repeat tags and the
/// output can be read by any Snappy decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfig {
    table_bits: u8,
    skip_log: u8,
    hash_bytes: u8,
    classic_format: bool,
}

impl BlockConfig {
    /// 16K entry table, used for blocks of 16KB and up
    pub const S2_14B: BlockConfig = BlockConfig::preset(14, 5, 6, false);
    /// 4K entry table, used for blocks between 4KB and 16KB
    pub const S2_12B: BlockConfig = BlockConfig::preset(12, 5, 5, false);
    /// 1K entry table, used for blocks between 512B and 4KB
    pub const S2_10B: BlockConfig = BlockConfig::preset(10, 5, 4, false);
    /// 256 entry table, used for blocks below 512B
    pub const S2_8B: BlockConfig = BlockConfig::preset(8, 4, 4, false);

    /// Snappy compatible version of [`S2_14B`](Self::S2_14B)
    pub const SNAPPY_14B: BlockConfig = BlockConfig::preset(14, 6, 6, true);
    /// Snappy compatible version of [`S2_12B`](Self::S2_12B)
    pub const SNAPPY_12B: BlockConfig = BlockConfig::preset(12, 5, 5, true);
    /// Snappy compatible version of [`S2_10B`](Self::S2_10B)
    pub const SNAPPY_10B: BlockConfig = BlockConfig::preset(10, 5, 4, true);
    /// Snappy compatible version of [`S2_8B`](Self::S2_8B)
    pub const SNAPPY_8B: BlockConfig = BlockConfig::preset(8, 4, 4, true);

    const fn preset(table_bits: u8, skip_log: u8, hash_bytes: u8, classic_format: bool) -> Self {
        BlockConfig {
            table_bits,
            skip_log,
            hash_bytes,
            classic_format,
        }
    }

    /// Create a custom configuration.
    ///
    /// `table_bits` must be one of 8, 10, 12 or 14, `skip_log` between 1 and 8
    /// and `hash_bytes` between 4 and 6.
    pub fn new(table_bits: u8, skip_log: u8, hash_bytes: u8, classic_format: bool) -> Result<Self> {
        if !TABLE_BITS.contains(&table_bits) {
            return Err(Error::InvalidConfig(format!(
                "table_bits must be one of {:?}, got {}",
                TABLE_BITS, table_bits
            )));
        }
        if !(1..=8).contains(&skip_log) {
            return Err(Error::InvalidConfig(format!(
                "skip_log must be in 1..=8, got {}",
                skip_log
            )));
        }
        if !(4..=6).contains(&hash_bytes) {
            return Err(Error::InvalidConfig(format!(
                "hash_bytes must be in 4..=6, got {}",
                hash_bytes
            )));
        }

        Ok(BlockConfig::preset(
            table_bits,
            skip_log,
            hash_bytes,
            classic_format,
        ))
    }

    /// Pick the preset suited to a block of `len` bytes.
    ///
    /// Small blocks use small tables since zeroing a large table would cost
    /// more than the search itself.
    pub fn for_input_len(len: usize, classic_format: bool) -> Self {
        let config = if len >= LIMIT_12B {
            BlockConfig::S2_14B
        } else if len >= LIMIT_10B {
            BlockConfig::S2_12B
        } else if len >= LIMIT_8B {
            BlockConfig::S2_10B
        } else {
            BlockConfig::S2_8B
        };

        // The large Snappy variant skips a little slower.
        if classic_format && config == BlockConfig::S2_14B {
            return BlockConfig::SNAPPY_14B;
        }
        config.with_classic_format(classic_format)
    }

    /// Return a copy of this configuration with the classic flag changed
    pub const fn with_classic_format(mut self, classic_format: bool) -> Self {
        self.classic_format = classic_format;
        self
    }

    /// Number of bits of hash, the table has `1 << table_bits` entries
    pub fn table_bits(&self) -> u8 {
        self.table_bits
    }

    /// Shift applied to the literal run length to compute the next skip
    pub fn skip_log(&self) -> u8 {
        self.skip_log
    }

    /// Number of input bytes hashed per position
    pub fn hash_bytes(&self) -> u8 {
        self.hash_bytes
    }

    /// Whether repeat tags are disabled
    pub fn classic_format(&self) -> bool {
        self.classic_format
    }

    /// Number of entries in the hash table
    pub fn table_size(&self) -> usize {
        1 << self.table_bits
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        BlockConfig::S2_14B
    }
}
