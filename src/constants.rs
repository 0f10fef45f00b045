// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Tag for literal chunks
pub const TAG_LITERAL: u8 = 0x00;

/// Tag for copy with 1-byte offset (11 bits), also used for repeats
pub const TAG_COPY1: u8 = 0x01;

/// Tag for copy with 2-byte offset (16 bits)
pub const TAG_COPY2: u8 = 0x02;

/// Tag for copy with 4-byte offset (32 bits)
pub const TAG_COPY4: u8 = 0x03;

/// Bytes at the end of the input that are never searched for matches
pub const INPUT_MARGIN: usize = 8;

/// Inputs shorter than this are always stored as a single literal
pub const MIN_NON_LITERAL_BLOCK_SIZE: usize = 32;

/// Largest source block the encoder accepts; offsets must fit in 31 bits
pub const MAX_BLOCK_SIZE: usize = i32::MAX as usize;

/// Worst-case literal header size assumed by the size checks in the search loop
pub const LITERAL_MAX_OVERHEAD: usize = 4;

/// Longest run a single repeat chunk can describe
pub const MAX_REPEAT: usize = ((1 << 24) - 1) + 65536;

/// Hash table sizes accepted by [`BlockConfig`](crate::BlockConfig)
pub const TABLE_BITS: [u8; 4] = [8, 10, 12, 14];

/// Use a 12 bit table when the input is less than this
pub const LIMIT_12B: usize = 16 << 10;

/// Use a 10 bit table when the input is less than this
pub const LIMIT_10B: usize = 4 << 10;

/// Use an 8 bit table when the input is less than this
pub const LIMIT_8B: usize = 512;
