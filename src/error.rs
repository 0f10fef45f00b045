// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

/// Result type for S2 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for S2 block encoding
///
/// Running out of destination space is not an error: the encoder reports it
/// by returning 0 so callers can store the block uncompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The block is too large to be encoded
    TooLarge,

    /// The encoder configuration is not one the search loop supports
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TooLarge => write!(f, "s2: block is too large"),
            Error::InvalidConfig(msg) => write!(f, "s2: invalid config: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
