// src/exec/run_id.rs

//! Correlation identifiers for process invocations.
//!
//! A [`RunId`] is 26 characters drawn from a 32-symbol lowercase alphabet
//! that skips visually ambiguous characters (`0`, `l`, `v`, `2`). It encodes
//! 128 random bits, five bits per character, most significant bits first;
//! the last character carries the final three bits padded with zeros.
//!
//! Randomness comes from `rand`'s thread-local generator, which is seeded
//! from the OS and needs no locking, so ids can be generated from any number
//! of tasks at once.

use std::fmt;

use serde::Serialize;

/// Alphabet used to render run ids.
pub const ALPHABET: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Length of every rendered run id.
pub const RUN_ID_LEN: usize = 26;

/// Identifier grouping all log lines of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Generate a fresh id from 128 random bits.
    pub fn new() -> Self {
        Self::from_bits(rand::random::<u128>())
    }

    /// Render a specific 128-bit value as a run id.
    pub fn from_bits(bits: u128) -> Self {
        let mut out = String::with_capacity(RUN_ID_LEN);
        for i in 0..RUN_ID_LEN {
            // 26 * 5 = 130, so the final group is shifted left by two.
            let shift = 128_i32 - 5 * (i as i32 + 1);
            let group = if shift >= 0 {
                (bits >> shift) & 0x1f
            } else {
                (bits << -shift) & 0x1f
            };
            out.push(ALPHABET[group as usize] as char);
        }
        RunId(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
