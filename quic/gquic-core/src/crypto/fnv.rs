// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! 128-bit FNV-1a, the non-cryptographic hash behind the null cipher's tag

const OFFSET_BASIS: u128 = 0x6c62_272e_07bb_0142_62b8_2175_6295_c58d;
const PRIME: u128 = 0x0000_0000_0100_0000_0000_0000_0000_013b;

#[derive(Clone, Copy, Debug)]
pub struct Fnv128a(u128);

impl Default for Fnv128a {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv128a {
    #[inline]
    pub const fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u128::from(*byte);
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }

    /// Returns the `(high, low)` 64-bit halves of the digest
    #[inline]
    pub fn sum128(&self) -> (u64, u64) {
        ((self.0 >> 64) as u64, self.0 as u64)
    }
}
