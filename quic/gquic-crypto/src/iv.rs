// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use gquic_core::packet::number::PacketNumber;
use zeroize::Zeroize;

pub use ring::aead::NONCE_LEN;

/// Per-direction initialization vector combined with the packet number into a nonce
pub struct Iv([u8; NONCE_LEN]);

impl Iv {
    #[inline]
    pub fn new(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Left-pads the packet number to the nonce length and XORs it with the IV
    #[inline]
    pub fn nonce(&self, packet_number: PacketNumber) -> [u8; NONCE_LEN] {
        let mut nonce = [0; NONCE_LEN];
        nonce[NONCE_LEN - 8..].copy_from_slice(&packet_number.as_u64().to_be_bytes());

        for (a, b) in nonce.iter_mut().zip(self.0.iter()) {
            *a ^= b;
        }

        nonce
    }
}

impl Zeroize for Iv {
    #[inline]
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}

impl Drop for Iv {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl core::fmt::Debug for Iv {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        // never print key material
        f.write_str("Iv(..)")
    }
}
