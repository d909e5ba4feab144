// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::iv::Iv;
use gquic_core::{
    crypto::{CryptoError, PacketProtection},
    packet::number::PacketNumber,
};
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_128_GCM};

pub const KEY_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

/// AES-128-GCM protection installed once the handshake has produced keys
pub struct AesGcm128 {
    key: LessSafeKey,
    iv: Iv,
}

impl AesGcm128 {
    pub fn new(key: &[u8; KEY_LEN], iv: [u8; aead::NONCE_LEN]) -> Result<Self, CryptoError> {
        let key = UnboundKey::new(&AES_128_GCM, key).map_err(|_| CryptoError::Internal {
            reason: "invalid AES-128-GCM key",
        })?;

        Ok(Self {
            key: LessSafeKey::new(key),
            iv: Iv::new(iv),
        })
    }

    #[inline]
    fn nonce(&self, packet_number: PacketNumber) -> Nonce {
        Nonce::assume_unique_for_key(self.iv.nonce(packet_number))
    }
}

impl core::fmt::Debug for AesGcm128 {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("AesGcm128").finish_non_exhaustive()
    }
}

impl PacketProtection for AesGcm128 {
    #[inline]
    fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn seal(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        out.clear();
        out.reserve(plaintext.len() + TAG_LEN);
        out.extend_from_slice(plaintext);

        self.key
            .seal_in_place_append_tag(
                self.nonce(packet_number),
                Aad::from(associated_data),
                out,
            )
            .map_err(|_| CryptoError::Internal {
                reason: "AES-128-GCM seal failed",
            })
    }

    fn open<'a>(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        protected: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError> {
        if protected.len() < TAG_LEN {
            return Err(CryptoError::Length { tag_len: TAG_LEN });
        }

        self.key
            .open_in_place(
                self.nonce(packet_number),
                Aad::from(associated_data),
                protected,
            )
            .map_err(|_| CryptoError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolero::check;
    use hex_literal::hex;

    const KEY: [u8; KEY_LEN] = hex!("000102030405060708090a0b0c0d0e0f");
    const IV: [u8; aead::NONCE_LEN] = hex!("6b26114b9cba2b63a9e8dd4f");

    fn protection() -> AesGcm128 {
        AesGcm128::new(&KEY, IV).unwrap()
    }

    #[test]
    fn known_answer() {
        let aead = protection();
        let packet_number = PacketNumber::new(0x1337);

        let sealed = aead.protect(packet_number, b"header", b"hello").unwrap();
        assert_eq!(
            sealed[..],
            hex!("bfdd2572c350e64cd7fe2c1e538b6ad6be3abdefbd")
        );

        let mut sealed = sealed;
        let opened = aead.open(packet_number, b"header", &mut sealed).unwrap();
        assert_eq!(opened, b"hello");
    }

    #[test]
    fn wrong_packet_number_fails() {
        let aead = protection();
        let mut sealed = aead.protect(PacketNumber::new(1), b"", b"payload").unwrap();
        assert_eq!(
            aead.open(PacketNumber::new(2), b"", &mut sealed),
            Err(CryptoError::Authentication)
        );
    }

    #[test]
    fn short_input() {
        let aead = protection();
        let mut short = [0u8; TAG_LEN - 1];
        assert_eq!(
            aead.open(PacketNumber::new(1), b"", &mut short),
            Err(CryptoError::Length { tag_len: TAG_LEN })
        );
    }

    #[test]
    fn round_trip() {
        check!()
            .with_type::<(u64, Vec<u8>, Vec<u8>)>()
            .for_each(|(packet_number, associated_data, payload)| {
                let aead = protection();
                let packet_number = PacketNumber::new(*packet_number);

                let mut sealed = aead
                    .protect(packet_number, associated_data, payload)
                    .unwrap();
                assert_eq!(sealed.len(), payload.len() + TAG_LEN);

                let opened = aead
                    .open(packet_number, associated_data, &mut sealed)
                    .unwrap();
                assert_eq!(&opened[..], &payload[..]);
            });
    }

    #[test]
    fn tampering_is_detected() {
        check!()
            .with_type::<(Vec<u8>, u16, u8)>()
            .for_each(|(payload, index, bit)| {
                let aead = protection();
                let packet_number = PacketNumber::new(7);
                let mut sealed = aead.protect(packet_number, b"ad", payload).unwrap();

                let index = *index as usize % sealed.len();
                sealed[index] ^= 1 << (bit % 8);

                assert_eq!(
                    aead.open(packet_number, b"ad", &mut sealed),
                    Err(CryptoError::Authentication)
                );
            });
    }
}
