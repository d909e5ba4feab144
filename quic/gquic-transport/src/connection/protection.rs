// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use gquic_core::{
    crypto::{CryptoError, NullAead, PacketProtection},
    endpoint,
    packet::number::PacketNumber,
    Version,
};
use gquic_crypto::AesGcm128;

/// The packet protection currently in use by a connection.
///
/// A connection starts with [`Protection::Initial`] and moves to
/// [`Protection::ForwardSecure`] once the handshake delivers keys. There is no
/// transition back.
#[derive(Debug)]
pub enum Protection {
    Initial(NullAead),
    ForwardSecure {
        /// Protects packets sent by the local endpoint
        sealer: AesGcm128,
        /// Verifies packets sent by the peer
        opener: AesGcm128,
    },
}

impl Protection {
    pub fn new(perspective: endpoint::Type, version: Version) -> Self {
        Self::Initial(NullAead::new(perspective, version))
    }

    /// Replaces the current protection with keyed AEADs for each direction
    pub fn install_forward_secure_keys(&mut self, sealer: AesGcm128, opener: AesGcm128) {
        *self = Self::ForwardSecure { sealer, opener };
    }

    #[inline]
    pub fn is_forward_secure(&self) -> bool {
        matches!(self, Self::ForwardSecure { .. })
    }
}

impl PacketProtection for Protection {
    #[inline]
    fn tag_len(&self) -> usize {
        match self {
            Self::Initial(aead) => aead.tag_len(),
            Self::ForwardSecure { sealer, .. } => sealer.tag_len(),
        }
    }

    #[inline]
    fn seal(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        match self {
            Self::Initial(aead) => aead.seal(packet_number, associated_data, plaintext, out),
            Self::ForwardSecure { sealer, .. } => {
                sealer.seal(packet_number, associated_data, plaintext, out)
            }
        }
    }

    #[inline]
    fn open<'a>(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        protected: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError> {
        match self {
            Self::Initial(aead) => aead.open(packet_number, associated_data, protected),
            Self::ForwardSecure { opener, .. } => {
                opener.open(packet_number, associated_data, protected)
            }
        }
    }
}
