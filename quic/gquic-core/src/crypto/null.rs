// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    crypto::{fnv::Fnv128a, CryptoError, PacketProtection},
    endpoint,
    packet::number::PacketNumber,
    Version,
};
use byteorder::{ByteOrder, LittleEndian};
use subtle::ConstantTimeEq;

/// Length of the keyless authentication tag prepended to every payload
pub const TAG_LEN: usize = 12;

type Tag = [u8; TAG_LEN];

/// Protection for packets sent before any handshake keys exist.
///
/// The payload is left in cleartext. A 128-bit FNV-1a hash over the
/// associated data, the payload and, from [`Version::Q037`] on, the sealing
/// endpoint's role name is truncated to 96 bits and prepended:
///
/// ```text
/// +------------------+--------------------------+---------+
/// | low 64 bits (LE) | high 64 bits as u32 (LE) | payload |
/// +------------------+--------------------------+---------+
/// ```
///
/// This provides integrity against accidental corruption only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullAead {
    perspective: endpoint::Type,
    version: Version,
}

impl NullAead {
    pub fn new(perspective: endpoint::Type, version: Version) -> Self {
        Self {
            perspective,
            version,
        }
    }

    #[inline]
    pub fn perspective(&self) -> endpoint::Type {
        self.perspective
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The salt mixed in by the endpoint with the given role
    #[inline]
    fn role_salt(&self, role: endpoint::Type) -> &'static [u8] {
        if self.version.uses_role_salt() {
            role.label()
        } else {
            &[]
        }
    }

    fn compute_tag(&self, associated_data: &[u8], payload: &[u8], role: endpoint::Type) -> Tag {
        let mut hasher = Fnv128a::new();
        hasher.write(associated_data);
        hasher.write(payload);
        hasher.write(self.role_salt(role));
        let (high, low) = hasher.sum128();

        let mut tag = [0u8; TAG_LEN];
        LittleEndian::write_u64(&mut tag[..8], low);
        LittleEndian::write_u32(&mut tag[8..], high as u32);
        tag
    }
}

impl PacketProtection for NullAead {
    #[inline]
    fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn seal(
        &self,
        _packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        // the sealer salts with its own role
        let tag = self.compute_tag(associated_data, plaintext, self.perspective);

        out.clear();
        out.reserve(TAG_LEN + plaintext.len());
        out.extend_from_slice(&tag);
        out.extend_from_slice(plaintext);

        Ok(())
    }

    fn open<'a>(
        &self,
        _packet_number: PacketNumber,
        associated_data: &[u8],
        protected: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError> {
        if protected.len() < TAG_LEN {
            return Err(CryptoError::Length { tag_len: TAG_LEN });
        }

        let (tag, payload) = protected.split_at_mut(TAG_LEN);

        // the opener reproduces the salt of the remote endpoint that sealed the packet
        let expected = self.compute_tag(associated_data, payload, self.perspective.peer_type());

        if bool::from(expected[..].ct_eq(tag)) {
            Ok(payload)
        } else {
            Err(CryptoError::Authentication)
        }
    }
}
