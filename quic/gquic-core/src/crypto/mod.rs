// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! gQUIC packet protection primitives and traits
//!
//! ## Protection flow
//!
//! ```text
//!  +----------------+   seal()    +----------------+
//!  |CleartextPayload+------------>+ProtectedPayload|
//!  +-------+--------+             +-------+--------+
//!          ^                              |
//!          |            open()            |
//!          +------------------------------+
//! ```
//!
//! Before the handshake produces keys, packets are protected by the
//! [`NullAead`], which prepends a keyless 12 byte integrity tag and leaves the
//! payload readable. Once keys exist the connection swaps in a keyed AEAD
//! implementing the same [`PacketProtection`] trait.

mod error;
pub mod fnv;
pub mod null;

pub use error::CryptoError;
pub use null::NullAead;

use crate::packet::number::PacketNumber;

/// Seals and opens packet payloads for one direction pair of a connection
pub trait PacketProtection {
    /// Number of bytes the protection adds to each payload
    fn tag_len(&self) -> usize;

    /// Writes the protected form of `plaintext` into `out`, replacing its contents
    fn seal(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CryptoError>;

    /// Verifies `protected` and returns the cleartext region of the same buffer
    fn open<'a>(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        protected: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError>;

    /// Allocates a buffer and seals `plaintext` into it
    #[inline]
    fn protect(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(self.tag_len() + plaintext.len());
        self.seal(packet_number, associated_data, plaintext, &mut out)?;
        Ok(out)
    }
}

impl<T: PacketProtection + ?Sized> PacketProtection for &T {
    #[inline]
    fn tag_len(&self) -> usize {
        (**self).tag_len()
    }

    #[inline]
    fn seal(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        plaintext: &[u8],
        out: &mut Vec<u8>,
    ) -> Result<(), CryptoError> {
        (**self).seal(packet_number, associated_data, plaintext, out)
    }

    #[inline]
    fn open<'a>(
        &self,
        packet_number: PacketNumber,
        associated_data: &[u8],
        protected: &'a mut [u8],
    ) -> Result<&'a mut [u8], CryptoError> {
        (**self).open(packet_number, associated_data, protected)
    }
}
