// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// Error type for packet protection failures.
///
/// Authentication failures are deliberately a single variant: callers learn
/// that a packet was rejected, never which part of the tag disagreed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum CryptoError {
    /// The protected input is shorter than the authentication tag
    #[error("protected payload is shorter than the {tag_len} byte tag")]
    Length { tag_len: usize },
    /// The authentication tag did not match the payload
    #[error("failed to authenticate received data")]
    Authentication,
    /// The cipher backend failed while sealing a payload
    #[error("packet protection failed: {reason}")]
    Internal { reason: &'static str },
}

impl CryptoError {
    /// Returns true if the error was caused by an invalid tag
    #[inline]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Returns true if the input was too short to carry a tag
    #[inline]
    pub fn is_length(&self) -> bool {
        matches!(self, Self::Length { .. })
    }
}
