// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// A gQUIC protocol version number
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

impl Version {
    pub const Q035: Self = Self(35);
    pub const Q036: Self = Self(36);
    pub const Q037: Self = Self(37);

    /// The first version which salts the keyless authentication tag with the sender's role
    pub const ROLE_SALT_THRESHOLD: Self = Self::Q037;

    /// Versions this implementation can speak, newest first
    pub const SUPPORTED: [Self; 3] = [Self::Q037, Self::Q036, Self::Q035];

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns true if the version mixes the endpoint role into the null cipher's tag
    #[inline]
    pub fn uses_role_salt(self) -> bool {
        self >= Self::ROLE_SALT_THRESHOLD
    }

    #[inline]
    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl From<u32> for Version {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Q{:03}", self.0)
    }
}
