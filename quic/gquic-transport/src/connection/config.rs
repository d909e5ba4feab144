// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use gquic_core::{
    endpoint,
    recovery::{self, Settings},
    time::Duration,
    Version,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported version {0}")]
    UnsupportedVersion(Version),
    #[error(transparent)]
    Recovery(#[from] recovery::ValidationError),
}

/// Per-connection configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    perspective: endpoint::Type,
    version: Version,
    recovery: Settings,
}

macro_rules! setter {
    ($name:ident, $field:ident, $inner:ty, $validate:expr) => {
        pub fn $name(mut self, value: $inner) -> Result<Self, ValidationError> {
            self.$field = $validate(self.$field, value)?;
            Ok(self)
        }
    };
}

impl Config {
    pub const fn new(perspective: endpoint::Type) -> Self {
        Self {
            perspective,
            version: Version::Q037,
            recovery: Settings::RECOMMENDED,
        }
    }

    setter!(with_version, version, Version, |_, version: Version| {
        if version.is_supported() {
            Ok(version)
        } else {
            Err(ValidationError::UnsupportedVersion(version))
        }
    });
    setter!(
        with_packet_threshold,
        recovery,
        u64,
        |settings: Settings, value| settings.with_packet_threshold(value)
    );
    setter!(
        with_time_threshold,
        recovery,
        Duration,
        |settings: Settings, value| settings.with_time_threshold(value)
    );

    pub fn with_recovery_settings(mut self, settings: Settings) -> Self {
        self.recovery = settings;
        self
    }

    #[inline]
    pub fn perspective(&self) -> endpoint::Type {
        self.perspective
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    #[inline]
    pub fn recovery_settings(&self) -> Settings {
        self.recovery
    }
}
