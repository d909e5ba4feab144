// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod number;

/// An unsigned count of bytes, used for packet sizes and loss accounting
pub type ByteCount = u64;
