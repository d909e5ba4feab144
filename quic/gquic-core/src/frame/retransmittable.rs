// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Decides which frames are worth carrying over into a retransmission.
//!
//! ACK and STOP_WAITING frames describe the sender's state at the moment they
//! were written; by the time a packet is declared lost that state is stale, so
//! they are regenerated instead of resent. Every other frame kind is
//! retransmitted. New frame kinds must be added to the `match` below.

use crate::frame::Frame;

impl Frame {
    /// Returns true if the frame must be resent when its packet is lost
    #[inline]
    pub fn is_retransmittable(&self) -> bool {
        match self {
            Frame::Ack(_) | Frame::StopWaiting(_) => false,
            Frame::Stream(_)
            | Frame::RstStream(_)
            | Frame::WindowUpdate(_)
            | Frame::Blocked(_)
            | Frame::Ping(_)
            | Frame::GoAway(_)
            | Frame::ConnectionClose(_) => true,
        }
    }
}

/// Returns true if the frame must be resent when its packet is lost
#[inline]
pub fn is_retransmittable(frame: &Frame) -> bool {
    frame.is_retransmittable()
}

/// Returns references to the retransmittable frames, preserving their order
pub fn strip_non_retransmittable(frames: &[Frame]) -> Vec<&Frame> {
    frames
        .iter()
        .filter(|frame| frame.is_retransmittable())
        .collect()
}

/// Drops the non-retransmittable frames, moving the remaining ones without cloning
pub fn retain_retransmittable(mut frames: Vec<Frame>) -> Vec<Frame> {
    frames.retain(Frame::is_retransmittable);
    frames
}
