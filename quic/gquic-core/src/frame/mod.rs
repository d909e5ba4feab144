// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Decoded gQUIC frames.
//!
//! Encoding and decoding the wire layout is handled by the frame codec; this
//! module only models the decoded values that the recovery logic consumes.

use bytes::Bytes;
use core::fmt;

pub mod ack;
pub mod retransmittable;
pub mod stop_waiting;

pub use ack::{AckFrame, AckRange};
pub use retransmittable::{is_retransmittable, retain_retransmittable, strip_non_retransmittable};
pub use stop_waiting::StopWaitingFrame;

pub type StreamId = u32;
pub type ErrorCode = u32;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamFrame {
    pub stream_id: StreamId,
    pub fin: bool,
    pub offset: u64,
    pub data: Bytes,
}

impl StreamFrame {
    /// The offset one past the last byte carried by the frame
    #[inline]
    pub fn data_end(&self) -> u64 {
        self.offset.saturating_add(self.data.len() as u64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RstStreamFrame {
    pub stream_id: StreamId,
    pub error_code: ErrorCode,
    pub byte_offset: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowUpdateFrame {
    pub stream_id: StreamId,
    pub byte_offset: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockedFrame {
    pub stream_id: StreamId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PingFrame;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoAwayFrame {
    pub error_code: ErrorCode,
    pub last_good_stream_id: StreamId,
    pub reason_phrase: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionCloseFrame {
    pub error_code: ErrorCode,
    pub reason_phrase: String,
}

/// Every frame kind the transport can send or receive
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Stream(StreamFrame),
    Ack(AckFrame),
    StopWaiting(StopWaitingFrame),
    RstStream(RstStreamFrame),
    WindowUpdate(WindowUpdateFrame),
    Blocked(BlockedFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    ConnectionClose(ConnectionCloseFrame),
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Frame {
                #[inline]
                fn from(frame: $ty) -> Self {
                    Self::$variant(frame)
                }
            }
        )*
    };
}

impl_from!(
    Stream(StreamFrame),
    Ack(AckFrame),
    StopWaiting(StopWaitingFrame),
    RstStream(RstStreamFrame),
    WindowUpdate(WindowUpdateFrame),
    Blocked(BlockedFrame),
    Ping(PingFrame),
    GoAway(GoAwayFrame),
    ConnectionClose(ConnectionCloseFrame),
);

/// Whether a frame is being written to or read from the network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    #[inline]
    fn arrow(self) -> &'static str {
        match self {
            Self::Sent => "->",
            Self::Received => "<-",
        }
    }
}

impl Frame {
    /// Returns a compact, human-readable rendering of the frame
    #[inline]
    pub fn display(&self, direction: Direction) -> Display<'_> {
        Display {
            frame: self,
            direction,
        }
    }
}

/// Renders a [`Frame`] for debug logs
pub struct Display<'a> {
    frame: &'a Frame,
    direction: Direction,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.frame {
            Frame::Stream(frame) => write!(
                f,
                "StreamFrame{{StreamID: {}, FinBit: {}, Offset: {:#x}, Data length: {:#x}, Offset + Data length: {:#x}}}",
                frame.stream_id,
                frame.fin,
                frame.offset,
                frame.data.len(),
                frame.data_end()
            ),
            Frame::Ack(frame) => {
                write!(
                    f,
                    "AckFrame{{LargestAcked: {:#x}, LowestAcked: {:#x}, AckRanges: [",
                    frame.largest_acked, frame.lowest_acked
                )?;
                for (idx, range) in frame.ack_ranges.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{range}")?;
                }
                write!(f, "], DelayTime: {:?}}}", frame.delay_time)
            }
            Frame::StopWaiting(frame) => match self.direction {
                Direction::Sent => write!(
                    f,
                    "StopWaitingFrame{{LeastUnacked: {:#x}, PacketNumberLen: {:#x}}}",
                    frame.least_unacked,
                    frame.packet_number_len.bytesize()
                ),
                Direction::Received => write!(
                    f,
                    "StopWaitingFrame{{LeastUnacked: {:#x}}}",
                    frame.least_unacked
                ),
            },
            Frame::RstStream(frame) => write!(f, "{frame:?}"),
            Frame::WindowUpdate(frame) => write!(f, "{frame:?}"),
            Frame::Blocked(frame) => write!(f, "{frame:?}"),
            Frame::Ping(frame) => write!(f, "{frame:?}"),
            Frame::GoAway(frame) => write!(f, "{frame:?}"),
            Frame::ConnectionClose(frame) => write!(f, "{frame:?}"),
        }
    }
}

/// Emits a debug event describing a frame crossing the wire
#[inline]
pub fn log(frame: &Frame, direction: Direction) {
    tracing::debug!("\t{} {}", direction.arrow(), frame.display(direction));
}
