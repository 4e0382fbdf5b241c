//! Serlink binary framing protocol
//!
//! This crate implements the framed link between two microcontrollers over
//! an unbuffered, byte-oriented serial transport. It turns a noisy byte
//! stream into checksum-verified, typed messages and back.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬─────────┬────────┬──────────────┬────────┐
//! │ START │ COMMAND │ LENGTH │ PAYLOAD      │ CRC    │
//! │ 1B    │ 1B      │ 2B BE  │ 0–1024B      │ 2B BE  │
//! └───────┴─────────┴────────┴──────────────┴────────┘
//! ```
//!
//! The CRC is CRC-16 (poly 0x1021, init 0xFFFF) over COMMAND, LENGTH and
//! PAYLOAD. Corrupt, oversized or late frames are dropped silently and the
//! receiver resynchronizes on the next START byte. There is no flow control
//! and no retransmission.
//!
//! # Layers
//!
//! - [`crc`] - checksum
//! - [`payload`] - typed payload builder and parser
//! - [`frame`] - frame model, encoding, one-shot decoding
//! - [`receiver`] - byte-at-a-time receive state machine
//! - [`link`] - sending and polling over a [`serlink_hal`] transport

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod crc;
pub mod frame;
pub mod link;
pub mod payload;
pub mod receiver;

pub use command::{CommandId, ErrorCode};
pub use config::{LinkConfig, FRAME_TIMEOUT_MS};
pub use crc::{crc16, Crc16};
pub use frame::{
    Frame, FrameError, FRAME_START, FOOTER_SIZE, HEADER_SIZE, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE,
    MIN_FRAME_SIZE,
};
pub use link::{Link, LinkError, LinkStats};
pub use payload::{PayloadBuilder, PayloadError, PayloadParser};
pub use receiver::{FrameReceiver, Phase, RxStats};
