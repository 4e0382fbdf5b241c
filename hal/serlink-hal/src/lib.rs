//! Serlink Hardware Abstraction Layer
//!
//! This crate defines the two collaborators the framing protocol needs from
//! the board: a byte-oriented serial transport and a millisecond clock.
//! Chip-specific code implements these traits; the protocol crate is written
//! purely against them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (command dispatch, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  serlink-protocol (frames, link)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  serlink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embedded-io  │       │  board UART   │
//! │   adapter     │       │  driver       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialTx`], [`uart::SerialRx`] - Byte transport
//! - [`time::Clock`] - Monotonic millisecond clock

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "embedded-io")]
pub mod io;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
#[cfg(feature = "embedded-io")]
pub use io::IoSerial;
#[cfg(feature = "embassy-time")]
pub use time::EmbassyClock;
pub use time::Clock;
pub use uart::{Serial, SerialRx, SerialTx};
