// Shared test doubles; included by each integration test with `mod common;`
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use serlink_hal::{Clock, SerialRx, SerialTx};

/// In-memory transport: bytes pushed into `rx` are what the link reads,
/// bytes the link writes land in `tx`
#[derive(Debug, Default)]
pub struct Wire {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub writes: usize,
    pub flushes: usize,
}

impl Wire {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl SerialTx for Wire {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

impl SerialRx for Wire {
    type Error = Infallible;

    fn bytes_available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        Ok(self.rx.pop_front().expect("read_byte called with nothing available"))
    }
}

/// Manually driven clock; clones share the same time
///
/// `step_ms` is added after every reading, so busy-wait loops terminate.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
    step_ms: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_advancing(step_ms: u32) -> Self {
        Self {
            now: Rc::default(),
            step_ms,
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step_ms));
        now
    }
}

/// Frame bytes as the reference encoder would produce them
pub fn encode(command_id: u8, payload: &[u8]) -> Vec<u8> {
    let frame = serlink_protocol::Frame::new(command_id, payload).unwrap();
    frame.encode_to_vec().to_vec()
}
