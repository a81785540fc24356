//! Common test utilities for integration tests
//!
//! This module provides:
//! - `SimulatedSensor`: a `Transport` that behaves like an SDS011 on the far
//!   end of the UART, driven by a shared `FixedTime`
//! - `NoDelay`: a `Delay` that only records what was asked of it
//! - helpers to run a controller against the simulated clock

#![allow(dead_code)]

use std::collections::VecDeque;

use dustguard_core::{
    constants::{START_COMMAND, STOP_COMMAND, VERSION_COMMAND},
    constants::protocol::COMMAND_REPLY,
    time::{FixedTime, TimeSource, Timestamp},
    Delay, DutyCycleController, Frame, PhaseEvent, SamplePair, Transport,
};

/// Time from START to the first measurement push
pub const FIRST_PUSH_MS: u64 = 900;

/// Time between two measurement pushes
pub const PUSH_INTERVAL_MS: u64 = 1_000;

/// Device ID the simulated sensor reports
pub const DEVICE_ID: u16 = 0xA160;

/// SDS011 simulation on the far end of the link
///
/// While working it pushes a measurement frame every second, as a real
/// sensor in active reporting mode does. Frames pile up in its output
/// buffer until the controller reads them.
pub struct SimulatedSensor<'a> {
    clock: &'a FixedTime,
    working: bool,
    next_push: Timestamp,
    reading: SamplePair,
    /// Measurement frames still to be pushed; `None` for unlimited
    push_budget: Option<usize>,
    /// Sensor is powered but its TX line is dead
    stalled: bool,
    outgoing: VecDeque<u8>,
    commands: Vec<Vec<u8>>,
}

impl<'a> SimulatedSensor<'a> {
    /// Sensor asleep, reporting `pm2_5` / `pm10` (×10) once woken
    pub fn new(clock: &'a FixedTime, pm2_5: u16, pm10: u16) -> Self {
        Self {
            clock,
            working: false,
            next_push: 0,
            reading: SamplePair { pm2_5, pm10 },
            push_budget: None,
            stalled: false,
            outgoing: VecDeque::new(),
            commands: Vec::new(),
        }
    }

    /// Change what the sensor measures from the next push on
    pub fn set_reading(&mut self, pm2_5: u16, pm10: u16) {
        self.reading = SamplePair { pm2_5, pm10 };
    }

    /// Push only `frames` more measurement frames
    pub fn limit_pushes(&mut self, frames: usize) {
        self.push_budget = Some(frames);
    }

    /// Stop sending anything
    pub fn stall(&mut self) {
        self.stalled = true;
    }

    /// Queue raw bytes on the sensor's TX line
    pub fn inject(&mut self, bytes: &[u8]) {
        self.outgoing.extend(bytes.iter().copied());
    }

    /// Whether the laser is on
    pub fn is_working(&self) -> bool {
        self.working
    }

    /// Every command frame received, oldest first
    pub fn commands(&self) -> &[Vec<u8>] {
        &self.commands
    }

    /// Number of START commands received
    pub fn starts(&self) -> usize {
        self.commands.iter().filter(|c| c.as_slice() == START_COMMAND).count()
    }

    fn catch_up(&mut self) {
        let now = self.clock.now();

        while self.working && self.next_push <= now {
            self.next_push += PUSH_INTERVAL_MS;

            if let Some(budget) = self.push_budget.as_mut() {
                if *budget == 0 {
                    continue;
                }
                *budget -= 1;
            }

            let frame = Frame::measurement(self.reading.pm2_5, self.reading.pm10, DEVICE_ID);
            self.outgoing.extend(frame.to_bytes());
        }
    }
}

impl Transport for SimulatedSensor<'_> {
    type Error = ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.catch_up();
        self.commands.push(bytes.to_vec());

        if bytes == START_COMMAND {
            self.working = true;
            self.next_push = self.clock.now() + FIRST_PUSH_MS;
        } else if bytes == STOP_COMMAND {
            self.working = false;
        } else if bytes == VERSION_COMMAND {
            let [id_hi, id_lo] = DEVICE_ID.to_be_bytes();
            let reply = Frame::new(COMMAND_REPLY, [0x07, 18, 11, 16, id_hi, id_lo]);
            self.outgoing.extend(reply.to_bytes());
        }

        Ok(())
    }

    fn read(&mut self) -> nb::Result<u8, ()> {
        if self.stalled {
            return Err(nb::Error::WouldBlock);
        }

        self.catch_up();
        self.outgoing.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Delay that returns at once and sums the requested time
#[derive(Debug, Default)]
pub struct NoDelay {
    pub total_ms: u32,
}

impl Delay for NoDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
    }
}

/// Poll every `step_ms` until `until`, collecting every reported event
pub fn run_until<T: Transport>(
    sensor: &mut DutyCycleController<T, &FixedTime>,
    clock: &FixedTime,
    until: Timestamp,
    step_ms: u64,
) -> Vec<(Timestamp, PhaseEvent)> {
    let mut events = Vec::new();

    while clock.now() < until {
        clock.advance(step_ms);
        if let Some(event) = sensor.poll() {
            events.push((clock.now(), event));
        }
    }

    events
}

/// Poll every `step_ms` until the next working window closes
pub fn run_cycle<T: Transport>(
    sensor: &mut DutyCycleController<T, &FixedTime>,
    clock: &FixedTime,
    step_ms: u64,
) -> PhaseEvent {
    // Generous bound so a broken controller fails the test instead of hanging
    let deadline = clock.now() + 24 * 60 * 60 * 1_000;

    while clock.now() < deadline {
        clock.advance(step_ms);
        match sensor.poll() {
            Some(PhaseEvent::Started) | None => {}
            Some(event) => return event,
        }
    }

    panic!("no working window closed within a day of simulated time");
}
