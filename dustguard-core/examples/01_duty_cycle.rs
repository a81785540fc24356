//! Duty-Cycle Example
//!
//! Runs the controller against a simulated SDS011 on a simulated clock, so
//! a few minutes of sensor operation finish instantly.
//!
//! ## What You'll Learn
//!
//! - Implementing `Transport` for your serial link
//! - Driving the controller from an outer poll loop
//! - Reading results, diagnostics and the device identity
//! - Changing the schedule while the sensor runs
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_duty_cycle
//! ```

use std::collections::VecDeque;

use dustguard_core::{
    constants::{protocol::COMMAND_REPLY, START_COMMAND, STOP_COMMAND, VERSION_COMMAND},
    time::{FixedTime, TimeSource},
    Delay, DutyCycleController, Frame, PhaseEvent, ScheduleConfig, Transport,
};

/// Stand-in for the UART: a sensor that pushes one frame per second while
/// working, with readings slowly rising
struct FakeSds011<'a> {
    clock: &'a FixedTime,
    working: bool,
    next_push: u64,
    pm2_5: u16,
    tx: VecDeque<u8>,
}

impl Transport for FakeSds011<'_> {
    type Error = ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
        if bytes == START_COMMAND {
            self.working = true;
            self.next_push = self.clock.now() + 1_000;
        } else if bytes == STOP_COMMAND {
            self.working = false;
        } else if bytes == VERSION_COMMAND {
            let reply = Frame::new(COMMAND_REPLY, [0x07, 18, 11, 16, 0xA1, 0x60]);
            self.tx.extend(reply.to_bytes());
        }
        Ok(())
    }

    fn read(&mut self) -> nb::Result<u8, ()> {
        while self.working && self.next_push <= self.clock.now() {
            self.next_push += 1_000;
            self.pm2_5 += 3;
            let frame = Frame::measurement(self.pm2_5, self.pm2_5 * 2, 0xA160);
            self.tx.extend(frame.to_bytes());
        }
        self.tx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Advances the simulated clock instead of sleeping
struct SimulatedDelay<'a>(&'a FixedTime);

impl Delay for SimulatedDelay<'_> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(u64::from(ms));
    }
}

fn main() {
    println!("DustGuard Duty-Cycle Example");
    println!("============================\n");

    let clock = FixedTime::new(0);
    let uart = FakeSds011 {
        clock: &clock,
        working: false,
        next_push: 0,
        pm2_5: 100,
        tx: VecDeque::new(),
    };

    // 20s working, 40s pause: short enough to watch a few cycles
    let schedule = ScheduleConfig::new(20_000, 40_000, 1_000, 1).expect("valid schedule");
    println!("Schedule: {:?}", schedule);
    println!("Duty cycle: {:.0}%\n", schedule.duty_cycle() * 100.0);

    let mut sensor = DutyCycleController::new(uart, &clock, schedule);

    match sensor.query_identity(&mut SimulatedDelay(&clock)) {
        Ok(identity) => println!("{}\n", identity),
        Err(e) => println!("Identity query failed: {}\n", e),
    }

    // The outer loop: poll every 250ms for five simulated minutes
    while clock.now() < 5 * 60 * 1_000 {
        clock.advance(250);

        match sensor.poll() {
            Some(PhaseEvent::Started) => {
                println!("[{:>6}ms] sensor started", clock.now());
            }
            Some(PhaseEvent::Completed) => {
                println!("[{:>6}ms] cycle complete", clock.now());
                println!("  result:     {}", sensor.result_text());
                println!("  diagnostic: {}", sensor.diagnostic_line());
            }
            Some(PhaseEvent::Discarded { samples }) => {
                println!("[{:>6}ms] cycle discarded ({} samples)", clock.now(), samples);
            }
            None => {}
        }

        // Halfway through, switch to a longer window
        if clock.now() == 150_000 {
            match sensor.set_schedule(30_000, 60_000, 1_000, 3) {
                Ok(()) => println!("[{:>6}ms] schedule change queued", clock.now()),
                Err(e) => println!("Schedule rejected: {}", e),
            }
        }
    }

    if let Some(stats) = sensor.last_statistics() {
        println!("\nLast cycle: {} samples", stats.samples);
        println!(
            "  PM2.5 mean {:.2} µg/m³, trend {:+.2} per sample",
            stats.pm2_5.mean, stats.pm2_5.slope
        );
        println!(
            "  PM10  mean {:.2} µg/m³, trend {:+.2} per sample",
            stats.pm10.mean, stats.pm10.slope
        );
    }
}
