//! Duty-Cycle Controller
//!
//! ## Overview
//!
//! The controller owns the sensor link and runs a two-phase schedule:
//!
//! ```text
//!              pause elapsed: START
//!   Sleeping ───────────────────────► Working ──┐ every sample interval:
//!      ▲                                 │ ◄────┘ decode one measurement
//!      │     working time elapsed: STOP  │
//!      └─────────────────────────────────┘
//!            statistics + result, or discard
//! ```
//!
//! The outer loop calls [`DutyCycleController::poll`] at least once every
//! [`MAX_POLL_GAP_MS`](crate::constants::schedule::MAX_POLL_GAP_MS). Every
//! call reads the clock once and performs at most one phase transition;
//! nothing in `poll` blocks.
//!
//! ## Timing
//!
//! Wake-ups follow a fixed grid: the phase timer moves forward by exactly
//! the pause when the sensor starts, so a late poll does not delay the next
//! cycle. The end of a working window is the opposite: the phase timer is
//! re-anchored at the moment STOP is sent, so a long working window shortens
//! nothing but itself.
//!
//! Sample ticks are anchored at the start of each working window and also
//! advance in fixed steps.
//!
//! ## Results
//!
//! A window that collected more samples than the skip count produces a new
//! [`CycleStatistics`], a result string and a diagnostic line. A window with
//! too few samples (a stalled link, a sensor that never woke up) is dropped
//! and the previous result stays in place.
//!
//! ## Schedule Changes
//!
//! [`set_schedule`](DutyCycleController::set_schedule) validates at once but
//! only takes effect at the next phase transition, so a window in progress
//! is always judged by the schedule it started with.

use alloc::string::String;

use crate::{
    accumulator::{SampleAccumulator, SamplePair},
    config::ScheduleConfig,
    constants::schedule::IDENTITY_SETTLE_MS,
    encoder,
    errors::{Error, Result},
    identity::DeviceIdentity,
    protocol::{command, Command, FrameDecoder},
    stats::CycleStatistics,
    time::{IntervalTimer, TimeSource, Timestamp},
    traits::{Delay, Transport},
};

/// Which half of the duty cycle the sensor is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Laser and fan off, waiting for the pause to elapse
    Sleeping,
    /// Laser and fan on, collecting samples
    Working,
}

/// Transition reported by one [`DutyCycleController::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// START was sent and a working window began
    Started,
    /// A working window ended with a new result
    Completed,
    /// A working window ended without enough samples
    Discarded {
        /// Samples collected before the window closed
        samples: usize,
    },
}

/// Top-level state machine for one SDS011 sensor
pub struct DutyCycleController<T: Transport, C: TimeSource> {
    transport: T,
    clock: C,
    decoder: FrameDecoder,
    accumulator: SampleAccumulator,

    schedule: ScheduleConfig,
    pending: Option<ScheduleConfig>,

    phase: Phase,
    phase_timer: IntervalTimer,
    sample_timer: IntervalTimer,

    result: String,
    diagnostic: String,
    statistics: Option<CycleStatistics>,
    latest: Option<SamplePair>,
    identity: Option<DeviceIdentity>,
}

impl<T: Transport, C: TimeSource> DutyCycleController<T, C> {
    /// Create a sleeping controller.
    ///
    /// The first working window starts one pause after construction. The
    /// schedule is used as given; run it through
    /// [`ScheduleConfig::validate`] first if it comes from outside.
    pub fn new(transport: T, clock: C, schedule: ScheduleConfig) -> Self {
        let now = clock.now();

        Self {
            transport,
            clock,
            decoder: FrameDecoder::new(),
            accumulator: SampleAccumulator::new(),
            schedule,
            pending: None,
            phase: Phase::Sleeping,
            phase_timer: IntervalTimer::new(now),
            sample_timer: IntervalTimer::new(now),
            result: String::new(),
            diagnostic: String::new(),
            statistics: None,
            latest: None,
            identity: None,
        }
    }

    /// Run one step of the state machine
    pub fn poll(&mut self) -> Option<PhaseEvent> {
        let now = self.clock.now();

        match self.phase {
            Phase::Sleeping => self.poll_sleeping(now),
            Phase::Working => self.poll_working(now),
        }
    }

    fn poll_sleeping(&mut self, now: Timestamp) -> Option<PhaseEvent> {
        if !self.phase_timer.fire_fixed(now, self.schedule.pause_ms) {
            return None;
        }

        self.send(command::start_frame(), "start");
        self.phase = Phase::Working;
        self.sample_timer.reset(self.phase_timer.anchor());
        self.apply_pending();

        log_info!("Sensor started at {}", now);
        Some(PhaseEvent::Started)
    }

    fn poll_working(&mut self, now: Timestamp) -> Option<PhaseEvent> {
        if self.sample_timer.fire_fixed(now, self.schedule.sample_interval_ms) {
            self.collect_sample();
        }

        if !self.phase_timer.expired(now, self.schedule.working_ms) {
            return None;
        }

        self.send(command::stop_frame(), "stop");
        self.phase = Phase::Sleeping;
        self.phase_timer.reset(now);

        let event = self.finish_window(now);
        self.accumulator.clear();
        self.apply_pending();

        Some(event)
    }

    fn collect_sample(&mut self) {
        let frame = match self.decoder.decode(&mut self.transport, Command::QueryData) {
            Ok(Some(frame)) => frame,
            // Nothing buffered, or a read failure the decoder already logged
            Ok(None) | Err(_) => return,
        };

        let sample = frame.sample();
        log_trace!("PM2.5 {} PM10 {}", sample.pm2_5, sample.pm10);

        match self.accumulator.push(sample) {
            Ok(()) => self.latest = Some(sample),
            Err(e) => {
                log_warn!("Sample dropped: {}", e);
            }
        }
    }

    fn finish_window(&mut self, now: Timestamp) -> PhaseEvent {
        let collected = self.accumulator.len();

        let stats = match CycleStatistics::compute(
            self.accumulator.pm2_5(),
            self.accumulator.pm10(),
            self.schedule.skip_count,
        ) {
            Some(stats) => stats,
            None => {
                log_info!(
                    "Sensor stopped at {}, {} samples not enough, result unchanged",
                    now,
                    collected
                );
                return PhaseEvent::Discarded { samples: collected };
            }
        };

        match encoder::encode_result(&stats) {
            Ok(text) => self.result = text,
            Err(e) => {
                log_error!("Keeping previous result: {}", e);
            }
        }

        self.diagnostic = encoder::diagnostic_line(now, &stats);
        self.statistics = Some(stats);

        log_info!("Sensor stopped at {}, {} samples", now, collected);
        log_info!("{}", self.diagnostic);
        PhaseEvent::Completed
    }

    fn send(&mut self, frame: &[u8], name: &'static str) {
        log_debug!("Send {} command: {:02x?}", name, frame);

        if let Err(e) = self.transport.write(frame) {
            log_error!("Sensor {} command failed: {:?}", name, e);
        }
    }

    fn apply_pending(&mut self) {
        if let Some(schedule) = self.pending.take() {
            log_info!(
                "Schedule now working {}ms, pause {}ms, interval {}ms, skip {}",
                schedule.working_ms,
                schedule.pause_ms,
                schedule.sample_interval_ms,
                schedule.skip_count
            );
            self.schedule = schedule;
        }
    }

    /// Ask the sensor for its firmware date and device ID.
    ///
    /// Blocks for the settle delay. The identity is also kept for
    /// [`device_identity`](Self::device_identity).
    pub fn query_identity<D: Delay>(&mut self, delay: &mut D) -> Result<DeviceIdentity> {
        let frame = command::version_frame();
        log_debug!("Send version command: {:02x?}", frame);

        if let Err(e) = self.transport.write(frame) {
            log_error!("Sensor version command failed: {:?}", e);
            return Err(Error::Transport { operation: "write" });
        }

        delay.delay_ms(IDENTITY_SETTLE_MS);

        let identity = self
            .decoder
            .decode(&mut self.transport, Command::FirmwareVersion)?
            .as_ref()
            .and_then(DeviceIdentity::from_frame)
            .ok_or(Error::NoResponse)?;

        log_info!("{}", identity);
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Replace the schedule from the next phase transition on
    pub fn set_schedule(
        &mut self,
        working_ms: u32,
        pause_ms: u32,
        sample_interval_ms: u32,
        skip_count: usize,
    ) -> Result<()> {
        self.set_schedule_config(ScheduleConfig {
            working_ms,
            pause_ms,
            sample_interval_ms,
            skip_count,
        })
    }

    /// Replace the schedule from the next phase transition on
    pub fn set_schedule_config(&mut self, schedule: ScheduleConfig) -> Result<()> {
        if let Err(e) = schedule.validate() {
            log_warn!("Schedule rejected: {}", e);
            return Err(e);
        }

        self.pending = Some(schedule);
        Ok(())
    }

    /// Result entries of the last completed window, empty before the first
    pub fn result_text(&self) -> &str {
        &self.result
    }

    /// Diagnostic line of the last completed window, empty before the first
    pub fn diagnostic_line(&self) -> &str {
        &self.diagnostic
    }

    /// Statistics of the last completed window
    pub fn last_statistics(&self) -> Option<&CycleStatistics> {
        self.statistics.as_ref()
    }

    /// Most recent accepted sample
    pub fn latest_sample(&self) -> Option<SamplePair> {
        self.latest
    }

    /// Samples collected so far in the current window
    pub fn sample_count(&self) -> usize {
        self.accumulator.len()
    }

    /// Identity from the last successful [`query_identity`](Self::query_identity)
    pub fn device_identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Schedule in force
    pub fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    /// Schedule waiting for the next transition
    pub fn pending_schedule(&self) -> Option<&ScheduleConfig> {
        self.pending.as_ref()
    }

    /// Frame decoder counters
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Underlying sensor link
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying sensor link, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::buffers::SAMPLE_CAPACITY;
    use crate::constants::protocol::{COMMAND_REPLY, START_COMMAND, STOP_COMMAND, VERSION_COMMAND};
    use crate::protocol::Frame;
    use crate::time::FixedTime;
    use alloc::{collections::VecDeque, vec::Vec};

    #[derive(Default)]
    struct Link {
        incoming: VecDeque<u8>,
        written: Vec<Vec<u8>>,
        fail_writes: bool,
        fail_reads: usize,
    }

    impl Link {
        fn push_frame(&mut self, frame: Frame) {
            self.incoming.extend(frame.to_bytes());
        }
    }

    impl Transport for Link {
        type Error = ();

        fn write(&mut self, bytes: &[u8]) -> core::result::Result<(), ()> {
            if self.fail_writes {
                return Err(());
            }
            self.written.push(bytes.to_vec());
            Ok(())
        }

        fn read(&mut self) -> nb::Result<u8, ()> {
            if self.fail_reads > 0 {
                self.fail_reads -= 1;
                return Err(nb::Error::Other(()));
            }
            self.incoming.pop_front().ok_or(nb::Error::WouldBlock)
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        total_ms: u32,
    }

    impl Delay for RecordingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    /// 5s working, 1s pause, 1s sampling, skip 1
    fn short_schedule() -> ScheduleConfig {
        ScheduleConfig::new(5_000, 1_000, 1_000, 1).unwrap()
    }

    #[test]
    fn starts_asleep_and_wakes_after_pause() {
        let clock = FixedTime::new(0);
        let mut sensor = DutyCycleController::new(Link::default(), &clock, short_schedule());
        assert_eq!(sensor.phase(), Phase::Sleeping);

        clock.set(1_000);
        assert_eq!(sensor.poll(), None);
        assert!(sensor.transport().written.is_empty());

        clock.set(1_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));
        assert_eq!(sensor.phase(), Phase::Working);
        assert_eq!(sensor.transport().written, [START_COMMAND.to_vec()]);
    }

    #[test]
    fn working_window_produces_result() {
        let clock = FixedTime::new(0);
        let mut link = Link::default();
        for _ in 0..6 {
            link.push_frame(Frame::measurement(125, 250, 0xA160));
        }
        let mut sensor = DutyCycleController::new(link, &clock, short_schedule());

        clock.set(1_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));

        // Samples at 2001..5001, the fifth one and STOP at 6001
        for t in [2_001, 3_001, 4_001, 5_001] {
            clock.set(t);
            assert_eq!(sensor.poll(), None);
        }
        assert_eq!(sensor.sample_count(), 4);

        clock.set(6_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Completed));
        assert_eq!(sensor.phase(), Phase::Sleeping);
        assert_eq!(sensor.sample_count(), 0);
        assert_eq!(sensor.transport().written.last(), Some(&STOP_COMMAND.to_vec()));

        assert_eq!(
            sensor.result_text(),
            r#"{"value_type":"SDS_P1","value":"25.00"},{"value_type":"SDS_P2","value":"12.50"},"#
        );
        let stats = sensor.last_statistics().unwrap();
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.pm2_5.std_dev, 0.0);
        assert!(sensor.diagnostic_line().starts_with("6001\t4\t12.50\t25.00"));
        assert_eq!(sensor.latest_sample(), Some(SamplePair { pm2_5: 125, pm10: 250 }));
    }

    #[test]
    fn read_failure_skips_one_tick() {
        let clock = FixedTime::new(0);
        let mut link = Link::default();
        for _ in 0..6 {
            link.push_frame(Frame::measurement(125, 250, 0xA160));
        }
        let mut sensor = DutyCycleController::new(link, &clock, short_schedule());

        clock.set(1_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));
        clock.set(2_001);
        sensor.poll();
        assert_eq!(sensor.sample_count(), 1);

        sensor.transport_mut().fail_reads = 1;
        clock.set(3_001);
        assert_eq!(sensor.poll(), None);
        assert_eq!(sensor.sample_count(), 1);
        assert_eq!(sensor.phase(), Phase::Working);

        for t in [4_001, 5_001] {
            clock.set(t);
            sensor.poll();
        }
        assert_eq!(sensor.sample_count(), 3);

        clock.set(6_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Completed));
        assert_eq!(sensor.last_statistics().unwrap().samples, 3);
        assert_eq!(sensor.decoder().frames_decoded(), 4);
    }

    #[test]
    fn partial_interval_window_fits_buffer() {
        // Polls just after each interval boundary catch a tick on the poll
        // that ends the window: 999.5 intervals take 1000 samples
        let clock = FixedTime::new(0);
        let mut link = Link::default();
        for _ in 0..SAMPLE_CAPACITY + 10 {
            link.push_frame(Frame::measurement(125, 250, 0xA160));
        }
        let schedule = ScheduleConfig::new(999_500, 0, 1_000, 1).unwrap();
        let mut sensor = DutyCycleController::new(link, &clock, schedule);

        clock.set(1);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));

        let mut event = None;
        while event.is_none() {
            clock.advance(1_000);
            event = sensor.poll();
        }

        assert_eq!(clock.now(), 1_000_001);
        assert_eq!(event, Some(PhaseEvent::Completed));
        assert_eq!(sensor.decoder().frames_decoded(), SAMPLE_CAPACITY as u32);
        assert_eq!(sensor.last_statistics().unwrap().samples, SAMPLE_CAPACITY - 1);

        // Half an interval more would overflow on the same polling pattern
        assert!(matches!(
            sensor.set_schedule(1_000_500, 0, 1_000, 1),
            Err(Error::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn silent_sensor_discards_window() {
        let clock = FixedTime::new(0);
        let mut sensor = DutyCycleController::new(Link::default(), &clock, short_schedule());

        clock.set(1_001);
        sensor.poll();
        for t in (2_001..=6_001).step_by(1_000) {
            clock.set(t);
            sensor.poll();
        }

        assert_eq!(sensor.phase(), Phase::Sleeping);
        assert_eq!(sensor.result_text(), "");
        assert!(sensor.last_statistics().is_none());
    }

    #[test]
    fn discard_reports_sample_count() {
        let clock = FixedTime::new(0);
        let mut link = Link::default();
        link.push_frame(Frame::measurement(10, 20, 1));
        let mut sensor = DutyCycleController::new(link, &clock, short_schedule());

        clock.set(1_001);
        sensor.poll();
        clock.set(2_001);
        sensor.poll();
        assert_eq!(sensor.sample_count(), 1);

        clock.set(6_500);
        // 6500 is also a sample tick, but nothing more is buffered
        assert_eq!(sensor.poll(), Some(PhaseEvent::Discarded { samples: 1 }));
    }

    #[test]
    fn sleep_restarts_from_stop_time() {
        let clock = FixedTime::new(0);
        let mut sensor = DutyCycleController::new(Link::default(), &clock, short_schedule());

        clock.set(1_001);
        sensor.poll();
        // Polled late: STOP goes out at 8000 instead of 6001
        clock.set(8_000);
        assert!(matches!(sensor.poll(), Some(PhaseEvent::Discarded { .. })));

        clock.set(9_000);
        assert_eq!(sensor.poll(), None);
        clock.set(9_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));
    }

    #[test]
    fn schedule_change_waits_for_transition() {
        let clock = FixedTime::new(0);
        let mut sensor = DutyCycleController::new(Link::default(), &clock, short_schedule());

        sensor.set_schedule(10_000, 2_000, 500, 2).unwrap();
        assert_eq!(sensor.schedule(), &short_schedule());
        assert!(sensor.pending_schedule().is_some());

        clock.set(1_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));
        assert_eq!(sensor.schedule().working_ms, 10_000);
        assert!(sensor.pending_schedule().is_none());
    }

    #[test]
    fn invalid_schedule_is_rejected() {
        let clock = FixedTime::new(0);
        let mut sensor = DutyCycleController::new(Link::default(), &clock, short_schedule());

        assert!(matches!(
            sensor.set_schedule(5_000, 1_000, 0, 1),
            Err(Error::InvalidSchedule { .. })
        ));
        assert!(sensor.pending_schedule().is_none());
    }

    #[test]
    fn failed_writes_do_not_stall_cycle() {
        let clock = FixedTime::new(0);
        let link = Link { fail_writes: true, ..Link::default() };
        let mut sensor = DutyCycleController::new(link, &clock, short_schedule());

        clock.set(1_001);
        assert_eq!(sensor.poll(), Some(PhaseEvent::Started));
        clock.set(6_002);
        assert!(matches!(sensor.poll(), Some(PhaseEvent::Discarded { .. })));
        assert_eq!(sensor.phase(), Phase::Sleeping);
    }

    #[test]
    fn identity_query() {
        let clock = FixedTime::new(0);
        let mut link = Link::default();
        // A measurement push ahead of the reply is skipped
        link.push_frame(Frame::measurement(1, 2, 3));
        link.push_frame(Frame::new(COMMAND_REPLY, [0x07, 18, 11, 16, 0xA1, 0x60]));
        let mut sensor = DutyCycleController::new(link, &clock, ScheduleConfig::default());
        let mut delay = RecordingDelay::default();

        let identity = sensor.query_identity(&mut delay).unwrap();
        assert_eq!(identity.firmware(), "2018.11.16");
        assert_eq!(identity.device_id(), 0xA160);
        assert_eq!(sensor.device_identity(), Some(&identity));
        assert_eq!(delay.total_ms, IDENTITY_SETTLE_MS);
        assert_eq!(sensor.transport().written, [VERSION_COMMAND.to_vec()]);
    }

    #[test]
    fn identity_query_without_reply() {
        let clock = FixedTime::new(0);
        let mut sensor =
            DutyCycleController::new(Link::default(), &clock, ScheduleConfig::default());

        assert_eq!(
            sensor.query_identity(&mut RecordingDelay::default()),
            Err(Error::NoResponse)
        );
        assert!(sensor.device_identity().is_none());
    }

    #[test]
    fn identity_query_write_failure() {
        let clock = FixedTime::new(0);
        let link = Link { fail_writes: true, ..Link::default() };
        let mut sensor = DutyCycleController::new(link, &clock, ScheduleConfig::default());

        assert_eq!(
            sensor.query_identity(&mut RecordingDelay::default()),
            Err(Error::Transport { operation: "write" })
        );
    }
}
