//! Collaborator traits
//!
//! The core never touches hardware directly. Whatever owns the UART and the
//! delay source implements these and hands them in, which is also how tests
//! substitute a simulated sensor.

/// Byte-stream link to the sensor (the SDS011 UART)
///
/// Reads follow the `nb` convention of embedded serial drivers:
/// - `Ok(byte)` - a byte was available
/// - `Err(nb::Error::WouldBlock)` - nothing buffered right now
/// - `Err(nb::Error::Other(e))` - the link failed
///
/// ## Example Implementation
///
/// ```rust
/// use dustguard_core::Transport;
///
/// struct Loopback {
///     buffer: Vec<u8>,
/// }
///
/// impl Transport for Loopback {
///     type Error = ();
///
///     fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
///         self.buffer.extend_from_slice(bytes);
///         Ok(())
///     }
///
///     fn read(&mut self) -> nb::Result<u8, ()> {
///         if self.buffer.is_empty() {
///             Err(nb::Error::WouldBlock)
///         } else {
///             Ok(self.buffer.remove(0))
///         }
///     }
/// }
/// ```
pub trait Transport {
    /// Link-level error type
    type Error: core::fmt::Debug;

    /// Write a complete command frame
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read one byte without blocking
    fn read(&mut self) -> nb::Result<u8, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        (**self).read()
    }
}

/// Blocking millisecond delay
///
/// Only used by the on-demand identity query, which has to give the sensor
/// time to answer before reading.
pub trait Delay {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Thread-sleep delay (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
