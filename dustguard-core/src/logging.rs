//! Optional logging shims
//!
//! The firmware reports through five debug levels. They map onto the `log`
//! facade as follows:
//!
//! | firmware level | macro        | used for                                  |
//! |----------------|--------------|-------------------------------------------|
//! | ERROR          | `log_error!` | transport failures                        |
//! | WARNING        | `log_warn!`  | dropped samples, rejected configuration   |
//! | MIN_INFO       | `log_info!`  | phase transitions, cycle summaries        |
//! | MED_INFO       | `log_debug!` | command hex dumps, bad terminators        |
//! | MAX_INFO       | `log_trace!` | byte-level parser trace                   |
//!
//! Without the `log` feature every macro expands to an empty block. The
//! arguments still type-check inside a dead branch, so bindings that only
//! feed a log line stay used and embedded builds carry no formatting code.
//! Either way a shim is an expression and can stand alone as a match arm.

#[cfg(feature = "log")]
macro_rules! log_error {
    ($($arg:tt)*) => { log::error!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(feature = "log")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
