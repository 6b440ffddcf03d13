//! Error types surfaced to the orchestrator.
//!
//! Only configuration/IO failures reach here as `Result`s. Programming bugs
//! in the emulated firmware (stack wrap, unknown opcode, out-of-range Flash
//! read) are logged as warnings and recovered from in place; emulator-internal
//! invariant violations (bank/address out of range, an impossible EEPROM
//! state) panic after logging an error, since by definition nothing sensible
//! can continue.

use std::fmt;

/// Configuration and I/O failures, returned by the orchestrator's `run()`.
#[derive(Debug)]
pub enum EmulatorError {
    Io(std::io::Error),
    HexParse { line: usize, reason: String },
    HexAddressOutOfRange { word_address: u16 },
    EepromFileSize { expected: usize, actual: usize },
    InvalidLogLevel(String),
}

impl fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::HexParse { line, reason } => write!(f, "HEX parse error at line {line}: {reason}"),
            Self::HexAddressOutOfRange { word_address } => {
                write!(f, "HEX record addresses word 0x{word_address:04X}, past program memory")
            }
            Self::EepromFileSize { expected, actual } => {
                write!(f, "EEPROM file: expected {expected} bytes, got {actual}")
            }
            Self::InvalidLogLevel(s) => write!(f, "invalid log level '{s}', expected 0, 1, or 2"),
        }
    }
}

impl std::error::Error for EmulatorError {}

impl From<std::io::Error> for EmulatorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
