//! Instruction-accurate emulation core for a PIC16F876-class 8-bit
//! microcontroller: the fetch/decode/execute unit, the banked register
//! file, Flash program memory, and the peripherals (UART, Timer, ADC,
//! I2C EEPROM) that observe and drive it through the same callback
//! dispatch the register file exposes.
//!
//! This crate is the emulated chip. Everything host-side — CLI parsing,
//! the Intel-HEX loader, raw-mode console handling, and EEPROM file
//! persistence — lives in the `tgs-frontend` binary crate and talks to
//! this one only through [`memory::ProgramMemory`], [`registers::RegisterFile`],
//! and [`cpu::Cpu`].

pub mod cpu;
pub mod error;
pub mod log;
pub mod memory;
pub mod registers;

pub use cpu::Cpu;
pub use error::EmulatorError;
pub use log::{LogLevel, Logger};
pub use memory::ProgramMemory;
pub use registers::{RegisterFile, SharedRegisterFile};
