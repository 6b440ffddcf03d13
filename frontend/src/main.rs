//! Entry point for the `tgs` binary: parse the four positional arguments,
//! open the log sink, load program Flash and the EEPROM backing file, then
//! hand off to the orchestrator. Exits 0 on orderly shutdown (Ctrl-C on the
//! console), non-zero on any initialization failure, matching spec section
//! 6's CLI contract.

mod cli;
mod console;
mod eeprom_file;
mod hex;
mod orchestrator;

use std::sync::{Arc, Mutex};

use tgs_core::log::{LogLevel, Logger};
use tgs_core::memory::ProgramMemory;
use tgs_core::registers::RegisterFile;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let parsed = match cli::parse(&args) {
        Ok(parsed) => parsed,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(1);
        }
    };

    let log_level = match LogLevel::from_arg(&parsed.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let logger = match Logger::open(&parsed.log_file, log_level) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("failed to open log file '{}': {e}", parsed.log_file);
            std::process::exit(1);
        }
    };

    let hex_contents = match std::fs::read_to_string(&parsed.program_hex_file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("failed to read program HEX file '{}': {e}", parsed.program_hex_file);
            std::process::exit(1);
        }
    };

    let mut program_memory = ProgramMemory::new();
    if let Err(e) = hex::load_into(&mut program_memory, &hex_contents) {
        eprintln!("failed to load program HEX file: {e}");
        std::process::exit(1);
    }

    let eeprom_contents = match eeprom_file::load(&parsed.eeprom_file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("failed to load EEPROM file '{}': {e}", parsed.eeprom_file);
            std::process::exit(1);
        }
    };

    let mut register_file = RegisterFile::new();
    register_file.eeprom_load(&eeprom_contents);
    let regs = Arc::new(Mutex::new(register_file));

    orchestrator::run(program_memory, Arc::clone(&regs), Arc::clone(&logger));

    let snapshot = regs.lock().unwrap().eeprom_snapshot();
    if let Err(e) = eeprom_file::save(&parsed.eeprom_file, &snapshot) {
        eprintln!("failed to write EEPROM file '{}': {e}", parsed.eeprom_file);
        std::process::exit(1);
    }
}
