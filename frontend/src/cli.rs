//! Positional argument parsing for the `tgs` binary.
//!
//! `prog LOG_FILE LOG_LEVEL PROGRAM_HEX_FILE EEPROM_FILE`, matched with
//! plain `args.get(n)` the way `phosphor-frontend`'s own `main()` parses its
//! `<machine> <rom-path> [--scale N]` line — no argument-parsing crate.

pub struct Args {
    pub log_file: String,
    pub log_level: String,
    pub program_hex_file: String,
    pub eeprom_file: String,
}

const USAGE: &str = "Usage: tgs LOG_FILE LOG_LEVEL PROGRAM_HEX_FILE EEPROM_FILE\n\
  LOG_FILE : the file that will contain all logs.\n\
  LOG_LEVEL : how much log to write (error = 0, warning = 1, debug = 2).\n\
  PROGRAM_HEX_FILE : an Intel HEX file containing the program code.\n\
  EEPROM_FILE : a 4096-byte file backing the I2C EEPROM.";

/// Parse `args` (as returned by `std::env::args().collect()`). Returns
/// `Err` with a usage message on argument count mismatch, the same
/// disposition the original binary gives a bad invocation.
pub fn parse(args: &[String]) -> Result<Args, String> {
    if args.len() != 5 {
        return Err(USAGE.to_string());
    }
    Ok(Args {
        log_file: args[1].clone(),
        log_level: args[2].clone(),
        program_hex_file: args[3].clone(),
        eeprom_file: args[4].clone(),
    })
}
