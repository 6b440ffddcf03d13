//! EEPROM backing-file load/save: exactly 4096 bytes, read at startup and
//! rewritten in full at shutdown, matching spec section 6's EEPROM file
//! format.

use std::fs;

use tgs_core::error::EmulatorError;
use tgs_core::registers::EEPROM_SIZE;

/// Read `path` and require it to be exactly [`EEPROM_SIZE`] bytes. A short
/// or long file is a config error, not something to pad or truncate.
pub fn load(path: &str) -> Result<[u8; EEPROM_SIZE], EmulatorError> {
    let bytes = fs::read(path)?;
    if bytes.len() != EEPROM_SIZE {
        return Err(EmulatorError::EepromFileSize { expected: EEPROM_SIZE, actual: bytes.len() });
    }
    let mut buffer = [0u8; EEPROM_SIZE];
    buffer.copy_from_slice(&bytes);
    Ok(buffer)
}

/// Rewrite the full EEPROM contents back to `path`.
pub fn save(path: &str, contents: &[u8; EEPROM_SIZE]) -> Result<(), EmulatorError> {
    fs::write(path, contents)?;
    Ok(())
}
