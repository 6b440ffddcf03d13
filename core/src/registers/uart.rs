//! UART peripheral: console-backed transmit/receive.

use std::io::Write;

use super::{RegisterFile, SharedRegisterFile, flat_index, sfr};
use crate::log;
use crate::log::{LogLevel, Logger};

impl RegisterFile {
    /// Write to TXREG: emit the byte to the host's stdout and flush
    /// immediately. TXIF is left set — it was already raised by
    /// `uart_write_txsta` when TXEN went high, and transmission here is
    /// synchronous, so there's no separate completion event to clear it.
    pub(crate) fn uart_write_txreg(&mut self, data: u8) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(&[data]);
        let _ = stdout.flush();
    }

    /// Write to TXSTA: store the byte; if TXEN is newly set, raise PIR1.TXIF.
    pub(crate) fn uart_write_txsta(&mut self, data: u8, logger: &Logger) {
        if data & sfr::txsta_bits::TXEN != 0 {
            let pir1 = self.direct_read(sfr::BANK_0, sfr::PIR1, logger);
            self.direct_write(sfr::BANK_0, sfr::PIR1, pir1 | sfr::pir1_bits::TXIF, logger);
        }
        self.data[flat_index(sfr::BANK_1, sfr::TXSTA)] = data;
    }

    /// Read from RCREG: return the stored byte and clear PIR1.RCIF.
    pub(crate) fn uart_read_rcreg(&mut self) -> u8 {
        let value = self.data[flat_index(sfr::BANK_0, sfr::RCREG)];
        let pir1 = self.data[flat_index(sfr::BANK_0, sfr::PIR1)];
        self.data[flat_index(sfr::BANK_0, sfr::PIR1)] = pir1 & !sfr::pir1_bits::RCIF;
        value
    }
}

/// Inject a byte received from the host console into RCREG and raise
/// PIR1.RCIF. Runs on the console-input actor, a different thread than the
/// CPU, so it must take the lock itself.
pub fn receive_byte(regs: &SharedRegisterFile, data: u8, logger: &Logger) {
    log!(logger, LogLevel::Debug, "received byte 0x{data:02X} from console");
    let mut rf = regs.lock().unwrap();
    rf.direct_write(sfr::BANK_0, sfr::RCREG, data, logger);
    let pir1 = rf.direct_read(sfr::BANK_0, sfr::PIR1, logger);
    rf.direct_write(sfr::BANK_0, sfr::PIR1, pir1 | sfr::pir1_bits::RCIF, logger);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn test_logger() -> Logger {
        Logger::open("/dev/null", LogLevel::Debug).unwrap()
    }

    #[test]
    fn txsta_sets_txif_only_when_txen_rises() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(1, sfr::TXSTA, 0x00, &logger);
        assert_eq!(rf.direct_read(0, sfr::PIR1, &logger) & sfr::pir1_bits::TXIF, 0);

        rf.direct_write(1, sfr::TXSTA, sfr::txsta_bits::TXEN, &logger);
        assert_ne!(rf.direct_read(0, sfr::PIR1, &logger) & sfr::pir1_bits::TXIF, 0);
    }

    #[test]
    fn reading_rcreg_clears_rcif_independently_of_txif() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(0, sfr::RCREG, 0x41, &logger);
        rf.direct_write(
            0,
            sfr::PIR1,
            sfr::pir1_bits::RCIF | sfr::pir1_bits::TXIF,
            &logger,
        );
        let value = rf.direct_read(0, sfr::RCREG, &logger);
        assert_eq!(value, 0x41);
        let pir1 = rf.direct_read(0, sfr::PIR1, &logger);
        assert_eq!(pir1 & sfr::pir1_bits::RCIF, 0);
        assert_ne!(pir1 & sfr::pir1_bits::TXIF, 0);
    }

    #[test]
    fn receive_byte_fills_rcreg_and_sets_rcif() {
        let regs: SharedRegisterFile = Arc::new(Mutex::new(RegisterFile::new()));
        let logger = test_logger();
        receive_byte(&regs, 0x7A, &logger);
        let mut rf = regs.lock().unwrap();
        assert_eq!(rf.direct_read(0, sfr::RCREG, &logger), 0x7A);
        assert_ne!(rf.direct_read(0, sfr::PIR1, &logger) & sfr::pir1_bits::RCIF, 0);
    }
}
