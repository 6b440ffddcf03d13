//! The banked register file: a 4x128 byte matrix with per-cell read/write
//! dispatch, bank aliasing, indirect addressing, and interrupt arbitration.
//!
//! Each cell is tagged with a `CellKind` describing how it behaves on
//! access: a plain owned byte, an alias forwarding to another `(bank, addr)`
//! pair, indirect-through-(IRP:FSR) addressing, or a peripheral hook that
//! runs a side effect alongside the plain read/write. `data` is the flat
//! backing array every cell ultimately reads or writes through.
//!
//! The file also owns the peripheral-private state that writes to
//! SSPBUF/SSPCON2/ADCON0/TXREG/TXSTA/RCREG drive (the EEPROM's 4KiB array
//! and protocol cursor, the ADC's PRNG, the timer's prescaler) so the hooks
//! those writes trigger can reach it without a second lock — see DESIGN.md
//! for why each peripheral's private state lives here rather than behind
//! its own independently-locked object.

mod adc;
mod eeprom;
mod timer;
mod uart;

pub mod sfr;

pub use eeprom::EEPROM_SIZE;
pub use uart::receive_byte;

use std::sync::{Arc, Mutex};

use crate::log;
use crate::log::{LogLevel, Logger};

/// Shared handle used by the console-input actor (`Uart::receive_byte`) to
/// reach the register file from a different thread than the CPU.
pub type SharedRegisterFile = Arc<Mutex<RegisterFile>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PeripheralCell {
    Txsta,
    Txreg,
    Rcreg,
    Adcon0,
    Sspcon2,
    Sspbuf,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum CellKind {
    /// Owns its byte directly in `data`.
    Plain,
    /// Forwards to another cell's slot in `data`.
    Alias { bank: u8, addr: u8 },
    /// INDF: forwards through (IRP:FSR), computed per access.
    Indirect,
    /// Owns its byte in `data` like `Plain`, but the write additionally runs
    /// a peripheral side effect.
    Peripheral(PeripheralCell),
}

pub struct RegisterFile {
    data: [u8; sfr::BANK_COUNT as usize * sfr::REGISTERS_PER_BANK],
    kinds: [[CellKind; sfr::REGISTERS_PER_BANK]; sfr::BANK_COUNT as usize],
    pub(crate) eeprom: eeprom::EepromState,
    pub(crate) timer: timer::TimerState,
    pub(crate) adc: adc::AdcState,
}

pub(crate) fn flat_index(bank: u8, addr: u8) -> usize {
    bank as usize * sfr::REGISTERS_PER_BANK + addr as usize
}

impl RegisterFile {
    pub fn new() -> Self {
        let mut file = Self {
            data: [0; sfr::BANK_COUNT as usize * sfr::REGISTERS_PER_BANK],
            kinds: [[CellKind::Plain; sfr::REGISTERS_PER_BANK]; sfr::BANK_COUNT as usize],
            eeprom: eeprom::EepromState::new(),
            timer: timer::TimerState::new(),
            adc: adc::AdcState::new(),
        };
        file.initialize();
        file
    }

    fn alias_to_bank0(&mut self, addr: u8) {
        for bank in sfr::BANK_1..sfr::BANK_COUNT {
            self.kinds[bank as usize][addr as usize] = CellKind::Alias {
                bank: sfr::BANK_0,
                addr,
            };
        }
    }

    /// Initialization policy, applied once at construction.
    fn initialize(&mut self) {
        // (1) every cell starts as plain RAM with zero content — already true
        // from the struct's zeroed `data` and `CellKind::Plain` default.

        // (2) INDF cells in all four banks.
        for bank in sfr::BANK_0..sfr::BANK_COUNT {
            self.kinds[bank as usize][sfr::INDF as usize] = CellKind::Indirect;
        }

        // (3) PCL/STATUS/FSR/PCLATH/INTCON in banks 1-3 alias bank 0.
        for &addr in &[sfr::PCL, sfr::STATUS, sfr::FSR, sfr::PCLATH, sfr::INTCON] {
            self.alias_to_bank0(addr);
        }

        // (4) TMR0 (bank 2) -> bank 0 addr 0x01; OPTION_REG (bank 3) -> bank 1 addr 0x01.
        self.kinds[sfr::BANK_2 as usize][sfr::TMR0 as usize] = CellKind::Alias {
            bank: sfr::BANK_0,
            addr: sfr::TMR0,
        };
        self.kinds[sfr::BANK_3 as usize][sfr::OPTION_REG as usize] = CellKind::Alias {
            bank: sfr::BANK_1,
            addr: sfr::OPTION_REG,
        };

        // (5) 0x70..0x7F in banks 1-3 alias bank 0.
        for addr in sfr::COMMON_RAM_START..=sfr::COMMON_RAM_END {
            self.alias_to_bank0(addr);
        }

        // (6) STATUS initial byte.
        self.data[flat_index(sfr::BANK_0, sfr::STATUS)] = sfr::status_bits::POWER_ON_RESET;

        // (7) peripheral hooks.
        self.kinds[sfr::BANK_1 as usize][sfr::TXSTA as usize] = CellKind::Peripheral(PeripheralCell::Txsta);
        self.kinds[sfr::BANK_0 as usize][sfr::TXREG as usize] = CellKind::Peripheral(PeripheralCell::Txreg);
        self.kinds[sfr::BANK_0 as usize][sfr::RCREG as usize] = CellKind::Peripheral(PeripheralCell::Rcreg);
        self.kinds[sfr::BANK_0 as usize][sfr::ADCON0 as usize] = CellKind::Peripheral(PeripheralCell::Adcon0);
        self.kinds[sfr::BANK_1 as usize][sfr::SSPCON2 as usize] = CellKind::Peripheral(PeripheralCell::Sspcon2);
        self.kinds[sfr::BANK_0 as usize][sfr::SSPBUF as usize] = CellKind::Peripheral(PeripheralCell::Sspbuf);
    }

    fn current_bank(&self) -> u8 {
        (self.data[flat_index(sfr::BANK_0, sfr::STATUS)] >> 5) & 0x03
    }

    /// Read at `addr` in the bank selected by STATUS<6:5>. `addr` must be < 128.
    pub fn banked_read(&mut self, addr: u8, logger: &Logger) -> u8 {
        let bank = self.current_bank();
        self.direct_read(bank, addr, logger)
    }

    /// Write at `addr` in the bank selected by STATUS<6:5>. `addr` must be < 128.
    pub fn banked_write(&mut self, addr: u8, value: u8, logger: &Logger) {
        let bank = self.current_bank();
        self.direct_write(bank, addr, value, logger);
    }

    /// Read at an explicit `(bank, addr)`, unconditionally. `bank` must be <
    /// 4 and `addr` must be < 128 — these are emulator-internal invariants,
    /// not guest-programmable values, so a violation is fatal.
    pub fn direct_read(&mut self, bank: u8, addr: u8, logger: &Logger) -> u8 {
        assert!(
            (bank as usize) < sfr::BANK_COUNT as usize && (addr as usize) < sfr::REGISTERS_PER_BANK,
            "register file access out of range: bank={bank}, addr=0x{addr:02X}"
        );
        match self.kinds[bank as usize][addr as usize] {
            CellKind::Plain => self.data[flat_index(bank, addr)],
            CellKind::Alias {
                bank: target_bank,
                addr: target_addr,
            } => self.data[flat_index(target_bank, target_addr)],
            CellKind::Indirect => self.indirect_read(logger),
            CellKind::Peripheral(cell) => self.peripheral_read(cell, bank, addr),
        }
    }

    /// Write at an explicit `(bank, addr)`, unconditionally.
    pub fn direct_write(&mut self, bank: u8, addr: u8, value: u8, logger: &Logger) {
        assert!(
            (bank as usize) < sfr::BANK_COUNT as usize && (addr as usize) < sfr::REGISTERS_PER_BANK,
            "register file access out of range: bank={bank}, addr=0x{addr:02X}"
        );
        match self.kinds[bank as usize][addr as usize] {
            CellKind::Plain => self.data[flat_index(bank, addr)] = value,
            CellKind::Alias {
                bank: target_bank,
                addr: target_addr,
            } => self.data[flat_index(target_bank, target_addr)] = value,
            CellKind::Indirect => self.indirect_write(value, logger),
            CellKind::Peripheral(cell) => self.peripheral_write(cell, bank, addr, value, logger),
        }
    }

    /// (IRP:FSR) -> (bank, addr): IRP and FSR<7> select one of the four
    /// banks, FSR<6:0> selects the address within it.
    fn indirect_target(&self) -> (u8, u8) {
        let status = self.data[flat_index(sfr::BANK_0, sfr::STATUS)];
        let irp = (status & sfr::status_bits::IRP) != 0;
        let fsr = self.data[flat_index(sfr::BANK_0, sfr::FSR)];
        let bank = ((irp as u8) << 1) | ((fsr >> 7) & 1);
        (bank, fsr & 0x7F)
    }

    fn indirect_read(&mut self, logger: &Logger) -> u8 {
        let (bank, addr) = self.indirect_target();
        self.direct_read(bank, addr, logger)
    }

    fn indirect_write(&mut self, value: u8, logger: &Logger) {
        let (bank, addr) = self.indirect_target();
        self.direct_write(bank, addr, value, logger);
    }

    /// Print the 128x4 matrix to the log sink at Debug level.
    pub fn dump(&mut self, logger: &Logger) {
        log!(logger, LogLevel::Debug, "Address | Bank 0 | Bank 1 | Bank 2 | Bank 3");
        log!(logger, LogLevel::Debug, "--------+--------+--------+--------+--------");
        for addr in 0..sfr::REGISTERS_PER_BANK as u8 {
            let b0 = self.direct_read(sfr::BANK_0, addr, logger);
            let b1 = self.direct_read(sfr::BANK_1, addr, logger);
            let b2 = self.direct_read(sfr::BANK_2, addr, logger);
            let b3 = self.direct_read(sfr::BANK_3, addr, logger);
            log!(
                logger,
                LogLevel::Debug,
                "0x{addr:02X}    |  0x{b0:02X}  |  0x{b1:02X}  |  0x{b2:02X}  |  0x{b3:02X}"
            );
        }
    }

    /// GIE AND ((T0IE&T0IF) OR (INTE&INTF) OR (RBIE&RBIF) OR
    /// (PEIE AND ((RCIE&RCIF) OR (TXIE&TXIF) OR (SSPIE&SSPIF)))).
    ///
    /// Uses raw array reads (not `direct_read`/`banked_read`) since these
    /// addresses never carry a peripheral hook and this runs every step.
    pub fn has_interrupt_fired(&self) -> bool {
        use sfr::intcon_bits as ic;
        let intcon = self.data[flat_index(sfr::BANK_0, sfr::INTCON)];
        if intcon & ic::GIE == 0 {
            return false;
        }
        if (intcon & ic::T0IE != 0) && (intcon & ic::T0IF != 0) {
            return true;
        }
        if (intcon & ic::INTE != 0) && (intcon & ic::INTF != 0) {
            return true;
        }
        if (intcon & ic::RBIE != 0) && (intcon & ic::RBIF != 0) {
            return true;
        }
        if intcon & ic::PEIE == 0 {
            return false;
        }

        use sfr::{pie1_bits as pie, pir1_bits as pir};
        let pie1 = self.data[flat_index(sfr::BANK_1, sfr::PIE1)];
        let pir1 = self.data[flat_index(sfr::BANK_0, sfr::PIR1)];
        ((pie1 & pie::RCIE != 0) && (pir1 & pir::RCIF != 0))
            || ((pie1 & pie::TXIE != 0) && (pir1 & pir::TXIF != 0))
            || ((pie1 & pie::SSPIE != 0) && (pir1 & pir::SSPIF != 0))
    }

    pub(crate) fn intcon(&self) -> u8 {
        self.data[flat_index(sfr::BANK_0, sfr::INTCON)]
    }

    pub(crate) fn set_intcon(&mut self, value: u8) {
        self.data[flat_index(sfr::BANK_0, sfr::INTCON)] = value;
    }

    fn peripheral_read(&mut self, cell: PeripheralCell, bank: u8, addr: u8) -> u8 {
        match cell {
            PeripheralCell::Rcreg => self.uart_read_rcreg(),
            // Every other peripheral register reads back whatever byte was
            // last stored, same as a plain RAM cell.
            _ => self.data[flat_index(bank, addr)],
        }
    }

    fn peripheral_write(&mut self, cell: PeripheralCell, bank: u8, addr: u8, value: u8, logger: &Logger) {
        match cell {
            PeripheralCell::Txsta => self.uart_write_txsta(value, logger),
            PeripheralCell::Txreg => self.uart_write_txreg(value),
            PeripheralCell::Rcreg => self.data[flat_index(bank, addr)] = value,
            PeripheralCell::Adcon0 => self.adc_write_adcon0(value, logger),
            PeripheralCell::Sspcon2 => self.eeprom_write_sspcon2(value, logger),
            PeripheralCell::Sspbuf => self.eeprom_write_sspbuf(value, logger),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_logger() -> Logger {
        Logger::open("/dev/null", LogLevel::Debug).unwrap()
    }

    #[test]
    fn status_reads_0x18_at_power_on() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        assert_eq!(rf.direct_read(sfr::BANK_0, sfr::STATUS, &logger), 0x18);
    }

    #[test]
    fn core_sfrs_alias_across_banks() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        for bank in sfr::BANK_1..sfr::BANK_COUNT {
            for &addr in &[sfr::PCL, sfr::STATUS, sfr::FSR, sfr::PCLATH, sfr::INTCON] {
                rf.direct_write(sfr::BANK_0, addr, 0x42, &logger);
                assert_eq!(
                    rf.direct_read(bank, addr, &logger),
                    0x42,
                    "bank {bank} addr 0x{addr:02X} did not alias bank 0"
                );
            }
        }
    }

    #[test]
    fn common_ram_window_aliases_bank_0() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        for addr in sfr::COMMON_RAM_START..=sfr::COMMON_RAM_END {
            rf.direct_write(1, addr, 0x55, &logger);
            assert_eq!(rf.direct_read(0, addr, &logger), 0x55);
            rf.direct_write(2, addr, 0x66, &logger);
            assert_eq!(rf.direct_read(0, addr, &logger), 0x66);
            rf.direct_write(3, addr, 0x77, &logger);
            assert_eq!(rf.direct_read(0, addr, &logger), 0x77);
        }
    }

    #[test]
    fn tmr0_and_option_reg_alias_across_specific_banks() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(2, sfr::TMR0, 0x99, &logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 0x99);

        rf.direct_write(3, sfr::OPTION_REG, 0xAB, &logger);
        assert_eq!(rf.direct_read(1, sfr::OPTION_REG, &logger), 0xAB);
    }

    #[test]
    fn banked_access_follows_status_bank_bits() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        // Select bank 1 via STATUS<6:5>.
        rf.direct_write(0, sfr::STATUS, 0x38, &logger); // RP1=0 RP0=1 -> bank 1, plus TO/PD bits
        rf.banked_write(0x20, 0x7A, &logger);
        assert_eq!(rf.direct_read(1, 0x20, &logger), 0x7A);
        assert_eq!(rf.direct_read(0, 0x20, &logger), 0x00);
    }

    #[test]
    fn indirect_addressing_follows_irp_and_fsr() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        // FSR = 0x25, IRP = 0 -> bank 0 addr 0x25.
        rf.direct_write(0, sfr::FSR, 0x25, &logger);
        rf.direct_write(0, sfr::INDF, 0x11, &logger);
        assert_eq!(rf.direct_read(0, 0x25, &logger), 0x11);

        // FSR<7> = 1, IRP = 0 -> bank 1.
        rf.direct_write(0, sfr::FSR, 0x80 | 0x10, &logger);
        rf.direct_write(0, sfr::INDF, 0x22, &logger);
        assert_eq!(rf.direct_read(1, 0x10, &logger), 0x22);

        // IRP = 1, FSR<7> = 0 -> bank 2.
        let status = rf.direct_read(0, sfr::STATUS, &logger);
        rf.direct_write(0, sfr::STATUS, status | sfr::status_bits::IRP, &logger);
        rf.direct_write(0, sfr::FSR, 0x10, &logger);
        rf.direct_write(0, sfr::INDF, 0x33, &logger);
        assert_eq!(rf.direct_read(2, 0x10, &logger), 0x33);
    }

    #[test]
    #[should_panic]
    fn out_of_range_bank_is_fatal() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_read(4, 0, &logger);
    }

    #[test]
    #[should_panic]
    fn out_of_range_address_is_fatal() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_read(0, 128, &logger);
    }

    #[test]
    fn gie_clear_masks_every_interrupt_source() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(0, sfr::INTCON, sfr::intcon_bits::T0IE | sfr::intcon_bits::T0IF, &logger);
        assert!(!rf.has_interrupt_fired());
    }

    #[test]
    fn t0ie_and_t0if_together_fire_with_gie() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(
            0,
            sfr::INTCON,
            sfr::intcon_bits::GIE | sfr::intcon_bits::T0IE | sfr::intcon_bits::T0IF,
            &logger,
        );
        assert!(rf.has_interrupt_fired());
    }

    #[test]
    fn peie_clear_masks_all_peripheral_sources() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(0, sfr::INTCON, sfr::intcon_bits::GIE, &logger);
        rf.direct_write(1, sfr::PIE1, sfr::pie1_bits::RCIE | sfr::pie1_bits::TXIE | sfr::pie1_bits::SSPIE, &logger);
        rf.direct_write(0, sfr::PIR1, sfr::pir1_bits::RCIF | sfr::pir1_bits::TXIF | sfr::pir1_bits::SSPIF, &logger);
        assert!(!rf.has_interrupt_fired());
    }

    #[test]
    fn peripheral_flags_fire_when_peie_set() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(0, sfr::INTCON, sfr::intcon_bits::GIE | sfr::intcon_bits::PEIE, &logger);
        rf.direct_write(1, sfr::PIE1, sfr::pie1_bits::SSPIE, &logger);
        rf.direct_write(0, sfr::PIR1, sfr::pir1_bits::SSPIF, &logger);
        assert!(rf.has_interrupt_fired());
    }
}
