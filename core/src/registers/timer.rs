//! Timer peripheral: TMR0 prescaler/overflow interrupt, TMR2 enable gate.

use super::{RegisterFile, sfr};
use crate::log::Logger;

/// TMR2's own postscaler and TMR2IF are intentionally not modeled: nothing
/// in the register file currently depends on a TMR2 interrupt, only on TMR2
/// counting while TMR2ON is set.
pub(crate) struct TimerState {
    /// Widened to `u16`: the PS<2:0>=0b111 setting divides by 256, which a
    /// `u8` counter can never reach (it wraps at 256 back to 0).
    prescaler: u16,
}

impl TimerState {
    pub(crate) fn new() -> Self {
        Self { prescaler: 0 }
    }
}

impl RegisterFile {
    fn increment_tmr0(&mut self, logger: &Logger) {
        let value = self.direct_read(sfr::BANK_0, sfr::TMR0, logger).wrapping_add(1);
        self.direct_write(sfr::BANK_0, sfr::TMR0, value, logger);
        if value == 0 {
            let intcon = self.intcon();
            self.set_intcon(intcon | sfr::intcon_bits::T0IF);
        }
    }

    /// Advance the timer peripheral by one executed instruction.
    pub fn tick(&mut self, logger: &Logger) {
        let option_reg = self.direct_read(sfr::BANK_1, sfr::OPTION_REG, logger);
        if option_reg & sfr::option_reg_bits::PSA != 0 {
            // Prescaler assigned to the watchdog: TMR0 increments every step.
            self.increment_tmr0(logger);
        } else {
            let threshold = 2u16 << (option_reg & sfr::option_reg_bits::PRESCALER_MASK);
            self.timer.prescaler = self.timer.prescaler.wrapping_add(1);
            if self.timer.prescaler == threshold {
                self.increment_tmr0(logger);
                self.timer.prescaler = 0;
            }
        }

        let t2con = self.direct_read(sfr::BANK_0, sfr::T2CON, logger);
        if t2con & sfr::t2con_bits::TMR2ON != 0 {
            let tmr2 = self.direct_read(sfr::BANK_0, sfr::TMR2, logger).wrapping_add(1);
            self.direct_write(sfr::BANK_0, sfr::TMR2, tmr2, logger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::sfr;
    use super::*;
    use crate::log::LogLevel;

    fn test_logger() -> Logger {
        Logger::open("/dev/null", LogLevel::Debug).unwrap()
    }

    #[test]
    fn psa_set_increments_tmr0_every_step() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(1, sfr::OPTION_REG, sfr::option_reg_bits::PSA, &logger);
        rf.tick(&logger);
        rf.tick(&logger);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 3);
    }

    #[test]
    fn prescaler_divides_before_incrementing_tmr0() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        // PS<2:0> = 0 -> divide by 2.
        rf.direct_write(1, sfr::OPTION_REG, 0x00, &logger);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 0);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 1);
    }

    #[test]
    fn maximum_prescaler_divides_by_256() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        // PS<2:0> = 7 -> divide by 256.
        rf.direct_write(1, sfr::OPTION_REG, 0x07, &logger);
        for _ in 0..255 {
            rf.tick(&logger);
        }
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 0, "256th tick hasn't landed yet");
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 1, "256 ticks should have incremented TMR0 once");
    }

    #[test]
    fn tmr0_wrap_sets_t0if() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(1, sfr::OPTION_REG, sfr::option_reg_bits::PSA, &logger);
        rf.direct_write(0, sfr::TMR0, 0xFF, &logger);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR0, &logger), 0);
        assert_ne!(rf.intcon() & sfr::intcon_bits::T0IF, 0);
    }

    #[test]
    fn tmr2_only_increments_when_enabled() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(1, sfr::OPTION_REG, sfr::option_reg_bits::PSA, &logger);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR2, &logger), 0);

        rf.direct_write(0, sfr::T2CON, sfr::t2con_bits::TMR2ON, &logger);
        rf.tick(&logger);
        assert_eq!(rf.direct_read(0, sfr::TMR2, &logger), 1);
    }
}
