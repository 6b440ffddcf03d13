//! ADC peripheral: a pseudo-random 10-bit sample on start-of-conversion.
//! This crate carries no RNG dependency, so sampling is done with a small
//! splitmix64 generator seeded once at construction.

use super::{RegisterFile, flat_index, sfr};
use crate::log;
use crate::log::{LogLevel, Logger};

pub(crate) struct AdcState {
    rng: u64,
}

impl AdcState {
    pub(crate) fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E3779B97F4A7C15);
        Self { rng: seed | 1 }
    }

    /// splitmix64: https://prng.di.unimi.it/splitmix64.c, truncated to 10 bits.
    fn next_10_bits(&mut self) -> u16 {
        self.rng = self.rng.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.rng;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^= z >> 31;
        (z & 0x03FF) as u16
    }
}

impl RegisterFile {
    /// Write to ADCON0: if ADON and GO are both set, sample a 10-bit value
    /// into ADRESH:ADRESL and clear GO in the stored byte to signal
    /// completion. Otherwise store the byte verbatim.
    pub(crate) fn adc_write_adcon0(&mut self, mut data: u8, logger: &Logger) {
        if data & sfr::adcon0_bits::ADON != 0 && data & sfr::adcon0_bits::GO != 0 {
            let sample = self.adc.next_10_bits();
            log!(logger, LogLevel::Debug, "ADC sampled value: {sample}");
            self.direct_write(sfr::BANK_0, sfr::ADRESH, (sample >> 8) as u8 & 0x03, logger);
            self.direct_write(sfr::BANK_1, sfr::ADRESL, sample as u8, logger);
            data &= !sfr::adcon0_bits::GO;
        }
        self.data[flat_index(sfr::BANK_0, sfr::ADCON0)] = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_logger() -> Logger {
        Logger::open("/dev/null", LogLevel::Debug).unwrap()
    }

    #[test]
    fn go_and_adon_trigger_a_sample_and_clear_go() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(
            0,
            sfr::ADCON0,
            sfr::adcon0_bits::ADON | sfr::adcon0_bits::GO,
            &logger,
        );
        let stored = rf.direct_read(0, sfr::ADCON0, &logger);
        assert_eq!(stored & sfr::adcon0_bits::GO, 0);
        assert_ne!(stored & sfr::adcon0_bits::ADON, 0);

        let result = ((rf.direct_read(0, sfr::ADRESH, &logger) as u16) << 8)
            | rf.direct_read(1, sfr::ADRESL, &logger) as u16;
        assert!(result <= 0x03FF);
    }

    #[test]
    fn adon_without_go_stores_verbatim_with_no_sampling() {
        let mut rf = RegisterFile::new();
        let logger = test_logger();
        rf.direct_write(0, sfr::ADCON0, sfr::adcon0_bits::ADON, &logger);
        assert_eq!(rf.direct_read(0, sfr::ADCON0, &logger), sfr::adcon0_bits::ADON);
        assert_eq!(rf.direct_read(0, sfr::ADRESH, &logger), 0);
        assert_eq!(rf.direct_read(1, sfr::ADRESL, &logger), 0);
    }
}
