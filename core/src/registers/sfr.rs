//! Special-function-register addresses and bit masks.
//!
//! Addresses match the PIC16F876 memory map: TMR0 and OPTION_REG alias to the
//! same offset in different banks, several SFRs are mirrored into banks 1-3,
//! and 0x70-0x7F is a common RAM window visible from every bank.

pub const BANK_0: u8 = 0;
pub const BANK_1: u8 = 1;
pub const BANK_2: u8 = 2;
pub const BANK_3: u8 = 3;
pub const BANK_COUNT: u8 = 4;

pub const REGISTERS_PER_BANK: usize = 128;

pub const INDF: u8 = 0x00;
pub const TMR0: u8 = 0x01;
pub const PCL: u8 = 0x02;
pub const STATUS: u8 = 0x03;
pub const FSR: u8 = 0x04;
pub const PCLATH: u8 = 0x0A;
pub const INTCON: u8 = 0x0B;
pub const PIR1: u8 = 0x0C;
pub const TMR2: u8 = 0x11;
pub const T2CON: u8 = 0x12;
pub const SSPBUF: u8 = 0x13;
pub const RCSTA: u8 = 0x18;
pub const TXREG: u8 = 0x19;
pub const RCREG: u8 = 0x1A;
pub const ADRESH: u8 = 0x1E;
pub const ADCON0: u8 = 0x1F;

/// Bank 1 only.
pub const OPTION_REG: u8 = 0x01;
pub const SSPCON2: u8 = 0x11;
pub const PIE1: u8 = 0x0C;
pub const TXSTA: u8 = 0x18;
pub const ADRESL: u8 = 0x1E;

/// Inclusive range of the 16-byte common RAM window mirrored into banks 1-3.
pub const COMMON_RAM_START: u8 = 0x70;
pub const COMMON_RAM_END: u8 = 0x7F;

pub mod status_bits {
    pub const CARRY: u8 = 1 << 0;
    pub const DIGIT_CARRY: u8 = 1 << 1;
    pub const ZERO: u8 = 1 << 2;
    pub const RP0: u8 = 1 << 5;
    pub const RP1: u8 = 1 << 6;
    pub const IRP: u8 = 1 << 7;
    /// Power-on reset value: TO and PD both set.
    pub const POWER_ON_RESET: u8 = 0x18;
}

pub mod intcon_bits {
    pub const RBIF: u8 = 1 << 0;
    pub const INTF: u8 = 1 << 1;
    pub const T0IF: u8 = 1 << 2;
    pub const RBIE: u8 = 1 << 3;
    pub const INTE: u8 = 1 << 4;
    pub const T0IE: u8 = 1 << 5;
    pub const PEIE: u8 = 1 << 6;
    pub const GIE: u8 = 1 << 7;
}

pub mod pir1_bits {
    pub const SSPIF: u8 = 1 << 3;
    pub const TXIF: u8 = 1 << 4;
    pub const RCIF: u8 = 1 << 5;
}

/// PIE1 shares PIR1's bit layout (enable bits at the same positions as
/// their matching flag bits) but under enable-flavored names.
pub mod pie1_bits {
    pub const SSPIE: u8 = 1 << 3;
    pub const TXIE: u8 = 1 << 4;
    pub const RCIE: u8 = 1 << 5;
}

pub mod option_reg_bits {
    pub const PRESCALER_MASK: u8 = 0x07;
    pub const PSA: u8 = 1 << 3;
}

pub mod t2con_bits {
    pub const TMR2ON: u8 = 1 << 2;
}

pub mod txsta_bits {
    pub const TXEN: u8 = 1 << 5;
}

pub mod adcon0_bits {
    pub const ADON: u8 = 1 << 0;
    pub const GO: u8 = 1 << 2;
}

pub mod sspcon2_bits {
    pub const SEN: u8 = 1 << 0;
    pub const RSEN: u8 = 1 << 1;
    pub const PEN: u8 = 1 << 2;
    pub const RCEN: u8 = 1 << 3;
    pub const ACKEN: u8 = 1 << 4;
}
