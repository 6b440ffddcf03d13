//! Literal/control opcodes (NOP, RETURN, RETFIE, SLEEP, CLRWDT, CLRW),
//! branches (CALL, GOTO), and literal-with-W instructions
//! (MOVLW/RETLW/IORLW/ANDLW/XORLW/SUBLW/ADDLW).

use super::PC_MASK;
use super::status::{self, FlagUpdate, add8, sub8};
use super::Cpu;
use crate::log;
use crate::log::{LogLevel, Logger};
use crate::registers::{RegisterFile, sfr};

const NOP: u16 = 0x0000;
const RETURN: u16 = 0x0008;
const RETFIE: u16 = 0x0009;
const SLEEP: u16 = 0x0063;
const CLRWDT: u16 = 0x0064;
const CLRW: u16 = 0x0100;

/// True for the small set of full-word literal/control opcodes, which must
/// be matched before the byte-oriented decoder gets a chance at the same
/// bit pattern (e.g. RETURN's 0x0008 would otherwise decode as MOVWF 0x08).
pub(super) fn is_literal_control(word: u16) -> bool {
    matches!(word, NOP | RETURN | RETFIE | SLEEP | CLRWDT | CLRW)
}

pub(super) fn execute_literal_control(cpu: &mut Cpu, word: u16, regs: &mut RegisterFile, logger: &Logger, next_pc: &mut u16) {
    match word {
        NOP => {}
        RETURN => {
            *next_pc = cpu.stack.pop(logger) & PC_MASK;
        }
        RETFIE => {
            let intcon = regs.intcon();
            regs.set_intcon(intcon | sfr::intcon_bits::GIE);
            *next_pc = cpu.stack.pop(logger) & PC_MASK;
        }
        SLEEP | CLRWDT => {
            // Sleep/watchdog emulation is out of scope; both are no-ops here.
        }
        CLRW => {
            cpu.w = 0;
            status::apply(regs, logger, FlagUpdate::z(true));
        }
        _ => unreachable!("is_literal_control gates this match"),
    }
}

/// True for the CALL/GOTO branch family: bits 13:11 of the word are 0b100
/// or 0b101.
pub(super) fn is_branch(word: u16) -> bool {
    matches!((word >> 11) & 0x07, 0b100 | 0b101)
}

pub(super) fn execute_branch(cpu: &mut Cpu, word: u16, pc: u16, regs: &mut RegisterFile, logger: &Logger, next_pc: &mut u16) {
    let is_call = (word >> 11) & 0x07 == 0b100;
    let pclath = regs.direct_read(sfr::BANK_0, sfr::PCLATH, logger);
    let target = (((pclath as u16) >> 3) & 0x03) << 11 | (word & 0x7FF);

    if is_call {
        let return_address = pc.wrapping_add(1) & PC_MASK;
        cpu.stack.push(return_address, logger);
        log!(logger, LogLevel::Debug, "CALL to 0x{target:04X}, return address 0x{return_address:04X} pushed");
    }
    *next_pc = target;
}

/// True for the literal-with-W family: bits 13:8 fall in 0x30..=0x3F.
pub(super) fn is_literal_with_w(word: u16) -> bool {
    let selector = (word >> 8) & 0x3F;
    (0x30..=0x3F).contains(&selector)
}

pub(super) fn execute_literal_with_w(cpu: &mut Cpu, word: u16, regs: &mut RegisterFile, logger: &Logger, next_pc: &mut u16) {
    let selector = (word >> 8) & 0x3F;
    let literal = (word & 0xFF) as u8;

    match selector {
        0x30 => {
            // MOVLW: no flags.
            cpu.w = literal;
        }
        0x34 => {
            // RETLW
            cpu.w = literal;
            *next_pc = cpu.stack.pop(logger) & PC_MASK;
        }
        0x38 => {
            // IORLW
            cpu.w |= literal;
            status::apply(regs, logger, FlagUpdate::z(cpu.w == 0));
        }
        0x39 => {
            // ANDLW
            cpu.w &= literal;
            status::apply(regs, logger, FlagUpdate::z(cpu.w == 0));
        }
        0x3A => {
            // XORLW
            cpu.w ^= literal;
            status::apply(regs, logger, FlagUpdate::z(cpu.w == 0));
        }
        0x3C => {
            // SUBLW: K - W
            let (result, carry, dc, zero) = sub8(literal, cpu.w);
            cpu.w = result;
            status::apply(regs, logger, FlagUpdate::czdc(carry, dc, zero));
        }
        0x3E => {
            // ADDLW
            let (result, carry, dc, zero) = add8(cpu.w, literal);
            cpu.w = result;
            status::apply(regs, logger, FlagUpdate::czdc(carry, dc, zero));
        }
        _ => {
            log!(logger, LogLevel::Warning, "unknown literal-with-W opcode 0x{word:04X}, treating as NOP");
        }
    }
}
