//! Intel-HEX loader: parses `:LLAAAATT[DD...]CC` text records into
//! `(word address, 14-bit word)` pairs and feeds them into program memory.
//!
//! Only record types 00 (data) and 01 (end-of-file) are understood — the
//! PIC16F876's in-circuit debug and extended-address record types never
//! appear in a Text Games System build. Each data record's byte address is
//! halved to a word address (program memory is word-addressed) and its
//! bytes are paired little-endian into the 14-bit instruction word the
//! pair encodes, mirroring `Hex_Parser.c`'s `HexParserDecodeLine`.

use std::fmt;

use tgs_core::memory::ProgramMemory;

const RECORD_TYPE_DATA: u8 = 0x00;
const RECORD_TYPE_END_OF_FILE: u8 = 0x01;

/// The PIC16F876 configuration word lives at word address 0x2007; HEX files
/// produced by the toolchain always include it, but it's outside the 8192
/// words of addressable program Flash and carries no instruction semantics,
/// so it's silently dropped rather than treated as an out-of-range error.
const CONFIGURATION_WORD_ADDRESS: u16 = 0x2007;

#[derive(Debug)]
pub enum HexError {
    Io(std::io::Error),
    MissingEndOfFile,
    Parse { line: usize, reason: String },
    AddressOutOfRange { line: usize, word_address: u16 },
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingEndOfFile => write!(f, "HEX file ended without an end-of-file record"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::AddressOutOfRange { line, word_address } => {
                write!(f, "line {line}: word address 0x{word_address:04X} is past program memory")
            }
        }
    }
}

impl std::error::Error for HexError {}

impl From<std::io::Error> for HexError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<HexError> for tgs_core::error::EmulatorError {
    fn from(e: HexError) -> Self {
        use tgs_core::error::EmulatorError;
        match e {
            HexError::Io(io_err) => EmulatorError::Io(io_err),
            HexError::MissingEndOfFile => EmulatorError::HexParse { line: 0, reason: "missing end-of-file record".into() },
            HexError::Parse { line, reason } => EmulatorError::HexParse { line, reason },
            HexError::AddressOutOfRange { word_address, .. } => EmulatorError::HexAddressOutOfRange { word_address },
        }
    }
}

enum Record {
    Data(Vec<(u16, u16)>),
    EndOfFile,
    /// A record type this loader has no use for (e.g. an extended linear
    /// address record emitted by the toolchain ahead of the data records —
    /// this chip's program space never leaves the lowest 16-bit segment,
    /// so there is nothing to act on).
    Ignored,
}

fn hex_byte(bytes: &[u8], index: usize) -> Result<u8, String> {
    let hi = (bytes[index * 2] as char).to_digit(16);
    let lo = (bytes[index * 2 + 1] as char).to_digit(16);
    match (hi, lo) {
        (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
        _ => Err(format!("invalid hex digit at byte offset {index}")),
    }
}

/// Parse one `:`-prefixed line into a record. Pure function: no I/O, no
/// knowledge of program memory's size (address-range checking happens in
/// `load_into`, which knows the destination's bounds).
fn parse_line(line: &str, line_number: usize) -> Result<Record, HexError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let body = line
        .strip_prefix(':')
        .ok_or_else(|| HexError::Parse { line: line_number, reason: "record does not start with ':'".into() })?;

    if body.len() % 2 != 0 || body.len() < 8 {
        return Err(HexError::Parse { line: line_number, reason: "record has an odd or too-short byte count".into() });
    }
    let bytes = body.as_bytes();
    let byte_count = body.len() / 2;

    let mut decoded = Vec::with_capacity(byte_count);
    for i in 0..byte_count {
        decoded.push(hex_byte(bytes, i).map_err(|reason| HexError::Parse { line: line_number, reason })?);
    }

    let record_length = decoded[0] as usize;
    let byte_address = ((decoded[1] as u16) << 8) | decoded[2] as u16;
    let record_type = decoded[3];

    match record_type {
        RECORD_TYPE_END_OF_FILE => Ok(Record::EndOfFile),
        RECORD_TYPE_DATA => {
            let instruction_count = record_length / 2;
            let mut start_word = byte_address / 2;
            let mut pairs = Vec::with_capacity(instruction_count);
            for i in 0..instruction_count {
                let low = decoded[4 + i * 2];
                let high = decoded[4 + i * 2 + 1];
                let word = ((high as u16) << 8) | low as u16;
                pairs.push((start_word, word & 0x3FFF));
                start_word = start_word.wrapping_add(1);
            }
            Ok(Record::Data(pairs))
        }
        _ => Ok(Record::Ignored),
    }
}

/// Parse `contents` line by line and load every data-record word into
/// `memory`. Fatal if the file ends without an EOF record, or a data
/// record addresses a word beyond the 8192-word Flash (excluding the
/// configuration word at 0x2007, which is always discarded).
pub fn load_into(memory: &mut ProgramMemory, contents: &str) -> Result<(), HexError> {
    let mut saw_end_of_file = false;

    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line, line_number)? {
            Record::EndOfFile => {
                saw_end_of_file = true;
                break;
            }
            Record::Data(pairs) => {
                for (word_address, word) in pairs {
                    if word_address == CONFIGURATION_WORD_ADDRESS {
                        continue;
                    }
                    if memory.load_word(word_address, word).is_err() {
                        return Err(HexError::AddressOutOfRange { line: line_number, word_address });
                    }
                }
            }
            Record::Ignored => {}
        }
    }

    if !saw_end_of_file {
        return Err(HexError::MissingEndOfFile);
    }
    Ok(())
}
