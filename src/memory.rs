//! Memory cursors the disassembler pulls opcode words from.
//!
//! TMS320 program memory is word addressed: addresses count 16-bit words and an
//! image of N words occupies 2N bytes.
use super::*;

/// A read cursor over program memory. `read_word` returns `None` at end of data
/// so a decoder can report that it needs more input instead of reading garbage.
pub trait DisMemory {
    /// the word address of the next word to be read
    fn address(&self) -> u32;
    fn has_next(&self) -> bool;
    fn read_word(&mut self) -> Option<u16>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// A word image loaded at some origin.
pub struct ArrayMemory<'a> {
    origin: u32,
    words: &'a [u16],
    pos: usize,
}

impl<'a> ArrayMemory<'a> {
    pub fn new(origin: u32, words: &'a [u16]) -> Self { ArrayMemory { origin, words, pos: 0 } }
}

impl DisMemory for ArrayMemory<'_> {
    fn address(&self) -> u32 { self.origin + self.pos as u32 }
    fn has_next(&self) -> bool { self.pos < self.words.len() }
    fn read_word(&mut self) -> Option<u16> {
        let w = self.words.get(self.pos).copied()?;
        self.pos += 1;
        Some(w)
    }
}

/// Pack a byte stream into words. A trailing odd byte is an error since it can't
/// be part of any instruction.
pub fn words_from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Vec<u16>, Error> {
    if bytes.len() % 2 != 0 {
        return Err(general_err!(format!("odd number of bytes ({}) in word image", bytes.len())));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|b| match order {
            ByteOrder::BigEndian => u16::from_be_bytes([b[0], b[1]]),
            ByteOrder::LittleEndian => u16::from_le_bytes([b[0], b[1]]),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reports_end_of_data() {
        let words = [0x7F80u16, 0xF900];
        let mut mem = ArrayMemory::new(0x100, &words);
        assert_eq!(mem.address(), 0x100);
        assert_eq!(mem.read_word(), Some(0x7F80));
        assert_eq!(mem.read_word(), Some(0xF900));
        assert!(!mem.has_next());
        assert_eq!(mem.read_word(), None);
        assert_eq!(mem.address(), 0x102);
    }

    #[test]
    fn byte_order() -> Result<(), Error> {
        let bytes = [0x12u8, 0x34, 0xAB, 0xCD];
        assert_eq!(words_from_bytes(&bytes, ByteOrder::BigEndian)?, vec![0x1234, 0xABCD]);
        assert_eq!(words_from_bytes(&bytes, ByteOrder::LittleEndian)?, vec![0x3412, 0xCDAB]);
        assert!(words_from_bytes(&bytes[..3], ByteOrder::BigEndian).is_err());
        Ok(())
    }
}
