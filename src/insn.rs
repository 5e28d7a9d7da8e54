use super::*;

/// Longest TMS320 instruction, in words.
pub const MAX_WORDS: usize = 2;

/// One instruction, either decoded from memory or produced by the assembler.
/// Errors are attached rather than returned so a partial rendering (correct
/// mnemonic, operand flagged out of range) is always available.
#[derive(Clone, Debug)]
pub struct Insn {
    /// word address of the first word
    pub address: u32,
    buf: [u16; MAX_WORDS],
    len: usize,
    /// mnemonic
    pub name: String,
    /// comma-separated operand text
    pub operands: String,
    /// the first error encountered, if any
    pub error: Option<ErrorKind>,
}

impl Insn {
    pub fn new(address: u32) -> Self {
        Insn {
            address,
            buf: [0; MAX_WORDS],
            len: 0,
            name: String::new(),
            operands: String::new(),
            error: None,
        }
    }
    pub fn words(&self) -> &[u16] { &self.buf[..self.len] }
    pub fn len(&self) -> usize { self.len }
    pub fn is_ok(&self) -> bool { self.error.is_none() }
    pub fn emit_word(&mut self, w: u16) {
        if self.len < MAX_WORDS {
            self.buf[self.len] = w;
            self.len += 1;
        }
    }
    /// Replace a word already emitted (operands are patched into the base opcode).
    pub fn or_word(&mut self, index: usize, bits: u16) {
        if index < self.len {
            self.buf[index] |= bits;
        }
    }
    /// Record an error unless one is already recorded.
    pub fn set_error(&mut self, kind: ErrorKind) {
        if self.error.is_none() {
            self.error = Some(kind);
        }
    }
    /// Append an operand, separated from any previous one by a comma.
    pub fn add_operand(&mut self, text: &str) {
        if !self.operands.is_empty() {
            self.operands.push(',');
        }
        self.operands.push_str(text);
    }
    /// Mnemonic and operands as an assembler would read them.
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.operands)
        }
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = String::new();
        for w in self.words() {
            words.push_str(&format!("{:04X} ", w));
        }
        write!(f, "{:04X}: {:10} {:6} {}", self.address, words, self.name, self.operands)?;
        if let Some(e) = self.error {
            write!(f, "  ; {}", e)?;
        }
        Ok(())
    }
}

/// Hex rendering used for addresses and unsigned immediates.
pub fn fmt_hex(value: u32, digits: usize) -> String { format!("0x{:0width$X}", value, width = digits) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operands_are_comma_joined() {
        let mut insn = Insn::new(0x10);
        insn.name.push_str("ADD");
        insn.add_operand("*+");
        insn.add_operand("3");
        insn.add_operand("AR1");
        assert_eq!(insn.text(), "ADD *+,3,AR1");
        insn.emit_word(0x03A0);
        insn.or_word(0, 0x0009);
        insn.emit_word(1);
        insn.emit_word(2);
        assert_eq!(insn.words(), &[0x03A9, 1]);
    }

    #[test]
    fn first_error_wins() {
        let mut insn = Insn::new(0);
        assert!(insn.is_ok());
        insn.set_error(ErrorKind::OverflowRange);
        insn.set_error(ErrorKind::IllegalRegister);
        assert_eq!(insn.error, Some(ErrorKind::OverflowRange));
        assert_eq!(fmt_hex(0x90, 2), "0x90");
        assert_eq!(fmt_hex(0x123, 4), "0x0123");
    }
}
