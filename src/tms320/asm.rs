//! Instruction encoder.
//!
//! Candidate entries are tried in name-index order. The first pass only accepts
//! operands whose values fit the slot; if nothing fits, a second pass accepts
//! any value of the right shape so the range error can be reported against the
//! most likely form.
use super::cc;
use super::config::{Config, CpuType};
use super::flags::{AddrMode, Entry};
use super::parse::{parse_operands, Operand};
use super::table;
use crate::insn::Insn;
use crate::symbols::SymbolTable;
use crate::ErrorKind;

type Slots = [Option<usize>; 3];

pub struct InsnAssembler {
    config: Config,
}

impl InsnAssembler {
    pub fn new(cpu: CpuType) -> Self {
        InsnAssembler {
            config: Config::new(cpu),
        }
    }
    pub fn cpu(&self) -> CpuType { self.config.cpu }
    pub fn set_cpu(&mut self, name: &str) -> Result<(), ErrorKind> {
        let cpu = table::search_cpu(name).ok_or(ErrorKind::UnsupportedCpu)?;
        self.config = Config::new(cpu);
        Ok(())
    }
    /// true if the mnemonic exists on the selected variant
    pub fn is_instruction(&self, mnemonic: &str) -> bool { table::cpu(self.config.cpu).has_name(mnemonic) }

    /// Encode one instruction. `address` is the value of `$` in expressions.
    pub fn encode(&self, address: u32, mnemonic: &str, operands: &str, symtab: Option<&dyn SymbolTable>) -> Insn {
        let mut insn = Insn::new(address);
        insn.name = mnemonic.to_ascii_uppercase();
        insn.operands = operands.trim().to_string();
        let ops = match parse_operands(operands, symtab, address) {
            Ok(ops) => ops,
            Err(e) => {
                insn.set_error(e);
                return insn;
            }
        };
        let (entry, slots) = match self.search(mnemonic, &ops) {
            Ok(found) => found,
            Err(e) => {
                insn.set_error(e);
                return insn;
            }
        };
        if ops.iter().any(|o| o.undefined) {
            insn.set_error(ErrorKind::Reference);
        }
        self.emit(entry, &ops, slots, &mut insn);
        insn
    }

    fn search(&self, mnemonic: &str, ops: &[Operand]) -> Result<(&'static Entry, Slots), ErrorKind> {
        let cpu = table::cpu(self.config.cpu);
        for strict in [true, false] {
            match cpu.search_name(mnemonic, |e| self.assign(e, ops, strict).is_some()) {
                Ok(entry) => {
                    let slots = self.assign(entry, ops, strict).ok_or(ErrorKind::OperandNotAllowed)?;
                    return Ok((entry, slots));
                }
                Err(ErrorKind::OperandNotAllowed) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ErrorKind::OperandNotAllowed)
    }

    fn optional(mode: AddrMode) -> bool {
        matches!(
            mode,
            AddrMode::Ls4 | AddrMode::Ls3 | AddrMode::Ls0 | AddrMode::Ls4l | AddrMode::Ind | AddrMode::Idv | AddrMode::Narp
        )
    }

    // map each slot of `entry` to an operand index
    fn assign(&self, entry: &Entry, ops: &[Operand], strict: bool) -> Option<Slots> {
        let mut slots = [None; 3];
        let mut i = 0;
        let mut indirect = false;
        for (n, &mode) in entry.flags.modes().iter().enumerate() {
            if mode == AddrMode::None {
                continue;
            }
            if mode == AddrMode::Cc {
                // a condition list takes every remaining operand
                if i < ops.len() && ops[i..].iter().all(|o| o.is_condition()) {
                    slots[n] = Some(i);
                    i = ops.len();
                    continue;
                }
                return None;
            }
            if let Some(op) = ops.get(i) {
                if (mode != AddrMode::Narp || indirect) && self.accept(op, mode, strict) {
                    slots[n] = Some(i);
                    indirect |= op.mode.is_indirect();
                    i += 1;
                    continue;
                }
            }
            if !Self::optional(mode) {
                return None;
            }
        }
        if i == ops.len() {
            Some(slots)
        } else {
            None
        }
    }

    fn accept(&self, op: &Operand, mode: AddrMode, strict: bool) -> bool {
        let cnst = op.mode == AddrMode::Cnst;
        let within = |lo: i32, hi: i32| !strict || (lo..=hi).contains(&op.val);
        let immediate = if self.config.rules.immediate_prefix(mode) {
            op.mode == AddrMode::Imm
        } else {
            op.is_numeric()
        };
        let max_ar = self.config.max_ar() as i32;
        match mode {
            AddrMode::Mam => op.mode.is_indirect() || (cnst && within(0, self.config.data_top() as i32)),
            AddrMode::Sst => {
                let (lo, hi) = self.config.sst_window();
                op.mode.is_indirect() || (cnst && within(lo as i32, hi as i32))
            }
            AddrMode::Ind | AddrMode::Idv => op.mode.is_indirect(),
            AddrMode::Ls4 | AddrMode::Ls4l | AddrMode::Bit => cnst && within(0, 15),
            AddrMode::Ls3 => cnst && within(0, 7),
            AddrMode::Ls0 => cnst && (!strict || matches!(op.val, 0 | 1 | 4)),
            AddrMode::Ls16 => cnst && op.val == 16,
            AddrMode::Ar | AddrMode::Ark | AddrMode::Narp => {
                matches!(op.mode, AddrMode::Arx | AddrMode::Cnst) && within(0, max_ar)
            }
            AddrMode::Pa => matches!(op.mode, AddrMode::Pan | AddrMode::Cnst) && within(0, self.config.max_port() as i32),
            AddrMode::Pa16 => matches!(op.mode, AddrMode::Pan | AddrMode::Cnst) && within(0, 0xFFFF),
            AddrMode::Pm12 => cnst && within(0, self.config.prog_top() as i32),
            AddrMode::Pm16 | AddrMode::Da16 => immediate && within(0, 0xFFFF),
            AddrMode::Ctl => op.control_bit().is_some(),
            AddrMode::Cc => op.is_condition(),
            m => match immediate_range(m) {
                Some((lo, hi)) => immediate && within(lo, hi),
                None => false,
            },
        }
    }

    fn emit(&self, entry: &Entry, ops: &[Operand], slots: Slots, insn: &mut Insn) {
        let mut opcode = entry.opcode;
        let mut extra = None;
        let modes = entry.flags.modes();
        let next_arp = slots[2].filter(|_| modes[2] == AddrMode::Narp).map(|i| ops[i].val);
        for (n, &mode) in modes.iter().enumerate() {
            let op = slots[n].map(|i| &ops[i]);
            let val = op.map_or(0, |o| o.val);
            match mode {
                AddrMode::Mam | AddrMode::Sst | AddrMode::Ind | AddrMode::Idv => {
                    let modify = op.map_or(AddrMode::Arp, |o| o.mode);
                    if modify.is_indirect() {
                        let next = match (mode, next_arp) {
                            (AddrMode::Idv, _) | (_, None) => None,
                            (_, Some(n)) if n < 0 => {
                                insn.set_error(ErrorKind::IllegalRegister);
                                None
                            }
                            (_, Some(n)) => Some(n as u16),
                        };
                        match self.config.rules.encode_indirect(self.config.cpu, modify, next) {
                            Ok(bits) if mode == AddrMode::Idv => opcode |= bits & 0x70,
                            Ok(bits) => opcode |= 0x80 | bits,
                            Err(e) => insn.set_error(e),
                        }
                    } else if mode == AddrMode::Sst {
                        let (lo, hi) = self.config.sst_window();
                        check(insn, val, lo as i32, hi as i32, ErrorKind::OverflowRange);
                        opcode |= val as u16 & 0x7F;
                    } else {
                        check(insn, val, 0, self.config.data_top() as i32, ErrorKind::OverflowRange);
                        opcode |= val as u16 & 0x7F;
                    }
                }
                AddrMode::Ls4 | AddrMode::Bit => {
                    check(insn, val, 0, 15, ErrorKind::OverflowRange);
                    opcode |= (val as u16 & 0xF) << 8;
                }
                AddrMode::Ls3 => {
                    check(insn, val, 0, 7, ErrorKind::OverflowRange);
                    opcode |= (val as u16 & 7) << 8;
                }
                AddrMode::Ls0 => {
                    if !matches!(val, 0 | 1 | 4) {
                        insn.set_error(ErrorKind::OverflowRange);
                    }
                    opcode |= (val as u16 & 7) << 8;
                }
                AddrMode::Ls4l => {
                    check(insn, val, 0, 15, ErrorKind::OverflowRange);
                    opcode |= val as u16 & 0xF;
                }
                AddrMode::Ar => {
                    check(insn, val, 0, self.config.max_ar() as i32, ErrorKind::IllegalRegister);
                    opcode |= (val as u16 & 7) << 8;
                }
                AddrMode::Ark => {
                    check(insn, val, 0, self.config.max_ar() as i32, ErrorKind::IllegalRegister);
                    opcode |= val as u16 & 7;
                }
                AddrMode::Pa => {
                    check(insn, val, 0, self.config.max_port() as i32, ErrorKind::OverflowRange);
                    opcode |= (val as u16 & 0xF) << 8;
                }
                AddrMode::St => {
                    check(insn, val, 0, 1, ErrorKind::OverflowRange);
                    opcode |= (val as u16 & 1) << 8;
                }
                AddrMode::Ui1 | AddrMode::Ui2 | AddrMode::Ui8 | AddrMode::Ui9 | AddrMode::Si13 | AddrMode::Int => {
                    let (lo, hi) = immediate_range(mode).unwrap_or((0, 0));
                    check(insn, val, lo, hi, ErrorKind::OverflowRange);
                    opcode |= val as u16 & field_mask(mode);
                }
                AddrMode::Pm12 => {
                    check(insn, val, 0, self.config.prog_top() as i32, ErrorKind::OverflowRange);
                    extra = Some(val as u16);
                }
                AddrMode::Ui16 | AddrMode::Si16 | AddrMode::Pm16 | AddrMode::Pa16 | AddrMode::Da16 => {
                    let (lo, hi) = immediate_range(mode).unwrap_or((0, 0xFFFF));
                    check(insn, val, lo, hi, ErrorKind::OverflowRange);
                    extra = Some(val as u16);
                }
                AddrMode::Cc => {
                    let rest = slots[n].map_or(&[][..], |i| &ops[i..]);
                    let names: Vec<&str> = rest.iter().map(|o| o.name.as_str()).collect();
                    match cc::encode(&names) {
                        Ok(bits) => opcode |= bits,
                        Err(e) => insn.set_error(e),
                    }
                }
                AddrMode::Ctl => {
                    let rules = self.config.rules;
                    match op.and_then(|o| o.control_bit()) {
                        Some(bit) => {
                            if !rules.control_available(self.config.cpu, bit) {
                                insn.set_error(ErrorKind::IllegalRegister);
                            }
                            match rules.control_code(bit) {
                                Some(code) => opcode |= code,
                                None => insn.set_error(ErrorKind::IllegalRegister),
                            }
                        }
                        None => insn.set_error(ErrorKind::UnknownOperand),
                    }
                }
                // Narp is folded into the memory operand
                _ => {}
            }
        }
        insn.emit_word(opcode);
        if let Some(w) = extra {
            insn.emit_word(w);
        }
    }
}

// bits an immediate occupies in the opcode word
fn field_mask(mode: AddrMode) -> u16 {
    match mode {
        AddrMode::Ui1 => 0x0001,
        AddrMode::Ui2 => 0x0003,
        AddrMode::Ui8 => 0x00FF,
        AddrMode::Ui9 => 0x01FF,
        AddrMode::Si13 => 0x1FFF,
        AddrMode::Int => 0x001F,
        _ => 0,
    }
}

fn check(insn: &mut Insn, val: i32, lo: i32, hi: i32, kind: ErrorKind) {
    if !(lo..=hi).contains(&val) {
        insn.set_error(kind);
    }
}

// legal values for the plain immediate shapes
fn immediate_range(mode: AddrMode) -> Option<(i32, i32)> {
    let r = match mode {
        AddrMode::Ui1 | AddrMode::St => (0, 1),
        AddrMode::Ui2 => (0, 3),
        AddrMode::Ui8 => (0, 0xFF),
        AddrMode::Ui9 => (0, 0x1FF),
        AddrMode::Si13 => (-0x1000, 0x0FFF),
        AddrMode::Int => (0, 31),
        AddrMode::Ui16 => (-0x8000, 0xFFFF),
        AddrMode::Si16 => (-0x8000, 0x7FFF),
        _ => return None,
    };
    Some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ArrayMemory;
    use crate::symbols::SymbolMap;
    use crate::tms320::disasm::Disassembler;

    fn asm(cpu: CpuType, text: &str) -> Insn {
        let (name, operands) = text.split_once(' ').unwrap_or((text, ""));
        InsnAssembler::new(cpu).encode(0, name, operands, None)
    }

    #[test]
    fn memory_operands() {
        assert_eq!(asm(CpuType::Tms32010, "ADD *+,3,AR1").words(), &[0x03A1]);
        assert_eq!(asm(CpuType::Tms32010, "ADD *+").words(), &[0x00A8]);
        assert_eq!(asm(CpuType::Tms32010, "add 5,1").words(), &[0x0105]);
        assert_eq!(asm(CpuType::Tms320C25, "ADD *BR0+,AR2").words(), &[0x00FA]);
        assert_eq!(asm(CpuType::Tms320C25, "LAR AR3,*-,AR4").words(), &[0x339C]);
        assert_eq!(asm(CpuType::Tms32010, "SACH *,4").words(), &[0x5C88]);
        let insn = asm(CpuType::Tms32010, "SACH *,2");
        assert_eq!(insn.error, Some(ErrorKind::OverflowRange));
    }

    #[test]
    fn errors_by_kind() {
        assert_eq!(asm(CpuType::Tms32010, "FOO 1").error, Some(ErrorKind::UnknownInstruction));
        assert_eq!(asm(CpuType::Tms32010, "ADD AR1").error, Some(ErrorKind::OperandNotAllowed));
        assert_eq!(asm(CpuType::Tms32010, "LACK 300").error, Some(ErrorKind::OverflowRange));
        assert_eq!(asm(CpuType::Tms32010, "ADD *0+").error, Some(ErrorKind::OperandNotAllowed));
        assert_eq!(asm(CpuType::Tms32020, "ADD *BR0+").error, Some(ErrorKind::OperandNotAllowed));
        assert_eq!(asm(CpuType::Tms32010, "LARK AR2,5").error, Some(ErrorKind::IllegalRegister));
        assert_eq!(asm(CpuType::Tms32010, "SST 0x10").error, Some(ErrorKind::OverflowRange));
        assert_eq!(asm(CpuType::Tms32010, "B LATER").error, Some(ErrorKind::Reference));
        assert_eq!(asm(CpuType::Tms32010, "ADD *+,(").error, Some(ErrorKind::UnknownOperand));
    }

    #[test]
    fn sst_window() {
        assert_eq!(asm(CpuType::Tms32015, "SST 0x90").words(), &[0x7C10]);
        let insn = asm(CpuType::Tms32010, "SST 0x90");
        assert_eq!(insn.words(), &[0x7C10]);
        assert_eq!(insn.error, Some(ErrorKind::OverflowRange));
        assert_eq!(asm(CpuType::Tms320C25, "SST 0x10").words(), &[0x7810]);
    }

    #[test]
    fn immediate_forms_on_c2xx() {
        assert_eq!(asm(CpuType::Tms320C20x, "ADD #5").words(), &[0xB805]);
        assert_eq!(asm(CpuType::Tms320C20x, "ADD #300").words(), &[0xBF90, 300]);
        assert_eq!(asm(CpuType::Tms320C20x, "ADD #0x1234,4").words(), &[0xBF94, 0x1234]);
        assert_eq!(asm(CpuType::Tms320C20x, "ADD 5").words(), &[0x2005]);
        assert_eq!(asm(CpuType::Tms320C20x, "ADD 5,16").words(), &[0x6105]);
        assert_eq!(asm(CpuType::Tms320C20x, "LAR AR1,#5").words(), &[0xB105]);
        assert_eq!(asm(CpuType::Tms320C20x, "LAR AR1,#0x1000").words(), &[0xBF09, 0x1000]);
        assert_eq!(asm(CpuType::Tms320C20x, "LAR AR1,5").words(), &[0x0105]);
        assert_eq!(asm(CpuType::Tms320C20x, "MPY #-1").words(), &[0xDFFF]);
        assert_eq!(asm(CpuType::Tms320C20x, "BLDD #0x300,5").words(), &[0xA805, 0x0300]);
        assert_eq!(asm(CpuType::Tms320C20x, "BLDD 5,#0x300").words(), &[0xA905, 0x0300]);
        assert_eq!(asm(CpuType::Tms32010, "MPYK -1").words(), &[0x9FFF]);
        assert_eq!(asm(CpuType::Tms32010, "LACK #5").words(), &[0x7E05]);
    }

    #[test]
    fn conditions_and_control_bits() {
        assert_eq!(asm(CpuType::Tms320C20x, "BCND 0x100,LEQ,OV,C").words(), &[0xE3FF, 0x0100]);
        assert_eq!(asm(CpuType::Tms320C20x, "BCND 0x100,UNC").words(), &[0xE300, 0x0100]);
        assert_eq!(asm(CpuType::Tms320C20x, "RETC NEQ").words(), &[0xEF80]);
        assert_eq!(asm(CpuType::Tms320C20x, "CC 0x100,EQ,LT").error, Some(ErrorKind::OperandNotAllowed));
        assert_eq!(asm(CpuType::Tms320C20x, "SETC SXM").words(), &[0xBE47]);
        assert_eq!(asm(CpuType::Tms320C20x, "CLRC C").words(), &[0xBE4E]);
        assert_eq!(asm(CpuType::Tms320C20x, "SETC HM").error, Some(ErrorKind::IllegalRegister));
        assert_eq!(asm(CpuType::Tms320C25, "SETC C").words(), &[0xCE31]);
        let insn = asm(CpuType::Tms32020, "SETC C");
        assert_eq!(insn.words(), &[0xCE31]);
        assert_eq!(insn.error, Some(ErrorKind::IllegalRegister));
        assert_eq!(asm(CpuType::Tms32020, "CLRC INTM").words(), &[0xCE00]);
    }

    #[test]
    fn branches_and_symbols() {
        let mut syms = SymbolMap::new();
        syms.add_symbol(0x0123, "LOOP");
        let a = InsnAssembler::new(CpuType::Tms320C25);
        assert_eq!(a.encode(0, "B", "LOOP", Some(&syms)).words(), &[0xFF80, 0x0123]);
        assert_eq!(a.encode(0, "BANZ", "LOOP,*-,AR1", Some(&syms)).words(), &[0xFB99, 0x0123]);
        assert_eq!(a.encode(0x10, "B", "$+2", None).words(), &[0xFF80, 0x0012]);
        assert_eq!(a.encode(0, "B", "0x100,AR1", None).error, Some(ErrorKind::OperandNotAllowed));
        assert_eq!(asm(CpuType::Tms32010, "B 0x1000").error, Some(ErrorKind::OverflowRange));
        assert_eq!(asm(CpuType::Tms320C25, "NORM").words(), &[0xCE82]);
        assert_eq!(asm(CpuType::Tms320C25, "NORM *+").words(), &[0xCEA2]);
    }

    // decoded text assembles back to the same words, or to an equivalent or shorter form
    #[test]
    fn decoded_text_reassembles() {
        for cpu in [
            CpuType::Tms32010,
            CpuType::Tms32015,
            CpuType::Tms32020,
            CpuType::Tms320C25,
            CpuType::Tms320C26,
            CpuType::Tms320C20x,
        ] {
            let d = Disassembler::new(cpu);
            let a = InsnAssembler::new(cpu);
            for op in (0..=0xFFFFu16).step_by(7) {
                let words = [op, 0x0123];
                let mut mem = ArrayMemory::new(0, &words);
                let orig = d.decode(&mut mem, None);
                if !orig.is_ok() {
                    continue;
                }
                let re = a.encode(0, &orig.name, &orig.operands, None);
                assert!(re.is_ok(), "{:?} {:04X} {} {:?}", cpu, op, orig.text(), re.error);
                if re.words() != orig.words() {
                    let mut mem = ArrayMemory::new(0, re.words());
                    let again = d.decode(&mut mem, None);
                    assert!(
                        again.text() == orig.text() || re.len() < orig.len(),
                        "{:?} {:04X} {} -> {:04X?}",
                        cpu,
                        op,
                        orig.text(),
                        re.words()
                    );
                }
            }
        }
    }
}
