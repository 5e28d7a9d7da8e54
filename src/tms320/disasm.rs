//! Instruction decoder.
//!
//! Decoding never fails outright: an unknown opcode or a truncated instruction
//! comes back as an [Insn] with its error set, and an operand that is out of
//! range for the selected variant is rendered anyway with the error attached.
use super::cc;
use super::config::{Config, CpuType};
use super::flags::{AddrMode, Entry};
use super::registers::{ar_name, port_name};
use super::table;
use crate::insn::{fmt_hex, Insn};
use crate::memory::DisMemory;
use crate::symbols::SymbolTable;
use crate::ErrorKind;

/// Rendering choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisOptions {
    /// `AR1` rather than `1`
    pub use_ar_name: bool,
    /// `PA3` rather than `3`
    pub use_port_name: bool,
}

impl Default for DisOptions {
    fn default() -> Self {
        DisOptions {
            use_ar_name: true,
            use_port_name: true,
        }
    }
}

pub struct Disassembler {
    config: Config,
    pub options: DisOptions,
}

pub(crate) fn modifier_text(modify: AddrMode) -> &'static str {
    match modify {
        AddrMode::Inc => "*+",
        AddrMode::Dec => "*-",
        AddrMode::Inc0 => "*0+",
        AddrMode::Dec0 => "*0-",
        AddrMode::Ibr0 => "*BR0+",
        AddrMode::Dbr0 => "*BR0-",
        _ => "*",
    }
}

impl Disassembler {
    pub fn new(cpu: CpuType) -> Self {
        Disassembler {
            config: Config::new(cpu),
            options: DisOptions::default(),
        }
    }
    pub fn cpu(&self) -> CpuType { self.config.cpu }
    /// Switch variant by name; the current variant is kept if the name is unknown.
    pub fn set_cpu(&mut self, name: &str) -> Result<(), ErrorKind> {
        let cpu = table::search_cpu(name).ok_or(ErrorKind::UnsupportedCpu)?;
        self.config = Config::new(cpu);
        Ok(())
    }

    /// Decode one instruction starting at the memory cursor.
    pub fn decode(&self, mem: &mut dyn DisMemory, symtab: Option<&dyn SymbolTable>) -> Insn {
        let mut insn = Insn::new(mem.address());
        let opcode = match mem.read_word() {
            Some(w) => w,
            None => {
                insn.set_error(ErrorKind::NoMemory);
                return insn;
            }
        };
        insn.emit_word(opcode);
        let entry = match table::search_opcode(&self.config, opcode) {
            Some(e) => e,
            None => {
                insn.set_error(ErrorKind::UnknownInstruction);
                return insn;
            }
        };
        insn.name.push_str(entry.name);
        for mode in entry.flags.modes() {
            if mode == AddrMode::None || !self.has_value(opcode, mode) {
                continue;
            }
            match self.render(opcode, entry, mode, &mut insn, mem, symtab) {
                Some(text) => insn.add_operand(&text),
                None => break,
            }
        }
        insn
    }

    // operands that read as their default are left out
    fn has_value(&self, opcode: u16, mode: AddrMode) -> bool {
        match mode {
            AddrMode::Ls4 => (opcode >> 8) & 0xF != 0,
            AddrMode::Ls3 | AddrMode::Ls0 => (opcode >> 8) & 7 != 0,
            AddrMode::Ls4l => opcode & 0xF != 0,
            AddrMode::Ind => opcode & 0x7F != 0,
            AddrMode::Narp => {
                bit!(opcode, 7) && self.config.indirect(opcode).and_then(|i| i.next_arp).is_some()
            }
            _ => true,
        }
    }

    fn reg(&self, n: u16) -> String {
        if self.options.use_ar_name {
            ar_name(n)
        } else {
            n.to_string()
        }
    }

    fn port(&self, n: u16) -> String {
        if self.options.use_port_name {
            port_name(n)
        } else {
            n.to_string()
        }
    }

    fn prog(&self, addr: u16, symtab: Option<&dyn SymbolTable>) -> String {
        match symtab.and_then(|s| s.lookup_value(addr as u32)) {
            Some(name) => name.to_string(),
            None => fmt_hex(addr as u32, 4),
        }
    }

    fn indirect(&self, bits: u16) -> String {
        let modify = self.config.indirect(bits).map_or(AddrMode::Arp, |i| i.modify);
        modifier_text(modify).to_string()
    }

    // None if the instruction ran off the end of memory
    fn render(
        &self, opcode: u16, entry: &Entry, mode: AddrMode, insn: &mut Insn, mem: &mut dyn DisMemory,
        symtab: Option<&dyn SymbolTable>,
    ) -> Option<String> {
        let mask = entry.mask();
        let text = match mode {
            AddrMode::Mam | AddrMode::Sst | AddrMode::Ind if bit!(opcode, 7) => self.indirect(opcode),
            AddrMode::Idv => self.indirect(0x80 | (opcode & 0x70)),
            AddrMode::Mam => {
                let addr = opcode & 0x7F;
                if addr > self.config.data_top() {
                    insn.set_error(ErrorKind::OverflowRange);
                }
                fmt_hex(addr as u32, 2)
            }
            AddrMode::Sst => {
                let (lo, hi) = self.config.sst_window();
                let addr = lo | (opcode & 0x7F);
                if addr > hi {
                    insn.set_error(ErrorKind::OverflowRange);
                }
                fmt_hex(addr as u32, 2)
            }
            AddrMode::Ls4 | AddrMode::Bit => ((opcode >> 8) & 0xF).to_string(),
            AddrMode::Ls3 | AddrMode::Ls0 => ((opcode >> 8) & 7).to_string(),
            AddrMode::Ls4l => (opcode & 0xF).to_string(),
            AddrMode::Ls16 => "16".to_string(),
            AddrMode::Ar => self.reg((opcode & mask & 0x0F00) >> 8),
            AddrMode::Ark => self.reg(opcode & mask & 0x000F),
            AddrMode::Pa => {
                let port = (opcode & mask & 0x0F00) >> 8;
                if port > self.config.max_port() {
                    insn.set_error(ErrorKind::OverflowRange);
                }
                self.port(port)
            }
            AddrMode::Ui1 => (opcode & 1).to_string(),
            AddrMode::St => ((opcode >> 8) & 1).to_string(),
            AddrMode::Ui2 => (opcode & 3).to_string(),
            AddrMode::Ui8 => fmt_hex((opcode & 0xFF) as u32, 2),
            AddrMode::Ui9 => (opcode & 0x1FF).to_string(),
            AddrMode::Si13 => ((((opcode & 0x1FFF) << 3) as i16) >> 3).to_string(),
            AddrMode::Int => (opcode & 0x1F).to_string(),
            AddrMode::Cc => cc::decode(opcode & 0x3FF),
            AddrMode::Ctl => match self.config.rules.control_bit(opcode) {
                Some(bit) => {
                    if !self.config.rules.control_available(self.config.cpu, bit) {
                        insn.set_error(ErrorKind::IllegalRegister);
                    }
                    bit.name().to_string()
                }
                None => {
                    insn.set_error(ErrorKind::UnknownOperand);
                    String::new()
                }
            },
            AddrMode::Narp => {
                let n = self.config.indirect(opcode).and_then(|i| i.next_arp).unwrap_or(0);
                self.reg(n)
            }
            m if m.uses_extra_word() => {
                let word = match mem.read_word() {
                    Some(w) => w,
                    None => {
                        insn.set_error(ErrorKind::NoMemory);
                        return None;
                    }
                };
                insn.emit_word(word);
                match m {
                    AddrMode::Si16 => (word as i16).to_string(),
                    AddrMode::Pm12 => {
                        if word > self.config.prog_top() {
                            insn.set_error(ErrorKind::OverflowRange);
                        }
                        self.prog(word, symtab)
                    }
                    AddrMode::Pm16 => self.prog(word, symtab),
                    _ => fmt_hex(word as u32, 4),
                }
            }
            _ => String::new(),
        };
        if self.config.rules.immediate_prefix(mode) {
            Some(format!("#{}", text))
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ArrayMemory;
    use crate::symbols::SymbolMap;
    use std::collections::HashSet;

    fn dis(cpu: CpuType, words: &[u16]) -> Insn {
        let mut mem = ArrayMemory::new(0, words);
        Disassembler::new(cpu).decode(&mut mem, None)
    }

    #[test]
    fn every_opcode_decodes() {
        for cpu in [
            CpuType::Tms32010,
            CpuType::Tms32015,
            CpuType::Tms32020,
            CpuType::Tms320C25,
            CpuType::Tms320C26,
            CpuType::Tms320C20x,
        ] {
            let d = Disassembler::new(cpu);
            for op in 0..=0xFFFFu16 {
                let words = [op, 0x0123];
                let mut mem = ArrayMemory::new(0, &words);
                let insn = d.decode(&mut mem, None);
                assert!(insn.len() >= 1);
                if insn.error == Some(ErrorKind::UnknownInstruction) {
                    assert!(insn.name.is_empty(), "{:?} {:04X}", cpu, op);
                } else {
                    assert!(!insn.name.is_empty(), "{:?} {:04X}", cpu, op);
                }
            }
        }
    }

    #[test]
    fn every_entry_is_reachable() {
        for cpu in [CpuType::Tms32010, CpuType::Tms32020, CpuType::Tms320C25, CpuType::Tms320C20x] {
            let config = Config::new(cpu);
            let hit: HashSet<*const Entry> = (0..=0xFFFFu16)
                .filter_map(|op| table::search_opcode(&config, op))
                .map(|e| e as *const Entry)
                .collect();
            // a derivative's base page may be shadowed; its own page may not
            let page = &table::cpu(cpu).pages()[0];
            for e in page.entries() {
                assert!(hit.contains(&(e as *const Entry)), "{:?} {} {:04X}", cpu, e.name, e.opcode);
            }
        }
    }

    #[test]
    fn sst_page_depends_on_variant() {
        let insn = dis(CpuType::Tms32010, &[0x7C10]);
        assert_eq!(insn.text(), "SST 0x90");
        assert_eq!(insn.error, Some(ErrorKind::OverflowRange));
        let insn = dis(CpuType::Tms32015, &[0x7C10]);
        assert_eq!(insn.text(), "SST 0x90");
        assert!(insn.is_ok());
        assert_eq!(dis(CpuType::Tms320C25, &[0x7810]).text(), "SST 0x10");
        assert_eq!(dis(CpuType::Tms320C20x, &[0x8F10]).text(), "SST #1,0x10");
    }

    #[test]
    fn compound_condition() {
        let insn = dis(CpuType::Tms320C20x, &[0xE3FF, 0x1234]);
        assert_eq!(insn.text(), "BCND 0x1234,LEQ,OV,C");
        assert_eq!(insn.words(), &[0xE3FF, 0x1234]);
        assert_eq!(dis(CpuType::Tms320C20x, &[0xEF00]).text(), "RET");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xEF00 | 0x0008]).error, Some(ErrorKind::UnknownInstruction));
        assert_eq!(dis(CpuType::Tms320C20x, &[0xEF88]).text(), "RETC EQ");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xEC88]).text(), "RETC BIO,EQ");
        // condition bit outside its mask
        assert_eq!(dis(CpuType::Tms320C20x, &[0xE301, 0]).error, Some(ErrorKind::UnknownInstruction));
    }

    #[test]
    fn control_bits() {
        let insn = dis(CpuType::Tms32020, &[0xCE31]);
        assert_eq!(insn.text(), "SETC C");
        assert_eq!(insn.error, Some(ErrorKind::IllegalRegister));
        let insn = dis(CpuType::Tms320C25, &[0xCE31]);
        assert_eq!(insn.text(), "SC");
        assert!(insn.is_ok());
        assert_eq!(dis(CpuType::Tms32020, &[0xCE00]).text(), "EINT");
        let insn = dis(CpuType::Tms320C20x, &[0xBE49]);
        assert_eq!(insn.text(), "SETC HM");
        assert_eq!(insn.error, Some(ErrorKind::IllegalRegister));
        assert_eq!(dis(CpuType::Tms320C20x, &[0xBE46]).text(), "CLRC SXM");
    }

    #[test]
    fn indirect_modifiers_on_3201x() {
        let unknown: Vec<u16> = (0..8u16)
            .filter(|idv| dis(CpuType::Tms32010, &[0x0088 | (idv << 4)]).error == Some(ErrorKind::UnknownInstruction))
            .collect();
        assert_eq!(unknown, vec![3]);
        assert_eq!(dis(CpuType::Tms32010, &[0x00E8]).text(), "ADD *+");
        assert_eq!(dis(CpuType::Tms32010, &[0x00F8]).text(), "ADD *");
    }

    #[test]
    fn indirect_and_next_arp() {
        assert_eq!(dis(CpuType::Tms32010, &[0x00A1]).text(), "ADD *+,AR1");
        assert_eq!(dis(CpuType::Tms32010, &[0x03A1]).text(), "ADD *+,3,AR1");
        assert_eq!(dis(CpuType::Tms32010, &[0x00A8]).text(), "ADD *+");
        assert_eq!(dis(CpuType::Tms32010, &[0x0105]).text(), "ADD 0x05,1");
        assert_eq!(dis(CpuType::Tms32010, &[0x4388]).text(), "IN *,PA3");
        assert_eq!(dis(CpuType::Tms320C25, &[0x00FA]).text(), "ADD *BR0+,AR2");
        assert_eq!(dis(CpuType::Tms32020, &[0x00F2]).error, Some(ErrorKind::UnknownInstruction));
        assert_eq!(dis(CpuType::Tms320C25, &[0x00B0]).error, Some(ErrorKind::UnknownInstruction));
        assert_eq!(dis(CpuType::Tms320C25, &[0xCEA2]).text(), "NORM *+");
        assert_eq!(dis(CpuType::Tms32020, &[0xCE82]).text(), "NORM");

        let mut d = Disassembler::new(CpuType::Tms32010);
        d.options.use_ar_name = false;
        d.options.use_port_name = false;
        let words = [0x03A1, 0x4388];
        let mut mem = ArrayMemory::new(0, &words);
        assert_eq!(d.decode(&mut mem, None).text(), "ADD *+,3,1");
        assert_eq!(d.decode(&mut mem, None).text(), "IN *,3");
    }

    #[test]
    fn immediates() {
        assert_eq!(dis(CpuType::Tms32010, &[0x7E05]).text(), "LACK 0x05");
        assert_eq!(dis(CpuType::Tms32010, &[0x9FFF]).text(), "MPYK -1");
        assert_eq!(dis(CpuType::Tms32010, &[0x8FFF]).text(), "MPYK 4095");
        assert_eq!(dis(CpuType::Tms32010, &[0x6881]).text(), "LARP AR1");
        assert_eq!(dis(CpuType::Tms320C25, &[0xD102, 0x0040]).text(), "ADLK 0x0040,1");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xB905]).text(), "LACL #0x05");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xBF80, 0x1234]).text(), "LACC #0x1234");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xBF94, 0x1234]).text(), "ADD #0x1234,4");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xDFFF]).text(), "MPY #-1");
        assert_eq!(dis(CpuType::Tms320C20x, &[0x6105]).text(), "ADD 0x05,16");
        assert_eq!(dis(CpuType::Tms320C20x, &[0xBE7F]).text(), "INTR 31");
        assert_eq!(dis(CpuType::Tms320C26, &[0xCE3E]).text(), "CONF 2");
    }

    #[test]
    fn program_addresses() {
        let mut syms = SymbolMap::new();
        syms.add_symbol(0x0100, "LOOP");
        let d = Disassembler::new(CpuType::Tms320C25);
        let words = [0xFF80, 0x0100, 0xFF89, 0x0200];
        let mut mem = ArrayMemory::new(0x40, &words);
        let insn = d.decode(&mut mem, Some(&syms));
        assert_eq!((insn.address, insn.text().as_str()), (0x40, "B LOOP"));
        let insn = d.decode(&mut mem, Some(&syms));
        assert_eq!((insn.address, insn.text().as_str()), (0x42, "B 0x0200,*,AR1"));
        assert!(!mem.has_next());
        assert_eq!(dis(CpuType::Tms32010, &[0xF900, 0x0FFF]).text(), "B 0x0FFF");
        let insn = dis(CpuType::Tms32010, &[0xF900, 0x1000]);
        assert_eq!(insn.error, Some(ErrorKind::OverflowRange));
    }

    #[test]
    fn truncated_and_unknown() {
        let insn = dis(CpuType::Tms320C25, &[0xFF80]);
        assert_eq!(insn.name, "B");
        assert_eq!(insn.error, Some(ErrorKind::NoMemory));
        assert_eq!(insn.words(), &[0xFF80]);
        assert_eq!(dis(CpuType::Tms32010, &[]).error, Some(ErrorKind::NoMemory));
        assert_eq!(dis(CpuType::Tms32010, &[0x7F83]).error, Some(ErrorKind::UnknownInstruction));
    }

    #[test]
    fn switch_cpu_by_name() {
        let mut d = Disassembler::new(CpuType::Tms32010);
        assert_eq!(d.set_cpu("TMS320C25"), Ok(()));
        assert_eq!(d.cpu(), CpuType::Tms320C25);
        assert_eq!(d.set_cpu("8086"), Err(ErrorKind::UnsupportedCpu));
        assert_eq!(d.cpu(), CpuType::Tms320C25);
    }
}
