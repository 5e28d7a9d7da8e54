//! CPU variants, generations, and the per-generation rules the decoder and encoder consult.
use super::flags::{AddrMode, Entry};
use super::registers::{ControlBit, CONTROL_BITS};
use crate::table::OpcodeMatcher;
use crate::ErrorKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CpuType {
    Tms32010,
    Tms32015,
    Tms32020,
    Tms320C25,
    Tms320C26,
    Tms320C20x,
}

/// Instruction-set generations. Variants of one family share opcode layout rules.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Family {
    Tms3201x,
    Tms3202x,
    Tms320C2xx,
}

impl CpuType {
    pub fn family(self) -> Family {
        match self {
            CpuType::Tms32010 | CpuType::Tms32015 => Family::Tms3201x,
            CpuType::Tms32020 | CpuType::Tms320C25 | CpuType::Tms320C26 => Family::Tms3202x,
            CpuType::Tms320C20x => Family::Tms320C2xx,
        }
    }
    /// highest data memory address
    pub fn data_top(self) -> u16 {
        match self {
            CpuType::Tms32010 => 0x008F,
            CpuType::Tms32015 => 0x00FF,
            _ => 0xFFFF,
        }
    }
}

/// Indirect addressing modifier fields, bits 7-0 of an opcode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Indirect {
    /// one of the parser's indirect shapes (Arp, Inc, Dec, Inc0, Dec0, Ibr0, Dbr0)
    pub modify: AddrMode,
    /// the ARP to load after the access, if any
    pub next_arp: Option<u16>,
}

/// Everything that differs between generations.
pub trait FamilyRules: Sync {
    fn max_ar(&self) -> u16;
    fn max_port(&self) -> u16;
    fn prog_top(&self) -> u16;
    /// decode bits 7-0 of an indirect operand; None for reserved encodings
    fn indirect(&self, cpu: CpuType, bits: u16) -> Option<Indirect>;
    /// bits 6-0 for an indirect operand (bit 7 is the caller's)
    fn encode_indirect(&self, cpu: CpuType, modify: AddrMode, next_arp: Option<u16>) -> Result<u16, ErrorKind>;
    /// lowest and highest address an SST direct operand can reach
    fn sst_window(&self, cpu: CpuType) -> (u16, u16);
    /// the control bit selected by an opcode of a SETC/CLRC entry
    fn control_bit(&self, opcode: u16) -> Option<ControlBit>;
    /// the opcode bits selecting `bit`, if the generation has an encoding for it
    fn control_code(&self, bit: ControlBit) -> Option<u16>;
    fn control_available(&self, cpu: CpuType, bit: ControlBit) -> bool;
    /// immediates of this mode are written with a leading '#'
    fn immediate_prefix(&self, mode: AddrMode) -> bool;
}

pub struct Rules3201x;
pub struct Rules3202x;
pub struct RulesC2xx;

impl FamilyRules for Rules3201x {
    fn max_ar(&self) -> u16 { 1 }
    fn max_port(&self) -> u16 { 7 }
    fn prog_top(&self) -> u16 { 0x0FFF }
    // 1 X INC DEC NAR X X ARP; NAR set means the ARP is left alone.
    // INC and DEC together are reserved unless bit 6 is set, where they cancel.
    fn indirect(&self, _cpu: CpuType, bits: u16) -> Option<Indirect> {
        let ext = bit!(bits, 6);
        let (inc, dec) = match (bit!(bits, 5), bit!(bits, 4)) {
            (true, true) if !ext => return None,
            (true, true) => (false, false),
            pair => pair,
        };
        let next_arp = if bit!(bits, 3) {
            if bits & 1 != 0 {
                return None;
            }
            None
        } else {
            Some(bits & 1)
        };
        let modify = if inc {
            AddrMode::Inc
        } else if dec {
            AddrMode::Dec
        } else {
            AddrMode::Arp
        };
        Some(Indirect { modify, next_arp })
    }
    fn encode_indirect(&self, _cpu: CpuType, modify: AddrMode, next_arp: Option<u16>) -> Result<u16, ErrorKind> {
        let m = match modify {
            AddrMode::Arp => 0x00,
            AddrMode::Inc => 0x20,
            AddrMode::Dec => 0x10,
            _ => return Err(ErrorKind::OperandNotAllowed),
        };
        match next_arp {
            None => Ok(m | 0x08),
            Some(n) if n <= self.max_ar() => Ok(m | n),
            Some(_) => Err(ErrorKind::IllegalRegister),
        }
    }
    // SST always writes page 1
    fn sst_window(&self, cpu: CpuType) -> (u16, u16) { (0x0080, cpu.data_top()) }
    fn control_bit(&self, _opcode: u16) -> Option<ControlBit> { None }
    fn control_code(&self, _bit: ControlBit) -> Option<u16> { None }
    fn control_available(&self, _cpu: CpuType, _bit: ControlBit) -> bool { false }
    fn immediate_prefix(&self, _mode: AddrMode) -> bool { false }
}

// 1 IDV(3) N NARP(3), shared by the later generations
fn indirect_2x(bits: u16, br0: bool) -> Option<Indirect> {
    let modify = match (bits >> 4) & 7 {
        0 => AddrMode::Arp,
        1 => AddrMode::Dec,
        2 => AddrMode::Inc,
        4 if br0 => AddrMode::Dbr0,
        5 => AddrMode::Dec0,
        6 => AddrMode::Inc0,
        7 if br0 => AddrMode::Ibr0,
        _ => return None,
    };
    let next_arp = if bit!(bits, 3) {
        Some(bits & 7)
    } else if bits & 7 != 0 {
        return None;
    } else {
        None
    };
    Some(Indirect { modify, next_arp })
}

fn encode_indirect_2x(modify: AddrMode, next_arp: Option<u16>, br0: bool, max_ar: u16) -> Result<u16, ErrorKind> {
    let idv = match modify {
        AddrMode::Arp => 0,
        AddrMode::Dec => 1,
        AddrMode::Inc => 2,
        AddrMode::Dbr0 if br0 => 4,
        AddrMode::Dec0 => 5,
        AddrMode::Inc0 => 6,
        AddrMode::Ibr0 if br0 => 7,
        _ => return Err(ErrorKind::OperandNotAllowed),
    };
    match next_arp {
        None => Ok(idv << 4),
        Some(n) if n <= max_ar => Ok((idv << 4) | 0x08 | n),
        Some(_) => Err(ErrorKind::IllegalRegister),
    }
}

// SETC/CLRC aliases of the dedicated set/reset instructions: bits 5-1
const CTL_3202X: [(u16, ControlBit); 8] = [
    (0x00, ControlBit::Intm),
    (0x01, ControlBit::Ovm),
    (0x02, ControlBit::Cnf),
    (0x03, ControlBit::Sxm),
    (0x06, ControlBit::Xf),
    (0x18, ControlBit::C),
    (0x19, ControlBit::Tc),
    (0x1C, ControlBit::Hm),
];

impl FamilyRules for Rules3202x {
    fn max_ar(&self) -> u16 { 7 }
    fn max_port(&self) -> u16 { 15 }
    fn prog_top(&self) -> u16 { 0xFFFF }
    fn indirect(&self, cpu: CpuType, bits: u16) -> Option<Indirect> { indirect_2x(bits, cpu != CpuType::Tms32020) }
    fn encode_indirect(&self, cpu: CpuType, modify: AddrMode, next_arp: Option<u16>) -> Result<u16, ErrorKind> {
        encode_indirect_2x(modify, next_arp, cpu != CpuType::Tms32020, self.max_ar())
    }
    // SST always writes page 0
    fn sst_window(&self, _cpu: CpuType) -> (u16, u16) { (0x0000, 0x007F) }
    fn control_bit(&self, opcode: u16) -> Option<ControlBit> {
        let code = (opcode >> 1) & 0x1F;
        CTL_3202X.iter().find(|(c, _)| *c == code).map(|(_, b)| *b)
    }
    fn control_code(&self, bit: ControlBit) -> Option<u16> {
        CTL_3202X.iter().find(|(_, b)| *b == bit).map(|(c, _)| c << 1)
    }
    fn control_available(&self, cpu: CpuType, bit: ControlBit) -> bool {
        match bit {
            ControlBit::C | ControlBit::Tc | ControlBit::Hm => cpu != CpuType::Tms32020,
            _ => true,
        }
    }
    fn immediate_prefix(&self, _mode: AddrMode) -> bool { false }
}

impl FamilyRules for RulesC2xx {
    fn max_ar(&self) -> u16 { 7 }
    fn max_port(&self) -> u16 { 0xFFFF }
    fn prog_top(&self) -> u16 { 0xFFFF }
    fn indirect(&self, _cpu: CpuType, bits: u16) -> Option<Indirect> { indirect_2x(bits, true) }
    fn encode_indirect(&self, _cpu: CpuType, modify: AddrMode, next_arp: Option<u16>) -> Result<u16, ErrorKind> {
        encode_indirect_2x(modify, next_arp, true, self.max_ar())
    }
    fn sst_window(&self, _cpu: CpuType) -> (u16, u16) { (0x0000, 0x007F) }
    // bits 3-1 index the status bits in order
    fn control_bit(&self, opcode: u16) -> Option<ControlBit> { Some(CONTROL_BITS[((opcode >> 1) & 7) as usize]) }
    fn control_code(&self, bit: ControlBit) -> Option<u16> {
        CONTROL_BITS.iter().position(|&b| b == bit).map(|i| (i as u16) << 1)
    }
    // HM belongs to the 320C5x generation
    fn control_available(&self, _cpu: CpuType, bit: ControlBit) -> bool { bit != ControlBit::Hm }
    fn immediate_prefix(&self, mode: AddrMode) -> bool {
        matches!(
            mode,
            AddrMode::St
                | AddrMode::Ui8
                | AddrMode::Ui9
                | AddrMode::Si13
                | AddrMode::Ui16
                | AddrMode::Si16
                | AddrMode::Da16
        )
    }
}

static RULES_3201X: Rules3201x = Rules3201x;
static RULES_3202X: Rules3202x = Rules3202x;
static RULES_C2XX: RulesC2xx = RulesC2xx;

/// The selected variant together with its generation's rules.
#[derive(Clone, Copy)]
pub struct Config {
    pub cpu: CpuType,
    pub rules: &'static dyn FamilyRules,
}

impl Config {
    pub fn new(cpu: CpuType) -> Self {
        let rules: &'static dyn FamilyRules = match cpu.family() {
            Family::Tms3201x => &RULES_3201X,
            Family::Tms3202x => &RULES_3202X,
            Family::Tms320C2xx => &RULES_C2XX,
        };
        Config { cpu, rules }
    }
    pub fn max_ar(&self) -> u16 { self.rules.max_ar() }
    pub fn max_port(&self) -> u16 { self.rules.max_port() }
    pub fn data_top(&self) -> u16 { self.cpu.data_top() }
    pub fn prog_top(&self) -> u16 { self.rules.prog_top() }
    pub fn indirect(&self, bits: u16) -> Option<Indirect> { self.rules.indirect(self.cpu, bits & 0xFF) }
    pub fn sst_window(&self) -> (u16, u16) { self.rules.sst_window(self.cpu) }

    // check that the fields a mode reads hold a legal encoding
    fn field_ok(&self, opcode: u16, mask: u16, mode: AddrMode) -> bool {
        match mode {
            AddrMode::Mam | AddrMode::Sst => !bit!(opcode, 7) || self.indirect(opcode).is_some(),
            AddrMode::Ind => bit!(opcode, 7) && self.indirect(opcode).is_some(),
            AddrMode::Idv => self.indirect(0x80 | (opcode & 0x70)).is_some(),
            AddrMode::Ls0 => matches!((opcode >> 8) & 7, 0 | 1 | 4),
            AddrMode::Ar => ((opcode & mask & 0x0F00) >> 8) <= self.max_ar(),
            AddrMode::Ark => (opcode & mask & 0x000F) <= self.max_ar(),
            AddrMode::Cc => {
                // condition bits are only meaningful under their mask bits
                let cond = opcode & 0x0F;
                let flags = (opcode >> 4) & 0x0F;
                cond & !flags == 0
            }
            AddrMode::Ctl => self.rules.control_bit(opcode).is_some(),
            _ => true,
        }
    }
}

impl OpcodeMatcher<Entry> for Config {
    fn matches(&self, opcode: u16, entry: &Entry) -> bool {
        let mask = entry.mask();
        if (opcode & !mask) != (entry.opcode & !mask) {
            return false;
        }
        entry.flags.modes().iter().all(|&m| self.field_ok(opcode, mask, m))
    }
}
