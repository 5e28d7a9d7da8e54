//! Per-entry metadata: operand shapes and the variable-bit mask, packed into one word.
use crate::table::TableEntry;

/// Operand shapes. Values below 32 may appear in a table; the rest are produced
/// only by the operand parser.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum AddrMode {
    None = 0,
    /// direct (bit 7 clear) or indirect (bit 7 set) data memory, bits 7-0
    Mam = 1,
    /// indirect only, bits 7-0; omitted when it is plain `*` with no ARP change
    Ind = 2,
    /// indirect modifier only, bits 6-4
    Idv = 3,
    /// store-status destination: like Mam but the direct page is fixed per generation
    Sst = 4,
    /// left shift 0-15, bits 11-8
    Ls4 = 5,
    /// left shift 0-7, bits 10-8
    Ls3 = 6,
    /// left shift 0, 1 or 4, bits 10-8
    Ls0 = 7,
    /// left shift 0-15, bits 3-0
    Ls4l = 8,
    /// fixed left shift of 16
    Ls16 = 9,
    /// auxiliary register index, bits 10-8
    Ar = 10,
    /// auxiliary register index, low bits
    Ark = 11,
    /// port index, bits 11-8
    Pa = 12,
    /// 1-bit immediate, bit 0
    Ui1 = 13,
    /// status register number, bit 8
    St = 14,
    /// 2-bit immediate
    Ui2 = 15,
    /// 8-bit immediate
    Ui8 = 16,
    /// 9-bit immediate (data page)
    Ui9 = 17,
    /// 13-bit signed immediate
    Si13 = 18,
    /// 5-bit interrupt number
    Int = 19,
    /// bit code, bits 11-8
    Bit = 20,
    /// unsigned 16-bit immediate in the next word
    Ui16 = 21,
    /// signed 16-bit immediate in the next word
    Si16 = 22,
    /// 12-bit program address in the next word
    Pm12 = 23,
    /// 16-bit program address in the next word
    Pm16 = 24,
    /// 16-bit port address in the next word
    Pa16 = 25,
    /// 16-bit data address in the next word
    Da16 = 26,
    /// compound condition, bits 9-0
    Cc = 27,
    /// control bit
    Ctl = 28,
    /// next ARP (third slot only)
    Narp = 29,

    /* parser only */
    /// `*`
    Arp = 32,
    /// `*+`
    Inc = 33,
    /// `*-`
    Dec = 34,
    /// `*0+`
    Inc0 = 35,
    /// `*0-`
    Dec0 = 36,
    /// `*BR0+`
    Ibr0 = 37,
    /// `*BR0-`
    Dbr0 = 38,
    /// plain numeric expression
    Cnst = 39,
    /// `#` immediate
    Imm = 40,
    /// `ARn`
    Arx = 41,
    /// `PAn`
    Pan = 42,
    /// condition name list
    Ccn = 43,
    /// control bit name
    Ctln = 44,
}

impl AddrMode {
    /// Total decoding of a 5-bit table field; unused values read as None.
    pub const fn from_bits(bits: u16) -> AddrMode {
        use AddrMode::*;
        match bits & 0x1F {
            1 => Mam,
            2 => Ind,
            3 => Idv,
            4 => Sst,
            5 => Ls4,
            6 => Ls3,
            7 => Ls0,
            8 => Ls4l,
            9 => Ls16,
            10 => Ar,
            11 => Ark,
            12 => Pa,
            13 => Ui1,
            14 => St,
            15 => Ui2,
            16 => Ui8,
            17 => Ui9,
            18 => Si13,
            19 => Int,
            20 => Bit,
            21 => Ui16,
            22 => Si16,
            23 => Pm12,
            24 => Pm16,
            25 => Pa16,
            26 => Da16,
            27 => Cc,
            28 => Ctl,
            29 => Narp,
            _ => None,
        }
    }
    /// true for the indirect-addressing shapes the parser produces
    pub fn is_indirect(self) -> bool { (AddrMode::Arp as u8..=AddrMode::Dbr0 as u8).contains(&(self as u8)) }
    /// true for modes that take one extra word after the opcode
    pub fn uses_extra_word(self) -> bool {
        matches!(
            self,
            AddrMode::Ui16 | AddrMode::Si16 | AddrMode::Pm12 | AddrMode::Pm16 | AddrMode::Pa16 | AddrMode::Da16
        )
    }
}

/// Which low bits of an opcode carry operands.
///
/// Each variant is named after its literal mask rather than numbered. There are
/// sixteen, more than the twelve the classic numbering has: the C2xx short
/// forms need 0x000E, 0x000F and 0x001F, and the 3202x aliases need 0x003E.
/// Every discriminant fills the four-bit format field and each is used by some
/// table row, so no index is left unused.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum CodeFormat {
    Cf0000 = 0,
    Cf0001 = 1,
    Cf0003 = 2,
    Cf0007 = 3,
    Cf000E = 4,
    Cf000F = 5,
    Cf001F = 6,
    Cf003E = 7,
    Cf0070 = 8,
    Cf00FF = 9,
    Cf01FF = 10,
    Cf03FF = 11,
    Cf07FF = 12,
    Cf0F00 = 13,
    Cf0FFF = 14,
    Cf1FFF = 15,
}

/// Indexed by [CodeFormat] discriminant.
const MASKS: [u16; 16] = [
    0x0000, 0x0001, 0x0003, 0x0007, 0x000E, 0x000F, 0x001F, 0x003E, 0x0070, 0x00FF, 0x01FF, 0x03FF, 0x07FF,
    0x0F00, 0x0FFF, 0x1FFF,
];

/// mode1 (5 bits) | mode2 (5 bits) << 5 | mode3 is Narp (1 bit) << 10 | format (4 bits) << 11
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Flags(u16);

impl Flags {
    const MODE1: u16 = 0;
    const MODE2: u16 = 5;
    const MODE3: u16 = 10;
    const FORMAT: u16 = 11;

    pub const fn create(cf: CodeFormat, mode1: AddrMode, mode2: AddrMode, mode3: AddrMode) -> Flags {
        let m3 = matches!(mode3, AddrMode::Narp) as u16;
        Flags(
            ((mode1 as u16 & 0x1F) << Self::MODE1)
                | ((mode2 as u16 & 0x1F) << Self::MODE2)
                | (m3 << Self::MODE3)
                | ((cf as u16 & 0xF) << Self::FORMAT),
        )
    }
    pub const fn bits(&self) -> u16 { self.0 }
    pub const fn mode1(&self) -> AddrMode { AddrMode::from_bits(self.0 >> Self::MODE1) }
    pub const fn mode2(&self) -> AddrMode { AddrMode::from_bits(self.0 >> Self::MODE2) }
    pub const fn mode3(&self) -> AddrMode {
        if (self.0 >> Self::MODE3) & 1 != 0 {
            AddrMode::Narp
        } else {
            AddrMode::None
        }
    }
    pub const fn modes(&self) -> [AddrMode; 3] { [self.mode1(), self.mode2(), self.mode3()] }
    pub const fn mask(&self) -> u16 { MASKS[((self.0 >> Self::FORMAT) & 0xF) as usize] }
}

/// One row of an opcode table.
#[derive(Debug)]
pub struct Entry {
    pub opcode: u16,
    pub flags: Flags,
    pub name: &'static str,
}

impl Entry {
    pub const fn new(
        opcode: u16, name: &'static str, cf: CodeFormat, m1: AddrMode, m2: AddrMode, m3: AddrMode,
    ) -> Entry {
        Entry {
            opcode,
            flags: Flags::create(cf, m1, m2, m3),
            name,
        }
    }
    pub const fn mask(&self) -> u16 { self.flags.mask() }
    /// number of words this entry occupies
    pub fn size(&self) -> usize {
        1 + self.flags.modes().iter().filter(|m| m.uses_extra_word()).count()
    }
}

impl TableEntry for Entry {
    fn name(&self) -> &'static str { self.name }
}
