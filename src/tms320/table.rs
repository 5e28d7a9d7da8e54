//! Opcode tables for every supported variant.
//!
//! Rows are matched in declaration order, so a more specific row (a fixed
//! opcode) must precede the general row whose mask covers it. Within a page the
//! name index keeps that order too, which is how the assembler prefers the short
//! form of an instruction when several forms accept the same operands.
//!
//! Where two rows of one page accept the same word, the earlier row's variable
//! mask is a strict subset of the later one's. The overlaps are:
//! - `NOP` inside `MAR` (0x5500 on 3202x, 0x8B00 on C2xx) and `LARP` inside `MAR`
//! - `ZAC` inside `LACK` at 0xCA00 (3202x)
//! - the 3202x set/reset group, `EINT` through `CMPL`, inside the trailing
//!   `CLRC`/`SETC` aliases; `SPM` and `FORT` sit under their mask too but carry
//!   no valid control-bit code
//! - `RET` inside `RETC` at 0xEF00 (C2xx)
use super::config::{Config, CpuType};
use super::flags::{AddrMode::*, CodeFormat::*, Entry as E};
use crate::table::{search_cpu_name, Cpu};
use lazy_static::lazy_static;

#[rustfmt::skip]
static TABLE_3201X: &[E] = &[
    E::new(0x7F80, "NOP",  Cf0000, None, None, None),
    E::new(0x7F81, "DINT", Cf0000, None, None, None),
    E::new(0x7F82, "EINT", Cf0000, None, None, None),
    E::new(0x7F88, "ABS",  Cf0000, None, None, None),
    E::new(0x7F89, "ZAC",  Cf0000, None, None, None),
    E::new(0x7F8A, "ROVM", Cf0000, None, None, None),
    E::new(0x7F8B, "SOVM", Cf0000, None, None, None),
    E::new(0x7F8C, "CALA", Cf0000, None, None, None),
    E::new(0x7F8D, "RET",  Cf0000, None, None, None),
    E::new(0x7F8E, "PAC",  Cf0000, None, None, None),
    E::new(0x7F8F, "APAC", Cf0000, None, None, None),
    E::new(0x7F90, "SPAC", Cf0000, None, None, None),
    E::new(0x7F9C, "PUSH", Cf0000, None, None, None),
    E::new(0x7F9D, "POP",  Cf0000, None, None, None),
    E::new(0x0000, "ADD",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x1000, "SUB",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x2000, "LAC",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x3000, "SAR",  Cf01FF, Ar,   Mam,  Narp),
    E::new(0x3800, "LAR",  Cf01FF, Ar,   Mam,  Narp),
    E::new(0x4000, "IN",   Cf07FF, Mam,  Pa,   Narp),
    E::new(0x4800, "OUT",  Cf07FF, Mam,  Pa,   Narp),
    E::new(0x5000, "SACL", Cf00FF, Mam,  None, Narp),
    E::new(0x5800, "SACH", Cf07FF, Mam,  Ls0,  Narp),
    E::new(0x6000, "ADDH", Cf00FF, Mam,  None, Narp),
    E::new(0x6100, "ADDS", Cf00FF, Mam,  None, Narp),
    E::new(0x6200, "SUBH", Cf00FF, Mam,  None, Narp),
    E::new(0x6300, "SUBS", Cf00FF, Mam,  None, Narp),
    E::new(0x6400, "SUBC", Cf00FF, Mam,  None, Narp),
    E::new(0x6500, "ZALH", Cf00FF, Mam,  None, Narp),
    E::new(0x6600, "ZALS", Cf00FF, Mam,  None, Narp),
    E::new(0x6700, "TBLR", Cf00FF, Mam,  None, Narp),
    E::new(0x6880, "LARP", Cf0001, Ark,  None, None),
    E::new(0x6800, "MAR",  Cf00FF, Mam,  None, Narp),
    E::new(0x6900, "DMOV", Cf00FF, Mam,  None, Narp),
    E::new(0x6A00, "LT",   Cf00FF, Mam,  None, Narp),
    E::new(0x6B00, "LTD",  Cf00FF, Mam,  None, Narp),
    E::new(0x6C00, "LTA",  Cf00FF, Mam,  None, Narp),
    E::new(0x6D00, "MPY",  Cf00FF, Mam,  None, Narp),
    E::new(0x6E00, "LDPK", Cf0001, Ui1,  None, None),
    E::new(0x6F00, "LDP",  Cf00FF, Mam,  None, Narp),
    E::new(0x7000, "LARK", Cf01FF, Ar,   Ui8,  None),
    E::new(0x7800, "XOR",  Cf00FF, Mam,  None, Narp),
    E::new(0x7900, "AND",  Cf00FF, Mam,  None, Narp),
    E::new(0x7A00, "OR",   Cf00FF, Mam,  None, Narp),
    E::new(0x7B00, "LST",  Cf00FF, Mam,  None, Narp),
    E::new(0x7C00, "SST",  Cf00FF, Sst,  None, Narp),
    E::new(0x7D00, "TBLW", Cf00FF, Mam,  None, Narp),
    E::new(0x7E00, "LACK", Cf00FF, Ui8,  None, None),
    E::new(0x8000, "MPYK", Cf1FFF, Si13, None, None),
    E::new(0xF400, "BANZ", Cf0000, Pm12, None, None),
    E::new(0xF500, "BV",   Cf0000, Pm12, None, None),
    E::new(0xF600, "BIOZ", Cf0000, Pm12, None, None),
    E::new(0xF800, "CALL", Cf0000, Pm12, None, None),
    E::new(0xF900, "B",    Cf0000, Pm12, None, None),
    E::new(0xFA00, "BLZ",  Cf0000, Pm12, None, None),
    E::new(0xFB00, "BLEZ", Cf0000, Pm12, None, None),
    E::new(0xFC00, "BGZ",  Cf0000, Pm12, None, None),
    E::new(0xFD00, "BGEZ", Cf0000, Pm12, None, None),
    E::new(0xFE00, "BNZ",  Cf0000, Pm12, None, None),
    E::new(0xFF00, "BZ",   Cf0000, Pm12, None, None),
];

#[rustfmt::skip]
static TABLE_3202X: &[E] = &[
    E::new(0x0000, "ADD",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x1000, "SUB",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x2000, "LAC",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x3000, "LAR",  Cf07FF, Ar,   Mam,  Narp),
    E::new(0x3800, "MPY",  Cf00FF, Mam,  None, Narp),
    E::new(0x3900, "SQRA", Cf00FF, Mam,  None, Narp),
    E::new(0x3C00, "LT",   Cf00FF, Mam,  None, Narp),
    E::new(0x3D00, "LTA",  Cf00FF, Mam,  None, Narp),
    E::new(0x3E00, "LTP",  Cf00FF, Mam,  None, Narp),
    E::new(0x3F00, "LTD",  Cf00FF, Mam,  None, Narp),
    E::new(0x4000, "ZALH", Cf00FF, Mam,  None, Narp),
    E::new(0x4100, "ZALS", Cf00FF, Mam,  None, Narp),
    E::new(0x4200, "LACT", Cf00FF, Mam,  None, Narp),
    E::new(0x4400, "SUBH", Cf00FF, Mam,  None, Narp),
    E::new(0x4500, "SUBS", Cf00FF, Mam,  None, Narp),
    E::new(0x4600, "SUBT", Cf00FF, Mam,  None, Narp),
    E::new(0x4700, "SUBC", Cf00FF, Mam,  None, Narp),
    E::new(0x4800, "ADDH", Cf00FF, Mam,  None, Narp),
    E::new(0x4900, "ADDS", Cf00FF, Mam,  None, Narp),
    E::new(0x4A00, "ADDT", Cf00FF, Mam,  None, Narp),
    E::new(0x4B00, "RPT",  Cf00FF, Mam,  None, Narp),
    E::new(0x4C00, "XOR",  Cf00FF, Mam,  None, Narp),
    E::new(0x4D00, "OR",   Cf00FF, Mam,  None, Narp),
    E::new(0x4E00, "AND",  Cf00FF, Mam,  None, Narp),
    E::new(0x5000, "LST",  Cf00FF, Mam,  None, Narp),
    E::new(0x5100, "LST1", Cf00FF, Mam,  None, Narp),
    E::new(0x5200, "LDP",  Cf00FF, Mam,  None, Narp),
    E::new(0x5300, "LPH",  Cf00FF, Mam,  None, Narp),
    E::new(0x5400, "PSHD", Cf00FF, Mam,  None, Narp),
    E::new(0x5500, "NOP",  Cf0000, None, None, None),
    E::new(0x5588, "LARP", Cf0007, Ark,  None, None),
    E::new(0x5500, "MAR",  Cf00FF, Mam,  None, Narp),
    E::new(0x5600, "DMOV", Cf00FF, Mam,  None, Narp),
    E::new(0x5700, "BITT", Cf00FF, Mam,  None, Narp),
    E::new(0x5800, "TBLR", Cf00FF, Mam,  None, Narp),
    E::new(0x5900, "TBLW", Cf00FF, Mam,  None, Narp),
    E::new(0x5A00, "SQRS", Cf00FF, Mam,  None, Narp),
    E::new(0x5B00, "LTS",  Cf00FF, Mam,  None, Narp),
    E::new(0x5C00, "MACD", Cf00FF, Pm16, Mam,  Narp),
    E::new(0x5D00, "MAC",  Cf00FF, Pm16, Mam,  Narp),
    E::new(0x6000, "SACL", Cf07FF, Mam,  Ls3,  Narp),
    E::new(0x6800, "SACH", Cf07FF, Mam,  Ls3,  Narp),
    E::new(0x7000, "SAR",  Cf07FF, Ar,   Mam,  Narp),
    E::new(0x7800, "SST",  Cf00FF, Sst,  None, Narp),
    E::new(0x7900, "SST1", Cf00FF, Sst,  None, Narp),
    E::new(0x7A00, "POPD", Cf00FF, Mam,  None, Narp),
    E::new(0x7C00, "SPL",  Cf00FF, Mam,  None, Narp),
    E::new(0x7D00, "SPH",  Cf00FF, Mam,  None, Narp),
    E::new(0x7E00, "ADRK", Cf00FF, Ui8,  None, None),
    E::new(0x7F00, "SBRK", Cf00FF, Ui8,  None, None),
    E::new(0x8000, "IN",   Cf0FFF, Mam,  Pa,   Narp),
    E::new(0x9000, "BIT",  Cf0FFF, Mam,  Bit,  Narp),
    E::new(0xA000, "MPYK", Cf1FFF, Si13, None, None),
    E::new(0xC000, "LARK", Cf07FF, Ar,   Ui8,  None),
    E::new(0xC800, "LDPK", Cf01FF, Ui9,  None, None),
    E::new(0xCA00, "ZAC",  Cf0000, None, None, None),
    E::new(0xCA00, "LACK", Cf00FF, Ui8,  None, None),
    E::new(0xCB00, "RPTK", Cf00FF, Ui8,  None, None),
    E::new(0xCE00, "EINT", Cf0000, None, None, None),
    E::new(0xCE01, "DINT", Cf0000, None, None, None),
    E::new(0xCE02, "ROVM", Cf0000, None, None, None),
    E::new(0xCE03, "SOVM", Cf0000, None, None, None),
    E::new(0xCE04, "CNFD", Cf0000, None, None, None),
    E::new(0xCE05, "CNFP", Cf0000, None, None, None),
    E::new(0xCE06, "RSXM", Cf0000, None, None, None),
    E::new(0xCE07, "SSXM", Cf0000, None, None, None),
    E::new(0xCE08, "SPM",  Cf0003, Ui2,  None, None),
    E::new(0xCE0C, "RXF",  Cf0000, None, None, None),
    E::new(0xCE0D, "SXF",  Cf0000, None, None, None),
    E::new(0xCE0E, "FORT", Cf0001, Ui1,  None, None),
    E::new(0xCE14, "PAC",  Cf0000, None, None, None),
    E::new(0xCE15, "APAC", Cf0000, None, None, None),
    E::new(0xCE16, "SPAC", Cf0000, None, None, None),
    E::new(0xCE18, "SFL",  Cf0000, None, None, None),
    E::new(0xCE19, "SFR",  Cf0000, None, None, None),
    E::new(0xCE1B, "ABS",  Cf0000, None, None, None),
    E::new(0xCE1C, "PUSH", Cf0000, None, None, None),
    E::new(0xCE1D, "POP",  Cf0000, None, None, None),
    E::new(0xCE1E, "TRAP", Cf0000, None, None, None),
    E::new(0xCE1F, "IDLE", Cf0000, None, None, None),
    E::new(0xCE20, "RTXM", Cf0000, None, None, None),
    E::new(0xCE21, "STXM", Cf0000, None, None, None),
    E::new(0xCE23, "NEG",  Cf0000, None, None, None),
    E::new(0xCE24, "CALA", Cf0000, None, None, None),
    E::new(0xCE25, "BACC", Cf0000, None, None, None),
    E::new(0xCE26, "RET",  Cf0000, None, None, None),
    E::new(0xCE27, "CMPL", Cf0000, None, None, None),
    E::new(0xCE50, "CMPR", Cf0003, Ui2,  None, None),
    E::new(0xCE82, "NORM", Cf0000, None, None, None),
    E::new(0xD000, "LRLK", Cf0F00, Ar,   Ui16, None),
    E::new(0xD001, "LALK", Cf0F00, Ui16, Ls4,  None),
    E::new(0xD002, "ADLK", Cf0F00, Ui16, Ls4,  None),
    E::new(0xD003, "SBLK", Cf0F00, Ui16, Ls4,  None),
    E::new(0xD004, "ANDK", Cf0F00, Ui16, Ls4,  None),
    E::new(0xD005, "ORK",  Cf0F00, Ui16, Ls4,  None),
    E::new(0xD006, "XORK", Cf0F00, Ui16, Ls4,  None),
    E::new(0xE000, "OUT",  Cf0FFF, Mam,  Pa,   Narp),
    E::new(0xF080, "BV",   Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF180, "BGZ",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF280, "BLEZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF380, "BLZ",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF480, "BGEZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF580, "BNZ",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF680, "BZ",   Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF780, "BNV",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF880, "BBZ",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0xF980, "BBNZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xFA80, "BIOZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xFB80, "BANZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xFC00, "BLKP", Cf00FF, Pm16, Mam,  Narp),
    E::new(0xFD00, "BLKD", Cf00FF, Da16, Mam,  Narp),
    E::new(0xFE80, "CALL", Cf00FF, Pm16, Ind,  Narp),
    E::new(0xFF80, "B",    Cf00FF, Pm16, Ind,  Narp),
    // aliases of the set/reset instructions; last so the dedicated names win
    E::new(0xCE00, "CLRC", Cf003E, Ctl,  None, None),
    E::new(0xCE01, "SETC", Cf003E, Ctl,  None, None),
];

#[rustfmt::skip]
static TABLE_320C25: &[E] = &[
    E::new(0x3A00, "MPYA", Cf00FF, Mam,  None, Narp),
    E::new(0x3B00, "MPYS", Cf00FF, Mam,  None, Narp),
    E::new(0x4300, "ADDC", Cf00FF, Mam,  None, Narp),
    E::new(0x4F00, "SUBB", Cf00FF, Mam,  None, Narp),
    E::new(0x5E80, "BC",   Cf00FF, Pm16, Ind,  Narp),
    E::new(0x5F80, "BNC",  Cf00FF, Pm16, Ind,  Narp),
    E::new(0x7B00, "ZALR", Cf00FF, Mam,  None, Narp),
    E::new(0xCC00, "ADDK", Cf00FF, Ui8,  None, None),
    E::new(0xCD00, "SUBK", Cf00FF, Ui8,  None, None),
    E::new(0xCE30, "RC",   Cf0000, None, None, None),
    E::new(0xCE31, "SC",   Cf0000, None, None, None),
    E::new(0xCE32, "RTC",  Cf0000, None, None, None),
    E::new(0xCE33, "STC",  Cf0000, None, None, None),
    E::new(0xCE34, "ROL",  Cf0000, None, None, None),
    E::new(0xCE35, "ROR",  Cf0000, None, None, None),
    E::new(0xCE36, "RFSM", Cf0000, None, None, None),
    E::new(0xCE37, "SFSM", Cf0000, None, None, None),
    E::new(0xCE38, "RHM",  Cf0000, None, None, None),
    E::new(0xCE39, "SHM",  Cf0000, None, None, None),
    E::new(0xCE82, "NORM", Cf0070, Idv,  None, None),
    E::new(0xCF00, "MPYU", Cf00FF, Mam,  None, Narp),
];

#[rustfmt::skip]
static TABLE_320C26: &[E] = &[
    E::new(0xCE3C, "CONF", Cf0003, Ui2,  None, None),
];

#[rustfmt::skip]
static TABLE_320C2XX: &[E] = &[
    E::new(0x8B00, "NOP",  Cf0000, None, None, None),
    E::new(0xBE00, "ABS",  Cf0000, None, None, None),
    E::new(0xBE01, "CMPL", Cf0000, None, None, None),
    E::new(0xBE02, "NEG",  Cf0000, None, None, None),
    E::new(0xBE03, "PAC",  Cf0000, None, None, None),
    E::new(0xBE04, "APAC", Cf0000, None, None, None),
    E::new(0xBE05, "SPAC", Cf0000, None, None, None),
    E::new(0xBE09, "SFL",  Cf0000, None, None, None),
    E::new(0xBE0A, "SFR",  Cf0000, None, None, None),
    E::new(0xBE0C, "ROL",  Cf0000, None, None, None),
    E::new(0xBE0D, "ROR",  Cf0000, None, None, None),
    E::new(0xBE20, "BACC", Cf0000, None, None, None),
    E::new(0xBE22, "IDLE", Cf0000, None, None, None),
    E::new(0xBE30, "CALA", Cf0000, None, None, None),
    E::new(0xBE32, "POP",  Cf0000, None, None, None),
    E::new(0xBE3C, "PUSH", Cf0000, None, None, None),
    E::new(0xBE40, "CLRC", Cf000E, Ctl,  None, None),
    E::new(0xBE41, "SETC", Cf000E, Ctl,  None, None),
    E::new(0xBE51, "TRAP", Cf0000, None, None, None),
    E::new(0xBE52, "NMI",  Cf0000, None, None, None),
    E::new(0xBE60, "INTR", Cf001F, Int,  None, None),
    E::new(0xBF00, "SPM",  Cf0003, Ui2,  None, None),
    E::new(0xBF44, "CMPR", Cf0003, Ui2,  None, None),
    // short immediates ahead of the long ones sharing a mnemonic
    E::new(0xB000, "LAR",  Cf07FF, Ar,   Ui8,  None),
    E::new(0xB800, "ADD",  Cf00FF, Ui8,  None, None),
    E::new(0xB900, "LACL", Cf00FF, Ui8,  None, None),
    E::new(0xBA00, "SUB",  Cf00FF, Ui8,  None, None),
    E::new(0xBB00, "RPT",  Cf00FF, Ui8,  None, None),
    E::new(0xBC00, "LDP",  Cf01FF, Ui9,  None, None),
    E::new(0xBF08, "LAR",  Cf0007, Ark,  Ui16, None),
    E::new(0xBF80, "LACC", Cf000F, Ui16, Ls4l, None),
    E::new(0xBF90, "ADD",  Cf000F, Ui16, Ls4l, None),
    E::new(0xBFA0, "SUB",  Cf000F, Ui16, Ls4l, None),
    E::new(0xBFB0, "AND",  Cf000F, Ui16, Ls4l, None),
    E::new(0xBFC0, "OR",   Cf000F, Ui16, Ls4l, None),
    E::new(0xBFD0, "XOR",  Cf000F, Ui16, Ls4l, None),
    E::new(0x0000, "LAR",  Cf07FF, Ar,   Mam,  Narp),
    E::new(0x0A00, "SUBC", Cf00FF, Mam,  None, Narp),
    E::new(0x0B00, "RPT",  Cf00FF, Mam,  None, Narp),
    E::new(0x0C00, "OUT",  Cf00FF, Mam,  Pa16, Narp),
    E::new(0x0D00, "LDP",  Cf00FF, Mam,  None, Narp),
    E::new(0x0E00, "LST",  Cf01FF, St,   Mam,  Narp),
    E::new(0x1000, "LACC", Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x2000, "ADD",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x3000, "SUB",  Cf0FFF, Mam,  Ls4,  Narp),
    E::new(0x4000, "BIT",  Cf0FFF, Mam,  Bit,  Narp),
    E::new(0x5000, "MPYA", Cf00FF, Mam,  None, Narp),
    E::new(0x5100, "MPYS", Cf00FF, Mam,  None, Narp),
    E::new(0x5200, "SQRA", Cf00FF, Mam,  None, Narp),
    E::new(0x5300, "SQRS", Cf00FF, Mam,  None, Narp),
    E::new(0x5400, "MPY",  Cf00FF, Mam,  None, Narp),
    E::new(0x5500, "MPYU", Cf00FF, Mam,  None, Narp),
    E::new(0x6000, "ADDC", Cf00FF, Mam,  None, Narp),
    E::new(0x6100, "ADD",  Cf00FF, Mam,  Ls16, Narp),
    E::new(0x6200, "ADDS", Cf00FF, Mam,  None, Narp),
    E::new(0x6300, "ADDT", Cf00FF, Mam,  None, Narp),
    E::new(0x6400, "SUBB", Cf00FF, Mam,  None, Narp),
    E::new(0x6500, "SUB",  Cf00FF, Mam,  Ls16, Narp),
    E::new(0x6600, "SUBS", Cf00FF, Mam,  None, Narp),
    E::new(0x6700, "SUBT", Cf00FF, Mam,  None, Narp),
    E::new(0x6800, "ZALR", Cf00FF, Mam,  None, Narp),
    E::new(0x6900, "LACL", Cf00FF, Mam,  None, Narp),
    E::new(0x6A00, "LACC", Cf00FF, Mam,  Ls16, Narp),
    E::new(0x6B00, "LACT", Cf00FF, Mam,  None, Narp),
    E::new(0x6C00, "XOR",  Cf00FF, Mam,  None, Narp),
    E::new(0x6D00, "OR",   Cf00FF, Mam,  None, Narp),
    E::new(0x6E00, "AND",  Cf00FF, Mam,  None, Narp),
    E::new(0x6F00, "BITT", Cf00FF, Mam,  None, Narp),
    E::new(0x7000, "LTA",  Cf00FF, Mam,  None, Narp),
    E::new(0x7100, "LTP",  Cf00FF, Mam,  None, Narp),
    E::new(0x7200, "LTD",  Cf00FF, Mam,  None, Narp),
    E::new(0x7300, "LT",   Cf00FF, Mam,  None, Narp),
    E::new(0x7400, "LTS",  Cf00FF, Mam,  None, Narp),
    E::new(0x7500, "LPH",  Cf00FF, Mam,  None, Narp),
    E::new(0x7600, "PSHD", Cf00FF, Mam,  None, Narp),
    E::new(0x7700, "DMOV", Cf00FF, Mam,  None, Narp),
    E::new(0x7800, "ADRK", Cf00FF, Ui8,  None, None),
    E::new(0x7980, "B",    Cf00FF, Pm16, Ind,  Narp),
    E::new(0x7A80, "CALL", Cf00FF, Pm16, Ind,  Narp),
    E::new(0x7B80, "BANZ", Cf00FF, Pm16, Ind,  Narp),
    E::new(0x7C00, "SBRK", Cf00FF, Ui8,  None, None),
    E::new(0x8000, "SAR",  Cf07FF, Ar,   Mam,  Narp),
    E::new(0x8A00, "POPD", Cf00FF, Mam,  None, Narp),
    E::new(0x8B00, "MAR",  Cf00FF, Mam,  None, Narp),
    E::new(0x8C00, "SPL",  Cf00FF, Mam,  None, Narp),
    E::new(0x8D00, "SPH",  Cf00FF, Mam,  None, Narp),
    E::new(0x8E00, "SST",  Cf01FF, St,   Sst,  Narp),
    E::new(0x9000, "SACL", Cf07FF, Mam,  Ls3,  Narp),
    E::new(0x9800, "SACH", Cf07FF, Mam,  Ls3,  Narp),
    E::new(0xA080, "NORM", Cf0070, Idv,  None, None),
    E::new(0xA200, "MAC",  Cf00FF, Pm16, Mam,  Narp),
    E::new(0xA300, "MACD", Cf00FF, Pm16, Mam,  Narp),
    E::new(0xA500, "BLPD", Cf00FF, Pm16, Mam,  Narp),
    E::new(0xA600, "TBLR", Cf00FF, Mam,  None, Narp),
    E::new(0xA700, "TBLW", Cf00FF, Mam,  None, Narp),
    E::new(0xA800, "BLDD", Cf00FF, Da16, Mam,  Narp),
    E::new(0xA900, "BLDD", Cf00FF, Mam,  Da16, Narp),
    E::new(0xAE00, "SPLK", Cf00FF, Ui16, Mam,  Narp),
    E::new(0xAF00, "IN",   Cf00FF, Mam,  Pa16, Narp),
    E::new(0xC000, "MPY",  Cf1FFF, Si13, None, None),
    E::new(0xE000, "BCND", Cf03FF, Pm16, Cc,   None),
    E::new(0xE800, "CC",   Cf03FF, Pm16, Cc,   None),
    E::new(0xEF00, "RET",  Cf0000, None, None, None),
    E::new(0xEC00, "RETC", Cf03FF, Cc,   None, None),
];

lazy_static! {
    /// Every supported variant; a derivative lists its own page ahead of the base page.
    pub static ref CPUS: Vec<Cpu<CpuType, E>> = vec![
        Cpu::new(CpuType::Tms32010, "32010", &[TABLE_3201X]),
        Cpu::new(CpuType::Tms32015, "32015", &[TABLE_3201X]),
        Cpu::new(CpuType::Tms32020, "32020", &[TABLE_3202X]),
        Cpu::new(CpuType::Tms320C25, "320C25", &[TABLE_320C25, TABLE_3202X]),
        Cpu::new(CpuType::Tms320C26, "320C26", &[TABLE_320C26, TABLE_320C25, TABLE_3202X]),
        Cpu::new(CpuType::Tms320C20x, "320C20X", &[TABLE_320C2XX]),
    ];
}

/// The table set for `cpu`.
pub fn cpu(cpu: CpuType) -> &'static Cpu<CpuType, E> {
    // CPUS has one row per CpuType, in declaration order
    &CPUS[cpu as usize]
}

/// Find a variant by name: `32010`, `TMS320C25`, `320c20x`...
pub fn search_cpu(name: &str) -> Option<CpuType> { search_cpu_name(&CPUS, name, "TMS").map(|c| c.variant) }

/// Decode-side lookup.
pub fn search_opcode(config: &Config, opcode: u16) -> Option<&'static E> { cpu(config.cpu).search_opcode(opcode, config) }
