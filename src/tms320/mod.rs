//! The TMS320 family: TMS32010/15, TMS32020, TMS320C25/C26 and TMS320C20x.
pub mod asm;
pub mod cc;
pub mod config;
pub mod disasm;
pub mod flags;
pub mod parse;
pub mod registers;
pub mod table;

pub use asm::InsnAssembler;
pub use config::CpuType;
pub use disasm::{DisOptions, Disassembler};
