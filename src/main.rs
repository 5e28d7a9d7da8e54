//! # A table-driven TMS320 assembler and disassembler written in Rust.
//!
//! Covers the TMS32010/15, TMS32020, TMS320C25/C26 and TMS320C20x.
//!
//! ## Getting Started
//! To assemble a program:
//! ```text
//! cargo run -- --cpu 320C25 -l /path/to/program.asm
//! ```
//! To disassemble machine code (Intel HEX or raw big-endian words):
//! ```text
//! tms320 --cpu 32010 --org 0x20 --sym program.sym /path/to/program.bin
//! ```
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod assembler;
mod config;
mod error;
mod hex;
mod insn;
mod memory;
mod program;
mod symbols;
mod table;
mod tms320;
use crate::assembler::Assembler;
use crate::memory::{words_from_bytes, ArrayMemory, DisMemory};
use crate::symbols::{SymbolMap, SymbolTable};
use crate::tms320::{CpuType, DisOptions, Disassembler};
use hex::HexRecordCollection;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::result::Result;
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // process_file does all the work
    if let Err(e) = process_file(config::ARGS.file.as_str()) {
        println!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}

fn selected_cpu() -> Result<CpuType, Error> {
    tms320::table::search_cpu(&config::ARGS.cpu).ok_or_else(|| {
        Error::new(
            ErrorKind::UnsupportedCpu,
            &format!("unsupported CPU \"{}\"", config::ARGS.cpu),
        )
    })
}

/// process_file drives the top level functionality (assemble or disassemble) of the app
fn process_file(filename: &str) -> Result<(), Error> {
    let cpu = selected_cpu()?;
    let path = Path::new(filename);
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "asm" | "s" => {
            // the file looks like assembly source code, so try to assemble it
            info!("Assembling {} for TMS{}", filename, tms320::table::cpu(cpu).name);
            let program = Assembler::new(cpu, config::ARGS.org).assemble_from_file(filename)?;
            info!("Assembled {} words", program.size());
        }
        "hex" => {
            let hex = HexRecordCollection::read_from_file(path)?;
            let (origin, words) = hex.to_words(config::byte_order())?;
            info!("Loaded {} words at {:04X} from {}", words.len(), origin, filename);
            disassemble(cpu, origin, &words)?;
        }
        "bin" => {
            let bytes = std::fs::read(path)?;
            let words = words_from_bytes(&bytes, config::byte_order())?;
            info!("Loaded {} words from {}", words.len(), filename);
            disassemble(cpu, config::ARGS.org, &words)?;
        }
        _ => return Err(general_err!("unrecognized file type")),
    }
    Ok(())
}

/// Print every instruction in a word image. Symbols from `--sym` label their
/// addresses and stand in for numeric branch targets.
fn disassemble(cpu: CpuType, origin: u32, words: &[u16]) -> Result<(), Error> {
    let syms = match config::ARGS.sym.as_deref() {
        Some(file) => {
            let syms = SymbolMap::load(file)?;
            verbose_println!("Loaded {} symbols from {}", syms.len(), file);
            Some(syms)
        }
        None => None,
    };
    let symtab = syms.as_ref().map(|s| s as &dyn SymbolTable);
    let mut dis = Disassembler::new(cpu);
    dis.options = DisOptions {
        use_ar_name: config::use_ar_name(),
        use_port_name: config::use_port_name(),
    };
    let mut mem = ArrayMemory::new(origin, words);
    let mut errors = 0usize;
    while mem.has_next() {
        let insn = dis.decode(&mut mem, symtab);
        if let Some(label) = symtab.and_then(|s| s.lookup_value(insn.address)) {
            println!("{}:", label);
        }
        println!("{}", insn);
        if !insn.is_ok() {
            errors += 1;
        }
    }
    if errors > 0 {
        warn!("{} words could not be decoded as valid instructions", errors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;

    #[test]
    fn various_programs() -> Result<(), Error> {
        // assemble each .asm file in the ./test directory for the CPU its CPU directive names
        const TEST_PATH: &str = "test";
        println!("Attempting to assemble all .asm files in {}", TEST_PATH);
        let mut entries = fs::read_dir(TEST_PATH)?
            .map(|res| res.map(|e| e.path()))
            .collect::<Result<Vec<_>, io::Error>>()?;
        entries.sort();
        let mut count = 0;
        for e in entries {
            if !e.is_file() || e.extension().and_then(OsStr::to_str) != Some("asm") {
                continue;
            }
            let name = e.to_str().ok_or(general_err!("bad path"))?;
            let program = Assembler::new(CpuType::Tms32010, 0).assemble_from_file(name)?;
            assert!(program.size() > 0, "{} produced no code", name);
            // every word the assembler placed decodes back to its source mnemonic
            let cpu = program
                .lines
                .iter()
                .filter(|l| l.get_operation() == "CPU")
                .last()
                .and_then(|l| tms320::table::search_cpu(l.get_operand()))
                .unwrap_or(CpuType::Tms32010);
            let dis = Disassembler::new(cpu);
            for line in program.lines.iter().filter(|l| !l.words.is_empty() && l.get_operation() != "WORD") {
                let mut mem = ArrayMemory::new(line.addr, &line.words);
                let insn = dis.decode(&mut mem, None);
                assert!(insn.is_ok(), "{} line {}: {}", name, line.src_line_num, insn);
                assert_eq!(insn.name, line.get_operation(), "{} line {}", name, line.src_line_num);
            }
            count += 1;
        }
        assert!(count > 0);
        Ok(())
    }

    #[test]
    fn raw_words_disassemble() -> Result<(), Error> {
        let words = words_from_bytes(&[0x7F, 0x80, 0xF9, 0x00, 0x00, 0x20], memory::ByteOrder::BigEndian)?;
        disassemble(CpuType::Tms32010, 0x20, &words)
    }
}
