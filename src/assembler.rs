//! Building a TMS320 program from source is a multi-pass process:
//!
//!  1. Split every line into label, operation and operand fields
//!  2. Walk the lines assigning addresses, encoding instructions and defining
//!     labels; forward references use the values the previous pass found
//!  3. Repeat step 2 until a pass defines exactly the symbols the pass before it did
//!
//! Instruction size can depend on operand values (an immediate that fits the
//! short C2xx form on one pass may need the long form once its symbol is known),
//! so moving one label can move every label after it. Errors are collected per
//! line on each pass and only the settled pass's errors are reported.
//!
//! Statement syntax is `[label[:]] operation [operands] [; comment]` with the
//! label starting in column one. Lines whose first non-blank character is `;`
//! or `*` are comments. Directives: `ORG expr`, `label EQU expr`,
//! `WORD expr[,expr...]`, `CPU name` and `END`.
use super::program::{Program, ProgramLine};
use super::symbols::{SymbolMap, SymbolTable};
use super::tms320::parse::{parse_value, split_operands};
use super::tms320::{CpuType, InsnAssembler};
use super::*;

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead};

const MAX_PASSES: usize = 6;

/// Symbols defined so far on this pass, falling back to the previous pass for
/// forward references.
struct PassSymbols<'a> {
    cur: &'a SymbolMap,
    prev: &'a SymbolMap,
}

impl SymbolTable for PassSymbols<'_> {
    fn lookup_value(&self, addr: u32) -> Option<&str> {
        self.cur.lookup_value(addr).or_else(|| self.prev.lookup_value(addr))
    }
    fn lookup_name(&self, name: &str) -> Option<u32> {
        self.cur.lookup_name(name).or_else(|| self.prev.lookup_name(name))
    }
}

/// The container for our assembler methods.
pub struct Assembler {
    cpu: CpuType,
    origin: u32,
    re_comment_or_blank_line: Regex, // matches a line that is blank or only contains a comment
    re_statement: Regex,             // [label[:]] [operation [operand]] [;comment]
}

impl Assembler {
    pub fn new(cpu: CpuType, origin: u32) -> Assembler {
        Assembler {
            cpu,
            origin,
            re_comment_or_blank_line: Regex::new(r"^(?:[ \t]*[*;].*)|^[ \t]*$").unwrap(),
            re_statement: Regex::new(
                r"(?i)^([a-z_.][a-z0-9_.$]*)?:?(?:[ \t]+([^\s;]+))?(?:[ \t]+([^;]*?))?[ \t]*(?:;.*)?$",
            )
            .unwrap(),
        }
    }

    /// Split source lines into fields. Lines that are neither statements nor
    /// comments are syntax errors.
    fn load_lines<I, T>(&self, src: I) -> Result<Vec<ProgramLine>, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut lines = Vec::new();
        for (i, text) in src.into_iter().enumerate() {
            let text = text.as_ref();
            let mut line = ProgramLine::new(i + 1, text);
            if !self.re_comment_or_blank_line.is_match(text) {
                let statement = self
                    .re_statement
                    .captures(text)
                    .ok_or_else(|| syntax_err_line!(i + 1, format!("unrecognized statement \"{}\"", text.trim())))?;
                line.label = statement.get(1).map(|m| m.as_str().to_string());
                // operations are case insensitive; a leading '.' on directives is optional
                line.operation = statement.get(2).map(|m| m.as_str().to_ascii_uppercase());
                line.operand = statement
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty());
            }
            lines.push(line);
        }
        Ok(lines)
    }

    /// Attempt to load and build an assembly language program from a file with the given path.
    pub fn assemble_from_file(&self, path: &str) -> Result<Program, Error> {
        info!("Loading file: {}", path);
        let src = io::BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<String>, io::Error>>()?;
        let program = self.assemble_lines(src)?;
        if config::ARGS.write_files {
            program.write_output_files(path)?;
        }
        Ok(program)
    }

    pub fn assemble_lines<I, T>(&self, src: I) -> Result<Program, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut program = Program::new(self.load_lines(src)?);
        self.assemble_program(&mut program)?;
        Ok(program)
    }

    /// Run passes until the symbol table stops changing, then report the first
    /// error left on any line.
    fn assemble_program(&self, program: &mut Program) -> Result<(), Error> {
        let mut prev = SymbolMap::new();
        for pass_count in 1..=MAX_PASSES {
            verbose_println!("Build pass {}...", pass_count);
            let syms = self.build(program, &prev)?;
            let settled = pass_count > 1 && syms == prev;
            prev = syms;
            if settled {
                program.symbols = prev;
                if let Some(e) = program.lines.iter_mut().find_map(|l| l.err.take()) {
                    return Err(e);
                }
                verbose_println!("Build complete: {} words in {} passes", program.size(), pass_count);
                if config::ARGS.list {
                    program.write_listing(&mut io::stdout())?;
                }
                return Ok(());
            }
        }
        Err(general_err!("Too many build passes; label addresses never settled. Aborting..."))
    }

    /// One pass over the program. Returns the symbols it defined.
    fn build(&self, program: &mut Program, prev: &SymbolMap) -> Result<SymbolMap, Error> {
        let mut syms = SymbolMap::new();
        let mut asm = InsnAssembler::new(self.cpu);
        let mut addr = self.origin;
        let mut ended = false;
        for line in program.lines.iter_mut() {
            line.addr = addr;
            line.words.clear();
            line.err = None;
            if ended || line.is_inert() {
                continue;
            }
            let n = line.src_line_num;
            let operand = line.get_operand().to_string();
            let op = line.get_operation().to_string();
            let symbols = PassSymbols { cur: &syms, prev };
            match op.trim_start_matches('.') {
                "" => {}
                "EQU" => {
                    let label = line
                        .label
                        .clone()
                        .ok_or_else(|| syntax_err_line!(n, "EQU requires a label"))?;
                    let value = Self::value(line, &operand, &symbols, addr)?;
                    define(&mut syms, &label, value as u32, n)?;
                    continue;
                }
                "ORG" => {
                    addr = Self::value(line, &operand, &symbols, addr)? as u32;
                    line.addr = addr;
                }
                "WORD" => {
                    let items = split_operands(&operand).map_err(|k| insn_err_line!(n, k, operand))?;
                    for item in items {
                        let v = Self::value(line, item, &symbols, addr)?;
                        if !(-0x8000..=0xFFFF).contains(&v) && line.err.is_none() {
                            line.err = Some(insn_err_line!(n, ErrorKind::OverflowRange, item.trim()));
                        }
                        line.words.push(v as u16);
                    }
                }
                "CPU" => {
                    asm.set_cpu(&operand).map_err(|k| insn_err_line!(n, k, operand))?;
                    verbose_println!("line {}: CPU {:?}", n, asm.cpu());
                }
                "END" => ended = true,
                _ if !asm.is_instruction(&op) => {
                    line.err = Some(insn_err_line!(n, ErrorKind::UnknownInstruction, op));
                }
                _ => {
                    let insn = asm.encode(addr, &op, &operand, Some(&symbols));
                    line.words.extend_from_slice(insn.words());
                    if let Some(kind) = insn.error {
                        line.err = Some(insn_err_line!(n, kind, line.src.trim()));
                    }
                }
            }
            if let Some(label) = line.label.clone() {
                define(&mut syms, &label, line.addr, n)?;
            }
            addr = addr.wrapping_add(line.words.len() as u32);
        }
        Ok(syms)
    }

    /// Evaluate a directive operand. Failures are recorded on the line (they may
    /// resolve on a later pass) and evaluate to 0.
    fn value(line: &mut ProgramLine, text: &str, symbols: &dyn SymbolTable, addr: u32) -> Result<i32, Error> {
        let n = line.src_line_num;
        if text.trim().is_empty() {
            return Err(syntax_err_line!(
                n,
                format!("no value specified for {}", line.get_operation())
            ));
        }
        let (value, kind) = match parse_value(text, Some(symbols), addr) {
            Ok(v) if v.undefined => (v.value, Some(ErrorKind::Reference)),
            Ok(v) => (v.value, None),
            Err(k) => (0, Some(k)),
        };
        if let Some(kind) = kind {
            if line.err.is_none() {
                line.err = Some(insn_err_line!(n, kind, text.trim()));
            }
        }
        Ok(value)
    }
}

fn define(syms: &mut SymbolMap, label: &str, value: u32, line: usize) -> Result<(), Error> {
    if syms.lookup_name(label).is_some() {
        return Err(syntax_err_line!(line, format!("duplicate label \"{}\"", label)));
    }
    syms.add_symbol(value, label);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(cpu: CpuType, src: &str) -> Result<Program, Error> { Assembler::new(cpu, 0).assemble_lines(src.lines()) }

    const COUNT_LOOP: &str = "\
* counting loop
        ORG   0x10
START   LARK  AR0,10        ; loop count
LOOP:   ADD   *+
        BANZ  LOOP
        B     NEXT
LIMIT   EQU   NEXT-START
NEXT    WORD  0x1234,-1,LIMIT
        END
        NOP
";

    #[test]
    fn labels_and_directives() -> Result<(), Error> {
        let p = assemble(CpuType::Tms32010, COUNT_LOOP)?;
        assert_eq!(p.symbols.lookup_name("START"), Some(0x10));
        assert_eq!(p.symbols.lookup_name("LOOP"), Some(0x11));
        assert_eq!(p.symbols.lookup_name("NEXT"), Some(0x16));
        assert_eq!(p.symbols.lookup_name("LIMIT"), Some(6));
        assert_eq!(
            p.segments(),
            vec![(
                0x10,
                vec![0x700A, 0x00A8, 0xF400, 0x0011, 0xF900, 0x0016, 0x1234, 0xFFFF, 0x0006]
            )]
        );
        // nothing after END is assembled
        assert!(p.lines.last().map_or(false, |l| l.words.is_empty()));
        Ok(())
    }

    #[test]
    fn listing() -> Result<(), Error> {
        let p = assemble(CpuType::Tms32010, COUNT_LOOP)?;
        let mut out: Vec<u8> = Vec::new();
        p.write_listing(&mut out)?;
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("0010: 700A"));
        assert!(text.contains("0012: F400 0011"));
        assert!(text.contains("* counting loop"));
        Ok(())
    }

    #[test]
    fn sizes_settle_after_forward_reference() -> Result<(), Error> {
        let src = "\
* ADD needs its long form once BIG is known
        CPU   320C20X
        ADD   #BIG
HERE    NOP
BIG     EQU   0x1234
";
        let p = assemble(CpuType::Tms32010, src)?;
        assert_eq!(p.symbols.lookup_name("HERE"), Some(2));
        assert_eq!(p.lines[1].get_operation(), "CPU");
        assert_eq!(p.segments(), vec![(0, vec![0xBF90, 0x1234, 0x8B00])]);
        Ok(())
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = |cpu: CpuType, src: &str| assemble(cpu, src).err().map(|e| (e.kind, e.msg));
        let (kind, msg) = err(CpuType::Tms32010, " NOP\n B NOWHERE\n").unwrap_or((ErrorKind::General, String::new()));
        assert_eq!(kind, ErrorKind::Reference);
        assert!(msg.contains("line 2"));
        let e = err(CpuType::Tms32010, "A NOP\nA NOP\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::Syntax));
        let e = err(CpuType::Tms32010, " EQU 5\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::Syntax));
        let e = err(CpuType::Tms32010, " CPU 68000\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::UnsupportedCpu));
        let e = err(CpuType::Tms32010, " WORD 0x10000\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::OverflowRange));
        let e = err(CpuType::Tms32010, " LACK 5\n ZORK\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::UnknownInstruction));
        let e = err(CpuType::Tms32010, "!bad\n");
        assert_eq!(e.map(|e| e.0), Some(ErrorKind::Syntax));
    }

    #[test]
    fn multiple_segments() -> Result<(), Error> {
        let src = " ORG 0x20\n NOP\n .org 0x40\nTOP RET\n";
        let p = Assembler::new(CpuType::Tms32010, 0).assemble_lines(src.lines())?;
        assert_eq!(p.segments(), vec![(0x20, vec![0x7F80]), (0x40, vec![0x7F8D])]);
        assert_eq!(p.symbols.lookup_name("TOP"), Some(0x40));
        Ok(())
    }
}
