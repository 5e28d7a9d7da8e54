//! An assembled program: the source lines, the address and words each one
//! produced, and the symbols the final pass settled on.
use super::hex::HexRecordCollection;
use super::symbols::SymbolMap;
use super::*;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub struct ProgramLine {
    pub src_line_num: usize,
    pub src: String,
    pub label: Option<String>,
    pub operation: Option<String>,
    pub operand: Option<String>,
    /// word address of the first word this line produced (or would have)
    pub addr: u32,
    pub words: Vec<u16>,
    /// error from the latest pass; only the settled pass's errors are reported
    pub err: Option<Error>,
}

impl ProgramLine {
    pub fn new(src_line_num: usize, src: &str) -> Self {
        ProgramLine {
            src_line_num,
            src: src.to_string(),
            label: None,
            operation: None,
            operand: None,
            addr: 0,
            words: Vec::new(),
            err: None,
        }
    }
    pub fn get_operation(&self) -> &str { self.operation.as_ref().map_or("", String::as_str) }
    pub fn get_operand(&self) -> &str { self.operand.as_ref().map_or("", String::as_str) }
    pub fn is_inert(&self) -> bool { self.label.is_none() && self.operation.is_none() }
}

impl fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.src) }
}

pub struct Program {
    pub lines: Vec<ProgramLine>,
    pub symbols: SymbolMap,
}

impl Program {
    pub fn new(lines: Vec<ProgramLine>) -> Self {
        Program {
            lines,
            symbols: SymbolMap::new(),
        }
    }
    /// Total number of words emitted.
    pub fn size(&self) -> usize { self.lines.iter().map(|l| l.words.len()).sum() }
    /// Runs of consecutive words as `(origin, words)`. A new run starts whenever a
    /// line's address doesn't follow on from the previous line's last word.
    pub fn segments(&self) -> Vec<(u32, Vec<u16>)> {
        let mut segs: Vec<(u32, Vec<u16>)> = Vec::new();
        for line in self.lines.iter().filter(|l| !l.words.is_empty()) {
            match segs.last_mut() {
                Some((origin, words)) if *origin + words.len() as u32 == line.addr => {
                    words.extend_from_slice(&line.words)
                }
                _ => segs.push((line.addr, line.words.clone())),
            }
        }
        segs
    }
    pub fn write_listing(&self, f: &mut dyn io::Write) -> Result<(), io::Error> {
        for line in &self.lines {
            let words: Vec<String> = line.words.iter().map(|w| format!("{:04X}", w)).collect();
            if line.is_inert() {
                writeln!(f, "{:4} {:17} {line}", line.src_line_num, "")?;
            } else {
                writeln!(f, "{:4} {:04X}: {:10}  {line}", line.src_line_num, line.addr, words.join(" "))?;
            }
        }
        Ok(())
    }
    /// `ADDR,NAME` per line, sorted by address; the format `SymbolMap::load` reads.
    pub fn write_symbols(&self, f: &mut dyn io::Write) -> Result<(), io::Error> {
        let mut syms = self.symbols.all();
        syms.sort();
        for (addr, name) in syms {
            writeln!(f, "{:04X},{}", addr, name)?;
        }
        Ok(())
    }
    pub fn write_hex(&self, f: &mut dyn io::Write) -> Result<(), Error> {
        let mut hf = HexRecordCollection::new();
        for (origin, words) in self.segments() {
            hf.add_words(origin, &words, config::byte_order())?;
        }
        hf.add_eof();
        hf.write_to_file(f)
    }
    pub fn write_output_files(&self, parent_filename: &str) -> Result<(), Error> {
        let path = Path::new(parent_filename);
        let basename = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or(general_err!("bad filename"))?;
        let mut pb = path.to_path_buf();
        pb.set_file_name(basename);
        pb.set_extension("lst");
        let mut file = File::create(&pb)?;
        self.write_listing(&mut file)?;
        info!("wrote listing file: {}", pb.display());
        pb.set_extension("sym");
        file = File::create(&pb)?;
        self.write_symbols(&mut file)?;
        info!("wrote symbol file: {}", pb.display());
        pb.set_extension("hex");
        file = File::create(&pb)?;
        self.write_hex(&mut file)?;
        file.flush()?;
        info!("wrote hex file: {}", pb.display());
        Ok(())
    }
}
