//! Operand parsing for the assembler.
//!
//! Grammar for one operand:
//! ```text
//!  operand  = indirect | "#" valexpr | "AR" n | "PA" n | condition | control-bit | valexpr
//!  indirect = "*" | "*+" | "*-" | "*0+" | "*0-" | "*BR0+" | "*BR0-"
//!  valexpr  = mulexpr [addop mulexpr]
//!  mulexpr  = unary [mulop unary]
//!  unary    = "-" unary | "+" unary | "~" unary | atom
//!  atom     = number | symbol | "$" | "(" valexpr ")"
//!  number   = /0x[0-9a-f]+/ | />[0-9a-f]+/ | /0b[01]+/ | /\d+/
//! ```
//! `$` is the address of the instruction being assembled. A symbol that the
//! table can't resolve evaluates to 0 and marks the operand undefined; the
//! driver needs the instruction's size before every label is known.
use super::cc;
use super::flags::AddrMode;
use super::registers::{parse_indexed, ControlBit};
use crate::symbols::SymbolTable;
use crate::ErrorKind;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_INDIRECT: Regex = Regex::new(r"(?i)^\*(\+|-|0\+|0-|BR0\+|BR0-)?$").unwrap();
    static ref RE_NUMBER: Regex = Regex::new(r"(?i)^(?:0x([0-9a-f]+)|>([0-9a-f]+)|0b([01]+)|([0-9]+))").unwrap();
    static ref RE_SYMBOL: Regex = Regex::new(r"(?i)^[a-z_.][a-z0-9_.$]*").unwrap();
}

/// A fully evaluated expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Value {
    pub value: i32,
    /// a symbol in the expression had no definition
    pub undefined: bool,
}

/// One parsed operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    /// one of the parser-only shapes (indirect, Cnst, Imm, Arx, Pan, Ccn, Ctln)
    pub mode: AddrMode,
    /// numeric value, or the register/port index
    pub val: i32,
    /// upper-case name for Ccn and Ctln
    pub name: String,
    pub undefined: bool,
}

impl Operand {
    fn new(mode: AddrMode, val: i32) -> Self {
        Operand {
            mode,
            val,
            name: String::new(),
            undefined: false,
        }
    }
    fn named(mode: AddrMode, name: &str) -> Self {
        Operand {
            mode,
            val: 0,
            name: name.to_ascii_uppercase(),
            undefined: false,
        }
    }
    pub fn is_numeric(&self) -> bool { matches!(self.mode, AddrMode::Cnst | AddrMode::Imm) }
    pub fn is_condition(&self) -> bool { cc::is_condition(&self.name) }
    pub fn control_bit(&self) -> Option<ControlBit> {
        if self.name.is_empty() {
            None
        } else {
            ControlBit::parse(&self.name)
        }
    }
}

/// Split a comma separated operand field. Commas inside parentheses don't count.
pub fn split_operands(text: &str) -> Result<Vec<&str>, ErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    if depth != 0 || parts.iter().any(|p| p.is_empty()) {
        return Err(ErrorKind::UnknownOperand);
    }
    Ok(parts)
}

/// Parse every operand of an instruction.
pub fn parse_operands(
    text: &str, symtab: Option<&dyn SymbolTable>, location: u32,
) -> Result<Vec<Operand>, ErrorKind> {
    split_operands(text)?
        .into_iter()
        .map(|s| parse_operand(s, symtab, location))
        .collect()
}

pub fn parse_operand(text: &str, symtab: Option<&dyn SymbolTable>, location: u32) -> Result<Operand, ErrorKind> {
    let text = text.trim();
    if let Some(c) = RE_INDIRECT.captures(text) {
        let modify = match c.get(1).map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
            None => AddrMode::Arp,
            Some("+") => AddrMode::Inc,
            Some("-") => AddrMode::Dec,
            Some("0+") => AddrMode::Inc0,
            Some("0-") => AddrMode::Dec0,
            Some("BR0+") => AddrMode::Ibr0,
            _ => AddrMode::Dbr0,
        };
        return Ok(Operand::new(modify, 0));
    }
    if let Some(expr) = text.strip_prefix('#') {
        let v = parse_value(expr, symtab, location)?;
        let mut op = Operand::new(AddrMode::Imm, v.value);
        op.undefined = v.undefined;
        return Ok(op);
    }
    if let Some(n) = parse_indexed("AR", text) {
        return Ok(Operand::new(AddrMode::Arx, n as i32));
    }
    if let Some(n) = parse_indexed("PA", text) {
        return Ok(Operand::new(AddrMode::Pan, n as i32));
    }
    // reserved words; C and TC are both conditions and control bits
    if cc::is_condition(text) {
        return Ok(Operand::named(AddrMode::Ccn, text));
    }
    if ControlBit::parse(text).is_some() {
        return Ok(Operand::named(AddrMode::Ctln, text));
    }
    let v = parse_value(text, symtab, location)?;
    let mut op = Operand::new(AddrMode::Cnst, v.value);
    op.undefined = v.undefined;
    Ok(op)
}

/// Evaluate an expression.
pub fn parse_value(text: &str, symtab: Option<&dyn SymbolTable>, location: u32) -> Result<Value, ErrorKind> {
    let mut e = Expr {
        text: text.trim(),
        pos: 0,
        symtab,
        location,
        undefined: false,
    };
    if e.text.is_empty() {
        return Err(ErrorKind::UnknownOperand);
    }
    let value = e.sum()?;
    e.skip_ws();
    if e.pos != e.text.len() {
        return Err(ErrorKind::UnknownOperand);
    }
    Ok(Value {
        value,
        undefined: e.undefined,
    })
}

struct Expr<'a> {
    text: &'a str,
    pos: usize,
    symtab: Option<&'a dyn SymbolTable>,
    location: u32,
    undefined: bool,
}

impl<'a> Expr<'a> {
    fn rest(&self) -> &'a str { &self.text[self.pos..] }
    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }
    fn sum(&mut self) -> Result<i32, ErrorKind> {
        let mut v = self.product()?;
        loop {
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    v = v.wrapping_add(self.product()?);
                }
                Some('-') => {
                    self.pos += 1;
                    v = v.wrapping_sub(self.product()?);
                }
                _ => return Ok(v),
            }
        }
    }
    fn product(&mut self) -> Result<i32, ErrorKind> {
        let mut v = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(c @ ('*' | '/' | '%')) => c,
                _ => return Ok(v),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            v = match op {
                '*' => v.wrapping_mul(rhs),
                _ if rhs == 0 => return Err(ErrorKind::OverflowRange),
                '/' => v.wrapping_div(rhs),
                _ => v.wrapping_rem(rhs),
            };
        }
    }
    fn unary(&mut self) -> Result<i32, ErrorKind> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(self.unary()?.wrapping_neg())
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            Some('~') => {
                self.pos += 1;
                Ok(!self.unary()?)
            }
            _ => self.atom(),
        }
    }
    fn atom(&mut self) -> Result<i32, ErrorKind> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let v = self.sum()?;
                if self.peek() != Some(')') {
                    return Err(ErrorKind::UnknownOperand);
                }
                self.pos += 1;
                Ok(v)
            }
            Some('$') => {
                self.pos += 1;
                Ok(self.location as i32)
            }
            Some(_) => {
                if let Some(c) = RE_NUMBER.captures(self.rest()) {
                    self.pos += c[0].len();
                    let (digits, radix) = if let Some(m) = c.get(1).or_else(|| c.get(2)) {
                        (m.as_str(), 16)
                    } else if let Some(m) = c.get(3) {
                        (m.as_str(), 2)
                    } else {
                        (&c[4], 10)
                    };
                    let v = u32::from_str_radix(digits, radix).map_err(|_| ErrorKind::OverflowRange)?;
                    return Ok(v as i32);
                }
                if let Some(m) = RE_SYMBOL.find(self.rest()) {
                    self.pos += m.end();
                    let name = m.as_str();
                    return match self.symtab.and_then(|s| s.lookup_name(name)) {
                        Some(v) => Ok(v as i32),
                        None => {
                            self.undefined = true;
                            Ok(0)
                        }
                    };
                }
                Err(ErrorKind::UnknownOperand)
            }
            None => Err(ErrorKind::UnknownOperand),
        }
    }
}
