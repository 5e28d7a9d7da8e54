use std::{convert::From, fmt};

/// Simple custom Error for the TMS320 tools
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// opcode matches no entry of the active CPU (or mnemonic is unknown)
    UnknownInstruction,
    /// the instruction needs more words than the memory can supply
    NoMemory,
    /// a decoded or assembled address/value lies outside the legal window
    OverflowRange,
    /// a register or control bit that does not exist on the active CPU
    IllegalRegister,
    /// operand text that can't be parsed
    UnknownOperand,
    /// mnemonic is known but the operand shapes are not accepted
    OperandNotAllowed,
    /// CPU variant name is not recognized
    UnsupportedCpu,
    /// error in syntax of assembly code
    Syntax,
    /// unresolved reference (e.g. undefined label)
    Reference,
    /// underlying io error
    IO,
    /// catch-all for other errors
    General,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::UnknownInstruction => "unknown instruction",
            ErrorKind::NoMemory => "no memory",
            ErrorKind::OverflowRange => "overflow range",
            ErrorKind::IllegalRegister => "illegal register",
            ErrorKind::UnknownOperand => "unknown operand",
            ErrorKind::OperandNotAllowed => "operand not allowed",
            ErrorKind::UnsupportedCpu => "unsupported CPU",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Reference => "undefined symbol",
            ErrorKind::IO => "io error",
            ErrorKind::General => "error",
        };
        f.write_str(s)
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: &str) -> Error {
        Error {
            kind,
            msg: String::from(message),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, e.to_string().as_str()) }
}
impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self { Error::new(kind, kind.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}: {}", red!("tms320::Error"), self.msg) }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.msg) }
}
impl std::error::Error for Error {}
