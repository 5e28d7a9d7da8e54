use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;

use crate::memory::ByteOrder;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// Assembly (.asm, .s) file to assemble or machine code (.hex, .bin) to disassemble
    pub file: String,

    /// CPU variant (32010, 32015, 32020, 320C25, 320C26, 320C20X; "TMS" prefix optional)
    #[arg(long, default_value = "32010")]
    pub cpu: String,

    /// Word address of the first word of a binary image (hex ok with '0x')
    #[arg(long,value_parser=maybe_hex::<u32>, default_value_t=0_u32)]
    pub org: u32,

    /// Render auxiliary registers as plain numbers rather than ARn
    #[arg(long)]
    pub no_ar_name: bool,

    /// Render I/O ports as plain numbers rather than PAn
    #[arg(long)]
    pub no_port_name: bool,

    /// Binary input stores the low byte of each word first
    #[arg(long)]
    pub little_endian: bool,

    /// Symbol file (ADDR,NAME per line) used to render program addresses
    #[arg(short, long)]
    pub sym: Option<String>,

    /// Dump the program listing to stdout
    #[arg(short, long)]
    pub list: bool,

    /// Write output files after assembly (.lst, .sym, .hex)
    #[arg(short, long)]
    pub write_files: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test", "test"])
    } else {
        Args::parse()
    };
}

pub fn use_ar_name() -> bool { !ARGS.no_ar_name }
pub fn use_port_name() -> bool { !ARGS.no_port_name }
pub fn byte_order() -> ByteOrder {
    if ARGS.little_endian {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    }
}
