#![allow(non_snake_case, non_upper_case_globals)]

//! Intel HEX (I8HEX) reading and writing for TMS320 word images.
//!
//! Record addresses are byte addresses. A word at word address `a` occupies
//! bytes `2a` and `2a+1`, high byte first unless the image is little endian.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{self, Display};
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::memory::{words_from_bytes, ByteOrder};

pub mod HexRecordType {
    // only Data and EndOfFile are meaningful for I8HEX
    pub const Data: u8 = 0;
    pub const EndOfFile: u8 = 1;
}

/// Bytes per data record written by `from_words`.
const RECORD_BYTES: usize = 16;

lazy_static! {
    static ref RE_RECORD: Regex =
        Regex::new(r"(?i)^\s*:([0-9a-f]{2})([0-9a-f]{4})([0-9a-f]{2})((?:[0-9a-f]{2})*)([0-9a-f]{2})\s*$").unwrap();
}

pub struct HexRecord {
    pub data_size: u8,
    pub address: u16,
    pub record_type: u8,
    pub data: Vec<u8>,
    pub checksum: u8,
}

impl Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{:02X}{:04X}{:02X}", self.data_size, self.address, self.record_type)?;
        for b in &self.data {
            write!(f, "{:02X}", b)?;
        }
        writeln!(f, "{:02X}", self.checksum)
    }
}

use super::Error;

impl HexRecord {
    pub fn from_data(address: u16, data: &[u8]) -> Self {
        let mut h = HexRecord {
            data_size: data.len() as u8,
            address,
            record_type: HexRecordType::Data,
            data: data.to_vec(),
            checksum: 0,
        };
        h.checksum = h.calc_checksum();
        h
    }
    pub fn eof() -> Self {
        HexRecord {
            data_size: 0,
            address: 0,
            record_type: HexRecordType::EndOfFile,
            data: Vec::new(),
            checksum: 0xff,
        }
    }
    /// Parse one line. Lines that aren't records at all yield `Ok(None)`; records
    /// with a bad length or checksum are errors.
    pub fn from_str<S: AsRef<str>>(s: S) -> Result<Option<Self>, Error> {
        let Some(c) = RE_RECORD.captures(s.as_ref()) else {
            return Ok(None);
        };
        let field = |i: usize| c.get(i).map(|m| m.as_str()).unwrap_or("");
        let data_size = u8::from_str_radix(field(1), 16).map_err(|_| general_err!("bad record length"))?;
        let address = u16::from_str_radix(field(2), 16).map_err(|_| general_err!("bad record address"))?;
        let record_type = u8::from_str_radix(field(3), 16).map_err(|_| general_err!("bad record type"))?;
        let data = HexRecord::data_from_str(field(4))?;
        let checksum = u8::from_str_radix(field(5), 16).map_err(|_| general_err!("bad checksum"))?;
        if data.len() != data_size as usize {
            return Err(general_err!(format!(
                "record at {:04X} declares {} bytes but holds {}",
                address,
                data_size,
                data.len()
            )));
        }
        let h = HexRecord {
            data_size,
            address,
            record_type,
            data,
            checksum,
        };
        if h.calc_checksum() != h.checksum {
            return Err(general_err!(format!("checksum mismatch in record at {:04X}", address)));
        }
        Ok(Some(h))
    }
    fn data_from_str(s: &str) -> Result<Vec<u8>, Error> {
        (0..s.len() / 2)
            .map(|i| u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| general_err!("bad data byte")))
            .collect()
    }
    fn calc_checksum(&self) -> u8 {
        let mut sum = self.data_size as u16;
        sum += self.address >> 8;
        sum += self.address & 0xff;
        sum += self.record_type as u16;
        self.data.iter().for_each(|&b| sum += b as u16);
        (sum as u8).wrapping_neg()
    }
}

#[derive(Default)]
pub struct HexRecordCollection {
    records: Vec<HexRecord>,
    eof: bool,
}

impl HexRecordCollection {
    pub fn new() -> Self { Default::default() }
    pub fn from_str_iter<I, T>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut hf = HexRecordCollection::new();
        for s in iter {
            if let Some(hr) = HexRecord::from_str(s)? {
                hf.add_record(hr)?
            }
        }
        if hf.eof {
            Ok(hf)
        } else {
            Err(general_err!("EOF record not found in hex file"))
        }
    }
    /// Build the records for a contiguous word image starting at word address `origin`.
    pub fn from_words(origin: u32, words: &[u16], order: ByteOrder) -> Result<Self, Error> {
        let mut hf = HexRecordCollection::new();
        hf.add_words(origin, words, order)?;
        hf.add_eof();
        Ok(hf)
    }
    /// Append data records for one run of words. Called once per segment when an
    /// image has several origins.
    pub fn add_words(&mut self, origin: u32, words: &[u16], order: ByteOrder) -> Result<(), Error> {
        let end = (origin as usize + words.len()) * 2;
        if end > 0x10000 {
            return Err(general_err!(format!(
                "image ends at byte address {:X}, past the I8HEX limit",
                end
            )));
        }
        let bytes: Vec<u8> = words
            .iter()
            .flat_map(|w| match order {
                ByteOrder::BigEndian => w.to_be_bytes(),
                ByteOrder::LittleEndian => w.to_le_bytes(),
            })
            .collect();
        let base = origin as usize * 2;
        for (i, chunk) in bytes.chunks(RECORD_BYTES).enumerate() {
            self.add_record(HexRecord::from_data((base + i * RECORD_BYTES) as u16, chunk))?;
        }
        Ok(())
    }
    pub fn add_record(&mut self, h: HexRecord) -> Result<(), Error> {
        if self.eof {
            return Err(general_err!("records after EOF in hex file"));
        }
        if h.record_type == HexRecordType::EndOfFile {
            self.eof = true
        } else if h.record_type != HexRecordType::Data {
            return Err(general_err!(format!("unsupported hex record type {:02X}", h.record_type)));
        }
        self.records.push(h);
        Ok(())
    }
    pub fn add_eof(&mut self) {
        if !self.eof {
            self.eof = true;
            self.records.push(HexRecord::eof());
        }
    }
    /// Flatten the data records into one word image. Gaps between records are
    /// filled with zero words; the origin is the lowest address present.
    pub fn to_words(&self, order: ByteOrder) -> Result<(u32, Vec<u16>), Error> {
        let data = || self.records.iter().filter(|r| r.record_type == HexRecordType::Data);
        let Some(lo) = data().map(|r| r.address as usize).min() else {
            return Ok((0, Vec::new()));
        };
        if lo % 2 != 0 {
            return Err(general_err!(format!("hex data starts at odd byte address {:04X}", lo)));
        }
        let hi = data().map(|r| r.address as usize + r.data.len()).max().unwrap_or(lo);
        let mut bytes = vec![0u8; hi - lo];
        for r in data() {
            let start = r.address as usize - lo;
            bytes[start..start + r.data.len()].copy_from_slice(&r.data);
        }
        if bytes.len() % 2 != 0 {
            bytes.push(0);
        }
        Ok(((lo / 2) as u32, words_from_bytes(&bytes, order)?))
    }
    pub fn read_from_file(path: &Path) -> Result<Self, Error> {
        let file = BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<String>, io::Error>>()?;
        HexRecordCollection::from_str_iter(file)
    }
    pub fn write_to_file(&self, f: &mut dyn io::Write) -> Result<(), Error> {
        if !self.eof {
            return Err(general_err!("cannot write hex file without EOF record"));
        }
        for r in self.iter() {
            f.write_all(r.to_string().as_bytes())?;
        }
        Ok(())
    }
}

use std::ops::Deref;
impl Deref for HexRecordCollection {
    type Target = Vec<HexRecord>;
    fn deref(&self) -> &Self::Target { &self.records }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum() -> Result<(), Error> {
        let r = HexRecord::from_data(0x0010, &[0x7F, 0x80, 0xF9, 0x00]);
        assert_eq!(r.to_string(), ":040010007F80F900F4\n");
        let back = HexRecord::from_str(":040010007F80F900F4")?.ok_or(general_err!("no record"))?;
        assert_eq!(back.data, vec![0x7F, 0x80, 0xF9, 0x00]);
        assert!(HexRecord::from_str(":040010007F80F900F5").is_err());
        assert!(HexRecord::from_str("; not a record")?.is_none());
        Ok(())
    }

    #[test]
    fn word_image() -> Result<(), Error> {
        let words: Vec<u16> = (0..20u16).map(|i| 0x1000 + i).collect();
        let hf = HexRecordCollection::from_words(0x40, &words, ByteOrder::BigEndian)?;
        // 40 bytes split into 16 + 16 + 8, then EOF
        assert_eq!(hf.len(), 4);
        assert_eq!(hf[0].address, 0x80);
        assert_eq!(hf[2].data_size, 8);
        let mut out: Vec<u8> = Vec::new();
        hf.write_to_file(&mut out)?;
        let text = String::from_utf8(out).map_err(|_| general_err!("utf8"))?;
        assert!(text.ends_with(":00000001FF\n"));
        let read = HexRecordCollection::from_str_iter(text.lines())?;
        assert_eq!(read.to_words(ByteOrder::BigEndian)?, (0x40, words));
        Ok(())
    }

    #[test]
    fn gaps_and_bad_files() -> Result<(), Error> {
        let lines = [":02000000AABB99", ":02000600CCDD4F", ":00000001FF"];
        let hf = HexRecordCollection::from_str_iter(lines)?;
        assert_eq!(hf.to_words(ByteOrder::LittleEndian)?, (0, vec![0xBBAA, 0, 0, 0xDDCC]));
        assert!(HexRecordCollection::from_str_iter(&lines[..2]).is_err());
        assert!(HexRecordCollection::from_str_iter([":00000001FF", ":02000000AABB99"]).is_err());
        Ok(())
    }
}
