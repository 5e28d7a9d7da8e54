use super::*;
use std::io::BufRead;

/// Address to name lookup (disassembler) and name to address lookup (assembler).
pub trait SymbolTable {
    fn lookup_value(&self, addr: u32) -> Option<&str>;
    fn lookup_name(&self, name: &str) -> Option<u32>;
}

#[derive(Default, PartialEq, Debug)]
pub struct SymbolMap {
    addr_to_sym: HashMap<u32, Vec<String>>,
    sym_to_addr: HashMap<String, u32>,
}

impl SymbolMap {
    pub fn new() -> Self { Default::default() }
    pub fn len(&self) -> usize { self.sym_to_addr.len() }
    pub fn add_symbol(&mut self, addr: u32, name: &str) {
        if let Some(names) = self.addr_to_sym.get_mut(&addr) {
            // address is already in the symbol table; just add this name to the list
            names.push(name.to_string());
        } else {
            self.addr_to_sym.insert(addr, vec![name.to_string()]);
        }
        self.sym_to_addr.insert(name.to_string(), addr);
    }
    /// Symbols sorted by address, first name at each address only.
    pub fn sorted(&self) -> Vec<(u32, &str)> {
        let mut v: Vec<(u32, &str)> = self
            .addr_to_sym
            .iter()
            .filter_map(|(a, n)| n.first().map(|s| (*a, s.as_str())))
            .collect();
        v.sort();
        v
    }
    /// Every name with its value, unordered.
    pub fn all(&self) -> Vec<(u32, &str)> { self.sym_to_addr.iter().map(|(n, a)| (*a, n.as_str())).collect() }
    /// Read a symbol file with one `ADDR,NAME` pair (hex address) per line.
    pub fn load(filename: &str) -> Result<Self, Error> {
        let f = std::fs::File::open(filename)
            .map_err(|e| Error::new(ErrorKind::IO, &format!("Failed to open symbol file {}: {}", filename, e)))?;
        let mut map = SymbolMap::new();
        for line in std::io::BufReader::new(f).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let comps: Vec<&str> = line.split(',').collect();
            if comps.len() != 2 {
                return Err(Error::new(ErrorKind::IO, "Invalid symbol file format"));
            }
            let addr = u32::from_str_radix(comps[0].trim(), 16).map_err(|_| {
                Error::new(
                    ErrorKind::IO,
                    &format!("Bad format for address in symbol file: {}", comps[0]),
                )
            })?;
            map.add_symbol(addr, comps[1].trim());
        }
        Ok(map)
    }
}

impl SymbolTable for SymbolMap {
    fn lookup_value(&self, addr: u32) -> Option<&str> {
        self.addr_to_sym.get(&addr).and_then(|v| v.first()).map(|s| s.as_str())
    }
    fn lookup_name(&self, name: &str) -> Option<u32> { self.sym_to_addr.get(name).copied() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_directions() {
        let mut syms = SymbolMap::new();
        syms.add_symbol(0x20, "LOOP");
        syms.add_symbol(0x20, "AGAIN");
        syms.add_symbol(0x08, "START");
        assert_eq!(syms.lookup_value(0x20), Some("LOOP"));
        assert_eq!(syms.lookup_name("AGAIN"), Some(0x20));
        assert_eq!(syms.lookup_value(0x21), None);
        assert_eq!(syms.sorted(), vec![(0x08, "START"), (0x20, "LOOP")]);
        assert_eq!(syms.len(), 3);
    }
}
