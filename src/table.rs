//! The generic opcode-table engine shared by every architecture.
//!
//! An architecture declares its instructions as static arrays of entries. Each array
//! becomes an [EntryPage] which adds a name-sorted index for the assembler direction,
//! and one or more pages are grouped under a [Cpu] for a specific CPU variant.
//!
//! Two searches are provided:
//!  - by name (assembler): binary search of the name index, then the first entry whose
//!    declared operand shapes are accepted by a caller-supplied predicate
//!  - by opcode (disassembler): linear scan of the entries in declaration order using
//!    an architecture-supplied [OpcodeMatcher]
//!
//! Pages are searched first to last, so a variant that shadows a base opcode lists its
//! own page first.
use super::*;

/// What the engine needs to know about a table row.
pub trait TableEntry: 'static {
    /// the mnemonic; tables use upper case
    fn name(&self) -> &'static str;
}

/// Decides whether an input opcode is an instance of a table entry. Implementations
/// apply the entry's declared mask and may widen it or validate reserved fields.
pub trait OpcodeMatcher<E> {
    fn matches(&self, opcode: u16, entry: &E) -> bool;
}

/// A table of entries plus a parallel index sorted by mnemonic.
pub struct EntryPage<E: 'static> {
    entries: &'static [E],
    index: Vec<u16>,
}

impl<E: TableEntry> EntryPage<E> {
    pub fn new(entries: &'static [E]) -> Self {
        let mut index: Vec<u16> = (0..entries.len() as u16).collect();
        // a stable sort keeps declaration order among entries sharing a mnemonic
        index.sort_by(|&a, &b| entries[a as usize].name().cmp(entries[b as usize].name()));
        EntryPage { entries, index }
    }
    pub fn entries(&self) -> &'static [E] { self.entries }
    pub fn index(&self) -> &[u16] { &self.index }
    /// All entries named `name` (which must be upper case), in declaration order.
    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'static E> + 'a {
        let entries = self.entries;
        let lo = self.index.partition_point(|&i| entries[i as usize].name() < name);
        self.index[lo..]
            .iter()
            .map(move |&i| &entries[i as usize])
            .take_while(move |e| e.name() == name)
    }
    /// Find the first entry named `name` that `accept` agrees with.
    pub fn search_name<A>(&self, name: &str, mut accept: A) -> Result<&'static E, ErrorKind>
    where
        A: FnMut(&E) -> bool,
    {
        let mut seen = false;
        for entry in self.entries_named(name) {
            seen = true;
            if accept(entry) {
                return Ok(entry);
            }
        }
        Err(if seen {
            ErrorKind::OperandNotAllowed
        } else {
            ErrorKind::UnknownInstruction
        })
    }
    /// Find the first entry, in declaration order, that `matcher` says `opcode` belongs to.
    pub fn search_opcode<M>(&self, opcode: u16, matcher: &M) -> Option<&'static E>
    where
        M: OpcodeMatcher<E> + ?Sized,
    {
        self.entries.iter().find(|e| matcher.matches(opcode, e))
    }
}

/// A CPU variant with its ordered list of pages.
pub struct Cpu<T: Copy + 'static, E: 'static> {
    pub variant: T,
    pub name: &'static str,
    pages: Vec<EntryPage<E>>,
}

impl<T: Copy + 'static, E: TableEntry> Cpu<T, E> {
    pub fn new(variant: T, name: &'static str, pages: &[&'static [E]]) -> Self {
        Cpu {
            variant,
            name,
            pages: pages.iter().map(|&p| EntryPage::new(p)).collect(),
        }
    }
    pub fn pages(&self) -> &[EntryPage<E>] { &self.pages }
    /// Search every page in order. A name found on some page but never accepted
    /// yields [ErrorKind::OperandNotAllowed] rather than [ErrorKind::UnknownInstruction].
    pub fn search_name<A>(&self, name: &str, mut accept: A) -> Result<&'static E, ErrorKind>
    where
        A: FnMut(&E) -> bool,
    {
        let name = name.to_ascii_uppercase();
        let mut error = ErrorKind::UnknownInstruction;
        for page in &self.pages {
            match page.search_name(&name, &mut accept) {
                Ok(entry) => return Ok(entry),
                Err(ErrorKind::OperandNotAllowed) => error = ErrorKind::OperandNotAllowed,
                Err(_) => {}
            }
        }
        Err(error)
    }
    pub fn search_opcode<M>(&self, opcode: u16, matcher: &M) -> Option<&'static E>
    where
        M: OpcodeMatcher<E> + ?Sized,
    {
        self.pages.iter().find_map(|p| p.search_opcode(opcode, matcher))
    }
    /// true if any page declares the mnemonic
    pub fn has_name(&self, name: &str) -> bool {
        let name = name.to_ascii_uppercase();
        self.pages.iter().any(|p| p.entries_named(&name).next().is_some())
    }
}

/// Look up a CPU by name, ignoring case and an optional vendor prefix.
pub fn search_cpu_name<'a, T: Copy, E: TableEntry>(
    cpus: &'a [Cpu<T, E>], name: &str, prefix: &str,
) -> Option<&'a Cpu<T, E>> {
    let upper = name.trim().to_ascii_uppercase();
    let bare = upper.strip_prefix(prefix).unwrap_or(&upper);
    cpus.iter().find(|cpu| cpu.name.eq_ignore_ascii_case(bare))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        op: u16,
        mask: u16,
        name: &'static str,
    }
    impl TableEntry for Row {
        fn name(&self) -> &'static str { self.name }
    }
    struct MaskOnly;
    impl OpcodeMatcher<Row> for MaskOnly {
        fn matches(&self, opcode: u16, e: &Row) -> bool { (opcode & !e.mask) == e.op }
    }

    static BASE: &[Row] = &[
        Row { op: 0x0000, mask: 0x0000, name: "NOP" },
        Row { op: 0x1000, mask: 0x00FF, name: "LD" },
        Row { op: 0x2000, mask: 0x00FF, name: "ADD" },
        Row { op: 0x2100, mask: 0x00FF, name: "ADD" },
        Row { op: 0x3000, mask: 0x0FFF, name: "B" },
    ];
    static OVERRIDE: &[Row] = &[Row { op: 0x3000, mask: 0x0000, name: "HALT" }];

    #[test]
    fn name_index_is_sorted_permutation() {
        let page = EntryPage::new(BASE);
        let mut seen: Vec<u16> = page.index().to_vec();
        seen.sort();
        assert_eq!(seen, (0..BASE.len() as u16).collect::<Vec<_>>());
        let names: Vec<&str> = page.index().iter().map(|&i| BASE[i as usize].name).collect();
        assert_eq!(names, vec!["ADD", "ADD", "B", "LD", "NOP"]);
        // duplicates stay in declaration order
        assert_eq!(page.index()[0], 2);
        assert_eq!(page.index()[1], 3);
    }

    #[test]
    fn name_search_distinguishes_errors() {
        let cpu = Cpu::new(0u8, "TOY", &[BASE]);
        let e = cpu.search_name("add", |e| e.op == 0x2100).map(|e| e.op);
        assert_eq!(e, Ok(0x2100));
        assert_eq!(
            cpu.search_name("ADD", |_| false).map(|e| e.op),
            Err(ErrorKind::OperandNotAllowed)
        );
        assert_eq!(
            cpu.search_name("SUB", |_| true).map(|e| e.op),
            Err(ErrorKind::UnknownInstruction)
        );
        assert!(cpu.has_name("ld"));
    }

    #[test]
    fn opcode_search_honors_page_order() {
        let base = Cpu::new(0u8, "BASE", &[BASE]);
        let ext = Cpu::new(1u8, "EXT", &[OVERRIDE, BASE]);
        assert_eq!(base.search_opcode(0x3000, &MaskOnly).map(|e| e.name), Some("B"));
        assert_eq!(ext.search_opcode(0x3000, &MaskOnly).map(|e| e.name), Some("HALT"));
        assert_eq!(ext.search_opcode(0x3001, &MaskOnly).map(|e| e.name), Some("B"));
        assert_eq!(ext.search_opcode(0x4000, &MaskOnly).map(|e| e.name), None);
    }

    #[test]
    fn cpu_name_ignores_case_and_prefix() {
        let cpus = vec![Cpu::new(0u8, "32010", &[BASE]), Cpu::new(1u8, "320C25", &[BASE])];
        assert_eq!(search_cpu_name(&cpus, "tms320c25", "TMS").map(|c| c.variant), Some(1));
        assert_eq!(search_cpu_name(&cpus, "32010", "TMS").map(|c| c.variant), Some(0));
        assert!(search_cpu_name(&cpus, "68000", "TMS").is_none());
    }
}
