//! Register, port, control-bit and condition names.

/// Status bits that can be set or cleared individually.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlBit {
    Intm,
    Ovm,
    Cnf,
    Sxm,
    Hm,
    Tc,
    Xf,
    C,
}

pub const CONTROL_BITS: [ControlBit; 8] = [
    ControlBit::Intm,
    ControlBit::Ovm,
    ControlBit::Cnf,
    ControlBit::Sxm,
    ControlBit::Hm,
    ControlBit::Tc,
    ControlBit::Xf,
    ControlBit::C,
];

impl ControlBit {
    pub fn name(self) -> &'static str {
        match self {
            ControlBit::Intm => "INTM",
            ControlBit::Ovm => "OVM",
            ControlBit::Cnf => "CNF",
            ControlBit::Sxm => "SXM",
            ControlBit::Hm => "HM",
            ControlBit::Tc => "TC",
            ControlBit::Xf => "XF",
            ControlBit::C => "C",
        }
    }
    pub fn parse(name: &str) -> Option<ControlBit> {
        CONTROL_BITS.iter().copied().find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// `ARn`
pub fn ar_name(n: u16) -> String { format!("AR{}", n) }
/// `PAn`
pub fn port_name(n: u16) -> String { format!("PA{}", n) }

/// Parse `ARn` or `PAn` style names; returns the index.
pub fn parse_indexed(prefix: &str, text: &str) -> Option<u16> {
    let upper = text.to_ascii_uppercase();
    let digits = upper.strip_prefix(prefix)?;
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(ControlBit::parse("sxm"), Some(ControlBit::Sxm));
        assert_eq!(ControlBit::parse("ZZ"), None);
        assert_eq!(parse_indexed("AR", "ar7"), Some(7));
        assert_eq!(parse_indexed("PA", "PA15"), Some(15));
        assert_eq!(parse_indexed("AR", "ARX"), None);
        assert_eq!(parse_indexed("AR", "AR"), None);
        assert_eq!(ar_name(3), "AR3");
        assert_eq!(port_name(0), "PA0");
    }
}
