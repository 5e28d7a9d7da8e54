//! Compound branch conditions: `TP(2) ZLVC-mask(4) ZLVC-value(4)` in bits 9-0.
//!
//! Tokens are rendered in a fixed priority order: the TP test, then the
//! accumulator comparison (Z and L together read as one relation), then
//! overflow, then carry.
use crate::ErrorKind;

const Z: u16 = 8;
const L: u16 = 4;
const V: u16 = 2;
const C: u16 = 1;

const TP_BIO: u16 = 0;
const TP_TC: u16 = 1;
const TP_NTC: u16 = 2;
const TP_NONE: u16 = 3;

/// Render the condition field (bits 9-0 of the opcode).
pub fn decode(field: u16) -> String {
    let tp = (field >> 8) & 3;
    let mask = (field >> 4) & 0xF;
    let cond = field & 0xF;
    let mut out = String::new();
    let mut push = |s: &str| {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(s);
    };
    match tp {
        TP_BIO => push("BIO"),
        TP_TC => push("TC"),
        TP_NTC => push("NTC"),
        _ if mask == 0 => push("UNC"),
        _ => {}
    }
    if mask & (Z | L) == Z | L {
        push(match cond & (Z | L) {
            0x0C => "LEQ",
            Z => "GEQ",
            L => "LT",
            _ => "GT",
        });
    } else if mask & Z != 0 {
        push(if cond & Z != 0 { "EQ" } else { "NEQ" });
    } else if mask & L != 0 {
        push(if cond & L != 0 { "LT" } else { "GEQ" });
    }
    if mask & V != 0 {
        push(if cond & V != 0 { "OV" } else { "NOV" });
    }
    if mask & C != 0 {
        push(if cond & C != 0 { "C" } else { "NC" });
    }
    out
}

/// true if `name` is a condition token
pub fn is_condition(name: &str) -> bool { token(name).is_some() }

// (group, tp, mask, cond); group 0 is TP, 1 is Z/L, 2 is V, 3 is C
fn token(name: &str) -> Option<(u8, u16, u16, u16)> {
    let t = match name.to_ascii_uppercase().as_str() {
        "UNC" => (0, TP_NONE, 0, 0),
        "BIO" => (0, TP_BIO, 0, 0),
        "TC" => (0, TP_TC, 0, 0),
        "NTC" => (0, TP_NTC, 0, 0),
        "EQ" => (1, TP_NONE, Z, Z),
        "NEQ" => (1, TP_NONE, Z, 0),
        "LT" => (1, TP_NONE, L, L),
        "GEQ" => (1, TP_NONE, L, 0),
        "LEQ" => (1, TP_NONE, Z | L, Z | L),
        "GT" => (1, TP_NONE, Z | L, 0),
        "OV" => (2, TP_NONE, V, V),
        "NOV" => (2, TP_NONE, V, 0),
        "C" => (3, TP_NONE, C, C),
        "NC" => (3, TP_NONE, C, 0),
        _ => return None,
    };
    Some(t)
}

/// Combine condition tokens into the 10-bit field. Two tokens from the same
/// group, or UNC with anything else, can't be combined.
pub fn encode<S: AsRef<str>>(names: &[S]) -> Result<u16, ErrorKind> {
    let mut used = [false; 4];
    let mut tp = TP_NONE;
    let mut mask = 0u16;
    let mut cond = 0u16;
    for name in names {
        let name = name.as_ref();
        let (group, t, m, c) = token(name).ok_or(ErrorKind::UnknownOperand)?;
        if used[group as usize] {
            return Err(ErrorKind::OperandNotAllowed);
        }
        used[group as usize] = true;
        if name.eq_ignore_ascii_case("UNC") && names.len() > 1 {
            return Err(ErrorKind::OperandNotAllowed);
        }
        if group == 0 {
            tp = t;
        }
        mask |= m;
        cond |= c;
    }
    Ok((tp << 8) | (mask << 4) | cond)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order() {
        assert_eq!(decode(0x3FF), "LEQ,OV,C");
        assert_eq!(decode(0x1F0), "TC,GT,NOV,NC");
        assert_eq!(decode(0x300), "UNC");
        assert_eq!(decode(0x000), "BIO");
        assert_eq!(decode(0x288), "NTC,EQ");
        assert_eq!(decode(0x380), "NEQ");
        assert_eq!(decode(0x344), "LT");
        assert_eq!(decode(0x340), "GEQ");
        assert_eq!(decode(0x3C8), "GEQ");
        assert_eq!(decode(0x3C4), "LT");
        assert_eq!(decode(0x322), "OV");
        assert_eq!(decode(0x310), "NC");
    }

    #[test]
    fn encode_tokens() {
        assert_eq!(encode(&["LEQ", "OV", "C"]), Ok(0x3FF));
        assert_eq!(encode(&["UNC"]), Ok(0x300));
        assert_eq!(encode(&["tc", "eq"]), Ok(0x188));
        assert_eq!(encode(&["EQ", "LT"]), Err(ErrorKind::OperandNotAllowed));
        assert_eq!(encode(&["UNC", "C"]), Err(ErrorKind::OperandNotAllowed));
        assert_eq!(encode(&["FOO"]), Err(ErrorKind::UnknownOperand));
        assert!(is_condition("nov"));
        for names in [&["GT", "NOV", "NC"][..], &["BIO", "NEQ"][..], &["NTC", "C"][..]] {
            assert_eq!(decode(encode(names).unwrap()), names.join(","));
        }
    }
}
