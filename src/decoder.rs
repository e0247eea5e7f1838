//! Instruction-line decoding.
//!
//! Grammar accepted by [`LineDecoder`]:
//!
//! ```text
//! [label:] MNEMONIC [operand {, operand}] [; comment]
//! ```
//!
//! - Everything from the comment character (`;` by default) on is dropped.
//!   Letters, digits, whitespace and `# , : + - _` cannot be the delimiter.
//! - A blank line, or a line holding only a label, decodes to `None`. A label
//!   that is not an identifier is an `InvalidLabel` error.
//! - The mnemonic is the first whitespace-delimited token.
//! - Operands are separated by commas and trimmed; an empty operand is an error.
//! - An operand starting with `#`, a digit, `+` or `-` is an immediate;
//!   anything else must be a register name (`[A-Za-z_][A-Za-z0-9_]*`).
//! - Immediates: `42`, `42d`, `-7`, `0x2A`, `2Ah`, `101b`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chip::SimError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand {
    Register(String),
    Immediate(i64),
}

impl Operand {
    pub fn as_register(&self) -> Option<&str> {
        match self {
            Operand::Register(name) => Some(name),
            Operand::Immediate(_) => None,
        }
    }

    pub fn as_immediate(&self) -> Option<i64> {
        match self {
            Operand::Immediate(v) => Some(*v),
            Operand::Register(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(name) => f.write_str(name),
            Operand::Immediate(v) => write!(f, "#{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub label: Option<String>,
    pub mnemonic: String,
    pub operands: Vec<Operand>,
}

pub trait Decoder {
    /// Split one source line into mnemonic and operands. `Ok(None)` means the
    /// line carries no instruction.
    fn decode(&self, line: &str) -> Result<Option<Decoded>, SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDecoder {
    comment: char,
}

/// Characters the line grammar itself uses.
fn reserved(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '#' | ',' | ':' | '+' | '-' | '_')
}

impl LineDecoder {
    pub fn new(comment: char) -> Result<Self, SimError> {
        if reserved(comment) {
            return Err(SimError::InvalidComment { comment });
        }
        Ok(Self { comment })
    }

    pub fn comment(&self) -> char {
        self.comment
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self { comment: ';' }
    }
}

impl Decoder for LineDecoder {
    fn decode(&self, line: &str) -> Result<Option<Decoded>, SimError> {
        let code = match line.find(self.comment) {
            Some(p) => &line[..p],
            None => line,
        };
        let mut rest = code.trim();
        if rest.is_empty() {
            return Ok(None);
        }

        let mut label = None;
        let (first, tail) = split_token(rest);
        if let Some(name) = first.strip_suffix(':') {
            if !is_ident(name) {
                return Err(SimError::InvalidLabel {
                    label: name.to_string(),
                });
            }
            label = Some(name.to_string());
            rest = tail;
            if rest.is_empty() {
                return Ok(None);
            }
        }

        let (mnemonic, tail) = split_token(rest);
        let operands = if tail.is_empty() {
            Vec::new()
        } else {
            tail.split(',')
                .map(|tok| parse_operand(tok.trim()))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Some(Decoded {
            label,
            mnemonic: mnemonic.to_string(),
            operands,
        }))
    }
}

fn split_token(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_error(token: &str, reason: &'static str) -> SimError {
    SimError::OperandParse {
        token: token.to_string(),
        reason,
    }
}

pub fn parse_operand(tok: &str) -> Result<Operand, SimError> {
    if tok.is_empty() {
        return Err(parse_error(tok, "empty operand"));
    }
    if let Some(num) = tok.strip_prefix('#') {
        return parse_number(num).map(Operand::Immediate);
    }
    match tok.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => {
            parse_number(tok).map(Operand::Immediate)
        }
        _ if is_ident(tok) => Ok(Operand::Register(tok.to_string())),
        _ => Err(parse_error(tok, "not a register name or number")),
    }
}

fn strip_radix_suffix(s: &str, suffix: char) -> Option<&str> {
    s.strip_suffix(suffix)
        .or_else(|| s.strip_suffix(suffix.to_ascii_uppercase()))
}

/// Parse a signed number in any of the accepted radix notations.
pub fn parse_number(s: &str) -> Result<i64, SimError> {
    let (neg, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (digits, radix) = if let Some(h) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (h, 16)
    } else if let Some(h) = strip_radix_suffix(body, 'h') {
        (h, 16)
    } else if let Some(b) = strip_radix_suffix(body, 'b')
        .filter(|b| !b.is_empty() && b.chars().all(|c| c == '0' || c == '1'))
    {
        (b, 2)
    } else if let Some(d) = strip_radix_suffix(body, 'd') {
        (d, 10)
    } else {
        (body, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(parse_error(s, "malformed number"));
    }
    let mag = i128::from_str_radix(digits, radix).map_err(|_| parse_error(s, "number out of range"))?;
    let v = if neg { -mag } else { mag };
    i64::try_from(v).map_err(|_| parse_error(s, "number out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix_notations() {
        assert_eq!(parse_number("42").unwrap(), 42);
        assert_eq!(parse_number("42d").unwrap(), 42);
        assert_eq!(parse_number("-7").unwrap(), -7);
        assert_eq!(parse_number("+7").unwrap(), 7);
        assert_eq!(parse_number("0x2A").unwrap(), 0x2A);
        assert_eq!(parse_number("2Ah").unwrap(), 0x2A);
        assert_eq!(parse_number("0FFH").unwrap(), 0xFF);
        assert_eq!(parse_number("1Bh").unwrap(), 0x1B);
        assert_eq!(parse_number("101b").unwrap(), 5);
        assert_eq!(parse_number("-0x10").unwrap(), -16);
    }

    #[test]
    fn rejects_malformed_numbers() {
        for bad in ["", "-", "0x", "h", "2b", "12z", "--5", "0x-5", "99999999999999999999"] {
            assert!(parse_number(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn split_token_eats_inner_whitespace() {
        assert_eq!(split_token("LD   #5, A"), ("LD", "#5, A"));
        assert_eq!(split_token("NOP"), ("NOP", ""));
    }
}
