use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chip::SimError;

/// Widest register the `i64` container can hold with its sign bit clear.
pub const MAX_BITS: u32 = 63;

/// Display radix for register dumps. The numeric codes are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    Decimal = 0,
    Hex = 1,
    Binary = 2,
}

impl Base {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Base::Decimal),
            1 => Some(Base::Hex),
            2 => Some(Base::Binary),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl FromStr for Base {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "dec" | "decimal" => Ok(Base::Decimal),
            "h" | "hex" | "hexadecimal" => Ok(Base::Hex),
            "b" | "bin" | "binary" => Ok(Base::Binary),
            other => Err(format!("unknown base `{other}` (expected dec, hex or bin)")),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Base::Decimal => "dec",
            Base::Hex => "hex",
            Base::Binary => "bin",
        })
    }
}

/// What a write does with bits shifted past the register's nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the low `num_bits` bits.
    #[default]
    Wrap,
    /// Clamp to the all-ones pattern of the register width.
    Saturate,
    /// `try_write` fails with `RegisterOverflow`; plain `write` wraps.
    Reject,
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access: u8 {
const READ = 1 << 0;
const WRITE = 1 << 1;
}
}

impl Default for Access {
    fn default() -> Self {
        Access::READ | Access::WRITE
    }
}

fn ones(bits: u32) -> i64 {
    ((1u64 << bits) - 1) as i64
}

/// A hardware register: `num_bits` of storage reached through a data bus
/// `bus_width` bits wide.
///
/// Contents always satisfy `0 <= value <= bit_mask`; every mutation goes
/// through [`Register::write`] or [`Register::try_write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    name: String,
    short_name: String,
    num_bits: u32,
    bus_width: u32,
    value: i64,
    bit_mask: i64,
    bus_mask: i64,
    overflow: OverflowPolicy,
    access: Access,
}

impl Register {
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        num_bits: u32,
        bus_width: u32,
    ) -> Result<Self, SimError> {
        let name = name.into();
        if num_bits == 0 || num_bits > MAX_BITS {
            return Err(SimError::InvalidRegister {
                name,
                reason: format!("width {num_bits} outside 1..={MAX_BITS}"),
            });
        }
        if bus_width == 0 || bus_width > num_bits {
            return Err(SimError::InvalidRegister {
                name,
                reason: format!("bus width {bus_width} outside 1..={num_bits}"),
            });
        }
        Ok(Self {
            name,
            short_name: short_name.into(),
            num_bits,
            bus_width,
            value: 0,
            bit_mask: ones(num_bits),
            bus_mask: ones(bus_width),
            overflow: OverflowPolicy::default(),
            access: Access::default(),
        })
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    pub fn bus_width(&self) -> u32 {
        self.bus_width
    }

    pub fn bit_mask(&self) -> i64 {
        self.bit_mask
    }

    pub fn bus_mask(&self) -> i64 {
        self.bus_mask
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Full-width contents, not truncated to the bus.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Contents sign-extended from `num_bits`.
    pub fn signed(&self) -> i64 {
        let s = 64 - self.num_bits;
        (self.value << s) >> s
    }

    /// True when `ident` is this register's name or short name, ignoring ASCII case.
    pub fn matches(&self, ident: &str) -> bool {
        self.name.eq_ignore_ascii_case(ident) || self.short_name.eq_ignore_ascii_case(ident)
    }

    /// Positive `amount` shifts left, negative shifts right arithmetically by
    /// the magnitude. Shifts of 64 or more saturate: left gives 0, right gives
    /// the sign fill.
    pub fn shift(value: i64, amount: i32) -> i64 {
        let n = amount.unsigned_abs();
        if amount > 0 {
            if n >= 64 {
                0
            } else {
                value << n
            }
        } else if amount < 0 {
            value >> n.min(63)
        } else {
            value
        }
    }

    /// Latch `input` through the bus, shift it, and store it within `num_bits`.
    ///
    /// Never fails. `Reject` registers wrap here; use [`Register::try_write`]
    /// to have the policy enforced.
    pub fn write(&mut self, input: i64, shift: i32) {
        let masked = input & self.bus_mask;
        self.value = self.reduce(masked, shift);
        tracing::trace!(register = %self.name, input, shift, value = self.value, "write");
    }

    /// Like [`Register::write`], but a `Reject` register refuses a value that
    /// no longer fits after the shift and keeps its old contents.
    pub fn try_write(&mut self, input: i64, shift: i32) -> Result<(), SimError> {
        let masked = input & self.bus_mask;
        if self.overflow == OverflowPolicy::Reject && self.out_of_range(masked, shift) {
            return Err(SimError::RegisterOverflow {
                register: self.name.clone(),
                value: input,
                shift,
            });
        }
        self.write(input, shift);
        Ok(())
    }

    /// Fit an arithmetic result to the register width before it is stored.
    ///
    /// `Wrap` keeps the low 64 bits and leaves narrowing to the write.
    /// `Saturate` clamps to `0..=bit_mask`. `Reject` fails with
    /// `RegisterOverflow` when the result falls outside that range.
    pub fn settle(&self, result: i128) -> Result<i64, SimError> {
        let max = i128::from(self.bit_mask);
        match self.overflow {
            OverflowPolicy::Wrap => Ok(result as i64),
            OverflowPolicy::Saturate => Ok(result.clamp(0, max) as i64),
            OverflowPolicy::Reject if (0..=max).contains(&result) => Ok(result as i64),
            OverflowPolicy::Reject => Err(SimError::RegisterOverflow {
                register: self.name.clone(),
                value: result.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
                shift: 0,
            }),
        }
    }

    /// Shift the contents, then truncate to the bus.
    pub fn read(&self, shift: i32) -> i64 {
        Self::shift(self.value, shift) & self.bus_mask
    }

    /// Render the full-width contents with a radix suffix (`d`, `h` or `b`).
    pub fn format(&self, base: Base) -> String {
        format_value(self.value, base)
    }

    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            name: self.name.clone(),
            short_name: self.short_name.clone(),
            bits: self.num_bits,
            bus_width: self.bus_width,
            value: self.value,
        }
    }

    fn out_of_range(&self, masked: i64, shift: i32) -> bool {
        // masked is non-negative, so only left shifts can leave the register
        if shift <= 0 || masked == 0 {
            return false;
        }
        if shift >= 64 {
            return true;
        }
        (i128::from(masked) << shift) > i128::from(self.bit_mask)
    }

    fn reduce(&self, masked: i64, shift: i32) -> i64 {
        match self.overflow {
            OverflowPolicy::Saturate if self.out_of_range(masked, shift) => self.bit_mask,
            _ => Self::shift(masked, shift) & self.bit_mask,
        }
    }
}

/// Render `value` in `base`. Hex digits are lowercase and zero-padded to an
/// even count; a negative value keeps its sign ahead of the digits.
pub fn format_value(value: i64, base: Base) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let mag = value.unsigned_abs();
    match base {
        Base::Decimal => format!("{sign}{mag}d"),
        Base::Hex => {
            let mut digits = format!("{mag:x}");
            if digits.len() % 2 != 0 {
                digits.insert(0, '0');
            }
            format!("{sign}{digits}h")
        }
        Base::Binary => format!("{sign}{mag:b}b"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub name: String,
    pub short_name: String,
    pub bits: u32,
    pub bus_width: u32,
    pub value: i64,
}
